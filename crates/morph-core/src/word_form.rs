//! Word-form output record (§3) and the token-level container it lives in.

use std::sync::Arc;

use crate::categories::{BaseMorphInfo, Case, Class, Gender, Language, Number};
use crate::misc::MiscInfo;

/// A single ranked analysis of a word: base morph info plus the lemma
/// machinery and confidence metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct WordForm {
    pub base: BaseMorphInfo,
    pub tail: String,
    pub normal_tail: String,
    pub full_normal_tail: String,
    /// Short lemma.
    pub normal_case: String,
    /// Long lemma.
    pub normal_full: String,
    pub misc: Option<Arc<MiscInfo>>,
    /// 0 when taken straight from the dictionary; positive when guessed by
    /// the reverse trie (larger = less confident).
    pub undef_coef: i32,
    pub rule_id: Option<i32>,
    pub variant_id: Option<i16>,
}

impl WordForm {
    pub fn is_in_dictionary(&self) -> bool {
        self.undef_coef == 0
    }

    pub fn class(&self) -> Class {
        self.base.class
    }
    pub fn gender(&self) -> Gender {
        self.base.gender
    }
    pub fn number(&self) -> Number {
        self.base.number
    }
    pub fn case(&self) -> Case {
        self.base.case
    }
    pub fn language(&self) -> Language {
        self.base.language
    }

    /// The dedup key used by Phase A (§4.5): (class, gender, number, case,
    /// lemma). Lemma is taken as `normal_full` when present, else
    /// `normal_case`.
    pub fn dedup_key(&self) -> (Class, Gender, Number, Case, &str) {
        let lemma = if !self.normal_full.is_empty() {
            self.normal_full.as_str()
        } else {
            self.normal_case.as_str()
        };
        (self.base.class, self.base.gender, self.base.number, self.base.case, lemma)
    }

    /// Ordinary method, not a trait: returns false when there is no misc
    /// record to check against (§9 polymorphism note).
    pub fn contains_attr(&self, attr: &str, class: Option<Class>) -> bool {
        match &self.misc {
            Some(misc) if misc.contains_attr(attr) => match class {
                None => true,
                Some(c) if c.is_empty() => true,
                Some(c) => self.base.class == c || self.base.class.contains(c),
            },
            _ => false,
        }
    }
}

/// Per-token casing and script fingerprint (§4.2 CharsInfo). At most one of
/// the four casing bits is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharsInfo {
    pub is_letter: bool,
    pub is_latin_letter: bool,
    pub is_cyrillic_letter: bool,
    pub is_all_upper: bool,
    pub is_all_lower: bool,
    pub is_capital_upper: bool,
    pub is_last_lower: bool,
}

impl CharsInfo {
    /// Compute the descriptor from a token's source characters.
    pub fn compute(chars: &[char]) -> CharsInfo {
        use crate::character::{is_cyrillic, is_latin, is_letter, is_lower, is_upper};

        let mut info = CharsInfo::default();
        if chars.is_empty() {
            return info;
        }

        let letters: Vec<char> = chars.iter().copied().filter(|&c| is_letter(c)).collect();
        if letters.is_empty() {
            return info;
        }
        info.is_letter = true;
        info.is_latin_letter = letters.iter().any(|&c| is_latin(c));
        info.is_cyrillic_letter = letters.iter().any(|&c| is_cyrillic(c));

        let all_upper = letters.iter().all(|&c| is_upper(c));
        let all_lower = letters.iter().all(|&c| is_lower(c));

        if all_upper && letters.len() >= 1 {
            info.is_all_upper = true;
        } else if all_lower {
            info.is_all_lower = true;
        } else if letters.len() >= 2
            && is_upper(letters[0])
            && letters[1..].iter().all(|&c| is_lower(c))
        {
            // "false for single-letter tokens" (§9 open question): requires len >= 2.
            info.is_capital_upper = true;
        } else if letters.len() >= 3
            && is_lower(*letters.last().unwrap())
            && letters[..letters.len() - 1].iter().all(|&c| is_upper(c))
        {
            info.is_last_lower = true;
        }

        info
    }
}

/// `(begin_char, end_char, term, char_info, language, word_forms[],
/// lemma_cached)` from §3.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub begin_char: usize,
    pub end_char: usize,
    pub term: String,
    pub char_info: CharsInfo,
    pub language: Language,
    pub word_forms: Vec<WordForm>,
    pub lemma_cached: Option<String>,
}

impl Token {
    pub fn new(begin_char: usize, end_char: usize, term: impl Into<String>) -> Self {
        Token {
            begin_char,
            end_char,
            term: term.into(),
            char_info: CharsInfo::default(),
            language: Language::empty(),
            word_forms: Vec::new(),
            lemma_cached: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chars_info_all_upper() {
        let chars: Vec<char> = "МАМА".chars().collect();
        let info = CharsInfo::compute(&chars);
        assert!(info.is_all_upper);
        assert!(!info.is_all_lower);
        assert!(info.is_cyrillic_letter);
    }

    #[test]
    fn chars_info_capital_upper_requires_two_letters() {
        let single: Vec<char> = "А".chars().collect();
        let info = CharsInfo::compute(&single);
        // single-letter tokens never set capital_upper (§9 open question)
        assert!(!info.is_capital_upper);
    }

    #[test]
    fn chars_info_capital_upper() {
        let chars: Vec<char> = "Петров".chars().collect();
        let info = CharsInfo::compute(&chars);
        assert!(info.is_capital_upper);
    }

    #[test]
    fn chars_info_last_lower_requires_three_letters() {
        let chars: Vec<char> = "ЗАВх".chars().collect();
        let info = CharsInfo::compute(&chars);
        assert!(info.is_last_lower);
    }

    #[test]
    fn chars_info_at_most_one_casing_bit() {
        let chars: Vec<char> = "Тест".chars().collect();
        let info = CharsInfo::compute(&chars);
        let bits = [info.is_all_upper, info.is_all_lower, info.is_capital_upper, info.is_last_lower];
        assert!(bits.iter().filter(|b| **b).count() <= 1);
    }

    #[test]
    fn word_form_dictionary_flag() {
        let wf = WordForm {
            base: BaseMorphInfo::default(),
            tail: String::new(),
            normal_tail: String::new(),
            full_normal_tail: String::new(),
            normal_case: "СТОЛ".into(),
            normal_full: String::new(),
            misc: None,
            undef_coef: 0,
            rule_id: None,
            variant_id: None,
        };
        assert!(wf.is_in_dictionary());
    }
}
