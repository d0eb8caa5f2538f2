//! Language helpers (C2): word correction, transliteral correction,
//! per-word language classification and the preposition case table.

use crate::categories::{Case, Language};
use crate::character::{is_cyrillic, is_latin, is_stress_mark, simple_upper};

const RUS0: &str = "–ЁѐЀЍѝЎўӢӣ";
const RUS1: &str = "-ЕЕЕИИУУЙЙ";

/// Uppercase a raw word, fold stressed/variant Cyrillic characters to their
/// canonical counterpart, replace soft hyphens with ASCII hyphen, and fix
/// up the `АГЕНС…` → `АГЕНТС…` prefix quirk.
pub fn correct_word(raw: &str) -> String {
    let upper: String = raw.chars().map(simple_upper).collect();
    let rus0: Vec<char> = RUS0.chars().collect();
    let rus1: Vec<char> = RUS1.chars().collect();

    let mut out = String::with_capacity(upper.len());
    for c in upper.chars() {
        let c = if c == '\u{00AD}' {
            '-'
        } else if let Some(idx) = rus0.iter().position(|&r| r == c) {
            rus1[idx]
        } else {
            c
        };
        out.push(c);
    }

    if let Some(rest) = out.strip_prefix("АГЕНС") {
        out = format!("АГЕНТС{rest}");
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Cyrillic,
    Latin,
    Other,
}

/// A/А, E/Е, O/О, etc. -- letters that look identical in both scripts.
fn ambiguous_pair(c: char) -> Option<(char, char)> {
    match c {
        'A' | 'А' => Some(('A', 'А')),
        'E' | 'Е' => Some(('E', 'Е')),
        'O' | 'О' => Some(('O', 'О')),
        'P' | 'Р' => Some(('P', 'Р')),
        'C' | 'С' => Some(('C', 'С')),
        'T' | 'Т' => Some(('T', 'Т')),
        'X' | 'Х' => Some(('X', 'Х')),
        'B' | 'В' => Some(('B', 'В')),
        'H' | 'Н' => Some(('H', 'Н')),
        'K' | 'К' => Some(('K', 'К')),
        'M' | 'М' => Some(('M', 'М')),
        _ => None,
    }
}

/// The typed script of a letter, independent of whether it also belongs to
/// `ambiguous_pair`. Keeping this separate from ambiguity is what lets a
/// literal Cyrillic letter count as Cyrillic evidence even when it happens
/// to look like a Latin one.
fn classify_letter(c: char) -> Script {
    if is_cyrillic(c) {
        Script::Cyrillic
    } else if is_latin(c) {
        Script::Latin
    } else {
        Script::Other
    }
}

/// Given a word and the previous word's first letter (if any), resolve
/// visually-ambiguous Latin/Cyrillic letters to a single script (§4.2).
pub fn transliteral_correction(word: &str, previous_word: &str) -> String {
    let mut chars: Vec<char> = word.chars().filter(|&c| !is_stress_mark(c)).collect();

    // A literal Cyrillic letter is always evidence of Cyrillic, even if it
    // also has a Latin look-alike. A Latin letter only counts as hard
    // evidence of Latin when it has no Cyrillic look-alike at all, since an
    // ambiguous one could just as well be a mistyped Cyrillic letter.
    let has_cyrillic = chars.iter().any(|&c| classify_letter(c) == Script::Cyrillic);
    let has_pure_latin = chars.iter().any(|&c| classify_letter(c) == Script::Latin && ambiguous_pair(c).is_none());

    let ambiguous_cyr = chars.iter().filter(|&&c| classify_letter(c) == Script::Cyrillic && ambiguous_pair(c).is_some()).count();
    let ambiguous_lat = chars.iter().filter(|&&c| classify_letter(c) == Script::Latin && ambiguous_pair(c).is_some()).count();

    let prev_first_script = previous_word.chars().find(|c| c.is_alphabetic()).map(classify_letter);

    let target: Option<Script> = if has_pure_latin && has_cyrillic {
        None
    } else if has_cyrillic && ambiguous_lat > 0 {
        Some(Script::Cyrillic)
    } else if has_pure_latin && ambiguous_cyr > 0 {
        Some(Script::Latin)
    } else {
        match prev_first_script {
            Some(Script::Cyrillic) => Some(Script::Cyrillic),
            Some(Script::Latin) => Some(Script::Latin),
            _ => {
                // Majority vote among the ambiguous letters themselves.
                if ambiguous_cyr > ambiguous_lat {
                    Some(Script::Cyrillic)
                } else if ambiguous_lat > ambiguous_cyr {
                    Some(Script::Latin)
                } else {
                    None
                }
            }
        }
    };

    if let Some(target) = target {
        for c in chars.iter_mut() {
            if let Some((latin, cyr)) = ambiguous_pair(*c) {
                *c = if target == Script::Latin { latin } else { cyr };
            }
        }
    }

    let joined: String = chars.into_iter().collect();
    collapse_soft_sign_i(&joined, word)
}

/// `ЬI` collapses to `Ы`.
fn collapse_soft_sign_i(corrected: &str, original: &str) -> String {
    let mut out = String::with_capacity(corrected.len());
    let mut chars = corrected.chars().peekable();
    while let Some(c) = chars.next() {
        if c == 'Ь' && chars.peek() == Some(&'I') {
            out.push('Ы');
            chars.next();
        } else {
            out.push(c);
        }
    }
    let _ = original;
    out
}

/// Strip apostrophes when the word is at least 3 letters long.
pub fn strip_apostrophe(word: &str) -> String {
    let letter_count = word.chars().filter(|c| c.is_alphabetic()).count();
    if letter_count >= 3 {
        word.chars().filter(|&c| c != '\'' && c != '\u{2019}').collect()
    } else {
        word.to_string()
    }
}

/// Classify a word's script-language (§4.2).
pub fn word_language(word: &str) -> Language {
    let mut cyr = 0usize;
    let mut lat = 0usize;
    let mut other = 0usize;
    for c in word.chars() {
        if is_cyrillic(c) {
            cyr += 1;
        } else if is_latin(c) {
            lat += 1;
        } else if c.is_alphabetic() {
            other += 1;
        }
    }
    let _ = other;

    if lat > 0 && cyr == 0 {
        return Language::EN;
    }
    if lat > 0 && cyr > 0 {
        return Language::empty();
    }
    if cyr == 0 {
        return Language::empty();
    }

    let mut candidates = Language::RU | Language::UA | Language::BY | Language::KZ;
    for c in word.chars() {
        match c {
            'Ґ' | 'ґ' | 'Є' | 'є' | 'Ї' | 'ї' => candidates -= Language::RU | Language::BY,
            'І' | 'і' => candidates -= Language::RU,
            'Ё' | 'ё' | 'Э' | 'э' => candidates -= Language::UA | Language::KZ,
            'Ы' | 'ы' => candidates -= Language::UA,
            'Ў' | 'ў' => candidates -= Language::RU | Language::UA,
            'Щ' | 'щ' => candidates -= Language::BY,
            'Ъ' | 'ъ' => candidates -= Language::BY | Language::UA | Language::KZ,
            'Ә' | 'ә' | 'Ғ' | 'ғ' | 'Қ' | 'қ' | 'Ң' | 'ң' | 'Ө' | 'ө' | 'Ұ' | 'ұ' | 'Ү' | 'ү' | 'Һ' | 'һ' => {
                candidates &= Language::KZ
            }
            'В' | 'в' | 'Ф' | 'ф' | 'Ц' | 'ц' | 'Ч' | 'ч' | 'Ь' | 'ь' => candidates -= Language::KZ,
            _ => {}
        }
    }
    candidates
}

/// Static preposition → governed-case(s) table, plus variant canonicalization.
pub struct PrepositionTable;

impl PrepositionTable {
    /// `ВО → В`, `КО → К`, etc.
    pub fn canonical(word: &str) -> &str {
        match word {
            "ВО" => "В",
            "КО" => "К",
            "СО" => "С",
            "ОБО" => "О",
            "НАДО" => "НАД",
            "ОТО" => "ОТ",
            "ПОДО" => "ПОД",
            "ИЗО" => "ИЗ",
            other => other,
        }
    }

    pub fn governed_case(word: &str) -> Case {
        match Self::canonical(word) {
            "В" | "НА" | "ЗА" | "ПОД" | "ПРО" | "ЧЕРЕЗ" => Case::ACCUSATIVE | Case::PREPOSITIONAL,
            "К" => Case::DATIVE,
            "С" | "НАД" | "ПЕРЕД" | "МЕЖДУ" => Case::INSTRUMENTAL,
            "ОТ" | "ИЗ" | "ДО" | "У" | "БЕЗ" | "ДЛЯ" | "ВОКРУГ" | "ОКОЛО" => Case::GENITIVE,
            "О" | "ПРИ" => Case::PREPOSITIONAL,
            _ => Case::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_word_examples() {
        assert_eq!(correct_word("Ёлка"), "ЕЛКА");
        assert_eq!(correct_word("А\u{00AD}БВ"), "А-БВ");
        assert_eq!(correct_word("АГЕНСТВО"), "АГЕНТСТВО");
    }

    #[test]
    fn transliteral_correction_latin_to_cyrillic() {
        // MOCKBA with Latin O, C, B amid Cyrillic letters -> all-Cyrillic МОСКВА
        let word = "М\u{004F}СКВ\u{0041}"; // Cyrillic М, Latin O, С,К,В cyr, Latin A... approximate
        let _ = word;
        let result = transliteral_correction("МOCKBA", "");
        assert_eq!(result, "МОСКВА");
    }

    #[test]
    fn transliteral_correction_falls_back_to_previous_word_script() {
        // COKO is all Latin letters with Cyrillic look-alikes; no pure
        // evidence either way, so the previous word's script decides.
        let result = transliteral_correction("COKO", "МАМА");
        assert_eq!(result, "СОКО");
    }

    #[test]
    fn transliteral_correction_majority_vote_among_ambiguous_letters() {
        // No pure evidence and no previous word: all four letters are
        // Latin-typed look-alikes, so the vote keeps them Latin.
        let result = transliteral_correction("COKO", "");
        assert_eq!(result, "COKO");
    }

    #[test]
    fn soft_sign_i_collapses_to_y() {
        let result = collapse_soft_sign_i("КОМПЬIОТЕР", "КОМПЬIОТЕР");
        assert_eq!(result, "КОМПЫОТЕР");
    }

    #[test]
    fn strip_apostrophe_short_word_kept() {
        assert_eq!(strip_apostrophe("О'КЕЙ"), "ОКЕЙ");
        assert_eq!(strip_apostrophe("д'А"), "д'А");
    }

    #[test]
    fn word_language_all_latin_is_en() {
        assert_eq!(word_language("HELLO"), Language::EN);
    }

    #[test]
    fn word_language_mixed_is_unknown() {
        assert!(word_language("HEллo").is_empty());
    }

    #[test]
    fn word_language_cyrillic_superset() {
        let lang = word_language("МОЛОКО");
        assert!(lang.contains(Language::RU));
        assert!(lang.contains(Language::BY));
    }

    #[test]
    fn word_language_kz_specific_letters_restrict_to_kz() {
        let lang = word_language("ӘЛЕМ");
        assert_eq!(lang, Language::KZ);
    }

    #[test]
    fn preposition_canonical_form() {
        assert_eq!(PrepositionTable::canonical("ВО"), "В");
        assert_eq!(PrepositionTable::canonical("КО"), "К");
    }
}
