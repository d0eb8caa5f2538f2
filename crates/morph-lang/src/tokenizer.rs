//! Text runner (C8): character-type-change segmentation and the per-token
//! post-pass that only needs a loaded dictionary (surname hypotheses,
//! stranded-Latin correction, quote merging, hyphen-pair collapse).

use morph_core::categories::Class;
use morph_core::character::{is_cyrillic, is_latin, is_quote, segmentation_type};
use morph_core::langhelpers::{correct_word, transliteral_correction};
use morph_core::word_form::{CharsInfo, Token};
use morph_trie::Dictionary;

use crate::analyzer::reverse_scan_classes;

const ZAV_PREFIXES: &[&str] = &["ЗАВОТДЕЛ", "ЗАВЛАБОРАТ", "ЗАВКАФЕДР"];

/// Pure segmentation: split `text` into maximal runs of equal character
/// type (§6.4), correct letter runs, and split `ЗАВ`-prefixed runs. No
/// morphology is performed.
pub fn segment(text: &str) -> Vec<Token> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut previous_term = String::new();
    let mut i = 0;

    while i < chars.len() {
        let ty = segmentation_type(chars[i]);
        let start = i;
        let allow_run = ty == 0 || ty == 1 || ty == 2;
        let mut j = i + 1;
        if allow_run {
            while j < chars.len() && segmentation_type(chars[j]) == ty {
                j += 1;
            }
        }

        if ty == 0 {
            // whitespace runs are consumed but not emitted as tokens
            i = j;
            continue;
        }

        let raw: String = chars[start..j].iter().collect();
        if ty == 1 {
            let corrected = correct_word(&transliteral_correction(&raw, &previous_term));
            push_letter_run(&mut tokens, start, j, &corrected);
            previous_term = corrected;
        } else {
            tokens.push(Token::new(start, j, raw));
        }
        i = j;
    }

    for token in &mut tokens {
        let run_chars: Vec<char> = token.term.chars().collect();
        token.char_info = CharsInfo::compute(&run_chars);
    }
    tokens
}

fn push_letter_run(tokens: &mut Vec<Token>, start: usize, end: usize, corrected: &str) {
    for prefix in ZAV_PREFIXES {
        if corrected.starts_with(prefix) && corrected.chars().count() > 3 {
            let zav: String = corrected.chars().take(3).collect();
            let rest: String = corrected.chars().skip(3).collect();
            tokens.push(Token::new(start, start + 3, zav));
            tokens.push(Token::new(start + 3, end, rest));
            return;
        }
    }
    tokens.push(Token::new(start, end, corrected.to_string()));
}

/// Correct a stranded Latin A/C/P letter surrounded by Cyrillic neighbors.
pub fn stranded_latin_correct(tokens: &mut [Token]) {
    for i in 0..tokens.len() {
        if tokens[i].term.chars().count() != 1 {
            continue;
        }
        let c = tokens[i].term.chars().next().unwrap();
        let cyr_equivalent = match c {
            'A' => Some('А'),
            'C' => Some('С'),
            'P' => Some('Р'),
            _ => None,
        };
        let Some(repl) = cyr_equivalent else { continue };
        let prev_cyr = i > 0 && tokens[i - 1].term.chars().next_back().map_or(false, is_cyrillic);
        let next_cyr = i + 1 < tokens.len() && tokens[i + 1].term.chars().next().map_or(false, is_cyrillic);
        if prev_cyr && next_cyr {
            tokens[i].term = repl.to_string();
        }
    }
}

/// Merge the three-token pattern `LATIN-letter quote LATIN-word` into one
/// token, e.g. `A"БАКУМОВ` (the quote is itself ASCII/typographic).
pub fn merge_quoted_latin(tokens: &mut Vec<Token>) {
    let mut i = 0;
    while i + 2 < tokens.len() {
        let is_single_latin = tokens[i].term.chars().count() == 1 && tokens[i].term.chars().next().map_or(false, is_latin);
        let is_quote_tok = tokens[i + 1].term.chars().count() == 1 && tokens[i + 1].term.chars().next().map_or(false, is_quote);
        let is_latin_word = tokens[i + 2].term.chars().all(is_latin) && !tokens[i + 2].term.is_empty();
        if is_single_latin && is_quote_tok && is_latin_word {
            let merged_term = format!("{}{}{}", tokens[i].term, tokens[i + 1].term, tokens[i + 2].term);
            let begin = tokens[i].begin_char;
            let end = tokens[i + 2].end_char;
            let merged_chars: Vec<char> = merged_term.chars().collect();
            let mut merged = Token::new(begin, end, merged_term);
            merged.char_info = CharsInfo::compute(&merged_chars);
            tokens.splice(i..i + 3, [merged]);
        }
        i += 1;
    }
}

/// Collapse consecutive pairs of hyphen-class tokens not abutting a third.
pub fn collapse_hyphen_pairs(tokens: &mut Vec<Token>) {
    let is_hyphen_tok = |t: &Token| t.term.chars().count() == 1 && t.term.chars().next().map_or(false, morph_core::character::is_hyphen);
    let mut i = 0;
    while i + 1 < tokens.len() {
        if is_hyphen_tok(&tokens[i]) && is_hyphen_tok(&tokens[i + 1]) {
            let third_abuts = i + 2 < tokens.len() && is_hyphen_tok(&tokens[i + 2]);
            if !third_abuts {
                let begin = tokens[i].begin_char;
                let end = tokens[i + 1].end_char;
                let term = format!("{}{}", tokens[i].term, tokens[i + 1].term);
                let merged_chars: Vec<char> = term.chars().collect();
                let mut merged = Token::new(begin, end, term);
                merged.char_info = CharsInfo::compute(&merged_chars);
                tokens.splice(i..i + 2, [merged]);
            }
        }
        i += 1;
    }
}

/// Insert a proper-noun surname/geo hypothesis for Cyrillic all-upper or
/// capital-upper tokens that did not already get one from the forward scan.
pub fn insert_surname_hypotheses(tokens: &mut [Token], dict: &Dictionary) {
    let proper_classes = Class::PROPER_SURNAME | Class::PROPER_GEO;
    for token in tokens.iter_mut() {
        if !token.char_info.is_cyrillic_letter || !(token.char_info.is_all_upper || token.char_info.is_capital_upper) {
            continue;
        }
        let already = token.word_forms.iter().any(|wf| wf.base.class.is_proper_surname() || wf.base.class.is_proper_geo());
        if already {
            continue;
        }
        let mut guesses = reverse_scan_classes(dict, &token.term, proper_classes);
        token.word_forms.append(&mut guesses);
    }
}

/// For `LastLower` Cyrillic tokens without a lemma matching the literal
/// prefix, prepend a synthetic noun word-form carrying the literal prefix.
pub fn insert_last_lower_literal_forms(tokens: &mut [Token]) {
    for token in tokens.iter_mut() {
        if !token.char_info.is_cyrillic_letter || !token.char_info.is_last_lower {
            continue;
        }
        let literal: String = token.term.chars().take(token.term.chars().count().saturating_sub(1)).collect();
        let has_literal_prefix = token.word_forms.iter().any(|wf| wf.normal_case.starts_with(&literal) || wf.normal_full.starts_with(&literal));
        if has_literal_prefix {
            continue;
        }
        let synthetic = morph_core::word_form::WordForm {
            base: morph_core::categories::BaseMorphInfo { class: Class::with_noun(), ..Default::default() },
            tail: String::new(),
            normal_tail: String::new(),
            full_normal_tail: String::new(),
            normal_case: literal.clone(),
            normal_full: literal,
            misc: None,
            undef_coef: i32::MAX,
            rule_id: None,
            variant_id: None,
        };
        token.word_forms.insert(0, synthetic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_by_character_type() {
        let tokens = segment("дом 123 мир!");
        let terms: Vec<&str> = tokens.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(terms, vec!["ДОМ", "123", "МИР", "!"]);
    }

    #[test]
    fn splits_zav_prefixed_run() {
        let tokens = segment("завотделом");
        let terms: Vec<&str> = tokens.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(terms, vec!["ЗАВ", "ОТДЕЛОМ"]);
    }

    #[test]
    fn collapses_double_hyphen() {
        let mut tokens = vec![Token::new(0, 1, "-"), Token::new(1, 2, "-"), Token::new(2, 5, "так")];
        collapse_hyphen_pairs(&mut tokens);
        assert_eq!(tokens[0].term, "--");
    }

    #[test]
    fn stranded_latin_a_between_cyrillic_corrects() {
        let mut tokens = vec![Token::new(0, 3, "ИВ"), Token::new(3, 4, "A"), Token::new(4, 7, "НЫЙ")];
        stranded_latin_correct(&mut tokens);
        assert_eq!(tokens[1].term, "А");
    }
}
