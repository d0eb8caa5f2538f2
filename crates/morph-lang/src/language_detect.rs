//! Document-level language detection (§6.3): pure/tolerant word tallies
//! feeding a fixed precedence table, with a retally pass over the first
//! `retally_window` words when the first pass is inconclusive.

use morph_core::categories::Language;
use morph_core::langhelpers::word_language;
use morph_core::word_form::Token;

const CANDIDATES: [Language; 4] = [Language::RU, Language::UA, Language::BY, Language::KZ];

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    pure: [u32; 4],
    tot: [u32; 4],
    en: u32,
}

fn idx(lang: Language) -> usize {
    CANDIDATES.iter().position(|&c| c == lang).unwrap()
}

fn tally_tokens(tokens: &[Token]) -> Tally {
    let mut t = Tally::default();
    for token in tokens {
        if !token.char_info.is_letter {
            continue;
        }
        let lang = word_language(&token.term);
        if lang.is_empty() {
            continue;
        }
        if lang == Language::EN {
            t.en += 1;
            continue;
        }
        for &cand in &CANDIDATES {
            if lang.contains(cand) {
                t.tot[idx(cand)] += 1;
            }
        }
        if lang.bits().count_ones() == 1 && token.term.chars().count() >= 3 {
            for &cand in &CANDIDATES {
                if lang == cand {
                    t.pure[idx(cand)] += 1;
                }
            }
        }
    }
    t
}

fn strict_max(values: [u32; 4], which: usize) -> bool {
    let v = values[which];
    v > 0 && CANDIDATES.iter().enumerate().all(|(i, _)| i == which || values[i] < v)
}

/// Decide by the §6.3 precedence table over a tally; returns `None` when no
/// rule fires (falls through to the retally pass).
fn decide(t: &Tally) -> Option<Language> {
    let (ru, ua, by, kz) = (idx(Language::RU), idx(Language::UA), idx(Language::BY), idx(Language::KZ));

    if strict_max(t.pure, ru) {
        return Some(Language::RU);
    }
    if t.tot[ru] > t.tot[ua] && (t.tot[ru] > t.tot[by] || (t.tot[ru] == t.tot[by] && t.pure[by] == 0)) && t.tot[ru] > t.tot[kz] {
        return Some(Language::RU);
    }
    if strict_max(t.pure, ua) {
        return Some(Language::UA);
    }
    if strict_max(t.tot, ua) {
        return Some(Language::UA);
    }
    if t.pure[kz] > t.pure[ru] && t.tot[kz] + t.pure[kz] > t.tot[ru] && t.pure[kz] > t.pure[ua] && t.pure[kz] > t.pure[by] {
        return Some(Language::KZ);
    }
    if strict_max(t.tot, kz) {
        return Some(Language::KZ);
    }
    if strict_max(t.pure, by) {
        let has_ru_hint = t.tot[ru] > 0;
        if t.pure[by] < 10 && has_ru_hint {
            return Some(Language::RU);
        }
        if t.pure[by] > 5 {
            return Some(Language::BY);
        }
    }
    if strict_max(t.tot, by) && (t.tot[by] as f64 >= 2.0 * t.tot[ru] as f64 || t.tot[ru] == 0) {
        return Some(Language::BY);
    }
    None
}

/// Detect the document language. `ru_probe` is called with the first
/// `retally_window` letter-token terms during the retally pass and should
/// return `true` when the word has a dictionary-backed Russian analysis.
pub fn detect_document_language(tokens: &[Token], retally_window: usize, mut ru_probe: impl FnMut(&str) -> bool) -> Language {
    let tally = tally_tokens(tokens);

    // No Cyrillic-script evidence at all: the §6.3 table has nothing to
    // decide among RU/UA/BY/KZ, so a document made of Latin words is EN.
    if tally.tot.iter().all(|&n| n == 0) && tally.en > 0 {
        return Language::EN;
    }

    let first_pass = decide(&tally);

    let needs_retally = matches!(first_pass, None | Some(Language::UA));
    if !needs_retally {
        return first_pass.unwrap();
    }

    let letter_terms: Vec<&str> = tokens
        .iter()
        .filter(|t| t.char_info.is_letter)
        .take(retally_window)
        .map(|t| t.term.as_str())
        .collect();
    if letter_terms.is_empty() {
        return first_pass.unwrap_or(Language::RU);
    }

    let ru_hits = letter_terms.iter().filter(|term| ru_probe(term)).count();
    if ru_hits * 2 >= letter_terms.len() {
        Language::RU
    } else {
        first_pass.unwrap_or(Language::RU)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morph_core::word_form::CharsInfo;

    fn letter_token(term: &str) -> Token {
        let mut t = Token::new(0, term.chars().count(), term);
        t.char_info = CharsInfo { is_letter: true, ..Default::default() };
        t
    }

    #[test]
    fn pure_russian_majority_picks_ru() {
        let tokens = vec![letter_token("МОСКВА"), letter_token("ДОМ"), letter_token("Ёжик")];
        let lang = detect_document_language(&tokens, 100, |_| true);
        assert_eq!(lang, Language::RU);
    }

    #[test]
    fn yo_letter_forces_ru_over_by_kz() {
        let tokens = vec![letter_token("ЁЛКА"), letter_token("ДЕРЕВО")];
        let lang = detect_document_language(&tokens, 100, |_| true);
        assert_eq!(lang, Language::RU);
    }

    #[test]
    fn all_latin_document_picks_en() {
        let tokens = vec![letter_token("I"), letter_token("SAW"), letter_token("A"), letter_token("CAT")];
        let lang = detect_document_language(&tokens, 100, |_| false);
        assert_eq!(lang, Language::EN);
    }

    #[test]
    fn empty_tokens_default_to_ru() {
        let lang = detect_document_language(&[], 100, |_| false);
        assert_eq!(lang, Language::RU);
    }
}
