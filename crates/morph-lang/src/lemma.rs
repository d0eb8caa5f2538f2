//! Per-token lemma selection (§4.6): pick one lemma out of a token's final
//! word-form list and apply the post-fixup rules.

use morph_core::categories::Number;
use morph_core::word_form::{Token, WordForm};

fn form_lemma(wf: &WordForm) -> &str {
    if !wf.normal_full.is_empty() {
        &wf.normal_full
    } else {
        &wf.normal_case
    }
}

/// Token-level comparator (distinct from the analyzer's §4.5.1 ranking):
/// prefers shorter lemmas for the same class, -ОЙ adjectives over -Й, and
/// singular over plural nouns when lengths are close.
fn better_candidate(a: &WordForm, b: &WordForm) -> bool {
    let (la, lb) = (form_lemma(a), form_lemma(b));
    if a.base.class == b.base.class {
        if a.base.class.is_adjective() {
            let a_oy = la.ends_with("ОЙ");
            let b_oy = lb.ends_with("ОЙ");
            if a_oy != b_oy {
                return a_oy;
            }
        }
        if a.base.class.is_noun() {
            let a_sing = a.base.number.contains(Number::SINGULAR);
            let b_sing = b.base.number.contains(Number::SINGULAR);
            let len_close = (la.chars().count() as i32 - lb.chars().count() as i32).abs() <= 1;
            if len_close && a_sing != b_sing {
                return a_sing;
            }
        }
        return la.chars().count() < lb.chars().count();
    }
    la.chars().count() < lb.chars().count()
}

fn apply_post_fixups(lemma: String, token_term: &str, has_dictionary_form: bool) -> String {
    if let Some(stem) = lemma.strip_suffix("АНЫЙ") {
        return format!("{stem}АННЫЙ");
    }
    if let Some(stem) = lemma.strip_suffix("ЕНЫЙ") {
        return format!("{stem}ЕННЫЙ");
    }
    if lemma.ends_with("ЙСЯ") {
        let trimmed: String = lemma.chars().take(lemma.chars().count().saturating_sub(2)).collect();
        return trimmed;
    }
    if let Some(stem) = lemma.strip_suffix("АНИЙ") {
        if lemma == token_term && !has_dictionary_form {
            return format!("{stem}АНИЕ");
        }
    }
    lemma
}

/// Choose the lemma for a token given its final word-form list.
pub fn select_lemma(token: &Token) -> Option<String> {
    let forms = &token.word_forms;
    if forms.is_empty() {
        return None;
    }

    let chosen: &WordForm = if forms.len() == 1 {
        &forms[0]
    } else if !token.char_info.is_all_lower {
        let surname = forms
            .iter()
            .find(|wf| wf.base.class.is_proper_surname() && (form_lemma(wf).ends_with("ОВ") || form_lemma(wf).ends_with("ЕВ")));
        let fallback = forms.iter().find(|wf| wf.base.class.is_proper_name() && wf.is_in_dictionary());
        surname.or(fallback).unwrap_or(&forms[0])
    } else {
        let mut best = &forms[0];
        for wf in &forms[1..] {
            if better_candidate(wf, best) {
                best = wf;
            }
        }
        best
    };

    let has_dictionary_form = forms.iter().any(|wf| wf.is_in_dictionary());
    Some(apply_post_fixups(form_lemma(chosen).to_string(), &token.term, has_dictionary_form))
}

#[cfg(test)]
mod tests {
    use super::*;
    use morph_core::categories::{BaseMorphInfo, Class};
    use morph_core::word_form::CharsInfo;

    fn make_wf(class: Class, normal_case: &str, undef_coef: i32) -> WordForm {
        WordForm {
            base: BaseMorphInfo { class, ..Default::default() },
            tail: String::new(),
            normal_tail: String::new(),
            full_normal_tail: String::new(),
            normal_case: normal_case.to_string(),
            normal_full: String::new(),
            misc: None,
            undef_coef,
            rule_id: None,
            variant_id: None,
        }
    }

    #[test]
    fn singleton_form_is_lemma() {
        let mut token = Token::new(0, 5, "СТОЛЫ");
        token.word_forms.push(make_wf(Class::with_noun(), "СТОЛ", 0));
        assert_eq!(select_lemma(&token), Some("СТОЛ".to_string()));
    }

    #[test]
    fn anyj_suffix_becomes_annyj() {
        let mut token = Token::new(0, 6, "СДЕЛАН");
        token.word_forms.push(make_wf(Class::with_adjective(), "СДЕЛАНЫЙ", 0));
        assert_eq!(select_lemma(&token), Some("СДЕЛАННЫЙ".to_string()));
    }

    #[test]
    fn non_lowercase_token_prefers_surname() {
        let mut token = Token::new(0, 7, "ИВАНОВА");
        token.char_info = CharsInfo { is_capital_upper: true, ..Default::default() };
        token.word_forms.push(make_wf(Class::with_noun(), "ИВАНОВА", 3));
        token.word_forms.push(make_wf(Class::with_noun().set_proper_surname(), "ИВАНОВ", 0));
        assert_eq!(select_lemma(&token), Some("ИВАНОВ".to_string()));
    }
}
