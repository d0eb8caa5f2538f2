//! The central per-word analysis algorithm (C7): forward scan, coalescing,
//! the unknown-word gate, reverse-trie fallback, domain adjustments and the
//! final ranking pass.

use std::cmp::Ordering;

use morph_core::categories::{Class, Gender, Language, Number};
use morph_core::character::{is_cyrillic, is_vowel};
use morph_core::langhelpers::PrepositionTable;
use morph_core::word_form::WordForm;
use morph_trie::{Dictionary, RuleVariant, TrieNode};

const PULL_FULL: &[&str] = &["КОПИЯ", "ПОЛК", "СУД", "ПАРК", "БАНК", "ПОЛОЖЕНИЕ"];
const PULL_CASE: &[&str] = &["МОРЕ", "МАРИЯ", "ВЕТЕР", "КИЕВ"];

fn lemma_of(wf: &WordForm) -> &str {
    if !wf.normal_full.is_empty() {
        &wf.normal_full
    } else {
        &wf.normal_case
    }
}

/// Analyze `word` (already upper-cased and translit-corrected) against
/// `dict`, returning a ranked, deduplicated word-form list.
pub fn analyze(dict: &Dictionary, language: Language, word: &str) -> Vec<WordForm> {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() > 1 && !chars.iter().any(|&c| is_vowel(c)) {
        return Vec::new();
    }

    log::trace!("analyzer: phase A for {word:?}");
    let mut results = phase_a(dict, &chars);
    log::trace!("analyzer: phase B coalescing {} forms", results.len());
    phase_b_coalesce(&mut results);

    if phase_c_needs_reverse(&chars, &results) {
        log::trace!("analyzer: phase D reverse fallback for {word:?}");
        phase_d_reverse(dict, &chars, &mut results);
    }

    phase_e_domain_adjustments(word, &mut results);
    phase_f_sort_and_cleanup(word, language, &mut results);
    results
}

fn phase_a(dict: &Dictionary, chars: &[char]) -> Vec<WordForm> {
    let mut results: Vec<WordForm> = Vec::new();
    let rules = dict.rules();
    dict.forward().walk(chars, dict.data(), rules, &mut |depth: usize, node: &TrieNode| {
        let ids = node.rule_ids(dict.data(), rules);
        if ids.is_empty() {
            return;
        }
        let suffix: String = chars[depth..].iter().collect();
        let stem: String = chars[..depth].iter().collect();
        let table = rules.lock();
        for id in ids {
            let Some(rule) = table.get(id) else { continue };
            let Some(variants) = rule.variants_for_tail(&suffix) else { continue };
            for variant in variants {
                let wf = build_dictionary_form(dict, &stem, variant);
                if !results.iter().any(|existing: &WordForm| existing.dedup_key() == wf.dedup_key()) {
                    results.push(wf);
                }
            }
        }
    });
    results
}

fn build_dictionary_form(dict: &Dictionary, stem: &str, variant: &RuleVariant) -> WordForm {
    let normal_case = format!("{stem}{}", variant.normal_tail);
    let normal_full = format!("{stem}{}", variant.full_normal_tail);
    WordForm {
        base: variant.base,
        tail: variant.tail.clone(),
        normal_tail: variant.normal_tail.clone(),
        full_normal_tail: variant.full_normal_tail.clone(),
        normal_case,
        normal_full,
        misc: dict.misc().get(variant.misc_id),
        undef_coef: 0,
        rule_id: Some(variant.rule_id),
        variant_id: Some(variant.id),
    }
}

fn is_infinitive_flag(wf: &WordForm) -> bool {
    wf.misc.as_ref().map_or(false, |m| m.is_infinitive())
}

fn phase_b_coalesce(results: &mut Vec<WordForm>) {
    merge_pass(
        results,
        |wf| (wf.base.class, wf.base.gender, wf.base.number, lemma_of(wf).to_string(), is_infinitive_flag(wf)),
        |keep, other| keep.base.case |= other.base.case,
    );
    merge_pass(
        results,
        |wf| (wf.base.class, wf.base.case, wf.base.number, lemma_of(wf).to_string(), is_infinitive_flag(wf)),
        |keep, other| keep.base.gender |= other.base.gender,
    );
}

fn merge_pass<K: PartialEq>(items: &mut Vec<WordForm>, key: impl Fn(&WordForm) -> K, merge: impl Fn(&mut WordForm, &WordForm)) {
    let mut i = 0;
    while i < items.len() {
        let mut j = i + 1;
        while j < items.len() {
            if key(&items[i]) == key(&items[j]) {
                let other = items.remove(j);
                merge(&mut items[i], &other);
            } else {
                j += 1;
            }
        }
        i += 1;
    }
}

fn phase_c_needs_reverse(chars: &[char], results: &[WordForm]) -> bool {
    let mut need = true;

    for wf in results {
        let class = wf.base.class;
        if class.is_pronoun() || class.is_noun() || class.is_adjective() || class.is_conjunction() || class.is_preposition() {
            need = false;
        } else if class.is_adverb() {
            let lemma = lemma_of(wf);
            let ends_a_or_o = lemma.ends_with('А') || lemma.ends_with('О');
            if !ends_a_or_o || lemma == "МНОГО" {
                need = false;
            }
        }
    }

    let verb_forms: Vec<&WordForm> = results.iter().filter(|wf| wf.base.class.is_verb()).collect();
    if !verb_forms.is_empty() {
        let heterogeneous = results.iter().any(|wf| wf.base.class != verb_forms[0].base.class);
        let ends_im = chars.len() >= 2 && chars[chars.len() - 2..] == ['И', 'М'];
        if heterogeneous && !ends_im {
            need = false;
        }
    }

    if results.len() == 1 {
        let wf = &results[0];
        if wf.base.class.is_verb() {
            let present_imperfective_non_passive = wf
                .misc
                .as_ref()
                .map_or(false, |m| m.tense() == morph_core::categories::Tense::PRESENT && m.aspect() == morph_core::categories::Aspect::IMPERFECTIVE && m.voice() != morph_core::categories::Voice::PASSIVE);
            let future_perfective = wf.misc.as_ref().map_or(false, |m| m.tense() == morph_core::categories::Tense::FUTURE && m.aspect() == morph_core::categories::Aspect::PERFECTIVE);
            let infinitive_perfective = is_infinitive_flag(wf) && wf.misc.as_ref().map_or(false, |m| m.aspect() == morph_core::categories::Aspect::PERFECTIVE);
            let lemma_sya = lemma_of(wf).ends_with("СЯ");
            if present_imperfective_non_passive || future_perfective || infinitive_perfective || lemma_sya {
                need = false;
            }
        } else if wf.base.class.is_empty() && wf.misc.as_ref().map_or(false, |m| m.has_attr("прдктв.")) {
            need = false;
        }
    }

    if need {
        let is_cyr = chars.iter().any(|&c| is_cyrillic(c));
        if is_cyr {
            let vowels = chars.iter().filter(|&&c| is_vowel(c)).count();
            let consonants = chars.iter().filter(|&&c| is_cyrillic(c) && !is_vowel(c)).count();
            if vowels < 2 || consonants < 2 {
                need = false;
            }
        }
    }

    need
}

fn class_already_covered(results: &[WordForm], class: Class) -> bool {
    results.iter().any(|wf| wf.is_in_dictionary() && wf.base.class == class)
}

fn phase_d_reverse(dict: &Dictionary, chars: &[char], results: &mut Vec<WordForm>) {
    let Some(reverse) = dict.reverse() else { return };
    let reversed: Vec<char> = chars.iter().rev().copied().collect();
    let rules = dict.rules();

    let mut deepest: Option<(usize, Vec<morph_trie::ReverseRef>)> = None;
    reverse.walk(&reversed, dict.data(), rules, &mut |depth, node| {
        let refs = node.reverse_refs(dict.data(), rules);
        if !refs.is_empty() {
            deepest = Some((depth, refs));
        }
    });

    let Some((_, refs)) = deepest else { return };
    let word: String = chars.iter().collect();
    let table = rules.lock();

    for r in &refs {
        let Some(rule) = table.get(r.rule_id) else { continue };
        let Some(variant) = rule.find_variant(r.variant_id) else { continue };

        let eligible_class = variant.base.class.is_verb()
            || variant.base.class.is_adjective()
            || variant.base.class.is_noun()
            || variant.base.class.is_proper_surname()
            || variant.base.class.is_proper_name()
            || variant.base.class.is_proper_secname()
            || variant.base.class.is_proper_geo();
        if !eligible_class {
            continue;
        }

        let tail_len = variant.tail.chars().count();
        if tail_len > chars.len() || !word.ends_with(&variant.tail) {
            continue;
        }

        let covered = class_already_covered(results, variant.base.class);
        let verb_relaxation = variant.base.class.is_verb()
            && !results.iter().any(|wf| wf.is_in_dictionary() && wf.base.class.is_adjective());
        if covered && !verb_relaxation {
            continue;
        }

        let stem_len = chars.len() - tail_len;
        let stem: String = chars[..stem_len].iter().collect();
        let mut wf = build_dictionary_form(dict, &stem, variant);
        wf.undef_coef = r.coef.max(1) as i32;
        results.push(wf);
    }
}

fn phase_e_domain_adjustments(word: &str, results: &mut Vec<WordForm>) {
    if word == "ПРИ" {
        results.retain(|wf| !wf.base.class.is_proper_geo());
    }

    if results.len() > 1 {
        if let Some(idx) = results.iter().position(|wf| PULL_FULL.contains(&wf.normal_full.as_str()) || PULL_CASE.contains(&wf.normal_case.as_str())) {
            let item = results.remove(idx);
            results.insert(0, item);
        }
    }
}

fn feature_coefficient(wf: &WordForm) -> i32 {
    let mut k = 0i32;
    if !wf.base.case.is_empty() {
        k += 1;
    }
    if !wf.base.gender.is_empty() {
        k += 1;
    }
    if !wf.base.number.is_empty() {
        k += 1;
    }
    if wf.misc.as_ref().map_or(false, |m| m.is_synonym_form()) {
        k -= 3;
    }

    if wf.base.class.is_adjective() {
        let lemma_chars: Vec<char> = lemma_of(wf).chars().collect();
        if wf.base.number.contains(Number::SINGULAR) && !wf.base.gender.is_empty() && lemma_chars.len() >= 2 {
            let last = lemma_chars[lemma_chars.len() - 1];
            let penultimate = lemma_chars[lemma_chars.len() - 2];
            if is_vowel(penultimate) {
                let expected = if wf.base.gender.contains(Gender::MASCULINE) {
                    Some('Й')
                } else if wf.base.gender.contains(Gender::FEMININE) {
                    Some('Я')
                } else if wf.base.gender.contains(Gender::NEUTER) {
                    Some('Е')
                } else {
                    None
                };
                if expected == Some(last) {
                    k += 1;
                }
                if wf.base.gender.contains(Gender::MASCULINE) && last == 'Й' && penultimate == 'И' {
                    k += 1;
                }
            }
        } else if wf.base.number.contains(Number::PLURAL) {
            if let Some(&last) = lemma_chars.last() {
                if last == 'Й' || last == 'Е' {
                    k += 1;
                }
            }
        }
    }

    k
}

fn class_rank(class: Class) -> i32 {
    if class.is_preposition() || class.is_conjunction() || class.is_pronoun() || class.is_personal_pronoun() {
        0
    } else if class.is_noun() {
        1
    } else if class.is_verb() {
        3
    } else {
        2
    }
}

/// The `§4.5.1` ranking comparator. The `undef_coef` asymmetry is
/// intentional and must not be "fixed" into a symmetric comparator.
fn rank_cmp(a: &WordForm, b: &WordForm) -> Ordering {
    match (a.is_in_dictionary(), b.is_in_dictionary()) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }

    if !a.is_in_dictionary() && !b.is_in_dictionary() {
        if (a.undef_coef as f64) > 2.0 * (b.undef_coef as f64) {
            return Ordering::Less;
        }
        if 2.0 * (a.undef_coef as f64) < (b.undef_coef as f64) {
            return Ordering::Greater;
        }
    }

    if a.base.class != b.base.class {
        let (ra, rb) = (class_rank(a.base.class), class_rank(b.base.class));
        if ra != rb {
            return ra.cmp(&rb);
        }
    }

    let (ka, kb) = (feature_coefficient(a), feature_coefficient(b));
    if ka != kb {
        return kb.cmp(&ka);
    }

    let a_plural = a.base.number.contains(Number::PLURAL);
    let b_plural = b.base.number.contains(Number::PLURAL);
    a_plural.cmp(&b_plural)
}

/// `§4.5.2`: same (gender, number, case, lemma) across differing classes,
/// adjective/noun or adjective/pronoun, drop the weaker candidate.
fn dedup_by_similarity(results: &mut Vec<WordForm>) {
    let mut to_remove = vec![false; results.len()];
    for i in 0..results.len() {
        if to_remove[i] {
            continue;
        }
        for j in (i + 1)..results.len() {
            if to_remove[j] {
                continue;
            }
            let (a, b) = (&results[i], &results[j]);
            let same_profile = a.base.gender == b.base.gender && a.base.number == b.base.number && a.base.case == b.base.case && lemma_of(a) == lemma_of(b);
            if !same_profile {
                continue;
            }

            if a.base.class.is_adjective() && b.base.class.is_noun() && !a.is_in_dictionary() && !b.is_in_dictionary() {
                to_remove[j] = true;
            } else if b.base.class.is_adjective() && a.base.class.is_noun() && !a.is_in_dictionary() && !b.is_in_dictionary() {
                to_remove[i] = true;
            } else if a.base.class.is_adjective() && b.base.class.is_pronoun() && lemma_of(b) != "ОДИН" {
                to_remove[i] = true;
            } else if b.base.class.is_adjective() && a.base.class.is_pronoun() && lemma_of(a) != "ОДИН" {
                to_remove[j] = true;
            }
        }
    }
    let mut idx = 0;
    results.retain(|_| {
        let keep = !to_remove[idx];
        idx += 1;
        keep
    });
}

fn phase_f_sort_and_cleanup(word: &str, language: Language, results: &mut Vec<WordForm>) {
    results.sort_by(rank_cmp);
    dedup_by_similarity(results);

    let only_verb_in_dictionary = results.iter().any(|wf| wf.is_in_dictionary() && wf.base.class.is_verb())
        && !results.iter().any(|wf| wf.is_in_dictionary() && !wf.base.class.is_verb());

    for wf in results.iter_mut() {
        if wf.normal_case.is_empty() {
            wf.normal_case = word.to_string();
        }
        if wf.base.class.is_verb() && wf.normal_full.is_empty() && wf.normal_case.ends_with("ТЬСЯ") {
            let trimmed: String = wf.normal_case.chars().take(wf.normal_case.chars().count().saturating_sub(2)).collect();
            wf.normal_full = trimmed;
        }
        wf.base.language = language;
        if wf.base.class.is_preposition() {
            wf.normal_case = PrepositionTable::canonical(&wf.normal_case).to_string();
            wf.normal_full = PrepositionTable::canonical(&wf.normal_full).to_string();
        }
    }

    if only_verb_in_dictionary {
        let (mut demoted, mut rest): (Vec<WordForm>, Vec<WordForm>) =
            (Vec::new(), Vec::new());
        for wf in results.drain(..) {
            if wf.base.class.is_adjective() && wf.undef_coef > 100 {
                demoted.push(wf);
            } else {
                rest.push(wf);
            }
        }
        rest.extend(demoted);
        *results = rest;
    }
}

/// Helper re-exported for the reverse-trie-backed surname/geo scanner used
/// by the tokenizer's per-token post-pass (§4.7).
pub fn reverse_scan_classes(dict: &Dictionary, word: &str, classes: Class) -> Vec<WordForm> {
    let chars: Vec<char> = word.chars().collect();
    let Some(reverse) = dict.reverse() else { return Vec::new() };
    let reversed: Vec<char> = chars.iter().rev().copied().collect();
    let rules = dict.rules();

    let mut refs_at_depth: Vec<morph_trie::ReverseRef> = Vec::new();
    reverse.walk(&reversed, dict.data(), rules, &mut |_depth, node| {
        let refs = node.reverse_refs(dict.data(), rules);
        if !refs.is_empty() {
            refs_at_depth = refs;
        }
    });

    let table = rules.lock();
    let mut out = Vec::new();
    for r in &refs_at_depth {
        let Some(rule) = table.get(r.rule_id) else { continue };
        let Some(variant) = rule.find_variant(r.variant_id) else { continue };
        if !variant.base.class.intersects(classes) {
            continue;
        }
        let tail_len = variant.tail.chars().count();
        if tail_len > chars.len() || !word.ends_with(&variant.tail) {
            continue;
        }
        let stem_len = chars.len() - tail_len;
        let stem: String = chars[..stem_len].iter().collect();
        let mut wf = build_dictionary_form(dict, &stem, variant);
        wf.undef_coef = r.coef.max(1) as i32;
        out.push(wf);
    }
    out
}

/// Enumerate every dictionary-backed word-form of the given `class` by
/// walking the whole forward trie (`GetAllWordsByClass`, §6.1).
pub fn collect_by_class(dict: &Dictionary, class: Class) -> Vec<WordForm> {
    let mut out = Vec::new();
    let mut stem = smallvec::SmallVec::<[char; 24]>::new();
    collect_by_class_rec(dict.forward().root(), dict, class, &mut stem, &mut out);
    out
}

fn collect_by_class_rec(node: &TrieNode, dict: &Dictionary, class: Class, stem: &mut smallvec::SmallVec<[char; 24]>, out: &mut Vec<WordForm>) {
    let rules = dict.rules();
    let ids = node.rule_ids(dict.data(), rules);
    if !ids.is_empty() {
        let stem_str: String = stem.iter().collect();
        let table = rules.lock();
        for id in &ids {
            let Some(rule) = table.get(*id) else { continue };
            for variants in &rule.variants {
                for variant in variants {
                    if variant.base.class.intersects(class) {
                        out.push(build_dictionary_form(dict, &stem_str, variant));
                    }
                }
            }
        }
    }

    for key in node.child_keys(dict.data(), rules) {
        let Some(c) = char::from_u32(key as u32) else { continue };
        node.with_child(key, dict.data(), rules, |child| {
            stem.push(c);
            collect_by_class_rec(child, dict, class, stem, out);
            stem.pop();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morph_core::categories::{BaseMorphInfo, Case};

    fn wf(class: Class, normal_case: &str, undef_coef: i32) -> WordForm {
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
    fn dictionary_backed_precedes_guessed() {
        let a = wf(Class::with_noun(), "СТОЛ", 0);
        let b = wf(Class::with_noun(), "СТОЛБ", 5);
        assert_eq!(rank_cmp(&a, &b), Ordering::Less);
    }

    #[test]
    fn undef_coef_asymmetry_is_preserved() {
        let a = wf(Class::with_noun(), "А", 10);
        let b = wf(Class::with_noun(), "Б", 6);
        // 10 > 2*6=12 is false, 2*10=20 < 6 is false -> falls through to class/K tie
        assert_ne!(rank_cmp(&a, &b), Ordering::Greater.reverse());
        let c = wf(Class::with_noun(), "В", 21);
        let d = wf(Class::with_noun(), "Г", 10);
        assert_eq!(rank_cmp(&c, &d), Ordering::Less);
    }

    #[test]
    fn merge_pass_ors_cases() {
        let mut items = vec![
            WordForm {
                base: BaseMorphInfo { class: Class::with_noun(), case: Case::NOMINATIVE, ..Default::default() },
                tail: String::new(),
                normal_tail: String::new(),
                full_normal_tail: String::new(),
                normal_case: "СТОЛ".into(),
                normal_full: String::new(),
                misc: None,
                undef_coef: 0,
                rule_id: None,
                variant_id: None,
            },
            WordForm {
                base: BaseMorphInfo { class: Class::with_noun(), case: Case::ACCUSATIVE, ..Default::default() },
                tail: String::new(),
                normal_tail: String::new(),
                full_normal_tail: String::new(),
                normal_case: "СТОЛ".into(),
                normal_full: String::new(),
                misc: None,
                undef_coef: 0,
                rule_id: None,
                variant_id: None,
            },
        ];
        merge_pass(
            &mut items,
            |wf| (wf.base.class, wf.base.gender, wf.base.number, lemma_of(wf).to_string(), false),
            |keep, other| keep.base.case |= other.base.case,
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].base.case, Case::NOMINATIVE | Case::ACCUSATIVE);
    }

    #[test]
    fn short_word_with_no_vowel_yields_nothing() {
        let dict_bytes = minimal_empty_dict();
        let dict = Dictionary::load(&dict_bytes, Default::default()).unwrap();
        let result = analyze(&dict, Language::RU, "ВВ");
        assert!(result.is_empty());
    }

    fn minimal_empty_dict() -> Vec<u8> {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut buf = Vec::new();
        buf.extend_from_slice(&0i32.to_le_bytes());
        buf.extend_from_slice(&0i32.to_le_bytes());
        let tree = vec![0u8; 6];
        buf.extend_from_slice(&(tree.len() as i32).to_le_bytes());
        buf.extend_from_slice(&tree);
        buf.extend_from_slice(&(tree.len() as i32).to_le_bytes());
        buf.extend_from_slice(&tree);

        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(&buf).unwrap();
        enc.finish().unwrap()
    }
}
