//! End-to-end tests against a real compiled dictionary.
//!
//! These tests require an m_RU.dat file. Set MORPH_DICT_DIR to the directory
//! containing it, or place it at ../../test-data/m_RU.dat.
//!
//! Run: MORPH_DICT_DIR=/path/to/dict cargo test -p morph-lang --test integration

use std::path::PathBuf;

use morph_core::categories::Language;
use morph_lang::{AnalyzerConfig, Service};

fn find_m_ru() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("MORPH_DICT_DIR") {
        let path = PathBuf::from(&dir).join("m_RU.dat");
        if path.exists() {
            return Some(path);
        }
    }
    let fallback = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-data/m_RU.dat");
    if fallback.exists() {
        return Some(fallback);
    }
    None
}

fn create_service() -> Option<Service> {
    let path = match find_m_ru() {
        Some(p) => p,
        None => {
            eprintln!("SKIP: m_RU.dat not found. Set MORPH_DICT_DIR or place it at test-data/m_RU.dat");
            return None;
        }
    };
    let dir = path.parent()?.to_path_buf();
    let service = Service::new(AnalyzerConfig::new());
    let statuses = service.load_languages(&[Language::RU], Some(&dir));
    match statuses.get(&Language::RU) {
        Some(Ok(())) => Some(service),
        _ => None,
    }
}

#[test]
fn process_assigns_a_lemma_to_every_letter_token() {
    let Some(service) = create_service() else { return };

    let tokens = service.process("Дом стоит на высокой горе.", Some(Language::RU)).unwrap();
    for token in &tokens {
        if token.char_info.is_letter {
            assert!(token.lemma_cached.is_some(), "no lemma for {:?}", token.term);
        }
    }
}

#[test]
fn get_all_wordforms_returns_dictionary_backed_forms_for_known_word() {
    let Some(service) = create_service() else { return };

    let forms = service.get_all_wordforms("ДОМ", Some(Language::RU)).unwrap();
    assert!(!forms.is_empty());
    assert!(forms.iter().any(|f| f.is_in_dictionary()));
}

#[test]
fn get_all_wordforms_on_unloaded_language_fails() {
    let service = Service::new(AnalyzerConfig::new());
    let err = service.get_all_wordforms("ДОМ", Some(Language::EN)).unwrap_err();
    assert!(matches!(err, morph_lang::MorphError::InitializationMissing { .. }));
}

#[test]
fn tokenize_splits_on_punctuation_without_any_loaded_dictionary() {
    let service = Service::new(AnalyzerConfig::new());
    let tokens = service.tokenize("Иван, приди!");
    assert!(tokens.len() >= 4);
}
