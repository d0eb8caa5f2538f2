//! The top-level façade (C9): engine lifecycle, tokenization and analysis
//! entry points, and the `AnalyzerConfig` option surface.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use morph_core::categories::{Case, Class, Gender, Language, Number};
use morph_core::langhelpers::{correct_word, strip_apostrophe};
use morph_core::word_form::{Token, WordForm};
use parking_lot::RwLock;

use crate::analyzer::collect_by_class;
use crate::engine::Engine;
use crate::tokenizer;
use crate::{language_detect, lemma, MorphError};

/// Construction-time options for the service, the equivalent of the
/// teacher's `VoikkoOptions`.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Overrides the conventional dictionary directory (§4.3.1).
    pub dict_dir: Option<PathBuf>,
    /// Materialize the reverse trie and all rules eagerly at load time.
    pub eager_load: bool,
    /// Word count used by the §4.7 language re-tally pass.
    pub retally_window: usize,
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        AnalyzerConfig { dict_dir: None, eager_load: false, retally_window: 100 }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig::new()
    }
}

fn default_languages() -> Vec<Language> {
    vec![Language::RU, Language::EN]
}

/// The morphological analysis service: a set of loaded per-language
/// engines behind a read-mostly lock (§5).
pub struct Service {
    config: AnalyzerConfig,
    engines: RwLock<HashMap<Language, Arc<Engine>>>,
}

impl Service {
    pub fn new(config: AnalyzerConfig) -> Service {
        Service { config, engines: RwLock::new(HashMap::new()) }
    }

    fn resolve_path(&self, lang: Language, override_dir: Option<&Path>) -> PathBuf {
        let filename = format!("m_{}.dat", lang.render());
        if let Some(dir) = override_dir {
            return dir.join(filename);
        }
        if let Ok(env_dir) = std::env::var("MORPH_DICT_DIR") {
            return PathBuf::from(env_dir).join(filename);
        }
        if let Some(dir) = &self.config.dict_dir {
            return dir.join(filename);
        }
        PathBuf::from("dict").join(filename)
    }

    /// Load dictionaries for `langs` (default `{RU, EN}` if empty),
    /// resolving each file per §4.3.1. Per-language failures are isolated:
    /// one missing/corrupt file never prevents loading the rest.
    pub fn load_languages(&self, langs: &[Language], override_dir: Option<&Path>) -> HashMap<Language, Result<(), MorphError>> {
        let wanted: Vec<Language> = if langs.is_empty() { default_languages() } else { langs.to_vec() };
        let mut statuses = HashMap::new();

        for lang in wanted {
            let path = self.resolve_path(lang, override_dir);
            let status = match fs::read(&path) {
                Ok(bytes) => match Engine::from_bytes(lang, &bytes, self.config.eager_load) {
                    Ok(engine) => {
                        self.engines.write().insert(lang, Arc::new(engine));
                        Ok(())
                    }
                    Err(e) => {
                        log::warn!("dictionary for {} is corrupt: {e}", lang.render());
                        Err(e)
                    }
                },
                Err(io_err) => {
                    log::warn!("dictionary for {} unavailable at {}: {io_err}", lang.render(), path.display());
                    Err(MorphError::ResourceUnavailable { lang: lang.render(), source: io_err })
                }
            };
            statuses.insert(lang, status);
        }
        statuses
    }

    /// Load the default language set, ignoring per-language load status
    /// (callers wanting per-language detail should use `load_languages`).
    pub fn initialize(&self, langs: &[Language]) {
        self.load_languages(langs, None);
    }

    pub fn unload_languages(&self, langs: &[Language]) {
        let mut engines = self.engines.write();
        for lang in langs {
            engines.remove(lang);
        }
    }

    pub fn loaded_languages(&self) -> Vec<Language> {
        self.engines.read().keys().copied().collect()
    }

    fn engine_for(&self, lang: Option<Language>) -> Option<Arc<Engine>> {
        let engines = self.engines.read();
        match lang {
            Some(l) => engines.get(&l).cloned(),
            None => engines.values().next().cloned(),
        }
    }

    /// Segmentation only, no morphology (§6.1).
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        tokenizer::segment(text)
    }

    /// Full analysis: segmentation, document language detection and
    /// per-token morphology (§6.1, §4.7).
    pub fn process(&self, text: &str, lang_hint: Option<Language>) -> Result<Vec<Token>, MorphError> {
        if self.engines.read().is_empty() {
            return Err(MorphError::InitializationMissing { operation: "Process" });
        }

        let mut tokens = tokenizer::segment(text);
        let ru_engine = self.engine_for(Some(Language::RU));
        let document_language = language_detect::detect_document_language(&tokens, self.config.retally_window, |term| {
            ru_engine.as_ref().map_or(false, |e| e.has_dictionary_analysis(term))
        });

        let chosen = self
            .engine_for(Some(document_language))
            .or_else(|| self.engine_for(lang_hint))
            .or_else(|| self.engine_for(None))
            .ok_or(MorphError::InitializationMissing { operation: "Process" })?;

        let mut cache: HashMap<String, Vec<WordForm>> = HashMap::new();
        for token in tokens.iter_mut() {
            if !token.char_info.is_letter {
                continue;
            }
            let term = strip_apostrophe(&token.term);
            let forms = cache.entry(term.clone()).or_insert_with(|| chosen.analyze(&term)).clone();
            token.word_forms = forms;
        }

        tokenizer::insert_surname_hypotheses(&mut tokens, chosen.dictionary());
        tokenizer::insert_last_lower_literal_forms(&mut tokens);
        tokenizer::stranded_latin_correct(&mut tokens);
        tokenizer::merge_quoted_latin(&mut tokens);
        tokenizer::collapse_hyphen_pairs(&mut tokens);

        for token in tokens.iter_mut() {
            if token.char_info.is_cyrillic_letter {
                token.language = document_language;
            }
            token.lemma_cached = lemma::select_lemma(token);
        }

        Ok(tokens)
    }

    pub fn get_all_wordforms(&self, word: &str, lang: Option<Language>) -> Result<Vec<WordForm>, MorphError> {
        let engine = self.engine_for(lang).ok_or(MorphError::InitializationMissing { operation: "GetAllWordforms" })?;
        Ok(engine.analyze(&correct_word(word)))
    }

    pub fn get_all_words_by_class(&self, class: Class, lang: Option<Language>) -> Result<Vec<WordForm>, MorphError> {
        let engine = self.engine_for(lang).ok_or(MorphError::InitializationMissing { operation: "GetAllWordsByClass" })?;
        Ok(collect_by_class(engine.dictionary(), class))
    }

    pub fn get_wordform(&self, word: &str, class: Class, gender: Gender, case: Case, number: Number, lang: Option<Language>) -> Result<String, MorphError> {
        let engine = self.engine_for(lang).ok_or(MorphError::InitializationMissing { operation: "GetWordform" })?;
        Ok(engine.inflect(&correct_word(word), class, gender, case, number))
    }
}
