//! A loaded dictionary paired with its language tag: the per-language unit
//! the service façade keeps in its engine map.

use morph_core::categories::{Case, Class, Gender, Language, Number};
use morph_core::word_form::WordForm;
use morph_trie::{Dictionary, LoadOptions};

use crate::analyzer;
use crate::MorphError;

/// One language's loaded dictionary, owning its forward/reverse tries and
/// rule/misc tables directly (no trait object, mirroring the teacher's
/// `VoikkoHandle` struct-of-owned-components shape).
#[derive(Debug)]
pub struct Engine {
    language: Language,
    dictionary: Dictionary,
}

impl Engine {
    /// Decompress and deserialize `gz_bytes` for `language`, applying
    /// `eager_load` per `AnalyzerConfig` (§4.10).
    pub fn from_bytes(language: Language, gz_bytes: &[u8], eager_load: bool) -> Result<Engine, MorphError> {
        let options = LoadOptions { lazy: !eager_load, ignore_reverse_tree: false };
        let dictionary = Dictionary::load(gz_bytes, options).map_err(|e| MorphError::corrupt(&language.render(), e))?;
        log::debug!(
            "loaded dictionary for {}: {} rules, {} misc entries",
            language.render(),
            dictionary.rules().lock().len(),
            dictionary.misc().len()
        );
        Ok(Engine { language, dictionary })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Analyze a single upper-cased, translit-corrected word (§4.5).
    pub fn analyze(&self, word: &str) -> Vec<WordForm> {
        analyzer::analyze(&self.dictionary, self.language, word)
    }

    pub fn has_dictionary_analysis(&self, word: &str) -> bool {
        self.analyze(word).iter().any(|wf| wf.is_in_dictionary())
    }

    /// All word-forms tagged with `class` among this word's analyses.
    pub fn words_by_class(&self, word: &str, class: Class) -> Vec<WordForm> {
        self.analyze(word).into_iter().filter(|wf| wf.base.class.intersects(class)).collect()
    }

    /// Inflect `word` to the requested features; empty string when no
    /// candidate matches (§6.1 `GetWordform`).
    pub fn inflect(&self, word: &str, class: Class, gender: Gender, case: Case, number: Number) -> String {
        self.analyze(word)
            .into_iter()
            .find(|wf| {
                wf.base.class.intersects(class)
                    && (gender.is_empty() || wf.base.gender.intersects(gender))
                    && (case.is_empty() || wf.base.case.intersects(case))
                    && (number.is_empty() || wf.base.number.intersects(number))
            })
            .map(|wf| if !wf.normal_full.is_empty() { wf.normal_full } else { wf.normal_case })
            .unwrap_or_default()
    }
}
