//! Per-language morphological engines, the word analyzer, the text runner
//! and the service façade (C7, C8, C9).
//!
//! - [`analyzer`] -- the central per-word analysis algorithm
//! - [`lemma`] -- per-token lemma selection over a word's final form list
//! - [`tokenizer`] -- text segmentation and the per-token post-pass
//! - [`language_detect`] -- document-level language detection
//! - [`engine`] -- a loaded dictionary paired with its language tag
//! - [`service`] -- the top-level façade and its configuration surface

pub mod analyzer;
pub mod engine;
pub mod language_detect;
pub mod lemma;
pub mod service;
pub mod tokenizer;

pub use engine::Engine;
pub use service::{AnalyzerConfig, Service};

/// Error type for the service façade and per-language engines.
#[derive(Debug, thiserror::Error)]
pub enum MorphError {
    #[error("no dictionaries loaded for {operation}")]
    InitializationMissing { operation: &'static str },
    #[error("dictionary for language {lang} unavailable: {source}")]
    ResourceUnavailable { lang: String, #[source] source: std::io::Error },
    #[error("dictionary for language {lang} is corrupt: {reason}")]
    DictionaryCorrupt { lang: String, reason: String },
}

impl MorphError {
    pub(crate) fn corrupt(lang: &str, err: morph_trie::TrieError) -> MorphError {
        MorphError::DictionaryCorrupt { lang: lang.to_string(), reason: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_stable() {
        let e = MorphError::InitializationMissing { operation: "Process" };
        assert_eq!(e.to_string(), "no dictionaries loaded for Process");
    }
}
