//! Lazy suffix-trie dictionary engine (C4, C5, C6).
//!
//! - [`format`] -- positional binary cursor reader over the decompressed
//!   dictionary payload
//! - [`rule`] -- inflectional rule / rule-variant storage
//! - [`trie`] -- lazy forward and reverse suffix tries
//! - [`dictionary`] -- GZIP decompression and top-level deserialization

pub mod dictionary;
pub mod format;
pub mod rule;
pub mod trie;

pub use dictionary::{Dictionary, LoadOptions};
pub use rule::{MiscTable, Rule, RuleTable, RuleVariant};
pub use trie::{ReverseRef, Trie, TrieNode};

/// Error type for dictionary loading and positional parsing failures.
#[derive(Debug, thiserror::Error)]
pub enum TrieError {
    #[error("failed to decompress dictionary: {0}")]
    Gzip(String),
    #[error("unexpected end of dictionary data at offset {offset}")]
    Truncated { offset: usize },
    #[error("invalid string encoding at offset {offset}")]
    InvalidString { offset: usize },
    #[error("rule {rule_id} references unresolved lazy position {pos}")]
    DanglingLazyRef { rule_id: i32, pos: usize },
}
