//! Character table, grammatical feature types and language helpers shared
//! by the trie engine and the word analyzer.
//!
//! - [`character`] -- process-wide code-point classification (C1)
//! - [`categories`] -- bit-flag grammatical feature sets (C3)
//! - [`misc`] -- additional per-variant attributes (misc info)
//! - [`word_form`] -- the `Token`/`WordForm`/`CharsInfo` output model
//! - [`langhelpers`] -- word correction, transliteral correction, language
//!   classification and the preposition table (C2)

pub mod categories;
pub mod character;
pub mod langhelpers;
pub mod misc;
pub mod word_form;
