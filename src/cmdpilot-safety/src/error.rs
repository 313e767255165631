//! Error types for vocabulary construction.

use thiserror::Error;

/// Errors raised while building a [`crate::SafetyVocabulary`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SafetyError {
    /// A list entry was empty after trimming.
    #[error("empty entry in {list} list")]
    EmptyEntry { list: &'static str },

    /// A list entry contained whitespace and could never match a first token.
    #[error("entry '{entry}' in {list} list contains whitespace")]
    EntryWithWhitespace { list: &'static str, entry: String },
}
