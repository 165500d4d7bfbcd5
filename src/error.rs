//! Error types for prettify

use thiserror::Error;

/// Result type alias for prettify operations
pub type Result<T> = std::result::Result<T, PrettifyError>;

/// Highlighter error types
#[derive(Error, Debug)]
pub enum PrettifyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A token pattern carried the global or multiline flag
    #[error("pattern /{0}/ uses the global or multiline flag")]
    UnsupportedFlags(String),

    #[error("unknown flag '{flag}' on pattern /{pattern}/")]
    UnknownFlag { pattern: String, flag: char },

    #[error("invalid pattern /{pattern}/: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },

    /// Matching failed at decoration time (e.g. backtracking limit)
    #[error("pattern matching failed: {0}")]
    Match(#[from] fancy_regex::Error),

    #[error("unknown style: {0}")]
    UnknownStyle(String),

    #[error("unknown color: {0}")]
    UnknownColor(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("{0}")]
    Message(String),
}
