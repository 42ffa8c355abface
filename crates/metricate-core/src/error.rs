//! Error types for metricate-core

use std::path::PathBuf;

/// Errors produced while building registries or converting quantities.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A candidate literal did not parse as a number after normalization.
    #[error("malformed numeric literal: {literal:?}")]
    MalformedLiteral { literal: String },

    /// Explicit significant figures and least significant digit disagree.
    #[error("inconsistent precision: {0}")]
    InconsistentPrecision(String),

    /// Division by a zero-valued quantity.
    #[error("division by zero")]
    DivisionByZero,

    /// A locale key that has no number format.
    #[error("unknown locale: {0}")]
    UnknownLocale(String),

    /// The radix and place-value separator of a locale overlap.
    #[error("locale '{locale}' has overlapping radix and place-value separator")]
    AmbiguousNumberFormat { locale: String },

    /// A unit or locale pattern failed to compile.
    #[error("invalid pattern for '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// Unit or unit-type definitions are structurally invalid.
    #[error("invalid definition: {0}")]
    InvalidDefinition(String),

    /// Definition file could not be read.
    #[error("cannot read definitions from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Definition document is not valid JSON for the expected schema.
    #[error("invalid definition document: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
