//! Common error types for TextGrid handling

use thiserror::Error;

/// Common result type for fave-common operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for fave-common
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or unrecognized TextGrid input, or unencodable output
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Tier domain change that would truncate existing content
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// An item or tier of one kind was combined with a tier of the other kind
    #[error("Tier kind mismatch on tier \"{tier}\": expected {expected}, found {found}")]
    TierKindMismatch {
        tier: String,
        expected: &'static str,
        found: &'static str,
    },

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failures while reading or writing the TextGrid text format
///
/// Line numbers are 1-based and refer to the input text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Header or first structural line matches neither the long nor the short variant
    #[error("Unrecognized TextGrid variant at line {line}: {content:?}")]
    UnknownVariant { line: usize, content: String },

    /// Declared tier count disagrees with the tiers actually present
    #[error("Tier count mismatch: declared {declared}, found {actual}")]
    TierCountMismatch { declared: usize, actual: usize },

    /// A numeric field did not parse
    #[error("Invalid number at line {line}: {value:?}")]
    InvalidNumber { line: usize, value: String },

    /// A quoted label was not closed on its line
    #[error("Unterminated label at line {line}: {content:?}")]
    UnterminatedLabel { line: usize, content: String },

    /// A keyed line did not carry the expected key
    #[error("Missing field {field:?} at line {line}: {content:?}")]
    MissingField {
        line: usize,
        field: &'static str,
        content: String,
    },

    /// Tier class is neither "IntervalTier" nor "TextTier"
    #[error("Unknown tier class at line {line}: {class:?}")]
    UnknownTierClass { line: usize, class: String },

    /// Interval record whose end lies before its start
    #[error("Interval ends before it starts at line {line}: {start} > {end}")]
    InvertedInterval { line: usize, start: f64, end: f64 },

    /// Input ended in the middle of a record
    #[error("Unexpected end of input after line {line}")]
    UnexpectedEof { line: usize },

    /// Label cannot be written under the configured label policy
    #[error("Label on tier \"{tier}\" cannot be encoded: {label:?}")]
    UnencodableLabel { tier: String, label: String },
}

/// Rejected attempt to shrink a tier's domain
#[derive(Error, Debug, Clone, PartialEq)]
#[error(
    "Cannot extend tier \"{tier}\" from [{current_min}, {current_max}] to [{requested_min}, {requested_max}]: \
     new domain must contain the old one"
)]
pub struct DomainError {
    pub tier: String,
    pub current_min: f64,
    pub current_max: f64,
    pub requested_min: f64,
    pub requested_max: f64,
}
