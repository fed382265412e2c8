use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Validation and contract errors exposed by `goldview-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid range '{value}', expected one of 1mo, 6mo, 1y, 10y, 20y")]
    InvalidRange { value: String },
    #[error("invalid domestic source '{value}', expected one of scrape, sidebar, table")]
    InvalidDomesticSource { value: String },

    #[error("timestamp '{value}' is not in a supported format")]
    UnsupportedTimestamp { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be positive")]
    NonPositiveValue { field: &'static str },
}

/// Failure classification shared by every upstream-facing component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Transport failed or the upstream answered with a non-success status.
    UpstreamUnavailable,
    /// The expected field or container is missing from the payload.
    MalformedUpstreamData,
    /// A numeric value is absent, non-finite or non-positive after extraction.
    InvalidMarketValue,
}

impl SourceErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UpstreamUnavailable => "upstream_unavailable",
            Self::MalformedUpstreamData => "malformed_upstream_data",
            Self::InvalidMarketValue => "invalid_market_value",
        }
    }
}

impl Display for SourceErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal error for a spot or history request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::UpstreamUnavailable,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::MalformedUpstreamData,
            message: message.into(),
        }
    }

    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidMarketValue,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ValidationError> for SourceError {
    fn from(error: ValidationError) -> Self {
        match error {
            ValidationError::NonFiniteValue { .. } | ValidationError::NonPositiveValue { .. } => {
                Self::invalid_value(error.to_string())
            }
            other => Self::malformed(other.to_string()),
        }
    }
}
