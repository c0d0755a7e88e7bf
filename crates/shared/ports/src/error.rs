use thiserror::Error;

/// Why a raw frame did not become a `MarketEvent`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// Recognized message type with an unusable field. Counted and dropped.
    #[error("Malformed record: {field}: {reason}")]
    MalformedRecord { field: &'static str, reason: String },

    /// Not a message type the monitor consumes. Ignored, not an error.
    #[error("Unrecognized envelope")]
    UnrecognizedEnvelope,
}

impl NormalizeError {
    pub fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        NormalizeError::MalformedRecord {
            field,
            reason: reason.into(),
        }
    }

    pub fn missing(field: &'static str) -> Self {
        Self::malformed(field, "missing")
    }

    /// Whether this failure should be counted as a dropped record
    pub fn is_malformed(&self) -> bool {
        matches!(self, NormalizeError::MalformedRecord { .. })
    }
}

pub type NormalizeResult<T> = std::result::Result<T, NormalizeError>;
