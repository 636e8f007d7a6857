//! Error types for duration parsing and manifest I/O.

use std::fmt;

use thiserror::Error;

// ── Duration ────────────────────────────────────────────────────────

/// Which `PnDTnHnMnS` field a conversion error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationField {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl fmt::Display for DurationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationField::Days => write!(f, "days"),
            DurationField::Hours => write!(f, "hours"),
            DurationField::Minutes => write!(f, "minutes"),
            DurationField::Seconds => write!(f, "seconds"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("at least one number and designator are required")]
    TooShort,
    #[error("duration cannot be negative")]
    Negative,
    #[error("duration must be in the format: P[nD][T[nH][nM][nS]]")]
    InvalidFormat,
    #[error("error parsing {field}: {reason}")]
    Field {
        field: DurationField,
        reason: String,
    },
    #[error("{field} value overflows the duration range")]
    Overflow { field: DurationField },
    #[error("duration out of range for conversion")]
    OutOfRange,
}

impl DurationError {
    /// True for rejections made on the shape of the text, before any field
    /// is converted.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            DurationError::TooShort | DurationError::Negative | DurationError::InvalidFormat
        )
    }

    /// The field a conversion error refers to, if any.
    pub fn field(&self) -> Option<DurationField> {
        match self {
            DurationError::Field { field, .. } | DurationError::Overflow { field } => {
                Some(*field)
            }
            _ => None,
        }
    }
}

// ── Manifest ────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid MPD document: {0}")]
    Deserialize(String),
    #[error("MPD serialization failed: {0}")]
    Serialize(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
