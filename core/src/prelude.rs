use crate::model::Field;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Why a single-field edit was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ValidationReason {
    Empty,
    NotNumeric,
    NotInteger,
    NotFinite,
    Negative,
    OutOfRange { min: f64, max: f64 },
    IndexOutOfBounds,
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationReason::Empty => write!(f, "value is empty"),
            ValidationReason::NotNumeric => write!(f, "value is not a decimal number"),
            ValidationReason::NotInteger => write!(f, "value is not an unsigned integer"),
            ValidationReason::NotFinite => write!(f, "value is not finite"),
            ValidationReason::Negative => write!(f, "value must not be negative"),
            ValidationReason::OutOfRange { min, max } => {
                write!(f, "value must lie within [{}, {}]", min, max)
            }
            ValidationReason::IndexOutOfBounds => write!(f, "no record at that index"),
        }
    }
}

/// Single-field rejection. The record keeps its prior value.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: Field,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(field: Field, reason: ValidationReason) -> Self {
        Self { field, reason }
    }
}

/// Which kind of document failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Json,
    Xml,
    Scenario,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentKind::Json => "JSON situation",
            DocumentKind::Xml => "XML situation",
            DocumentKind::Scenario => "scenario XML",
        };
        f.write_str(name)
    }
}

/// Malformed content in an otherwise readable document.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("malformed {kind}: {message}")]
pub struct ParseError {
    pub kind: DocumentKind,
    pub message: String,
}

impl ParseError {
    pub fn new(kind: DocumentKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn json(message: impl Into<String>) -> Self {
        Self::new(DocumentKind::Json, message)
    }

    pub fn xml(message: impl Into<String>) -> Self {
        Self::new(DocumentKind::Xml, message)
    }

    pub fn scenario(message: impl Into<String>) -> Self {
        Self::new(DocumentKind::Scenario, message)
    }
}

/// Common error type for every fallible core operation.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("i/o failure on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("encoding failure: {0}")]
    Encode(String),
    #[error("source roster is empty")]
    EmptyInput,
    #[error("roster has no unused ids left")]
    IdsExhausted,
    #[error("scenario yielded no usable entities ({dropped} dropped)")]
    PartialExtraction { dropped: usize },
}

impl CoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
