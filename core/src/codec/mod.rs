//! Situation document codecs.
//!
//! Two independent on-disk encodings share one in-memory
//! [`SituationDocument`]: pretty JSON and a fixed-layout XML schema.
//! Decoding never partially applies; callers keep their state on error.

pub mod json;
pub mod store;
pub mod xml;

pub use store::SituationStore;

use crate::model::SituationDocument;
use crate::prelude::{CoreResult, ParseError};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Xml,
}

impl Format {
    /// `.xml` (any case) selects XML; every other path is JSON.
    pub fn from_path(path: &Path) -> Format {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xml") => Format::Xml,
            _ => Format::Json,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

pub fn encode(document: &SituationDocument, format: Format) -> CoreResult<Vec<u8>> {
    match format {
        Format::Json => json::encode(document),
        Format::Xml => xml::encode(document),
    }
}

pub fn decode(bytes: &[u8], format: Format) -> Result<SituationDocument, ParseError> {
    match format {
        Format::Json => json::decode(bytes),
        Format::Xml => xml::decode(bytes),
    }
}
