//! TextGrid text format
//!
//! Praat stores a TextGrid in one of two isomorphic text encodings:
//!
//! - **Long**: every value is keyed (`xmin = 0.5`), tiers and items carry
//!   headers such as `intervals: size = 3`
//! - **Short**: the same values, one per line, in a fixed order without keys
//!
//! [`TextGridCodec::parse`] accepts both and detects the variant from the first
//! structural line after the two header lines. [`TextGridCodec::serialize`]
//! always writes the long variant. Time values are rounded to
//! [`CodecConfig::decimals`] places on the way in and on the way out, so
//! repeated load/save cycles are stable.
//!
//! Labels are double-quoted; a quote inside a label is written as `""`.
//! Labels spanning several lines are not supported: the reader reports them as
//! unterminated and the writer applies [`crate::config::LabelPolicy`].

mod long;
mod reader;
mod short;
mod writer;

use crate::config::CodecConfig;
use crate::document::Document;
use crate::error::{FormatError, Result};
use reader::LineReader;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// The two on-disk encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Long,
    Short,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Long => write!(f, "long"),
            Variant::Short => write!(f, "short"),
        }
    }
}

/// TextGrid reader and writer
#[derive(Debug, Clone, Default)]
pub struct TextGridCodec {
    config: CodecConfig,
}

impl TextGridCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Parse either variant into a document
    ///
    /// Nothing is returned unless the whole text parses.
    pub fn parse(&self, text: &str) -> std::result::Result<Document, FormatError> {
        self.parse_detailed(text).map(|(doc, _)| doc)
    }

    /// Parse either variant, also reporting which one was found
    pub fn parse_detailed(
        &self,
        text: &str,
    ) -> std::result::Result<(Document, Variant), FormatError> {
        let mut reader = LineReader::new(text);

        let (line, content) = reader.next_line()?;
        if !content.starts_with("File type = \"ooTextFile") {
            return Err(unknown(line, content));
        }
        let (line, content) = reader.next_line()?;
        if content != "Object class = \"TextGrid\"" && content != "\"TextGrid\"" {
            return Err(unknown(line, content));
        }

        let first = reader.next_line()?;
        let variant = detect_variant(first.1).ok_or_else(|| unknown(first.0, first.1))?;
        debug!("Detected {} TextGrid variant", variant);

        let doc = match variant {
            Variant::Long => long::read(&mut reader, first, &self.config)?,
            Variant::Short => short::read(&mut reader, first, &self.config)?,
        };
        if !reader.is_at_end() {
            debug!("Ignoring trailing lines after last tier");
        }
        Ok((doc, variant))
    }

    /// Write the long variant, tiers and items exactly in stored order
    pub fn serialize(&self, doc: &Document) -> std::result::Result<String, FormatError> {
        writer::write(doc, &self.config)
    }

    pub fn parse_file(&self, path: &Path) -> Result<Document> {
        let text = std::fs::read_to_string(path)?;
        let doc = self.parse(&text)?;
        debug!("Read {} from {}", doc, path.display());
        Ok(doc)
    }

    pub fn write_file(&self, doc: &Document, path: &Path) -> Result<()> {
        let text = self.serialize(doc)?;
        std::fs::write(path, text)?;
        debug!("Wrote {} to {}", doc, path.display());
        Ok(())
    }
}

/// Classify the first structural line: `xmin = <num>` or a lone number
fn detect_variant(content: &str) -> Option<Variant> {
    let fields: Vec<&str> = content.split_whitespace().collect();
    match fields.as_slice() {
        ["xmin", "=", value] if value.parse::<f64>().is_ok() => Some(Variant::Long),
        [value] if value.parse::<f64>().is_ok() => Some(Variant::Short),
        _ => None,
    }
}

fn unknown(line: usize, content: &str) -> FormatError {
    FormatError::UnknownVariant {
        line,
        content: content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_variant() {
        assert_eq!(detect_variant("xmin = 0"), Some(Variant::Long));
        assert_eq!(detect_variant("xmin = 1.25"), Some(Variant::Long));
        assert_eq!(detect_variant("0"), Some(Variant::Short));
        assert_eq!(detect_variant("12.5"), Some(Variant::Short));
        assert_eq!(detect_variant("xmin=0"), None);
        assert_eq!(detect_variant("\"IntervalTier\""), None);
        assert_eq!(detect_variant("xmax = 2"), None);
    }
}
