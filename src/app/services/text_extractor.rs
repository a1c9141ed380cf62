//! Document to text conversion
//!
//! Statements arrive as uploaded files. Only plain text and markdown are
//! converted here; binary formats must be converted upstream.

use std::path::Path;
use tracing::debug;

use crate::constants::TEXT_EXTENSIONS;
use crate::{Error, Result};

/// Converts an uploaded document into UTF-8 text
pub trait TextExtractor: Send + Sync {
    /// Extract the text of `bytes`; `filename` selects the conversion
    fn extract(&self, bytes: &[u8], filename: &str) -> Result<String>;
}

/// Extractor for `.txt`, `.md` and `.markdown` files
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    /// Check whether a file name has an accepted extension
    ///
    /// Files without an extension are accepted and treated as text.
    pub fn accepts(filename: &str) -> bool {
        match Path::new(filename).extension().and_then(|ext| ext.to_str()) {
            None => true,
            Some(ext) => TEXT_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted)),
        }
    }
}

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8], filename: &str) -> Result<String> {
        if !Self::accepts(filename) {
            return Err(Error::unsupported_document(
                filename,
                format!(
                    "only {} files can be ingested, convert other formats to text first",
                    TEXT_EXTENSIONS.join("/")
                ),
            ));
        }

        let text = String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::text_decoding(filename, e))?;

        // Editors on Windows like to prepend a byte order mark
        let text = match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        };

        debug!("Extracted {} characters from {}", text.len(), filename);
        Ok(text)
    }
}
