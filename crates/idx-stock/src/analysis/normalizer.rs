//! Turns raw user input into a single analysis request

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A file as received from the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upload {
    pub bytes: Vec<u8>,
    pub filename: String,
}

impl Upload {
    pub fn new(bytes: impl Into<Vec<u8>>, filename: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            filename: filename.into(),
        }
    }
}

/// Everything a user may submit at once
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub upload: Option<Upload>,
    pub text: Option<String>,
}

impl AnalysisInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            upload: None,
            text: Some(text.into()),
        }
    }

    pub fn upload(upload: Upload) -> Self {
        Self {
            upload: Some(upload),
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_upload(mut self, upload: Upload) -> Self {
        self.upload = Some(upload);
        self
    }
}

/// Normalized content ready for the executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisRequest {
    /// Pasted text, already within the character limit
    Text(String),
    /// Uploaded document
    Document { bytes: Vec<u8>, filename: String },
}

impl AnalysisRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Document { .. } => "document",
        }
    }
}

/// Result of cutting text down to a character limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation<'a> {
    /// The kept prefix
    pub text: &'a str,
    /// Whether anything was dropped
    pub truncated: bool,
}

/// Keep the first `limit` characters (Unicode scalar values, not bytes)
pub fn truncate_chars(text: &str, limit: usize) -> Truncation<'_> {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => Truncation {
            text: &text[..cut],
            truncated: true,
        },
        None => Truncation {
            text,
            truncated: false,
        },
    }
}

/// Chooses and prepares the content of a submission
///
/// An upload with a file name wins over text. Text must be non-empty and is
/// cut to `max_text_chars`.
#[derive(Debug, Clone, Copy)]
pub struct ContentNormalizer {
    max_text_chars: usize,
}

impl ContentNormalizer {
    pub fn new(max_text_chars: usize) -> Self {
        Self { max_text_chars }
    }

    pub fn max_text_chars(&self) -> usize {
        self.max_text_chars
    }

    /// Produce exactly one request, or `InputMissing`
    pub fn normalize(&self, input: AnalysisInput) -> Result<AnalysisRequest, AnalysisError> {
        if let Some(upload) = input.upload.filter(|upload| !upload.filename.trim().is_empty()) {
            return Ok(AnalysisRequest::Document {
                bytes: upload.bytes,
                filename: upload.filename,
            });
        }

        match input.text.filter(|text| !text.is_empty()) {
            Some(text) => {
                let cut = truncate_chars(&text, self.max_text_chars);
                if cut.truncated {
                    debug!(limit = self.max_text_chars, "Pasted text truncated");
                }
                Ok(AnalysisRequest::Text(cut.text.to_string()))
            }
            None => Err(AnalysisError::InputMissing),
        }
    }
}

impl Default for ContentNormalizer {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_TEXT_CHARS)
    }
}
