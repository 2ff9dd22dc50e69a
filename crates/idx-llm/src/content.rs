//! Generation request and response types

use serde::{Deserialize, Serialize};

/// Handle to a file held by the remote service
///
/// Created by [`GenerativeProvider::upload`](crate::GenerativeProvider::upload)
/// and released with [`GenerativeProvider::delete`](crate::GenerativeProvider::delete).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteArtifact {
    /// Resource name used for management calls (e.g. `files/abc123`)
    pub name: String,

    /// URI used to reference the file inside generation requests
    pub uri: String,

    /// MIME type the service recorded for the file
    pub mime_type: String,
}

/// One piece of generation input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    /// Inline text
    Text {
        /// The text content
        text: String,
    },

    /// Reference to a previously uploaded file
    Artifact {
        /// The uploaded file
        artifact: RemoteArtifact,
    },
}

impl Part {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create a file reference part
    pub fn artifact(artifact: RemoteArtifact) -> Self {
        Self::Artifact { artifact }
    }

    /// Text content, if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Artifact { .. } => None,
        }
    }
}

/// Request for a single generation round trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (provider-specific)
    pub model: String,

    /// Ordered input parts, sent as one user turn
    pub parts: Vec<Part>,
}

/// Response from a generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Generated text, all candidate parts concatenated
    pub text: String,

    /// Why the model stopped, as reported by the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,

    /// Token usage statistics, when reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl GenerateResponse {
    /// Response carrying only text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish_reason: None,
            usage: None,
        }
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of input tokens
    pub input_tokens: usize,

    /// Number of output tokens
    pub output_tokens: usize,
}

impl TokenUsage {
    /// Total tokens used (input + output)
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

impl GenerateRequest {
    /// Create a builder for generation requests
    pub fn builder(model: impl Into<String>) -> GenerateRequestBuilder {
        GenerateRequestBuilder::new(model)
    }

    /// Concatenated text of all text parts
    pub fn text(&self) -> String {
        self.parts.iter().filter_map(Part::as_text).collect()
    }

    /// Uploaded files referenced by this request
    pub fn artifacts(&self) -> impl Iterator<Item = &RemoteArtifact> {
        self.parts.iter().filter_map(|part| match part {
            Part::Artifact { artifact } => Some(artifact),
            Part::Text { .. } => None,
        })
    }
}

/// Builder for GenerateRequest
pub struct GenerateRequestBuilder {
    model: String,
    parts: Vec<Part>,
}

impl GenerateRequestBuilder {
    /// Create a new builder
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            parts: Vec::new(),
        }
    }

    /// Append a text part
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(Part::text(text));
        self
    }

    /// Append a file reference part
    pub fn artifact(mut self, artifact: RemoteArtifact) -> Self {
        self.parts.push(Part::artifact(artifact));
        self
    }

    /// Build the generation request
    pub fn build(self) -> GenerateRequest {
        GenerateRequest {
            model: self.model,
            parts: self.parts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> RemoteArtifact {
        RemoteArtifact {
            name: "files/abc".to_string(),
            uri: "https://example.invalid/files/abc".to_string(),
            mime_type: "application/pdf".to_string(),
        }
    }

    #[test]
    fn test_builder() {
        let request = GenerateRequest::builder("gemini-2.5-flash")
            .artifact(artifact())
            .text("Analyze this")
            .build();

        assert_eq!(request.model, "gemini-2.5-flash");
        assert_eq!(request.parts.len(), 2);
        assert_eq!(request.text(), "Analyze this");
        assert_eq!(request.artifacts().count(), 1);
    }

    #[test]
    fn test_part_order_is_preserved() {
        let request = GenerateRequest::builder("m")
            .artifact(artifact())
            .text("prompt")
            .build();

        assert!(matches!(request.parts[0], Part::Artifact { .. }));
        assert_eq!(request.parts[1].as_text(), Some("prompt"));
    }

    #[test]
    fn test_token_usage() {
        let usage = TokenUsage {
            input_tokens: 100,
            output_tokens: 50,
        };
        assert_eq!(usage.total(), 150);
    }
}
