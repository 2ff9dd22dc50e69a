//! Google Gemini provider implementation
//!
//! This module implements the [`GenerativeProvider`] trait for the Gemini API.
//! Documents go through the Files API resumable upload protocol and are
//! referenced from `generateContent` by URI.
//! See: https://ai.google.dev/api/files and https://ai.google.dev/api/generate-content
//!
//! # Example
//!
//! ```no_run
//! use idx_llm::{GenerateRequest, GenerativeProvider};
//! use idx_llm::providers::{GeminiConfig, GeminiProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GeminiProvider::with_config(GeminiConfig::new("AIza..."))?;
//!
//!     let request = GenerateRequest::builder("gemini-2.5-flash")
//!         .text("Ringkas laporan keuangan berikut")
//!         .build();
//!
//!     let response = provider.generate(request).await?;
//!     println!("{}", response.text);
//!     Ok(())
//! }
//! ```

use crate::mime::mime_type_for;
use crate::{
    GenerateRequest, GenerateResponse, GenerativeProvider, LLMError, Part, RemoteArtifact, Result,
    TokenUsage,
};
use async_trait::async_trait;
use idx_utils::EnvSource;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const API_VERSION: &str = "v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";
const UPLOAD_URL_HEADER: &str = "x-goog-upload-url";

/// Configuration for the Gemini provider
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL (default: "https://generativelanguage.googleapis.com")
    pub api_base: String,

    /// Request timeout; `None` keeps the transport default
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            timeout: None,
        }
    }

    /// Create config from environment variables
    ///
    /// Reads the API key from `GEMINI_API_KEY` and optionally the base URL
    /// from `GEMINI_API_BASE`.
    pub fn from_env() -> Result<Self> {
        Self::from_source(&idx_utils::ProcessEnv)
    }

    /// Create config from any configuration source
    pub fn from_source(source: &impl EnvSource) -> Result<Self> {
        let api_key = source.get("GEMINI_API_KEY").ok_or_else(|| {
            LLMError::ConfigurationError("GEMINI_API_KEY environment variable not set".to_string())
        })?;

        let mut config = Self::new(api_key);
        if let Some(api_base) = source.get("GEMINI_API_BASE") {
            config = config.with_api_base(api_base);
        }
        Ok(config)
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Gemini provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a new Gemini provider with custom configuration
    pub fn with_config(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LLMError::ConfigurationError(
                "Gemini API key must not be empty".to_string(),
            ));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Create a new Gemini provider with API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(GeminiConfig::new(api_key))
    }

    /// Create a provider from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(GeminiConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{API_VERSION}/{path}", self.config.api_base)
    }

    fn upload_url(&self) -> String {
        format!("{}/upload/{API_VERSION}/files", self.config.api_base)
    }
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    #[instrument(skip(self, path), fields(file = %display_name))]
    async fn upload(&self, path: &Path, display_name: &str) -> Result<RemoteArtifact> {
        let bytes = tokio::fs::read(path).await?;
        let mime_type = mime_type_for(display_name);

        debug!(size = bytes.len(), mime_type, "Starting resumable upload");

        // Step 1: open an upload session
        let start = self
            .client
            .post(self.upload_url())
            .header(API_KEY_HEADER, &self.config.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", bytes.len())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&UploadStart {
                file: UploadFileMetadata {
                    display_name: display_name.to_string(),
                },
            })
            .send()
            .await?;
        let start = check_status(start, display_name).await?;

        let session_url = start
            .headers()
            .get(UPLOAD_URL_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                LLMError::UnexpectedResponse("Upload session URL missing".to_string())
            })?;

        // Step 2: send the bytes and finalize
        let response = self
            .client
            .post(session_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(bytes)
            .send()
            .await?;
        let response = check_status(response, display_name).await?;

        let uploaded: UploadResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse upload response: {e}"))
        })?;

        debug!(name = %uploaded.file.name, "Upload finished");

        Ok(RemoteArtifact {
            name: uploaded.file.name,
            uri: uploaded.file.uri,
            mime_type: uploaded
                .file
                .mime_type
                .unwrap_or_else(|| mime_type.to_string()),
        })
    }

    #[instrument(skip(self, request), fields(model = %request.model, parts = request.parts.len()))]
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        debug!("Sending request to Gemini API");

        let body = GeminiRequest::from_request(&request);

        let response = self
            .client
            .post(self.url(&format!("models/{}:generateContent", request.model)))
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response, &request.model).await?;

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        let generated = gemini_response.into_response()?;

        if let Some(usage) = generated.usage {
            debug!(
                "Received response - finish_reason: {:?}, tokens: {}/{}",
                generated.finish_reason, usage.input_tokens, usage.output_tokens
            );
        }

        Ok(generated)
    }

    #[instrument(skip(self, artifact), fields(name = %artifact.name))]
    async fn delete(&self, artifact: &RemoteArtifact) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&artifact.name))
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await?;
        check_status(response, &artifact.name).await?;

        debug!("Deleted remote file");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

/// Map a non-success status into an error, passing successful responses through
async fn check_status(response: Response, subject: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await?;
    Err(match status.as_u16() {
        401 | 403 => LLMError::AuthenticationFailed,
        429 => LLMError::RateLimitExceeded(error_text),
        400 => LLMError::InvalidRequest(error_text),
        404 => LLMError::NotFound(subject.to_string()),
        _ => LLMError::RequestFailed(format!("HTTP {status}: {error_text}")),
    })
}

// Gemini-specific request/response types
// These match the Gemini REST format

#[derive(Debug, Serialize)]
struct UploadStart {
    file: UploadFileMetadata,
}

#[derive(Debug, Serialize)]
struct UploadFileMetadata {
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: UploadedFile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadedFile {
    name: String,
    uri: String,
    mime_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

impl GeminiRequest {
    fn from_request(request: &GenerateRequest) -> Self {
        let parts = request
            .parts
            .iter()
            .map(|part| match part {
                Part::Text { text } => GeminiPart::Text { text: text.clone() },
                Part::Artifact { artifact } => GeminiPart::FileData {
                    file_data: FileData {
                        mime_type: artifact.mime_type.clone(),
                        file_uri: artifact.uri.clone(),
                    },
                },
            })
            .collect();

        Self {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts,
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    FileData {
        #[serde(alias = "fileData")]
        file_data: FileData,
    },
    /// Parts the dashboard does not use (function calls, inline blobs)
    Other(serde_json::Value),
}

#[derive(Debug, Serialize, Deserialize)]
struct FileData {
    #[serde(alias = "mimeType")]
    mime_type: String,
    #[serde(alias = "fileUri")]
    file_uri: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

impl GeminiResponse {
    fn into_response(self) -> Result<GenerateResponse> {
        let usage = self.usage_metadata.map(|usage| TokenUsage {
            input_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
        });

        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(LLMError::Blocked(reason));
        };

        let text: String = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| match part {
                GeminiPart::Text { text } => Some(text),
                GeminiPart::FileData { .. } | GeminiPart::Other(_) => None,
            })
            .collect();

        Ok(GenerateResponse {
            text,
            finish_reason: candidate.finish_reason,
            usage,
        })
    }
}
