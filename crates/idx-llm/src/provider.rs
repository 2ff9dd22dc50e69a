//! Generative provider trait definition

use crate::{GenerateRequest, GenerateResponse, RemoteArtifact, Result};
use async_trait::async_trait;
use std::path::Path;

/// Trait for hosted generative AI services
///
/// Implementations expose the three operations an analysis needs: putting a
/// document where the model can read it, running one generation, and
/// releasing the uploaded document afterwards.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Upload a local file so generation requests can reference it
    ///
    /// # Arguments
    ///
    /// * `path` - Local file holding the document bytes
    /// * `display_name` - Original file name, also used for MIME inference
    async fn upload(&self, path: &Path, display_name: &str) -> Result<RemoteArtifact>;

    /// Run a single generation round trip
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;

    /// Delete a previously uploaded file
    async fn delete(&self, artifact: &RemoteArtifact) -> Result<()>;

    /// Get the provider name (e.g., "gemini")
    fn name(&self) -> &str;
}
