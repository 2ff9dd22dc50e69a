//! Runs one analysis request against the generative provider
//!
//! Text goes out inline after the analyst prompt. Documents are staged in a
//! temporary file, uploaded, referenced from the generation call, and then
//! deleted remotely whatever the outcome.

use super::normalizer::{AnalysisRequest, truncate_chars};
use super::session::SessionEvent;
use crate::config::DEFAULT_MAX_TEXT_CHARS;
use crate::error::AnalysisError;
use idx_llm::{GenerateRequest, GenerateResponse, GenerativeProvider, RemoteArtifact};
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

/// Leading marker of a failure message
///
/// Generated text that starts with it is treated as a failure too.
pub const FAILURE_MARKER: &str = "❌";

/// Separator between the analyst prompt and pasted text
pub const TEXT_SECTION_HEADER: &str = "--- DATA INPUT TEKS ---";

/// Terminal result of one execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// Analysis text, exactly as generated
    Success(String),
    /// Displayable failure message
    Failure(String),
}

impl AnalysisOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Failure(text) => text,
        }
    }

    /// Session transition for this outcome
    pub fn into_event(self) -> SessionEvent {
        match self {
            Self::Success(text) => SessionEvent::Succeed(text),
            Self::Failure(message) => SessionEvent::Fail(message),
        }
    }

    /// Failure carrying a user-facing rendering of the error
    fn from_error(error: &AnalysisError) -> Self {
        let message = match error {
            AnalysisError::Upload(detail) => {
                format!("{FAILURE_MARKER} Gagal mengunggah file untuk dianalisis. Detail: {detail}")
            }
            AnalysisError::Generation(detail) => format!(
                "{FAILURE_MARKER} Gagal mendapatkan respons dari model AI. Detail Error: {detail}"
            ),
            other => format!("{FAILURE_MARKER} {other}"),
        };
        Self::Failure(message)
    }
}

/// Prompt followed by the pasted text, cut to `limit` characters
pub fn compose_text_payload(prompt: &str, text: &str, limit: usize) -> String {
    let cut = truncate_chars(text, limit);
    format!("{prompt}\n\n{TEXT_SECTION_HEADER}\n{}", cut.text)
}

/// Executes analysis requests one at a time
pub struct AnalysisExecutor {
    provider: Arc<dyn GenerativeProvider>,
    model: String,
    max_text_chars: usize,
}

impl AnalysisExecutor {
    pub fn new(provider: Arc<dyn GenerativeProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
        }
    }

    pub fn with_max_text_chars(mut self, limit: usize) -> Self {
        self.max_text_chars = limit;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run a request to a terminal outcome
    ///
    /// Never returns an error: every failure becomes [`AnalysisOutcome::Failure`].
    #[instrument(
        skip_all,
        fields(request_id = %uuid::Uuid::new_v4(), kind = request.kind(), model = %self.model)
    )]
    pub async fn execute(&self, request: AnalysisRequest, prompt: &str) -> AnalysisOutcome {
        let outcome = match request {
            AnalysisRequest::Text(text) => {
                let payload = compose_text_payload(prompt, &text, self.max_text_chars);
                let request = GenerateRequest::builder(&self.model).text(payload).build();
                self.generate(request).await
            }
            AnalysisRequest::Document { bytes, filename } => {
                self.execute_document(&bytes, &filename, prompt).await
            }
        };

        info!(success = outcome.is_success(), "Analysis request finished");
        outcome
    }

    async fn execute_document(&self, bytes: &[u8], filename: &str, prompt: &str) -> AnalysisOutcome {
        let staged = match stage(bytes, filename).await {
            Ok(staged) => staged,
            Err(e) => {
                let error = AnalysisError::Upload(format!("could not stage file: {e}"));
                warn!("{error}");
                return AnalysisOutcome::from_error(&error);
            }
        };

        let uploaded = self.provider.upload(staged.path(), filename).await;
        // The local copy is only needed until the upload finishes
        drop(staged);

        let artifact = match uploaded {
            Ok(artifact) => artifact,
            Err(e) => {
                let error = AnalysisError::Upload(e.to_string());
                warn!("{error}");
                return AnalysisOutcome::from_error(&error);
            }
        };
        debug!(name = %artifact.name, "Document uploaded");

        let guard = ArtifactGuard::new(Arc::clone(&self.provider), artifact.clone());

        let request = GenerateRequest::builder(&self.model)
            .artifact(artifact)
            .text(prompt)
            .build();
        let outcome = self.generate(request).await;

        guard.release().await;
        outcome
    }

    async fn generate(&self, request: GenerateRequest) -> AnalysisOutcome {
        classify(self.provider.generate(request).await)
    }
}

/// Map a generation result onto an outcome
fn classify(result: idx_llm::Result<GenerateResponse>) -> AnalysisOutcome {
    match result {
        Ok(response) if response.text.starts_with(FAILURE_MARKER) => {
            AnalysisOutcome::Failure(response.text)
        }
        Ok(response) if response.text.is_empty() => {
            AnalysisOutcome::from_error(&AnalysisError::Generation("empty response".to_string()))
        }
        Ok(response) => AnalysisOutcome::Success(response.text),
        Err(e) => {
            let error = AnalysisError::Generation(e.to_string());
            warn!("{error}");
            AnalysisOutcome::from_error(&error)
        }
    }
}

/// Write document bytes to a temporary file keeping the original extension
async fn stage(bytes: &[u8], filename: &str) -> std::io::Result<NamedTempFile> {
    let suffix = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();

    let staged = tempfile::Builder::new()
        .prefix("idx-pro-")
        .suffix(&suffix)
        .tempfile()?;
    tokio::fs::write(staged.path(), bytes).await?;
    Ok(staged)
}

/// Owns a remote file until it is deleted
///
/// [`ArtifactGuard::release`] deletes inline. If the guard is dropped without
/// release (the request future was cancelled), deletion is spawned onto the
/// current runtime instead.
struct ArtifactGuard {
    provider: Arc<dyn GenerativeProvider>,
    artifact: Option<RemoteArtifact>,
}

impl ArtifactGuard {
    fn new(provider: Arc<dyn GenerativeProvider>, artifact: RemoteArtifact) -> Self {
        Self {
            provider,
            artifact: Some(artifact),
        }
    }

    async fn release(mut self) {
        if let Some(artifact) = self.artifact.take() {
            delete_artifact(self.provider.as_ref(), &artifact).await;
        }
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        let Some(artifact) = self.artifact.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let provider = Arc::clone(&self.provider);
                handle.spawn(async move {
                    delete_artifact(provider.as_ref(), &artifact).await;
                });
            }
            Err(_) => warn!(name = %artifact.name, "No runtime to delete remote file"),
        }
    }
}

async fn delete_artifact(provider: &dyn GenerativeProvider, artifact: &RemoteArtifact) {
    match provider.delete(artifact).await {
        Ok(()) => debug!(name = %artifact.name, "Remote file deleted"),
        Err(e) => {
            let warning = AnalysisError::Cleanup(e.to_string());
            warn!(name = %artifact.name, "{warning}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testing::{FakeProvider, artifact};
    use async_trait::async_trait;
    use idx_llm::{LLMError, Part};

    const PROMPT: &str = "Anda adalah analis saham.";

    fn executor(provider: &Arc<FakeProvider>) -> AnalysisExecutor {
        AnalysisExecutor::new(provider.clone(), "gemini-2.5-flash")
    }

    mockall::mock! {
        Provider {}

        #[async_trait]
        impl GenerativeProvider for Provider {
            async fn upload(&self, path: &Path, display_name: &str) -> idx_llm::Result<RemoteArtifact>;
            async fn generate(&self, request: GenerateRequest) -> idx_llm::Result<GenerateResponse>;
            async fn delete(&self, artifact: &RemoteArtifact) -> idx_llm::Result<()>;
            fn name(&self) -> &str;
        }
    }

    fn document() -> AnalysisRequest {
        AnalysisRequest::Document {
            bytes: b"%PDF-1.7 laporan".to_vec(),
            filename: "laporan_q3.pdf".to_string(),
        }
    }

    #[tokio::test]
    async fn test_text_payload_layout() {
        let provider = Arc::new(FakeProvider::replying("OK"));
        let outcome = executor(&provider)
            .execute(AnalysisRequest::Text("Net income: 2T".to_string()), PROMPT)
            .await;

        assert_eq!(outcome, AnalysisOutcome::Success("OK".to_string()));

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "gemini-2.5-flash");
        assert_eq!(requests[0].parts.len(), 1);

        let payload = requests[0].text();
        assert!(payload.starts_with(PROMPT));
        assert!(payload.ends_with("--- DATA INPUT TEKS ---\nNet income: 2T"));
        assert_eq!(provider.upload_count(), 0);
        assert_eq!(provider.delete_count(), 0);
    }

    #[tokio::test]
    async fn test_long_text_keeps_first_5000_chars() {
        let provider = Arc::new(FakeProvider::replying("OK"));
        let text: String = "Pendapatan 10.5T; ".repeat(400);
        assert!(text.chars().count() > 5000);

        executor(&provider)
            .execute(AnalysisRequest::Text(text.clone()), PROMPT)
            .await;

        let expected: String = text.chars().take(5000).collect();
        assert_eq!(
            provider.requests()[0].text(),
            format!("{PROMPT}\n\n{TEXT_SECTION_HEADER}\n{expected}")
        );
    }

    #[tokio::test]
    async fn test_success_text_is_unmodified() {
        let reply = "### 1. 🔍 Kesimpulan Eksekutif\n- Sehat  \n";
        let provider = Arc::new(FakeProvider::replying(reply));
        let outcome = executor(&provider)
            .execute(AnalysisRequest::Text("x".to_string()), PROMPT)
            .await;
        assert_eq!(outcome.text(), reply);
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_marked_text_is_failure() {
        let provider = Arc::new(FakeProvider::replying("❌ Data tidak valid"));
        let outcome = executor(&provider)
            .execute(AnalysisRequest::Text("x".to_string()), PROMPT)
            .await;
        assert_eq!(outcome, AnalysisOutcome::Failure("❌ Data tidak valid".to_string()));
    }

    #[tokio::test]
    async fn test_transport_error_is_failure() {
        let provider = Arc::new(FakeProvider::failing("connection reset"));
        let outcome = executor(&provider)
            .execute(AnalysisRequest::Text("x".to_string()), PROMPT)
            .await;

        assert!(!outcome.is_success());
        assert!(outcome.text().starts_with(FAILURE_MARKER));
        assert!(outcome.text().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_empty_reply_is_failure() {
        let provider = Arc::new(FakeProvider::replying(""));
        let outcome = executor(&provider)
            .execute(AnalysisRequest::Text("x".to_string()), PROMPT)
            .await;
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_document_flow() {
        let provider = Arc::new(FakeProvider::replying("Analisis dokumen"));
        let outcome = executor(&provider).execute(document(), PROMPT).await;

        assert_eq!(outcome, AnalysisOutcome::Success("Analisis dokumen".to_string()));

        let uploaded = provider.uploaded();
        assert_eq!(uploaded.len(), 1);
        assert_eq!(uploaded[0].0, b"%PDF-1.7 laporan".to_vec());
        assert_eq!(uploaded[0].1, "laporan_q3.pdf");

        let requests = provider.requests();
        assert_eq!(requests[0].parts, vec![Part::artifact(artifact()), Part::text(PROMPT)]);
        assert_eq!(provider.delete_count(), 1);
    }

    #[tokio::test]
    async fn test_document_deleted_after_failed_generation() {
        let provider = Arc::new(FakeProvider::failing("503"));
        let outcome = executor(&provider).execute(document(), PROMPT).await;

        assert!(!outcome.is_success());
        assert_eq!(provider.delete_count(), 1);
    }

    #[tokio::test]
    async fn test_cleanup_failure_does_not_change_outcome() {
        let provider = Arc::new(FakeProvider::replying("OK").fail_delete());
        let outcome = executor(&provider).execute(document(), PROMPT).await;

        assert_eq!(outcome, AnalysisOutcome::Success("OK".to_string()));
        assert_eq!(provider.delete_count(), 1);
    }

    #[tokio::test]
    async fn test_upload_failure_skips_generation() {
        let provider = Arc::new(FakeProvider::replying("OK").fail_upload());
        let outcome = executor(&provider).execute(document(), PROMPT).await;

        assert!(outcome.text().starts_with(FAILURE_MARKER));
        assert!(outcome.text().contains("upload rejected"));
        assert!(provider.requests().is_empty());
        assert_eq!(provider.delete_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_called_once_on_success() {
        let mut mock = MockProvider::new();
        mock.expect_upload().times(1).returning(|_, _| Ok(artifact()));
        mock.expect_generate()
            .times(1)
            .returning(|_| Ok(GenerateResponse::text("OK")));
        mock.expect_delete()
            .withf(|artifact| artifact.name == "files/fake")
            .times(1)
            .returning(|_| Ok(()));

        let executor = AnalysisExecutor::new(Arc::new(mock), "gemini-2.5-flash");
        let outcome = executor.execute(document(), PROMPT).await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_delete_called_once_on_failure() {
        let mut mock = MockProvider::new();
        mock.expect_upload().times(1).returning(|_, _| Ok(artifact()));
        mock.expect_generate()
            .times(1)
            .returning(|_| Err(LLMError::RateLimitExceeded("quota".to_string())));
        mock.expect_delete().times(1).returning(|_| Ok(()));

        let executor = AnalysisExecutor::new(Arc::new(mock), "gemini-2.5-flash");
        let outcome = executor.execute(document(), PROMPT).await;
        assert!(outcome.text().contains("quota"));
    }

    #[tokio::test]
    async fn test_dropped_guard_still_deletes() {
        let provider = Arc::new(FakeProvider::replying("OK"));
        let guard = ArtifactGuard::new(provider.clone(), artifact());
        drop(guard);

        for _ in 0..10 {
            if provider.delete_count() == 1 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(provider.delete_count(), 1);
    }

    #[test]
    fn test_outcome_into_event() {
        assert_eq!(
            AnalysisOutcome::Success("a".to_string()).into_event(),
            SessionEvent::Succeed("a".to_string())
        );
        assert_eq!(
            AnalysisOutcome::Failure("b".to_string()).into_event(),
            SessionEvent::Fail("b".to_string())
        );
    }

    #[tokio::test]
    async fn test_stage_keeps_extension() {
        let staged = stage(b"abc", "laporan.PDF").await.unwrap();
        let path = staged.path().to_path_buf();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("PDF"));
        assert_eq!(std::fs::read(&path).unwrap(), b"abc");

        drop(staged);
        assert!(!path.exists());
    }
}
