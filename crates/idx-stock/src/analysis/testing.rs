//! Test doubles for the generative collaborator

use async_trait::async_trait;
use idx_llm::{GenerateRequest, GenerateResponse, GenerativeProvider, LLMError, RemoteArtifact};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// In-memory provider that records what it was asked to do
pub(crate) struct FakeProvider {
    reply: Result<String, String>,
    fail_upload: bool,
    fail_delete: bool,
    stall: Mutex<Option<Duration>>,
    requests: Mutex<Vec<GenerateRequest>>,
    uploaded: Mutex<Vec<(Vec<u8>, String)>>,
    uploads: AtomicUsize,
    deletes: AtomicUsize,
}

impl FakeProvider {
    pub(crate) fn replying(text: &str) -> Self {
        Self::with_reply(Ok(text.to_string()))
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self::with_reply(Err(message.to_string()))
    }

    fn with_reply(reply: Result<String, String>) -> Self {
        Self {
            reply,
            fail_upload: false,
            fail_delete: false,
            stall: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
            uploaded: Mutex::new(Vec::new()),
            uploads: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    pub(crate) fn fail_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    pub(crate) fn fail_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    /// Make the first generation call sleep before answering
    pub(crate) fn stall_first(self, delay: Duration) -> Self {
        if let Ok(mut stall) = self.stall.lock() {
            *stall = Some(delay);
        }
        self
    }

    pub(crate) fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Bytes and display name of every upload
    pub(crate) fn uploaded(&self) -> Vec<(Vec<u8>, String)> {
        self.uploaded.lock().map(|u| u.clone()).unwrap_or_default()
    }

    pub(crate) fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub(crate) fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

pub(crate) fn artifact() -> RemoteArtifact {
    RemoteArtifact {
        name: "files/fake".to_string(),
        uri: "https://example.invalid/files/fake".to_string(),
        mime_type: "application/pdf".to_string(),
    }
}

#[async_trait]
impl GenerativeProvider for FakeProvider {
    async fn upload(&self, path: &Path, display_name: &str) -> idx_llm::Result<RemoteArtifact> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if self.fail_upload {
            return Err(LLMError::RequestFailed("upload rejected".to_string()));
        }
        let bytes = tokio::fs::read(path).await?;
        if let Ok(mut uploaded) = self.uploaded.lock() {
            uploaded.push((bytes, display_name.to_string()));
        }
        Ok(artifact())
    }

    async fn generate(&self, request: GenerateRequest) -> idx_llm::Result<GenerateResponse> {
        let stall = self.stall.lock().ok().and_then(|mut stall| stall.take());
        if let Some(delay) = stall {
            tokio::time::sleep(delay).await;
        }
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        match &self.reply {
            Ok(text) => Ok(GenerateResponse::text(text.clone())),
            Err(message) => Err(LLMError::RequestFailed(message.clone())),
        }
    }

    async fn delete(&self, _artifact: &RemoteArtifact) -> idx_llm::Result<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete {
            return Err(LLMError::NotFound("files/fake".to_string()));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}
