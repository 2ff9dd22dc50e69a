//! Maps session state to what the result panel shows

use super::session::{AnalysisSession, AnalysisStatus};

pub const PENDING_TEXT: &str = "Belum ada analisis yang dijalankan.";
pub const RUNNING_HEADLINE: &str =
    "⏳ Gemini sedang menganalisis data (proses mungkin memakan waktu 30-60 detik).";
pub const RUNNING_TEXT: &str = "⏳ Sedang memproses analisis...";
pub const SUCCESS_HEADLINE: &str = "✅ Analisis Selesai! Lihat di bawah.";
pub const FAILURE_HEADLINE: &str = "❌ Analisis Gagal. Lihat detail error di bawah.";
pub const INPUT_MISSING_HEADLINE: &str = "⚠️ Input dibutuhkan.";
pub const INPUT_MISSING_TEXT: &str = "⚠️ Mohon masukkan teks atau upload file terlebih dahulu.";

/// One renderable state of the result panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation<'a> {
    Pending,
    Running,
    /// Markdown produced by the model
    Success(&'a str),
    /// Failure message, shown as-is
    Failure(&'a str),
    InputMissing,
}

impl<'a> Presentation<'a> {
    /// Status line above the panel, if any
    pub fn headline(&self) -> Option<&'static str> {
        match self {
            Self::Pending => None,
            Self::Running => Some(RUNNING_HEADLINE),
            Self::Success(_) => Some(SUCCESS_HEADLINE),
            Self::Failure(_) => Some(FAILURE_HEADLINE),
            Self::InputMissing => Some(INPUT_MISSING_HEADLINE),
        }
    }

    /// Panel content
    pub fn body(&self) -> &'a str {
        match *self {
            Self::Pending => PENDING_TEXT,
            Self::Running => RUNNING_TEXT,
            Self::Success(text) | Self::Failure(text) => text,
            Self::InputMissing => INPUT_MISSING_TEXT,
        }
    }

    /// Whether the body is model-generated markdown
    pub fn is_markdown(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Presentation for the current session state
pub fn present(session: &AnalysisSession) -> Presentation<'_> {
    match session.status() {
        AnalysisStatus::Idle => Presentation::Pending,
        AnalysisStatus::Running => Presentation::Running,
        AnalysisStatus::Succeeded => Presentation::Success(session.result().unwrap_or_default()),
        AnalysisStatus::Failed => Presentation::Failure(session.result().unwrap_or_default()),
        AnalysisStatus::InputMissing => Presentation::InputMissing,
    }
}
