//! Per-user analysis state machine
//!
//! ```text
//! Idle ──submit──▶ Running ──success──▶ Succeeded
//!  │                  │
//!  └─submit(empty)─▶ InputMissing      └──failure──▶ Failed
//! ```
//!
//! Every state except `Running` accepts a new submission. `Running` rejects
//! both submissions and empty submissions, so at most one analysis is in
//! flight per session.

use crate::error::AnalysisError;
use crate::ticker::Ticker;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a session is in its analysis lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// A request is with the executor
    Running,
    /// The last request produced an analysis
    Succeeded,
    /// The last request failed
    Failed,
    /// The last submission had no content
    InputMissing,
}

impl AnalysisStatus {
    /// Whether the status carries a result
    pub fn has_result(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::InputMissing => "input_missing",
        };
        f.write_str(label)
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A valid request was handed to the executor
    Submit,
    /// A submission without content
    SubmitEmpty,
    /// The executor produced an analysis
    Succeed(String),
    /// The executor failed; carries the displayable message
    Fail(String),
}

/// Analysis state for one user session
///
/// Owned by the caller and passed by `&mut` to every handler. The stored
/// result survives `Running` and `InputMissing` so a later completion can
/// overwrite it, but [`AnalysisSession::result`] only exposes it while the
/// status is `Succeeded` or `Failed`.
///
/// Serializable for display and logging only. There is no way to load a
/// session, so every instance went through [`AnalysisSession::apply`].
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSession {
    id: String,
    status: AnalysisStatus,
    result: Option<String>,
    ticker: Ticker,
    updated_at: DateTime<Utc>,
}

impl AnalysisSession {
    pub fn new(ticker: Ticker) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            status: AnalysisStatus::Idle,
            result: None,
            ticker,
            updated_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> AnalysisStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == AnalysisStatus::Running
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn set_ticker(&mut self, ticker: Ticker) {
        self.ticker = ticker;
        self.touch();
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Result of the last completed analysis, if the status exposes one
    pub fn result(&self) -> Option<&str> {
        if self.status.has_result() {
            self.result.as_deref()
        } else {
            None
        }
    }

    /// Last stored result regardless of status
    pub fn last_result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Reject work while an analysis is in flight
    pub fn ensure_idle(&self) -> Result<(), AnalysisError> {
        if self.is_running() {
            Err(AnalysisError::AlreadyRunning)
        } else {
            Ok(())
        }
    }

    /// Apply one event, returning the new status
    ///
    /// Rejected events leave the session untouched.
    pub fn apply(&mut self, event: SessionEvent) -> Result<AnalysisStatus, AnalysisError> {
        let next = match (self.status, event) {
            (AnalysisStatus::Running, SessionEvent::Submit | SessionEvent::SubmitEmpty) => {
                return Err(AnalysisError::AlreadyRunning);
            }
            (_, SessionEvent::Submit) => AnalysisStatus::Running,
            (_, SessionEvent::SubmitEmpty) => AnalysisStatus::InputMissing,
            (AnalysisStatus::Running, SessionEvent::Succeed(text)) => {
                self.result = Some(text);
                AnalysisStatus::Succeeded
            }
            (AnalysisStatus::Running, SessionEvent::Fail(message)) => {
                self.result = Some(message);
                AnalysisStatus::Failed
            }
            (_, SessionEvent::Succeed(_) | SessionEvent::Fail(_)) => {
                return Err(AnalysisError::NotRunning);
            }
        };

        self.status = next;
        self.touch();
        Ok(next)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new(Ticker::default())
    }
}
