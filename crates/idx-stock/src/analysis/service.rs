//! Submission handling for one session

use super::executor::AnalysisExecutor;
use super::normalizer::{AnalysisInput, ContentNormalizer};
use super::session::{AnalysisSession, AnalysisStatus, SessionEvent};
use crate::error::{AnalysisError, Result};
use crate::prompts::PromptLibrary;
use tracing::{info, instrument, warn};

/// Result stored when a running submission is dropped before it completes
pub const CANCELLED_MESSAGE: &str = "❌ Analisis dibatalkan sebelum selesai.";

/// Holds a session in `Running` for the duration of one request
///
/// [`InFlight::finish`] applies the outcome. If the submission future is
/// dropped first, `Drop` fails the session so it can accept new work.
struct InFlight<'a> {
    session: &'a mut AnalysisSession,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn start(session: &'a mut AnalysisSession) -> std::result::Result<Self, AnalysisError> {
        session.apply(SessionEvent::Submit)?;
        Ok(Self {
            session,
            settled: false,
        })
    }

    fn finish(mut self, event: SessionEvent) -> std::result::Result<AnalysisStatus, AnalysisError> {
        self.settled = true;
        self.session.apply(event)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!(session = self.session.id(), "Analysis dropped while running");
        if let Err(e) = self.session.apply(SessionEvent::Fail(CANCELLED_MESSAGE.to_string())) {
            warn!("Could not settle dropped analysis: {e}");
        }
    }
}

/// Drives a session from submission to a terminal state
///
/// Order of checks: a running session is rejected first, then a missing
/// client, then missing input. Only a request that passes all three moves
/// the session to `Running`.
pub struct AnalysisService {
    normalizer: ContentNormalizer,
    prompts: PromptLibrary,
    executor: Option<AnalysisExecutor>,
}

impl AnalysisService {
    pub fn new(executor: Option<AnalysisExecutor>, max_text_chars: usize) -> Result<Self> {
        Ok(Self {
            normalizer: ContentNormalizer::new(max_text_chars),
            prompts: PromptLibrary::new()?,
            executor,
        })
    }

    /// Whether a generative client is configured
    pub fn is_available(&self) -> bool {
        self.executor.is_some()
    }

    /// Submit content for analysis and wait for the outcome
    ///
    /// Returns the terminal status (`Succeeded` or `Failed`). Errors leave
    /// the session untouched, except `InputMissing`, which is recorded on the
    /// session before being returned. Dropping the future while the request
    /// is in flight leaves the session `Failed` with [`CANCELLED_MESSAGE`].
    #[instrument(skip_all, fields(session = session.id(), ticker = %session.ticker()))]
    pub async fn submit(
        &self,
        session: &mut AnalysisSession,
        input: AnalysisInput,
    ) -> std::result::Result<AnalysisStatus, AnalysisError> {
        session.ensure_idle()?;

        let Some(executor) = &self.executor else {
            warn!("Analysis requested without a generative client");
            return Err(AnalysisError::ClientUnavailable);
        };

        let request = match self.normalizer.normalize(input) {
            Ok(request) => request,
            Err(e) => {
                session.apply(SessionEvent::SubmitEmpty)?;
                return Err(e);
            }
        };

        let prompt = self
            .prompts
            .analyst_persona(session.ticker().code())
            .map_err(|e| AnalysisError::Prompt(e.to_string()))?;

        let in_flight = InFlight::start(session)?;
        info!(kind = request.kind(), "Analysis started");

        let outcome = executor.execute(request, &prompt).await;
        let status = in_flight.finish(outcome.into_event())?;

        info!(%status, "Analysis finished");
        Ok(status)
    }
}
