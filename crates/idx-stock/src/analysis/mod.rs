//! AI analysis request lifecycle
//!
//! - [`normalizer`]: raw input to one request
//! - [`session`]: per-user state machine
//! - [`executor`]: provider calls and remote file cleanup
//! - [`service`]: ties the three together for a submission
//! - [`presenter`]: state to display text

pub mod executor;
pub mod normalizer;
pub mod presenter;
pub mod service;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use executor::{AnalysisExecutor, AnalysisOutcome, FAILURE_MARKER};
pub use normalizer::{AnalysisInput, AnalysisRequest, ContentNormalizer, Upload};
pub use presenter::{Presentation, present};
pub use service::AnalysisService;
pub use session::{AnalysisSession, AnalysisStatus, SessionEvent};
