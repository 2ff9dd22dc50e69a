//! Generative AI client layer for idx-pro
//!
//! This crate provides a provider-agnostic abstraction over a hosted
//! generative model that can receive uploaded documents. It includes:
//!
//! - Content parts (inline text or a reference to an uploaded file)
//! - Generation request/response types
//! - The [`GenerativeProvider`] trait: upload, generate, delete
//! - A Google Gemini implementation (behind the `gemini` feature)

pub mod content;
pub mod error;
pub mod mime;
pub mod provider;

// Re-export main types
pub use content::{GenerateRequest, GenerateResponse, Part, RemoteArtifact, TokenUsage};
pub use error::{LLMError, Result};
pub use provider::GenerativeProvider;

// Provider implementations (feature-gated)
#[cfg(feature = "gemini")]
pub mod providers;
