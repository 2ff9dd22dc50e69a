//! Shared utilities for idx-pro
//!
//! This crate provides common functionality used across the idx-pro workspace,
//! including logging setup and environment-backed configuration lookups.

pub mod config;
pub mod logging;

pub use config::{EnvSource, ProcessEnv};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
