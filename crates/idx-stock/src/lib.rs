//! IDX stock dashboard core
//!
//! This crate holds everything behind the `idx-pro` dashboard except the
//! generative client itself:
//!
//! - Ticker normalization for the Indonesia Stock Exchange (`.JK` symbols)
//! - Cached daily price history from Yahoo Finance, plus a latest-day snapshot
//! - The AI analysis lifecycle: input normalization, per-session state
//!   machine, request execution with remote file cleanup, and presentation
//! - Terminal formatters for the CLI
//!
//! # Example
//!
//! ```rust,ignore
//! use idx_stock::{AnalysisInput, Dashboard, DashboardConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let dashboard = Dashboard::from_config(DashboardConfig::from_env()?)?;
//!     let mut session = dashboard.new_session()?;
//!
//!     let history = dashboard.price_history(&session).await;
//!     println!("{:?}", history.snapshot());
//!
//!     dashboard
//!         .submit(&mut session, AnalysisInput::text("Laba bersih naik 12%"))
//!         .await?;
//!     println!("{}", dashboard.present(&session).body());
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod interface;
pub mod market;
pub mod prompts;
pub mod ticker;

// Re-export main types for convenience
pub use analysis::{
    AnalysisInput, AnalysisSession, AnalysisStatus, Presentation, Upload,
};
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::{AnalysisError, Result, StockError};
pub use market::{PriceBar, PriceHistory, PriceSnapshot};
pub use ticker::Ticker;
