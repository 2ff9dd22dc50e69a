//! Terminal rendering of dashboard data

pub mod formatter;

pub use formatter::{CliFormatter, Formatter, FormatterFactory, MarkdownFormatter, OutputStyle};
