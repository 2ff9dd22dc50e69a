//! Command-line interface for IDX Pro

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use idx_stock::interface::{Formatter, FormatterFactory, OutputStyle};
use idx_stock::{AnalysisError, AnalysisInput, AnalysisStatus, Dashboard, DashboardConfig, Upload};
use idx_utils::LogFormat;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "idx-pro")]
#[command(about = "IDX stock dashboard with AI fundamental analysis", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    /// Output style
    #[arg(long, value_enum, global = true, default_value_t = Style::Table)]
    format: Style,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Style {
    Table,
    Markdown,
}

impl From<Style> for OutputStyle {
    fn from(style: Style) -> Self {
        match style {
            Style::Table => OutputStyle::Table,
            Style::Markdown => OutputStyle::Markdown,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Latest price, change and volume
    Snapshot {
        /// Exchange code, e.g. BBCA
        ticker: String,

        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Recent daily bars, newest first
    History {
        ticker: String,

        #[arg(long, default_value_t = 10)]
        rows: usize,
    },
    /// Run one AI analysis on a document or pasted text
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Ticker the analyst covers; defaults to IDX_DEFAULT_TICKER
    #[arg(long)]
    ticker: Option<String>,

    /// Financial report to upload (PDF, TXT, DOCX)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Financial data pasted inline
    #[arg(long, conflicts_with = "text_file")]
    text: Option<String>,

    /// Read the pasted text from a file
    #[arg(long)]
    text_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    idx_utils::init_tracing_with(if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    });

    let formatter = FormatterFactory::create(cli.format.into());
    if let Err(e) = run(cli.command, formatter.as_ref()).await {
        eprintln!("{}", formatter.format_error(&format!("{e:#}")));
        std::process::exit(1);
    }
}

async fn run(command: Command, formatter: &dyn Formatter) -> Result<()> {
    let config = DashboardConfig::from_env().context("Invalid configuration")?;
    let dashboard = Dashboard::from_config(config)?;
    let mut session = dashboard.new_session()?;

    info!(session = session.id(), "Starting idx-pro");

    match command {
        Command::Snapshot { ticker, json } => {
            let ticker = dashboard.select_ticker(&mut session, &ticker)?;
            let snapshot = dashboard.price_history(&session).await.snapshot();
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                println!("{}", formatter.format_snapshot(&ticker, &snapshot));
            }
        }
        Command::History { ticker, rows } => {
            dashboard.select_ticker(&mut session, &ticker)?;
            let history = dashboard.price_history(&session).await;
            println!("{}", formatter.format_history(&history.recent(rows)));
        }
        Command::Analyze(args) => {
            if let Some(ticker) = &args.ticker {
                dashboard.select_ticker(&mut session, ticker)?;
            }
            let input = read_input(&args).await?;

            match dashboard.submit(&mut session, input).await {
                Ok(status) => debug!(%status, "Submission finished"),
                // Shown through the presentation below
                Err(AnalysisError::InputMissing) => {}
                Err(e) => return Err(e.into()),
            }

            println!("{}", formatter.format_presentation(&dashboard.present(&session)));
            if session.status() != AnalysisStatus::Succeeded {
                bail!("Analysis ended with status {}", session.status());
            }
        }
    }

    Ok(())
}

/// Collect the upload and text given on the command line
async fn read_input(args: &AnalyzeArgs) -> Result<AnalysisInput> {
    let mut input = AnalysisInput::default();

    if let Some(path) = &args.file {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        input = input.with_upload(Upload::new(bytes, filename));
    }

    if let Some(text) = &args.text {
        input = input.with_text(text.as_str());
    } else if let Some(path) = &args.text_file {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        input = input.with_text(text);
    }

    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "idx-pro",
            "--json-logs",
            "analyze",
            "--ticker",
            "tlkm",
            "--text",
            "Net income: 2T",
        ])
        .unwrap();

        assert!(cli.json_logs);
        assert_eq!(cli.format, Style::Table);
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.ticker.as_deref(), Some("tlkm"));
                assert_eq!(args.text.as_deref(), Some("Net income: 2T"));
                assert!(args.file.is_none());
            }
            other => panic!("Expected analyze, got {other:?}"),
        }
    }

    #[test]
    fn test_text_sources_conflict() {
        let result = Cli::try_parse_from([
            "idx-pro", "analyze", "--text", "a", "--text-file", "b.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_history_rows_default() {
        let cli = Cli::try_parse_from(["idx-pro", "--format", "markdown", "history", "BBRI"]).unwrap();
        assert_eq!(cli.format, Style::Markdown);
        match cli.command {
            Command::History { ticker, rows } => {
                assert_eq!(ticker, "BBRI");
                assert_eq!(rows, 10);
            }
            other => panic!("Expected history, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_read_input_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("laporan.pdf");
        let notes = dir.path().join("catatan.txt");
        std::fs::write(&report, b"%PDF").unwrap();
        std::fs::write(&notes, "Laba naik").unwrap();

        let args = AnalyzeArgs {
            ticker: None,
            file: Some(report),
            text: None,
            text_file: Some(notes),
        };
        let input = read_input(&args).await.unwrap();

        let upload = input.upload.unwrap();
        assert_eq!(upload.filename, "laporan.pdf");
        assert_eq!(upload.bytes, b"%PDF".to_vec());
        assert_eq!(input.text.as_deref(), Some("Laba naik"));
    }

    #[tokio::test]
    async fn test_read_input_missing_file() {
        let args = AnalyzeArgs {
            ticker: None,
            file: Some(PathBuf::from("/nonexistent/laporan.pdf")),
            text: None,
            text_file: None,
        };
        assert!(read_input(&args).await.is_err());
    }
}
