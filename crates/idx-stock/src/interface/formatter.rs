//! Response formatting utilities

use crate::analysis::Presentation;
use crate::market::{PriceBar, PriceSnapshot};
use crate::ticker::Ticker;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};

const HISTORY_HEADERS: [&str; 6] = ["Tanggal", "Open", "High", "Low", "Close", "Volume"];

pub trait Formatter: Send + Sync {
    fn style(&self) -> OutputStyle;
    fn format_snapshot(&self, ticker: &Ticker, snapshot: &PriceSnapshot) -> String;
    fn format_history(&self, bars: &[&PriceBar]) -> String;
    fn format_presentation(&self, presentation: &Presentation<'_>) -> String;
    fn format_error(&self, error: &str) -> String;
}

/// Output flavours understood by [`FormatterFactory`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputStyle {
    /// Box-drawn tables for a terminal
    #[default]
    Table,
    /// Markdown, for piping into notes or chat
    Markdown,
}

/// `Rp 10,250`
fn rupiah(value: f64) -> String {
    format!("Rp {}", group_thousands(value))
}

/// Whole number with `,` separators; sign kept
fn group_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0.0 && digits != "0" {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+{}", group_thousands(value))
    } else {
        group_thousands(value)
    }
}

fn history_rows(bars: &[&PriceBar]) -> Vec<[String; 6]> {
    bars.iter()
        .map(|bar| {
            [
                bar.date.format("%Y-%m-%d").to_string(),
                group_thousands(bar.open),
                group_thousands(bar.high),
                group_thousands(bar.low),
                group_thousands(bar.close),
                group_thousands(bar.volume as f64),
            ]
        })
        .collect()
}

fn presentation_text(presentation: &Presentation<'_>) -> String {
    match presentation.headline() {
        Some(headline) => format!("{headline}\n\n{}", presentation.body()),
        None => presentation.body().to_string(),
    }
}

pub struct CliFormatter;

impl Formatter for CliFormatter {
    fn style(&self) -> OutputStyle {
        OutputStyle::Table
    }

    fn format_snapshot(&self, ticker: &Ticker, snapshot: &PriceSnapshot) -> String {
        if !snapshot.is_available() {
            return format!("{ticker}: data harga tidak tersedia");
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec![ticker.symbol(), ""]);
        table.add_row(vec!["Harga Terakhir".to_string(), rupiah(snapshot.price)]);
        table.add_row(vec![
            "Perubahan".to_string(),
            format!("{} ({:+.2}%)", signed(snapshot.change_value), snapshot.change_percent),
        ]);
        table.add_row(vec![
            "Volume".to_string(),
            format!("{:.1} Juta", snapshot.volume as f64 / 1_000_000.0),
        ]);
        table.to_string()
    }

    fn format_history(&self, bars: &[&PriceBar]) -> String {
        if bars.is_empty() {
            return "Tidak ada data harga.".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(HISTORY_HEADERS.to_vec());
        for row in history_rows(bars) {
            table.add_row(row.to_vec());
        }
        table.to_string()
    }

    fn format_presentation(&self, presentation: &Presentation<'_>) -> String {
        presentation_text(presentation)
    }

    fn format_error(&self, error: &str) -> String {
        format!("❌ Error: {error}")
    }
}

pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn style(&self) -> OutputStyle {
        OutputStyle::Markdown
    }

    fn format_snapshot(&self, ticker: &Ticker, snapshot: &PriceSnapshot) -> String {
        if !snapshot.is_available() {
            return format!("**{ticker}**: data harga tidak tersedia");
        }

        format!(
            "**{}**\n\n- Harga Terakhir: {}\n- Perubahan: {} ({:+.2}%)\n- Volume: {:.1} Juta",
            ticker.symbol(),
            rupiah(snapshot.price),
            signed(snapshot.change_value),
            snapshot.change_percent,
            snapshot.volume as f64 / 1_000_000.0
        )
    }

    fn format_history(&self, bars: &[&PriceBar]) -> String {
        let mut output = format!("| {} |\n", HISTORY_HEADERS.join(" | "));
        output.push_str(&format!("|{}\n", "---|".repeat(HISTORY_HEADERS.len())));
        for row in history_rows(bars) {
            output.push_str(&format!("| {} |\n", row.join(" | ")));
        }
        output
    }

    fn format_presentation(&self, presentation: &Presentation<'_>) -> String {
        match presentation.headline() {
            Some(headline) => format!("**{headline}**\n\n{}", presentation.body()),
            None => presentation.body().to_string(),
        }
    }

    fn format_error(&self, error: &str) -> String {
        format!("❌ **Error:** {error}")
    }
}

pub struct FormatterFactory;

impl FormatterFactory {
    pub fn create(style: OutputStyle) -> Box<dyn Formatter> {
        match style {
            OutputStyle::Table => Box::new(CliFormatter),
            OutputStyle::Markdown => Box::new(MarkdownFormatter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::bar;

    fn snapshot() -> PriceSnapshot {
        PriceSnapshot {
            price: 10_250.0,
            change_value: -125.0,
            change_percent: -1.2048,
            volume: 45_600_000,
        }
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(10_250.0), "10,250");
        assert_eq!(group_thousands(1_234_567.4), "1,234,567");
        assert_eq!(group_thousands(-4_500.0), "-4,500");
        assert_eq!(signed(125.0), "+125");
        assert_eq!(signed(-125.0), "-125");
    }

    #[test]
    fn test_cli_snapshot() {
        let ticker = Ticker::parse("BBCA").unwrap();
        let output = CliFormatter.format_snapshot(&ticker, &snapshot());

        assert!(output.contains("BBCA.JK"));
        assert!(output.contains("Rp 10,250"));
        assert!(output.contains("-125 (-1.20%)"));
        assert!(output.contains("45.6 Juta"));
    }

    #[test]
    fn test_unavailable_snapshot() {
        let ticker = Ticker::parse("XXXX").unwrap();
        let output = CliFormatter.format_snapshot(&ticker, &PriceSnapshot::default());
        assert!(output.contains("tidak tersedia"));
    }

    #[test]
    fn test_history_table() {
        let bars = [bar(2, 110.0, 2_000), bar(1, 100.0, 1_000)];
        let refs: Vec<&PriceBar> = bars.iter().collect();

        let output = CliFormatter.format_history(&refs);
        assert!(output.contains("Tanggal"));
        assert!(output.contains("2,000"));

        let markdown = MarkdownFormatter.format_history(&refs);
        assert!(markdown.starts_with("| Tanggal | Open |"));
        assert_eq!(markdown.lines().count(), 4);
    }

    #[test]
    fn test_presentation_text() {
        let output = CliFormatter.format_presentation(&Presentation::Success("### Hasil"));
        assert!(output.starts_with("✅ Analisis Selesai!"));
        assert!(output.ends_with("### Hasil"));

        let output = MarkdownFormatter.format_presentation(&Presentation::Pending);
        assert_eq!(output, "Belum ada analisis yang dijalankan.");
    }

    #[test]
    fn test_factory() {
        assert_eq!(FormatterFactory::create(OutputStyle::Table).style(), OutputStyle::Table);
        assert_eq!(
            FormatterFactory::create(OutputStyle::Markdown).style(),
            OutputStyle::Markdown
        );
    }
}
