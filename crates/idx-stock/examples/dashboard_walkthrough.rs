//! Dashboard walkthrough
//!
//! Fetches price history for a ticker and, when `GEMINI_API_KEY` is set,
//! runs one analysis on pasted text.
//!
//! To run this example:
//! ```bash
//! export GEMINI_API_KEY=your_key_here  # Optional
//! cargo run -p idx-stock --example dashboard_walkthrough BBRI
//! ```

use idx_stock::{AnalysisInput, Dashboard, DashboardConfig};
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    idx_utils::init_tracing();

    let config = DashboardConfig::from_env()?;
    let dashboard = Dashboard::from_config(config)?;
    let mut session = dashboard.new_session()?;

    if let Some(ticker) = env::args().nth(1) {
        dashboard.select_ticker(&mut session, &ticker)?;
    }

    println!("=== IDX Pro: {} ===\n", session.ticker().symbol());

    let history = dashboard.price_history(&session).await;
    let snapshot = history.snapshot();
    println!("Harga terakhir : Rp {:.0}", snapshot.price);
    println!("Perubahan      : {:+.2}%", snapshot.change_percent);
    println!("Jumlah bar     : {}\n", history.len());

    if !dashboard.is_analysis_available() {
        println!("GEMINI_API_KEY not set, skipping analysis");
        return Ok(());
    }

    let text = "Pendapatan: 25.3T (naik 8%)\nLaba bersih: 12.1T\nTotal liabilitas: 1,100T\nEkuitas: 240T";
    let status = dashboard.submit(&mut session, AnalysisInput::text(text)).await?;
    println!("Status: {status}\n");

    let view = dashboard.present(&session);
    if let Some(headline) = view.headline() {
        println!("{headline}\n");
    }
    println!("{}", view.body());

    Ok(())
}
