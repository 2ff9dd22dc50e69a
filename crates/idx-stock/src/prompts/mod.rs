//! Analyst prompt templates
//!
//! Templates are Jinja2 (via MiniJinja) and compiled once per
//! [`PromptLibrary`]. The only variable is `ticker`, the exchange code the
//! analyst is asked to cover.

use crate::error::Result;
use minijinja::{Environment, context};

/// Name of the fundamental analyst persona template
pub const ANALYST_PERSONA: &str = "idx.fundamental_analyst";

const ANALYST_PERSONA_TEMPLATE: &str = r"Anda adalah analis saham profesional khusus pasar Indonesia (IDX).
Anda bertindak sebagai analis fundamental untuk saham dengan kode {{ ticker }}.
TUGAS: Analisis data laporan keuangan berikut dan berikan wawasan investasi.

OUTPUT YANG DIHARAPKAN (Format Markdown):
### 1. 🔍 Kesimpulan Eksekutif
(3 poin utama tentang kesehatan perusahaan ini)

### 2. 🧮 Analisis Rasio (Estimasi)
*Jika angka tersedia, hitunglah. Jika tidak, berikan estimasi kualitatif.*
- **Profitabilitas:** (Margin, ROE, Laba Bersih)
- **Solvabilitas:** (Hutang, DER, Current Ratio)

### 3. 🚦 Rekomendasi Investasi
**Vonis:** [STRONG BUY / BUY / HOLD / SELL / AVOID]
**Alasan:** (penjelasan singkat 2-3 kalimat)";

/// Compiled prompt templates
pub struct PromptLibrary {
    env: Environment<'static>,
}

impl PromptLibrary {
    /// Compile the built-in templates
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(ANALYST_PERSONA, ANALYST_PERSONA_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Render the analyst persona for a ticker code
    pub fn analyst_persona(&self, ticker: &str) -> Result<String> {
        let template = self.env.get_template(ANALYST_PERSONA)?;
        Ok(template.render(context! { ticker => ticker })?)
    }
}
