//! Wiring of market data and AI analysis behind one handle

use crate::analysis::{
    AnalysisExecutor, AnalysisInput, AnalysisService, AnalysisSession, AnalysisStatus,
    Presentation, present,
};
use crate::api::YahooFinanceClient;
use crate::config::DashboardConfig;
use crate::error::{AnalysisError, Result};
use crate::market::{MarketDataSource, MarketService, PriceHistory};
use crate::ticker::Ticker;
use idx_llm::GenerativeProvider;
use idx_llm::providers::{GeminiConfig, GeminiProvider};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared dashboard state; sessions are owned by callers
pub struct Dashboard {
    config: DashboardConfig,
    market: MarketService,
    analysis: AnalysisService,
}

impl Dashboard {
    /// Build with Yahoo Finance and, when a key is configured, Gemini
    pub fn from_config(config: DashboardConfig) -> Result<Self> {
        let provider: Option<Arc<dyn GenerativeProvider>> = match &config.gemini_api_key {
            Some(key) => {
                let mut gemini = GeminiConfig::new(key.as_str());
                if let Some(timeout) = config.request_timeout {
                    gemini = gemini.with_timeout(timeout);
                }
                Some(Arc::new(GeminiProvider::with_config(gemini)?))
            }
            None => {
                warn!("GEMINI_API_KEY is not set, AI analysis is disabled");
                None
            }
        };

        Self::with_parts(config, Arc::new(YahooFinanceClient::new()), provider)
    }

    /// Build from explicit collaborators
    pub fn with_parts(
        config: DashboardConfig,
        source: Arc<dyn MarketDataSource>,
        provider: Option<Arc<dyn GenerativeProvider>>,
    ) -> Result<Self> {
        config.validate()?;

        let market = MarketService::new(source, config.history_range.as_str(), config.cache_ttl);
        let executor = provider.map(|provider| {
            AnalysisExecutor::new(provider, config.model.as_str())
                .with_max_text_chars(config.max_text_chars)
        });
        let analysis = AnalysisService::new(executor, config.max_text_chars)?;

        info!(
            model = %config.model,
            range = %config.history_range,
            analysis = analysis.is_available(),
            "Dashboard ready"
        );

        Ok(Self {
            config,
            market,
            analysis,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn market(&self) -> &MarketService {
        &self.market
    }

    pub fn is_analysis_available(&self) -> bool {
        self.analysis.is_available()
    }

    /// Fresh session on the configured default ticker
    pub fn new_session(&self) -> Result<AnalysisSession> {
        Ok(AnalysisSession::new(self.config.default_ticker()?))
    }

    /// Parse and select a ticker for a session
    pub fn select_ticker(&self, session: &mut AnalysisSession, input: &str) -> Result<Ticker> {
        let ticker = Ticker::parse(input)?;
        session.set_ticker(ticker.clone());
        Ok(ticker)
    }

    /// Price history for the session's ticker
    pub async fn price_history(&self, session: &AnalysisSession) -> PriceHistory {
        self.market.history(session.ticker()).await
    }

    /// Drop cached market data
    pub async fn refresh(&self) {
        self.market.refresh().await;
    }

    /// Run an analysis for the session
    pub async fn submit(
        &self,
        session: &mut AnalysisSession,
        input: AnalysisInput,
    ) -> std::result::Result<AnalysisStatus, AnalysisError> {
        self.analysis.submit(session, input).await
    }

    pub fn present<'a>(&self, session: &'a AnalysisSession) -> Presentation<'a> {
        present(session)
    }
}
