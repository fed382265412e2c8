//! Facade wiring configuration and transport into the spot and history paths.

use std::sync::Arc;

use crate::config::GoldviewConfig;
use crate::domestic::{build_domestic_source, DomesticSourceKind};
use crate::history::HistoryService;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::market_chart::MarketChartClient;
use crate::spot::SpotAggregator;
use crate::{HistoryRange, HistoryResult, SourceError, SpotRecord};

/// Entry point used by the server and the CLI. Cheap to clone.
#[derive(Clone)]
pub struct Goldview {
    domestic_kind: DomesticSourceKind,
    spot: SpotAggregator,
    history: HistoryService,
}

impl Goldview {
    pub fn new(config: &GoldviewConfig, http_client: Arc<dyn HttpClient>) -> Self {
        let charts = MarketChartClient::new(Arc::clone(&http_client), config.chart_base_url.clone())
            .with_timeout_ms(config.timeout_ms);
        let domestic = build_domestic_source(config, http_client);

        Self {
            domestic_kind: config.domestic_source,
            spot: SpotAggregator::new(
                domestic,
                charts.clone(),
                config.metal_symbol.clone(),
                config.fx_symbol.clone(),
            ),
            history: HistoryService::new(
                charts,
                config.metal_symbol.clone(),
                config.fx_symbol.clone(),
            ),
        }
    }

    /// Live transport backed by `reqwest`.
    pub fn from_config(config: &GoldviewConfig) -> Self {
        Self::new(config, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn domestic_kind(&self) -> DomesticSourceKind {
        self.domestic_kind
    }

    pub async fn spot(&self) -> Result<SpotRecord, SourceError> {
        self.spot.build_spot_record().await
    }

    pub async fn history(&self, range: HistoryRange) -> Result<HistoryResult, SourceError> {
        self.history.history(range).await
    }
}
