//! Historical series: range resolution, concurrent fetch and alignment.

use tracing::{debug, warn};

use crate::market_chart::MarketChartClient;
use crate::{HistoryPoint, HistoryRange, HistoryResult, InstrumentSeries, SourceError, Symbol};

/// Aligns the FX series onto the metal timeline.
///
/// Each metal point takes the last FX close at or before its timestamp. The FX
/// cursor starts at the first sample and only moves forward, so metal points
/// that precede every FX sample reuse the first one instead of being dropped.
pub fn align(metal: &InstrumentSeries, fx: &InstrumentSeries) -> Vec<HistoryPoint> {
    if metal.is_empty() || fx.is_empty() {
        return Vec::new();
    }

    let fx_points = &fx.points;
    let mut cursor = 0;
    metal
        .points
        .iter()
        .map(|point| {
            while cursor + 1 < fx_points.len() && fx_points[cursor + 1].ts <= point.ts {
                cursor += 1;
            }
            HistoryPoint::new(point.ts, point.close, fx_points[cursor].close)
        })
        .collect()
}

#[derive(Clone)]
pub struct HistoryService {
    charts: MarketChartClient,
    metal_symbol: Symbol,
    fx_symbol: Symbol,
}

impl HistoryService {
    pub fn new(charts: MarketChartClient, metal_symbol: Symbol, fx_symbol: Symbol) -> Self {
        Self {
            charts,
            metal_symbol,
            fx_symbol,
        }
    }

    pub async fn history(&self, range: HistoryRange) -> Result<HistoryResult, SourceError> {
        let config = range.config();
        let (metal, fx) = tokio::try_join!(
            self.charts
                .fetch(&self.metal_symbol, config.span, config.interval),
            self.charts
                .fetch(&self.fx_symbol, config.span, config.interval),
        )
        .inspect_err(|error| {
            warn!(kind = %error.kind(), %error, range = range.as_str(), "history fetch failed")
        })?;

        let points = align(&metal, &fx);
        debug!(
            range = range.as_str(),
            metal = metal.len(),
            fx = fx.len(),
            aligned = points.len(),
            "history aligned"
        );

        Ok(HistoryResult {
            range,
            points,
            source: self.charts.provider_label().to_owned(),
        })
    }
}
