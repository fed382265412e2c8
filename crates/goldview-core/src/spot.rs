//! Spot aggregation: one domestic snapshot plus the gold-futures and USD/KRW
//! charts, combined into a [`SpotRecord`].

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::validate_positive;
use crate::domestic::DomesticSource;
use crate::market_chart::MarketChartClient;
use crate::{
    now_utc_rfc3339, unix_to_utc_rfc3339, DomesticSnapshot, InstrumentSeries, SourceError,
    SpotRecord, Symbol,
};

/// Chart window used for the live legs; wide enough to span a weekend.
pub const SPOT_CHART_SPAN: &str = "5d";
pub const SPOT_CHART_INTERVAL: &str = "15m";

#[derive(Clone)]
pub struct SpotAggregator {
    domestic: Arc<dyn DomesticSource>,
    charts: MarketChartClient,
    metal_symbol: Symbol,
    fx_symbol: Symbol,
}

impl SpotAggregator {
    pub fn new(
        domestic: Arc<dyn DomesticSource>,
        charts: MarketChartClient,
        metal_symbol: Symbol,
        fx_symbol: Symbol,
    ) -> Self {
        Self {
            domestic,
            charts,
            metal_symbol,
            fx_symbol,
        }
    }

    pub fn source_label(&self) -> String {
        format!(
            "{} + {}",
            self.domestic.kind().label(),
            self.charts.provider_label()
        )
    }

    /// Issues the three fetches concurrently. The first failure fails the
    /// whole record; nothing is synthesized from the legs that succeeded.
    pub async fn build_spot_record(&self) -> Result<SpotRecord, SourceError> {
        let (domestic, metal, fx) = tokio::try_join!(
            self.domestic.fetch_snapshot(),
            self.charts
                .fetch(&self.metal_symbol, SPOT_CHART_SPAN, SPOT_CHART_INTERVAL),
            self.charts
                .fetch(&self.fx_symbol, SPOT_CHART_SPAN, SPOT_CHART_INTERVAL),
        )
        .inspect_err(|error| warn!(kind = %error.kind(), %error, "spot fetch failed"))?;

        let record = combine_spot(domestic, &metal, &fx, self.source_label())
            .inspect_err(|error| warn!(kind = %error.kind(), %error, "spot values rejected"))?;
        debug!(
            domestic = record.domestic_krw_per_gram,
            gold = record.gold_price_usd_per_ounce,
            usd_krw = record.usd_krw,
            "spot record built"
        );
        Ok(record)
    }
}

/// Merges already-fetched legs. Both global prices must be finite and positive.
pub fn combine_spot(
    domestic: DomesticSnapshot,
    metal: &InstrumentSeries,
    fx: &InstrumentSeries,
    source: String,
) -> Result<SpotRecord, SourceError> {
    let gold_price_usd_per_ounce = metal.current_price.ok_or_else(|| {
        SourceError::invalid_value(format!("no current price for {}", metal.symbol))
    })?;
    let usd_krw = fx
        .current_price
        .ok_or_else(|| SourceError::invalid_value(format!("no current price for {}", fx.symbol)))?;
    validate_positive("gold_price_usd_per_ounce", gold_price_usd_per_ounce)?;
    validate_positive("usd_krw", usd_krw)?;

    let updated_at = resolve_updated_at(&domestic, metal, fx);

    Ok(SpotRecord {
        domestic_krw_per_gram: domestic.price_per_gram,
        gold_price_usd_per_ounce,
        usd_krw,
        previous_domestic_krw_per_gram: domestic.previous_price_per_gram,
        change_percent: domestic.change_percent,
        updated_at,
        source,
    })
}

/// Domestic freshness wins when known; otherwise the later chart timestamp in
/// UTC, and the current time when neither chart carries a sample.
pub fn resolve_updated_at(
    domestic: &DomesticSnapshot,
    metal: &InstrumentSeries,
    fx: &InstrumentSeries,
) -> String {
    if let Some(observed_at) = domestic.observed_at {
        return observed_at.format_canonical();
    }

    metal
        .latest_timestamp()
        .into_iter()
        .chain(fx.latest_timestamp())
        .max()
        .and_then(unix_to_utc_rfc3339)
        .unwrap_or_else(now_utc_rfc3339)
}
