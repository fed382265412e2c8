use serde::{Deserialize, Serialize};

use crate::{CivilDateTime, HistoryRange, Symbol, ValidationError};

/// Troy ounce expressed in grams.
pub const OUNCE_TO_GRAM: f64 = 31.103_476_8;

/// Canonical domestic quote, always denominated per gram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomesticSnapshot {
    pub price_per_gram: f64,
    pub change_percent: f64,
    pub previous_price_per_gram: f64,
    pub observed_at: Option<CivilDateTime>,
}

impl DomesticSnapshot {
    pub fn new(
        price_per_gram: f64,
        change_percent: f64,
        previous_price_per_gram: f64,
        observed_at: Option<CivilDateTime>,
    ) -> Result<Self, ValidationError> {
        validate_positive("price_per_gram", price_per_gram)?;
        validate_finite("change_percent", change_percent)?;
        validate_positive("previous_price_per_gram", previous_price_per_gram)?;

        Ok(Self {
            price_per_gram,
            change_percent,
            previous_price_per_gram,
            observed_at,
        })
    }
}

/// One `(timestamp, close)` sample; `ts` is unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub ts: i64,
    pub close: f64,
}

impl SeriesPoint {
    pub const fn new(ts: i64, close: f64) -> Self {
        Self { ts, close }
    }
}

/// Close-price series for one instrument, ordered by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentSeries {
    pub symbol: Symbol,
    pub points: Vec<SeriesPoint>,
    /// Provider-reported current price, or the last finite close.
    pub current_price: Option<f64>,
}

impl InstrumentSeries {
    /// Drops non-finite closes and stably sorts by timestamp.
    pub fn new(symbol: Symbol, points: Vec<SeriesPoint>, current_price: Option<f64>) -> Self {
        let mut points = points
            .into_iter()
            .filter(|point| point.close.is_finite())
            .collect::<Vec<_>>();
        points.sort_by_key(|point| point.ts);

        Self {
            symbol,
            points,
            current_price: current_price.filter(|price| price.is_finite()),
        }
    }

    /// Convenience constructor for already-clean samples.
    pub fn from_points(symbol: Symbol, points: &[(i64, f64)]) -> Self {
        let points = points
            .iter()
            .map(|&(ts, close)| SeriesPoint::new(ts, close))
            .collect::<Vec<_>>();
        let current_price = points.last().map(|point| point.close);
        Self::new(symbol, points, current_price)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn latest_timestamp(&self) -> Option<i64> {
        self.points.last().map(|point| point.ts)
    }
}

/// Combined spot view returned by the spot endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotRecord {
    pub domestic_krw_per_gram: f64,
    pub gold_price_usd_per_ounce: f64,
    pub usd_krw: f64,
    pub previous_domestic_krw_per_gram: f64,
    pub change_percent: f64,
    pub updated_at: String,
    pub source: String,
}

/// Aligned gold/FX sample with the derived KRW-per-gram price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    pub ts: i64,
    pub usd_per_ounce: f64,
    pub usd_krw: f64,
    pub krw_per_gram: f64,
}

impl HistoryPoint {
    pub fn new(ts: i64, usd_per_ounce: f64, usd_krw: f64) -> Self {
        Self {
            ts,
            usd_per_ounce,
            usd_krw,
            krw_per_gram: usd_per_ounce * usd_krw / OUNCE_TO_GRAM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResult {
    pub range: HistoryRange,
    pub points: Vec<HistoryPoint>,
    pub source: String,
}

pub(crate) fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}

pub(crate) fn validate_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    validate_finite(field, value)?;
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveValue { field });
    }
    Ok(())
}
