//! Sidebar JSON strategy: a keyed object of price cards.
//!
//! ```json
//! { "data": { "gold": { "price": "1,350,000", "change": "12,000",
//!                       "changePercent": "0.90", "updatedAt": "2024.05.01 14:30" } } }
//! ```
//!
//! The `data` wrapper is optional. Numbers may be JSON numbers or formatted text.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use super::{
    fetch_body, normalize_with_delta, previous_from_percent, DomesticSource, DomesticSourceKind,
    LooseNumber, SnapshotFuture,
};
use crate::http_client::HttpClient;
use crate::{CivilDateTime, DomesticSnapshot, SourceError};

pub const DEFAULT_SIDEBAR_URL: &str = "https://www.koreagoldx.co.kr/api/price/sidebar";
pub const DEFAULT_SIDEBAR_KEY: &str = "gold";

#[derive(Clone)]
pub struct SidebarSource {
    http_client: Arc<dyn HttpClient>,
    url: String,
    key: String,
    timeout_ms: u64,
}

impl SidebarSource {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        url: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            url: url.into(),
            key: key.into(),
            timeout_ms: 10_000,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

impl DomesticSource for SidebarSource {
    fn kind(&self) -> DomesticSourceKind {
        DomesticSourceKind::Sidebar
    }

    fn fetch_snapshot<'a>(&'a self) -> SnapshotFuture<'a> {
        Box::pin(async move {
            let body = fetch_body(&self.http_client, &self.url, self.timeout_ms, self.kind()).await?;
            parse_sidebar(&body, &self.key)
        })
    }
}

#[derive(Debug, Deserialize)]
struct SidebarEntry {
    #[serde(default, alias = "basePrice", alias = "value")]
    price: Option<LooseNumber>,
    #[serde(default, alias = "diff", alias = "delta")]
    change: Option<LooseNumber>,
    #[serde(default, rename = "changePercent", alias = "rate", alias = "percent")]
    change_percent: Option<LooseNumber>,
    #[serde(default, rename = "updatedAt", alias = "date", alias = "time")]
    updated_at: Option<String>,
}

/// Normalizes the card stored under `key`.
pub fn parse_sidebar(body: &str, key: &str) -> Result<DomesticSnapshot, SourceError> {
    let document: Value = serde_json::from_str(body)
        .map_err(|e| SourceError::malformed(format!("domestic-sidebar: invalid JSON: {e}")))?;
    let cards = document.get("data").unwrap_or(&document);
    let card = cards
        .get(key)
        .cloned()
        .ok_or_else(|| SourceError::malformed(format!("domestic-sidebar: no '{key}' entry")))?;
    let entry: SidebarEntry = serde_json::from_value(card)
        .map_err(|e| SourceError::malformed(format!("domestic-sidebar: bad '{key}' entry: {e}")))?;

    let raw_price = entry
        .price
        .as_ref()
        .and_then(LooseNumber::value)
        .ok_or_else(|| SourceError::malformed("domestic-sidebar: price field missing"))?;
    let raw_delta = entry.change.as_ref().and_then(LooseNumber::value);
    let (price, delta) = normalize_with_delta(raw_price, raw_delta);
    let reported_percent = entry.change_percent.as_ref().and_then(LooseNumber::value);

    let (change_percent, previous) = match (reported_percent, delta) {
        (Some(percent), delta) => {
            let previous = delta
                .filter(|delta| same_direction(*delta, percent))
                .map(|delta| price - delta)
                .filter(|previous| *previous > 0.0)
                .unwrap_or_else(|| previous_from_percent(price, percent));
            (percent, previous)
        }
        (None, Some(delta)) => {
            let previous = price - delta;
            if previous <= 0.0 {
                return Err(SourceError::invalid_value(format!(
                    "domestic-sidebar: delta {delta} leaves no positive previous price"
                )));
            }
            (delta / previous * 100.0, previous)
        }
        (None, None) => {
            return Err(SourceError::malformed(
                "domestic-sidebar: neither change percent nor delta reported",
            ))
        }
    };

    let observed_at = CivilDateTime::canonicalize(entry.updated_at.as_deref());

    Ok(DomesticSnapshot::new(
        price,
        change_percent,
        previous,
        observed_at,
    )?)
}

/// A delta is only trusted when it moves the same way as the reported percent.
fn same_direction(delta: f64, percent: f64) -> bool {
    delta.partial_cmp(&0.0) == percent.partial_cmp(&0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceErrorKind;

    #[test]
    fn reported_percent_and_delta_are_used_directly() {
        let body = r#"{"data":{"gold":{"price":"1,350,000","change":"12,000",
            "changePercent":"0.90","updatedAt":"2024-05-01 14:30:00"}}}"#;
        let snapshot = parse_sidebar(body, "gold").expect("valid sidebar");
        assert_eq!(snapshot.price_per_gram, 1350.0);
        assert_eq!(snapshot.previous_price_per_gram, 1338.0);
        assert_eq!(snapshot.change_percent, 0.90);
        assert_eq!(
            snapshot.observed_at.map(|ts| ts.format_canonical()).as_deref(),
            Some("2024-05-01T14:30:00+09:00")
        );
    }

    #[test]
    fn delta_contradicting_the_percent_is_ignored() {
        let body = r#"{"gold":{"price":"135,000","change":"1,200","changePercent":"-0.88"}}"#;
        let snapshot = parse_sidebar(body, "gold").expect("valid sidebar");
        assert_eq!(snapshot.change_percent, -0.88);
        assert!((snapshot.previous_price_per_gram - 135_000.0 / (1.0 - 0.0088)).abs() < 1e-6);
        assert!(snapshot.previous_price_per_gram > snapshot.price_per_gram);
    }

    #[test]
    fn signed_delta_agrees_with_a_negative_percent() {
        let body = r#"{"gold":{"price":"135,000","change":"-1,200","changePercent":"-0.88"}}"#;
        let snapshot = parse_sidebar(body, "gold").expect("valid sidebar");
        assert_eq!(snapshot.previous_price_per_gram, 136_200.0);
    }

    #[test]
    fn oversized_delta_falls_back_to_percent_formula() {
        let body = r#"{"gold":{"price":135000,"change":140000,"changePercent":-5.0}}"#;
        let snapshot = parse_sidebar(body, "gold").expect("valid sidebar");
        assert!((snapshot.previous_price_per_gram - 135_000.0 / 0.95).abs() < 1e-6);
    }

    #[test]
    fn full_loss_falls_back_to_current_price() {
        let body = r#"{"gold":{"price":135000,"change":135000,"changePercent":-100}}"#;
        let snapshot = parse_sidebar(body, "gold").expect("valid sidebar");
        assert_eq!(snapshot.previous_price_per_gram, 135_000.0);
        assert_eq!(snapshot.change_percent, -100.0);
    }

    #[test]
    fn percent_is_derived_from_delta_when_not_reported() {
        let body = r#"{"gold":{"price":"101,000","diff":"1,000"}}"#;
        let snapshot = parse_sidebar(body, "gold").expect("valid sidebar");
        assert_eq!(snapshot.previous_price_per_gram, 100_000.0);
        assert!((snapshot.change_percent - 1.0).abs() < 1e-12);
        assert_eq!(snapshot.observed_at, None);
    }

    #[test]
    fn missing_card_is_malformed() {
        let error = parse_sidebar(r#"{"silver":{"price":1000}}"#, "gold").expect_err("no card");
        assert_eq!(error.kind(), SourceErrorKind::MalformedUpstreamData);
    }

    #[test]
    fn missing_price_is_malformed() {
        let error =
            parse_sidebar(r#"{"gold":{"changePercent":"1.0"}}"#, "gold").expect_err("no price");
        assert_eq!(error.kind(), SourceErrorKind::MalformedUpstreamData);
    }

    #[test]
    fn missing_change_fields_is_malformed() {
        let error = parse_sidebar(r#"{"gold":{"price":"135,000"}}"#, "gold").expect_err("no change");
        assert_eq!(error.kind(), SourceErrorKind::MalformedUpstreamData);
    }
}
