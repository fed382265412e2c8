//! Domestic KRW-per-gram price adapters.
//!
//! The domestic quote has been published in three incompatible shapes over
//! time. Each shape has its own [`DomesticSource`] implementation; all of them
//! run through the same normalization rules before a [`DomesticSnapshot`] is
//! built:
//!
//! | Strategy | Module | Change percent |
//! |----------|--------|----------------|
//! | HTML scrape | [`scrape`] | percent literal + up/down class marker |
//! | Sidebar JSON | [`sidebar`] | reported percent, delta as a cross-check |
//! | Table JSON | [`table`] | derived from the two most recent rows |
//!
//! Only one strategy is active at a time, selected by [`DomesticSourceKind`].

pub mod scrape;
pub mod sidebar;
pub mod table;

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GoldviewConfig;
use crate::http_client::{HttpClient, HttpRequest};
use crate::{DomesticSnapshot, SourceError, ValidationError};

pub use scrape::ScrapeSource;
pub use sidebar::SidebarSource;
pub use table::TableSource;

/// Raw prices above this are assumed to be quoted per kilogram.
pub const KILOGRAM_PRICE_THRESHOLD: f64 = 1_000_000.0;

pub type SnapshotFuture<'a> =
    Pin<Box<dyn Future<Output = Result<DomesticSnapshot, SourceError>> + Send + 'a>>;

/// Capability shared by every domestic upstream shape.
pub trait DomesticSource: Send + Sync {
    fn kind(&self) -> DomesticSourceKind;

    fn fetch_snapshot<'a>(&'a self) -> SnapshotFuture<'a>;
}

/// Configured domestic strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomesticSourceKind {
    #[default]
    Scrape,
    Sidebar,
    Table,
}

impl DomesticSourceKind {
    pub const ALL: [Self; 3] = [Self::Scrape, Self::Sidebar, Self::Table];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scrape => "scrape",
            Self::Sidebar => "sidebar",
            Self::Table => "table",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Scrape => "domestic-scrape",
            Self::Sidebar => "domestic-sidebar",
            Self::Table => "domestic-table",
        }
    }
}

impl Display for DomesticSourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DomesticSourceKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "scrape" | "html" => Ok(Self::Scrape),
            "sidebar" => Ok(Self::Sidebar),
            "table" => Ok(Self::Table),
            other => Err(ValidationError::InvalidDomesticSource {
                value: other.to_owned(),
            }),
        }
    }
}

/// Builds the adapter selected by `config.domestic_source`.
pub fn build_domestic_source(
    config: &GoldviewConfig,
    http_client: Arc<dyn HttpClient>,
) -> Arc<dyn DomesticSource> {
    let timeout_ms = config.timeout_ms;
    match config.domestic_source {
        DomesticSourceKind::Scrape => Arc::new(
            ScrapeSource::new(http_client, config.scrape_url.clone()).with_timeout_ms(timeout_ms),
        ),
        DomesticSourceKind::Sidebar => Arc::new(
            SidebarSource::new(
                http_client,
                config.sidebar_url.clone(),
                config.sidebar_key.clone(),
            )
            .with_timeout_ms(timeout_ms),
        ),
        DomesticSourceKind::Table => Arc::new(
            TableSource::new(http_client, config.table_url.clone()).with_timeout_ms(timeout_ms),
        ),
    }
}

/// Per-kilogram quotes are divided down to per-gram.
pub fn normalize_unit(raw_price: f64) -> f64 {
    if raw_price > KILOGRAM_PRICE_THRESHOLD {
        raw_price / 1000.0
    } else {
        raw_price
    }
}

/// Unit normalization for a price and its paired absolute delta. The delta is
/// scaled with the price, never on its own magnitude.
pub fn normalize_with_delta(raw_price: f64, raw_delta: Option<f64>) -> (f64, Option<f64>) {
    if raw_price > KILOGRAM_PRICE_THRESHOLD {
        (raw_price / 1000.0, raw_delta.map(|delta| delta / 1000.0))
    } else {
        (raw_price, raw_delta)
    }
}

/// Reverses a percent change: `current / (1 + pct/100)`.
///
/// A -100% move would divide by zero; the previous price is then defined as
/// the current price.
pub fn previous_from_percent(current: f64, change_percent: f64) -> f64 {
    if change_percent == -100.0 {
        return current;
    }
    current / (1.0 + change_percent / 100.0)
}

/// Extracts a number from loosely formatted upstream text such as
/// `"1,350,000원"`, `"₩ 135,000"` or `"-0.88%"`.
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned = text
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+'))
        .collect::<String>();
    if !cleaned.chars().any(|ch| ch.is_ascii_digit()) {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// JSON value that upstreams send either as a number or as formatted text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(f64),
    Text(String),
}

impl LooseNumber {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value).filter(|value| value.is_finite()),
            Self::Text(text) => parse_number(text),
        }
    }
}

/// Single GET shared by the adapters; transport and status failures map to
/// `UpstreamUnavailable`.
pub(crate) async fn fetch_body(
    http_client: &Arc<dyn HttpClient>,
    url: &str,
    timeout_ms: u64,
    kind: DomesticSourceKind,
) -> Result<String, SourceError> {
    debug!(source = kind.as_str(), url, "fetching domestic snapshot");

    let request = HttpRequest::get(url).with_timeout_ms(timeout_ms);
    let response = http_client.execute(request).await.map_err(|e| {
        SourceError::unavailable(format!("{} transport error: {}", kind.label(), e.message()))
    })?;

    if !response.is_success() {
        return Err(SourceError::unavailable(format!(
            "{} upstream returned status {}",
            kind.label(),
            response.status
        )));
    }

    Ok(response.body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kilogram_prices_are_divided_down() {
        assert_eq!(normalize_unit(1_350_000.0), 1350.0);
        assert_eq!(normalize_unit(135_000.0), 135_000.0);
        assert_eq!(normalize_unit(1_000_000.0), 1_000_000.0);
    }

    #[test]
    fn delta_follows_the_price_unit() {
        assert_eq!(
            normalize_with_delta(1_350_000.0, Some(12_000.0)),
            (1350.0, Some(12.0))
        );
        assert_eq!(
            normalize_with_delta(135_000.0, Some(1_200.0)),
            (135_000.0, Some(1_200.0))
        );
    }

    #[test]
    fn previous_price_reverses_percent_change() {
        let previous = previous_from_percent(110.0, 10.0);
        assert!((previous - 100.0).abs() < 1e-9);
        assert_eq!(previous_from_percent(135_000.0, -100.0), 135_000.0);
    }

    #[test]
    fn parses_formatted_numbers() {
        assert_eq!(parse_number("1,350,000원"), Some(1_350_000.0));
        assert_eq!(parse_number("₩ 135,000"), Some(135_000.0));
        assert_eq!(parse_number("-0.88%"), Some(-0.88));
        assert_eq!(parse_number("n/a"), None);
    }

    #[test]
    fn loose_number_accepts_both_shapes() {
        let number: LooseNumber = serde_json::from_str("135000.5").expect("number");
        let text: LooseNumber = serde_json::from_str("\"135,000.5\"").expect("text");
        assert_eq!(number.value(), Some(135_000.5));
        assert_eq!(text.value(), Some(135_000.5));
    }

    #[test]
    fn source_kind_parses_case_insensitively() {
        assert_eq!(DomesticSourceKind::from_str(" Table "), Ok(DomesticSourceKind::Table));
        assert!(matches!(
            DomesticSourceKind::from_str("csv"),
            Err(ValidationError::InvalidDomesticSource { .. })
        ));
    }
}
