//! Chart-series client for the global legs (gold futures and USD/KRW).
//!
//! Talks to a Yahoo-style `v8/finance/chart/{symbol}` endpoint that returns a
//! `meta.regularMarketPrice` plus parallel `timestamp[]` / `close[]` arrays.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::http_client::{HttpClient, HttpRequest};
use crate::{InstrumentSeries, SeriesPoint, SourceError, Symbol};

pub const DEFAULT_CHART_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Fetches one instrument's close series for a span/interval pair.
#[derive(Clone)]
pub struct MarketChartClient {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl MarketChartClient {
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            timeout_ms: 10_000,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub const fn provider_label(&self) -> &'static str {
        "yahoo-chart"
    }

    pub fn endpoint(&self, symbol: &Symbol, span: &str, interval: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}?range={}&interval={}",
            self.base_url,
            urlencoding::encode(symbol.as_str()),
            urlencoding::encode(span),
            urlencoding::encode(interval)
        )
    }

    /// Single attempt; any failure is terminal for the calling request.
    pub async fn fetch(
        &self,
        symbol: &Symbol,
        span: &str,
        interval: &str,
    ) -> Result<InstrumentSeries, SourceError> {
        let endpoint = self.endpoint(symbol, span, interval);
        debug!(%symbol, span, interval, "fetching chart series");

        let request = HttpRequest::get(&endpoint).with_timeout_ms(self.timeout_ms);
        let response = self.http_client.execute(request).await.map_err(|e| {
            SourceError::unavailable(format!("chart transport error for {symbol}: {}", e.message()))
        })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "chart upstream returned status {} for {symbol}",
                response.status
            )));
        }

        parse_chart_response(symbol, &response.body)
    }
}

/// Parses a chart payload into a series, resolving the current price from
/// `meta.regularMarketPrice` first and the last finite close second.
pub fn parse_chart_response(symbol: &Symbol, body: &str) -> Result<InstrumentSeries, SourceError> {
    let chart_response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::malformed(format!("failed to parse chart for {symbol}: {e}")))?;

    if let Some(error) = chart_response.chart.error.filter(|value| !value.is_null()) {
        return Err(SourceError::malformed(format!(
            "chart API error for {symbol}: {error}"
        )));
    }

    let result = chart_response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| SourceError::malformed(format!("no chart result for {symbol}")))?;

    let closes = result
        .indicators
        .and_then(|indicators| indicators.quote.into_iter().next())
        .map(|quote| quote.close)
        .unwrap_or_default();
    let timestamps = result.timestamp.unwrap_or_default();

    let current_price = result
        .meta
        .and_then(|meta| meta.regular_market_price)
        .filter(|price| price.is_finite())
        .or_else(|| last_finite_close(&closes));

    let points = timestamps
        .iter()
        .zip(closes.iter())
        .filter_map(|(&ts, close)| close.map(|close| SeriesPoint::new(ts, close)))
        .collect::<Vec<_>>();

    Ok(InstrumentSeries::new(symbol.clone(), points, current_price))
}

/// Scans backward past trailing gaps for the most recent usable close.
pub fn last_finite_close(closes: &[Option<f64>]) -> Option<f64> {
    closes
        .iter()
        .rev()
        .find_map(|close| close.filter(|value| value.is_finite()))
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: Option<ChartIndicators>,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice", default)]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpResponse, StubHttpClient};
    use crate::SourceErrorKind;

    fn gold() -> Symbol {
        Symbol::parse("GC=F").expect("valid symbol")
    }

    #[test]
    fn prefers_regular_market_price() {
        let body = r#"{"chart":{"result":[{"meta":{"regularMarketPrice":2345.6},
            "timestamp":[1,2],"indicators":{"quote":[{"close":[2300.0,2310.0]}]}}],"error":null}}"#;
        let series = parse_chart_response(&gold(), body).expect("valid chart");
        assert_eq!(series.current_price, Some(2345.6));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn falls_back_to_last_finite_close_past_trailing_nulls() {
        let body = r#"{"chart":{"result":[{"meta":{},
            "timestamp":[1,2,3,4],"indicators":{"quote":[{"close":[2300.0,2310.5,null,null]}]}}]}}"#;
        let series = parse_chart_response(&gold(), body).expect("valid chart");
        assert_eq!(series.current_price, Some(2310.5));
        assert_eq!(
            series.points,
            vec![SeriesPoint::new(1, 2300.0), SeriesPoint::new(2, 2310.5)]
        );
    }

    #[test]
    fn missing_result_is_malformed() {
        let body = r#"{"chart":{"result":[],"error":null}}"#;
        let error = parse_chart_response(&gold(), body).expect_err("no result");
        assert_eq!(error.kind(), SourceErrorKind::MalformedUpstreamData);
    }

    #[test]
    fn api_error_object_is_malformed() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#;
        let error = parse_chart_response(&gold(), body).expect_err("api error");
        assert_eq!(error.kind(), SourceErrorKind::MalformedUpstreamData);
        assert!(error.message().contains("No data found"));
    }

    #[test]
    fn empty_series_without_meta_price_has_no_current_price() {
        let body = r#"{"chart":{"result":[{"meta":{},"timestamp":[1],"indicators":{"quote":[{"close":[null]}]}}]}}"#;
        let series = parse_chart_response(&gold(), body).expect("valid chart");
        assert!(series.is_empty());
        assert_eq!(series.current_price, None);
    }

    #[tokio::test]
    async fn non_success_status_is_unavailable() {
        let client = MarketChartClient::new(
            Arc::new(StubHttpClient::new().respond("/chart/", HttpResponse::with_status(503, ""))),
            "https://chart.test",
        );
        let error = client
            .fetch(&gold(), "1mo", "1d")
            .await
            .expect_err("503 must fail");
        assert_eq!(error.kind(), SourceErrorKind::UpstreamUnavailable);
    }

    #[test]
    fn endpoint_encodes_symbol() {
        let client = MarketChartClient::new(Arc::new(StubHttpClient::new()), "https://chart.test/");
        assert_eq!(
            client.endpoint(&gold(), "10y", "1wk"),
            "https://chart.test/v8/finance/chart/GC%3DF?range=10y&interval=1wk"
        );
    }
}
