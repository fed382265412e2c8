//! # Goldview Web
//!
//! Read-only JSON API over [`goldview_core::Goldview`].
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /api/spot` | `SpotRecord` |
//! | `GET /api/history?range=<id>` | `HistoryResult`; unknown or missing range is `1mo` |
//! | `GET /healthz` | `ok` |
//!
//! Failures answer `500 {"error": "<message>"}`. Every response is marked
//! `Cache-Control: no-store` since each request recomputes from upstream.

pub mod error;

use axum::extract::{Query, State};
use axum::http::{header, HeaderValue};
use axum::routing::get;
use axum::{Json, Router};
use goldview_core::{Goldview, HistoryRange, HistoryResult, SpotRecord};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ServerError};

#[derive(Clone)]
pub struct AppState {
    goldview: Goldview,
}

impl AppState {
    pub fn new(goldview: Goldview) -> Self {
        Self { goldview }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub range: Option<String>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/spot", get(spot))
        .route("/api/history", get(history))
        .route("/healthz", get(healthz))
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn spot(State(state): State<AppState>) -> Result<Json<SpotRecord>, ApiError> {
    Ok(Json(state.goldview.spot().await?))
}

async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResult>, ApiError> {
    let range = HistoryRange::parse_or_default(query.range.as_deref());
    Ok(Json(state.goldview.history(range).await?))
}

async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use goldview_core::{GoldviewConfig, HttpResponse, StubHttpClient};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    const SCRAPE_HTML: &str = r#"<span class="price">135,000</span>
        <span class="change down">0.25%</span><span class="date">2024.05.01 14:30</span>"#;

    fn chart_body(price: f64, points: &[(i64, f64)]) -> String {
        let timestamps = points.iter().map(|(ts, _)| *ts).collect::<Vec<_>>();
        let closes = points.iter().map(|(_, close)| *close).collect::<Vec<_>>();
        json!({"chart": {"result": [{
            "meta": {"regularMarketPrice": price},
            "timestamp": timestamps,
            "indicators": {"quote": [{"close": closes}]}
        }], "error": null}})
        .to_string()
    }

    fn router(stub: StubHttpClient) -> (Router, Arc<StubHttpClient>) {
        let stub = Arc::new(stub);
        let mut config = GoldviewConfig::default().with_chart_base_url("https://chart.test");
        config.scrape_url = String::from("https://domestic.test/goldDetail");
        let goldview = Goldview::new(&config, stub.clone());
        (app(AppState::new(goldview)), stub)
    }

    fn healthy_stub() -> StubHttpClient {
        StubHttpClient::new()
            .respond("domestic.test", HttpResponse::ok(SCRAPE_HTML))
            .respond(
                "GC%3DF",
                HttpResponse::ok(chart_body(2345.6, &[(100, 2340.0), (200, 2345.0)])),
            )
            .respond("KRW%3DX", HttpResponse::ok(chart_body(1372.5, &[(50, 1370.0)])))
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, Option<HeaderValue>, Vec<u8>) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router is infallible");
        let status = response.status();
        let cache_control = response.headers().get(header::CACHE_CONTROL).cloned();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body")
            .to_vec();
        (status, cache_control, body)
    }

    #[tokio::test]
    async fn spot_returns_camel_case_record() {
        let (router, _) = router(healthy_stub());

        let (status, cache_control, body) = get(router, "/api/spot").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache_control, Some(HeaderValue::from_static("no-store")));
        let value: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(value["domesticKrwPerGram"], 135_000.0);
        assert_eq!(value["goldPriceUsdPerOunce"], 2345.6);
        assert_eq!(value["usdKrw"], 1372.5);
        assert_eq!(value["changePercent"], -0.25);
        assert_eq!(value["updatedAt"], "2024-05-01T14:30:00+09:00");
        assert_eq!(value["source"], "domestic-scrape + yahoo-chart");
    }

    #[tokio::test]
    async fn unknown_range_is_served_as_one_month() {
        let (router, stub) = router(healthy_stub());

        let (status, _, body) = get(router, "/api/history?range=bogus").await;

        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(value["range"], "1mo");
        assert_eq!(value["points"].as_array().map(Vec::len), Some(2));
        assert!(stub
            .recorded_requests()
            .iter()
            .all(|request| request.url.ends_with("?range=1mo&interval=1d")));
    }

    #[tokio::test]
    async fn twenty_year_range_is_honored() {
        let (router, stub) = router(healthy_stub());

        let (status, _, _) = get(router, "/api/history?range=20y").await;

        assert_eq!(status, StatusCode::OK);
        assert!(stub
            .recorded_requests()
            .iter()
            .all(|request| request.url.ends_with("?range=20y&interval=1mo")));
    }

    #[tokio::test]
    async fn upstream_failure_becomes_500_with_message() {
        let stub = StubHttpClient::new()
            .respond("domestic.test", HttpResponse::ok(SCRAPE_HTML))
            .respond("GC%3DF", HttpResponse::ok(chart_body(2345.6, &[])))
            .fail("KRW%3DX", "connection reset");
        let (router, _) = router(stub);

        let (status, cache_control, body) = get(router, "/api/spot").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(cache_control, Some(HeaderValue::from_static("no-store")));
        let value: Value = serde_json::from_slice(&body).expect("json body");
        let message = value["error"].as_str().expect("error message");
        assert!(message.contains("connection reset"));
    }

    #[tokio::test]
    async fn healthz_is_plain_ok() {
        let (router, stub) = router(StubHttpClient::new());

        let (status, _, body) = get(router, "/healthz").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
        assert!(stub.recorded_requests().is_empty());
    }
}
