//! # Goldview Core
//!
//! Normalization and alignment engine behind the goldview price view.
//!
//! ## Overview
//!
//! Goldview reconciles three quotes into one picture:
//!
//! - a **domestic** KRW-per-gram gold price, published in one of several
//!   incompatible upstream shapes
//! - the **global** USD-per-ounce gold futures price
//! - the **USD/KRW** exchange rate
//!
//! It serves a live spot snapshot and multi-range history, plus the rebased
//! indices and SVG path geometry used to chart that history.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`change`] | Field-level up/down detection between spot records |
//! | [`config`] | `GOLDVIEW_*` environment configuration |
//! | [`domain`] | Value objects (snapshot, series, spot, history, ranges) |
//! | [`domestic`] | Domestic price adapters (scrape, sidebar, table) |
//! | [`error`] | Validation and upstream error types |
//! | [`geometry`] | Chart box projection and SVG line/area paths |
//! | [`history`] | Forward-fill alignment and the history fetch |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`market_chart`] | Chart-series client for the global legs |
//! | [`rebase`] | Rebased-to-100 indices |
//! | [`service`] | [`Goldview`] facade |
//! | [`spot`] | Spot aggregation |
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │  goldview-web / -cli     │
//! └────────────┬─────────────┘
//!              ▼
//! ┌──────────────────────────┐
//! │  Goldview facade         │
//! └──────┬─────────────┬─────┘
//!        ▼             ▼
//! ┌─────────────┐ ┌──────────────┐     ┌──────────────────┐
//! │ Spot        │ │ History      │────▶│ Rebase / Geometry│
//! │ Aggregator  │ │ Service      │     └──────────────────┘
//! └──┬───────┬──┘ └──────┬───────┘
//!    ▼       ▼           ▼
//! ┌────────┐ ┌────────────────────┐
//! │Domestic│ │ MarketChartClient  │
//! │Source  │ └─────────┬──────────┘
//! └───┬────┘           ▼
//!     └──────▶ HttpClient (reqwest / stub)
//! ```
//!
//! ## Error Handling
//!
//! Upstream-facing operations fail with a [`SourceError`] whose kind is one of
//! three terminal classes. Nothing is retried and no partial result escapes:
//!
//! ```rust
//! use goldview_core::{SourceError, SourceErrorKind};
//!
//! fn status_hint(error: &SourceError) -> &'static str {
//!     match error.kind() {
//!         SourceErrorKind::UpstreamUnavailable => "upstream down",
//!         SourceErrorKind::MalformedUpstreamData => "upstream format changed",
//!         SourceErrorKind::InvalidMarketValue => "upstream value rejected",
//!     }
//! }
//! ```

pub mod change;
pub mod config;
pub mod domain;
pub mod domestic;
pub mod error;
pub mod geometry;
pub mod history;
pub mod http_client;
pub mod market_chart;
pub mod rebase;
pub mod service;
pub mod spot;

// Re-export commonly used types at crate root for convenience

// Change detection
pub use change::{ChangeDetector, ChangeSet, ChangeTracker, Direction};

// Configuration
pub use config::{ConfigError, GoldviewConfig};

// Domain models
pub use domain::{
    now_utc_rfc3339, unix_to_utc_rfc3339, CivilDateTime, DomesticSnapshot, HistoryPoint,
    HistoryRange, HistoryResult, InstrumentSeries, RangeConfig, SeriesPoint, SpotRecord, Symbol,
    CIVIL_OFFSET, OUNCE_TO_GRAM,
};

// Domestic adapters
pub use domestic::{DomesticSource, DomesticSourceKind, ScrapeSource, SidebarSource, TableSource};

// Error types
pub use error::{SourceError, SourceErrorKind, ValidationError};

// Chart geometry
pub use geometry::{ChartBox, ChartGeometryBuilder, ChartView, SeriesPaths};

// History
pub use history::{align, HistoryService};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, StubHttpClient,
};

// Chart client
pub use market_chart::MarketChartClient;

// Rebasing
pub use rebase::{rebase, RebasedIndices};

// Facade
pub use service::Goldview;

// Spot
pub use spot::SpotAggregator;
