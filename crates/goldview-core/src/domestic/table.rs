//! Tabular JSON strategy: a header row plus data rows.
//!
//! ```json
//! { "header": ["date", "price"],
//!   "rows": [["2024.05.01 14:30", "135,000"], ["2024.04.30 14:30", "134,200"]] }
//! ```
//!
//! No percent is published; it is derived from the two most recent rows.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use super::{
    fetch_body, normalize_unit, parse_number, DomesticSource, DomesticSourceKind, SnapshotFuture,
};
use crate::http_client::HttpClient;
use crate::{CivilDateTime, DomesticSnapshot, SourceError};

pub const DEFAULT_TABLE_URL: &str = "https://www.koreagoldx.co.kr/api/price/chart/list";

const DATE_COLUMNS: [&str; 6] = ["date", "datetime", "time", "updatedat", "일자", "날짜"];
const PRICE_COLUMNS: [&str; 5] = ["price", "close", "value", "가격", "기준가"];

#[derive(Clone)]
pub struct TableSource {
    http_client: Arc<dyn HttpClient>,
    url: String,
    timeout_ms: u64,
}

impl TableSource {
    pub fn new(http_client: Arc<dyn HttpClient>, url: impl Into<String>) -> Self {
        Self {
            http_client,
            url: url.into(),
            timeout_ms: 10_000,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

impl DomesticSource for TableSource {
    fn kind(&self) -> DomesticSourceKind {
        DomesticSourceKind::Table
    }

    fn fetch_snapshot<'a>(&'a self) -> SnapshotFuture<'a> {
        Box::pin(async move {
            let body = fetch_body(&self.http_client, &self.url, self.timeout_ms, self.kind()).await?;
            parse_table(&body)
        })
    }
}

#[derive(Debug, Deserialize)]
struct TablePayload {
    header: Vec<String>,
    rows: Vec<Vec<Value>>,
}

struct TableRow<'a> {
    observed_at: Option<CivilDateTime>,
    cells: &'a [Value],
}

/// Normalizes the table into a snapshot from its latest two rows.
///
/// Rows are ordered newest-first by timestamp when every row has a readable
/// one; otherwise the upstream order is trusted as newest-first.
pub fn parse_table(body: &str) -> Result<DomesticSnapshot, SourceError> {
    let document: Value = serde_json::from_str(body)
        .map_err(|e| SourceError::malformed(format!("domestic-table: invalid JSON: {e}")))?;
    let table = document.get("data").cloned().unwrap_or(document);
    let payload: TablePayload = serde_json::from_value(table)
        .map_err(|e| SourceError::malformed(format!("domestic-table: bad table shape: {e}")))?;

    let price_column = find_column(&payload.header, &PRICE_COLUMNS)
        .ok_or_else(|| SourceError::malformed("domestic-table: no price column in header"))?;
    let date_column = find_column(&payload.header, &DATE_COLUMNS);

    let mut rows = payload
        .rows
        .iter()
        .map(|cells| TableRow {
            observed_at: date_column
                .and_then(|column| cells.get(column))
                .and_then(|cell| CivilDateTime::canonicalize(cell.as_str())),
            cells: cells.as_slice(),
        })
        .collect::<Vec<_>>();

    if !rows.is_empty() && rows.iter().all(|row| row.observed_at.is_some()) {
        rows.sort_by(|a, b| b.observed_at.cmp(&a.observed_at));
    }

    let latest = rows
        .first()
        .ok_or_else(|| SourceError::malformed("domestic-table: no rows"))?;
    let previous = rows.get(1).unwrap_or(latest);

    let latest_price = row_price(latest, price_column)?;
    let previous_price = row_price(previous, price_column)?;
    if previous_price <= 0.0 {
        return Err(SourceError::invalid_value(
            "domestic-table: previous row price must be positive",
        ));
    }
    let change_percent = (latest_price - previous_price) / previous_price * 100.0;

    Ok(DomesticSnapshot::new(
        latest_price,
        change_percent,
        previous_price,
        latest.observed_at,
    )?)
}

fn find_column(header: &[String], candidates: &[&str]) -> Option<usize> {
    header.iter().position(|name| {
        let name = name.trim().to_lowercase();
        candidates.iter().any(|candidate| name == *candidate)
    })
}

fn row_price(row: &TableRow<'_>, column: usize) -> Result<f64, SourceError> {
    let raw = row
        .cells
        .get(column)
        .and_then(|cell| match cell {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => parse_number(text),
            _ => None,
        })
        .ok_or_else(|| SourceError::malformed("domestic-table: price cell missing or unreadable"))?;
    Ok(normalize_unit(raw))
}
