//! HTML-scrape strategy.
//!
//! Expects markup carrying three class-tagged elements:
//!
//! ```html
//! <span class="price">1,350,000</span>
//! <span class="change down">0.88%</span>
//! <span class="date">2024.05.01 14:30</span>
//! ```
//!
//! The change element's direction comes from an `up`/`down` style marker on
//! the element or on markup nested inside it.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::{
    fetch_body, normalize_unit, parse_number, previous_from_percent, DomesticSource,
    DomesticSourceKind, SnapshotFuture,
};
use crate::http_client::HttpClient;
use crate::{CivilDateTime, DomesticSnapshot, SourceError};

pub const DEFAULT_SCRAPE_URL: &str = "https://finance.naver.com/marketindex/goldDetail.naver";

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<[a-z][a-z0-9]*[^>]*\bclass\s*=\s*"[^"]*\bprice\b[^"]*"[^>]*>([^<]*)"#)
        .expect("price pattern is valid")
});

static CHANGE_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<([a-z][a-z0-9]*)[^>]*\bclass\s*=\s*"([^"]*\b(?:change|rate|fluctuation)\b[^"]*)"[^>]*>"#,
    )
    .expect("change pattern is valid")
});

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<[a-z][a-z0-9]*[^>]*\bclass\s*=\s*"[^"]*\b(?:date|time|updated)\b[^"]*"[^>]*>([^<]*)"#)
        .expect("date pattern is valid")
});

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{4}[.-]\d{2}[.-]\d{2}[ T]\d{2}:\d{2}(?::\d{2})?(?:Z|[+-]\d{2}:\d{2})?")
        .expect("timestamp pattern is valid")
});

static PERCENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[+-]?\s*(\d+(?:\.\d+)?)\s*%").expect("percent pattern is valid")
});

static CLASS_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bclass\s*=\s*"([^"]*)""#).expect("class pattern is valid")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// Direction read from markup class markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Up,
    Down,
    Unmarked,
}

/// Scrapes the domestic price page.
#[derive(Clone)]
pub struct ScrapeSource {
    http_client: Arc<dyn HttpClient>,
    url: String,
    timeout_ms: u64,
}

impl ScrapeSource {
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

impl DomesticSource for ScrapeSource {
    fn kind(&self) -> DomesticSourceKind {
        DomesticSourceKind::Scrape
    }

    fn fetch_snapshot<'a>(&'a self) -> SnapshotFuture<'a> {
        Box::pin(async move {
            let body = fetch_body(&self.http_client, &self.url, self.timeout_ms, self.kind()).await?;
            parse_markup(&body)
        })
    }
}

/// Normalizes scraped markup into a snapshot. The previous price is implied
/// by the percent change, since the page carries no absolute delta.
pub fn parse_markup(html: &str) -> Result<DomesticSnapshot, SourceError> {
    let raw_price = PRICE_RE
        .captures_iter(html)
        .filter_map(|captures| captures.get(1))
        .find_map(|text| parse_number(text.as_str()))
        .ok_or_else(|| SourceError::malformed("domestic-scrape: price element not found"))?;
    let price = normalize_unit(raw_price);

    let change_percent = parse_change_percent(html)?;
    let previous = previous_from_percent(price, change_percent);

    let observed_at = DATE_RE
        .captures_iter(html)
        .filter_map(|captures| captures.get(1))
        .filter_map(|text| TIMESTAMP_RE.find(text.as_str()))
        .find_map(|found| CivilDateTime::canonicalize(Some(found.as_str())));

    Ok(DomesticSnapshot::new(
        price,
        change_percent,
        previous,
        observed_at,
    )?)
}

/// Signed percent from the change element.
///
/// A class marker decides the sign. Without one the change counts as
/// positive, whatever sign the literal carries.
pub fn parse_change_percent(html: &str) -> Result<f64, SourceError> {
    let captures = CHANGE_OPEN_RE
        .captures(html)
        .ok_or_else(|| SourceError::malformed("domestic-scrape: change element not found"))?;
    let tag = captures.get(1).map_or("", |m| m.as_str()).to_ascii_lowercase();
    let outer_class = captures.get(2).map_or("", |m| m.as_str());
    let rest = &html[captures.get(0).map_or(0, |m| m.end())..];
    let inner = element_body(rest, &tag);

    let text = TAG_RE.replace_all(inner, " ");
    let percent = PERCENT_RE
        .captures(&text)
        .ok_or_else(|| SourceError::malformed("domestic-scrape: percent literal not found"))?;
    let magnitude = percent
        .get(1)
        .and_then(|digits| digits.as_str().parse::<f64>().ok())
        .ok_or_else(|| SourceError::malformed("domestic-scrape: percent literal not numeric"))?;

    let inner_classes = CLASS_ATTR_RE
        .captures_iter(inner)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect::<Vec<_>>();
    let direction = direction_from_classes(std::iter::once(outer_class).chain(inner_classes));

    Ok(match direction {
        ChangeDirection::Down => -magnitude,
        ChangeDirection::Up | ChangeDirection::Unmarked => magnitude,
    })
}

/// Content up to the matching close tag. Nested elements of the same name are
/// not expected in change markup.
fn element_body<'a>(rest: &'a str, tag: &str) -> &'a str {
    let closing = format!("</{tag}");
    rest.to_ascii_lowercase()
        .find(&closing)
        .map_or(rest, |end| &rest[..end])
}

/// Scans class tokens (split on whitespace, `_` and `-`) for a direction marker.
pub fn direction_from_classes<'a>(classes: impl IntoIterator<Item = &'a str>) -> ChangeDirection {
    for class in classes {
        for token in class
            .split(|ch: char| ch.is_whitespace() || ch == '_' || ch == '-')
            .map(str::to_ascii_lowercase)
        {
            match token.as_str() {
                "up" | "plus" | "rise" => return ChangeDirection::Up,
                "down" | "minus" | "fall" => return ChangeDirection::Down,
                _ => {}
            }
        }
    }
    ChangeDirection::Unmarked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceErrorKind;

    #[test]
    fn down_marker_makes_change_negative() {
        let html = r#"<div class="price_area">
            <span class="price">135,000원</span>
            <span class="change down">1.25%</span>
            <span class="date">2024.05.01 14:30</span>
        </div>"#;
        let snapshot = parse_markup(html).expect("valid markup");
        assert_eq!(snapshot.price_per_gram, 135_000.0);
        assert_eq!(snapshot.change_percent, -1.25);
        assert!((snapshot.previous_price_per_gram - 135_000.0 / 0.9875).abs() < 1e-6);
        assert_eq!(
            snapshot.observed_at.map(|ts| ts.format_canonical()).as_deref(),
            Some("2024-05-01T14:30:00+09:00")
        );
    }

    #[test]
    fn nested_marker_is_honored() {
        let html = r#"<p class="rate"><em class="ico_up"></em><strong>0.40</strong>%</p>
            <b class="price">1,350,000</b>"#;
        let snapshot = parse_markup(html).expect("valid markup");
        assert_eq!(snapshot.price_per_gram, 1350.0);
        assert_eq!(snapshot.change_percent, 0.40);
    }

    #[test]
    fn unmarked_change_defaults_to_positive() {
        let percent =
            parse_change_percent(r#"<span class="change">0.75 %</span>"#).expect("percent");
        assert_eq!(percent, 0.75);
    }

    #[test]
    fn unmarked_change_ignores_literal_sign() {
        let percent =
            parse_change_percent(r#"<span class="change">-0.75%</span>"#).expect("percent");
        assert_eq!(percent, 0.75);
    }

    #[test]
    fn hyphenated_wrapper_class_does_not_hide_price() {
        let html = r#"<div class="price-box"><span class="price">135,000</span></div>
            <span class="change up">1%</span>
            <div class="date-area"><span class="date">2024.05.01 14:30</span></div>"#;
        let snapshot = parse_markup(html).expect("valid markup");
        assert_eq!(snapshot.price_per_gram, 135_000.0);
        assert_eq!(snapshot.change_percent, 1.0);
        assert_eq!(
            snapshot.observed_at.map(|ts| ts.format_canonical()).as_deref(),
            Some("2024-05-01T14:30:00+09:00")
        );
    }

    #[test]
    fn missing_price_is_malformed() {
        let error = parse_markup(r#"<span class="change up">1%</span>"#).expect_err("no price");
        assert_eq!(error.kind(), SourceErrorKind::MalformedUpstreamData);
    }

    #[test]
    fn full_loss_keeps_previous_equal_to_current() {
        let html = r#"<span class="price">135,000</span><span class="change down">100%</span>"#;
        let snapshot = parse_markup(html).expect("valid markup");
        assert_eq!(snapshot.change_percent, -100.0);
        assert_eq!(snapshot.previous_price_per_gram, 135_000.0);
    }

    #[test]
    fn unreadable_date_leaves_observed_at_empty() {
        let html = r#"<span class="price">135,000</span><span class="change up">1%</span>
            <span class="date">장 마감</span>"#;
        let snapshot = parse_markup(html).expect("valid markup");
        assert_eq!(snapshot.observed_at, None);
    }

    #[test]
    fn direction_tokens_split_on_underscores() {
        assert_eq!(direction_from_classes(["no_today"]), ChangeDirection::Unmarked);
        assert_eq!(direction_from_classes(["no_down"]), ChangeDirection::Down);
    }
}
