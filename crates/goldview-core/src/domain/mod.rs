//! # Domain Models
//!
//! Value objects shared by the spot and history paths. Every type is built
//! fresh per request and owned by that request.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`DomesticSnapshot`] | Canonical domestic KRW-per-gram quote |
//! | [`InstrumentSeries`] | Close-price series for one chart instrument |
//! | [`SpotRecord`] | Combined domestic + global + FX snapshot |
//! | [`HistoryPoint`] | Aligned gold/FX sample with derived KRW-per-gram |
//! | [`HistoryRange`] | Closed set of history windows and their chart parameters |
//! | [`CivilDateTime`] | Timestamp pinned to the fixed `+09:00` civil offset |
//! | [`Symbol`] | Validated chart instrument symbol |
//!
//! Constructors validate invariants (positive prices, finite percentages), so
//! an adapter cannot hand out a half-normalized snapshot.

mod models;
mod range;
mod symbol;
mod timestamp;

pub use models::{
    DomesticSnapshot, HistoryPoint, HistoryResult, InstrumentSeries, SeriesPoint, SpotRecord,
    OUNCE_TO_GRAM,
};
pub(crate) use models::validate_positive;
pub use range::{HistoryRange, RangeConfig};
pub use symbol::Symbol;
pub use timestamp::{now_utc_rfc3339, unix_to_utc_rfc3339, CivilDateTime, CIVIL_OFFSET};
