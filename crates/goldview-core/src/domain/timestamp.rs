use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::{format_description, offset};
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::ValidationError;

/// Fixed civil offset for domestic timestamps; no daylight-saving rules apply.
pub const CIVIL_OFFSET: UtcOffset = offset!(+9);

const CANONICAL: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
);

const CIVIL_FORMATS: [&[BorrowedFormatItem<'static>]; 4] = [
    format_description!("[year].[month].[day] [hour]:[minute]"),
    format_description!("[year].[month].[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
];

/// Domestic observation time pinned to the `+09:00` civil offset.
///
/// Serializes as `YYYY-MM-DDTHH:MM:SS+09:00` regardless of the upstream shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDateTime(OffsetDateTime);

impl CivilDateTime {
    /// Accepts `YYYY.MM.DD HH:MM[:SS]`, `YYYY-MM-DD HH:MM[:SS]` (read as civil
    /// time) or RFC 3339 with any explicit offset (converted).
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();

        if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
            return Ok(Self::from_offset_datetime(parsed));
        }

        CIVIL_FORMATS
            .iter()
            .find_map(|format| PrimitiveDateTime::parse(trimmed, format).ok())
            .map(|civil| Self(civil.assume_offset(CIVIL_OFFSET)))
            .ok_or_else(|| ValidationError::UnsupportedTimestamp {
                value: input.to_owned(),
            })
    }

    /// Absent or unparseable input is `None`; callers fall back elsewhere.
    pub fn canonicalize(input: Option<&str>) -> Option<Self> {
        input
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .and_then(|value| Self::parse(value).ok())
    }

    pub fn from_offset_datetime(value: OffsetDateTime) -> Self {
        Self(value.to_offset(CIVIL_OFFSET).replace_nanosecond(0).unwrap_or(value))
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    pub fn format_canonical(self) -> String {
        self.0
            .format(CANONICAL)
            .unwrap_or_else(|_| String::from("<unformattable>"))
    }
}

impl Display for CivilDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_canonical())
    }
}

impl Serialize for CivilDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_canonical())
    }
}

impl<'de> Deserialize<'de> for CivilDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

/// Formats a unix timestamp as UTC RFC 3339 (`...Z`).
pub fn unix_to_utc_rfc3339(ts: i64) -> Option<String> {
    OffsetDateTime::from_unix_timestamp(ts)
        .ok()
        .and_then(|value| value.format(&Rfc3339).ok())
}

pub fn now_utc_rfc3339() -> String {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(0)
        .unwrap_or(now)
        .format(&Rfc3339)
        .unwrap_or_default()
}
