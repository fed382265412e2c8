use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Historical window offered by the history endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HistoryRange {
    #[default]
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "10y")]
    TenYears,
    #[serde(rename = "20y")]
    TwentyYears,
}

/// Upstream chart request parameters for one range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeConfig {
    pub span: &'static str,
    pub interval: &'static str,
}

impl HistoryRange {
    pub const ALL: [Self; 5] = [
        Self::OneMonth,
        Self::SixMonths,
        Self::OneYear,
        Self::TenYears,
        Self::TwentyYears,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TenYears => "10y",
            Self::TwentyYears => "20y",
        }
    }

    /// Coarser sampling for the wide ranges keeps the payload small.
    pub const fn config(self) -> RangeConfig {
        match self {
            Self::OneMonth => RangeConfig {
                span: "1mo",
                interval: "1d",
            },
            Self::SixMonths => RangeConfig {
                span: "6mo",
                interval: "1d",
            },
            Self::OneYear => RangeConfig {
                span: "1y",
                interval: "1d",
            },
            Self::TenYears => RangeConfig {
                span: "10y",
                interval: "1wk",
            },
            Self::TwentyYears => RangeConfig {
                span: "20y",
                interval: "1mo",
            },
        }
    }

    /// Lenient parse used at the HTTP boundary: anything unknown is `1mo`.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value
            .and_then(|raw| Self::from_str(raw).ok())
            .unwrap_or_default()
    }
}

impl Display for HistoryRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryRange {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1mo" => Ok(Self::OneMonth),
            "6mo" => Ok(Self::SixMonths),
            "1y" => Ok(Self::OneYear),
            "10y" => Ok(Self::TenYears),
            "20y" => Ok(Self::TwentyYears),
            other => Err(ValidationError::InvalidRange {
                value: other.to_owned(),
            }),
        }
    }
}
