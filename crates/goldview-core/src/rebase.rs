//! Rebased (first point = 100) indices for comparing the two price series.

use serde::{Deserialize, Serialize};

use crate::HistoryPoint;

/// Base value every rebased series starts from.
pub const INDEX_BASE: f64 = 100.0;

/// `index[i] = value[i] / value[0] * 100`.
///
/// Returns `None` for an empty series or a base that is not a finite positive
/// number.
pub fn rebase(values: &[f64]) -> Option<Vec<f64>> {
    let base = *values.first()?;
    if !base.is_finite() || base <= 0.0 {
        return None;
    }
    Some(
        values
            .iter()
            .map(|value| value / base * INDEX_BASE)
            .collect(),
    )
}

/// Domestic (KRW/g) and global (USD/oz) indices over one aligned history.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebasedIndices {
    pub domestic: Vec<f64>,
    pub global: Vec<f64>,
}

impl RebasedIndices {
    pub fn from_points(points: &[HistoryPoint]) -> Self {
        let domestic = points.iter().map(|p| p.krw_per_gram).collect::<Vec<_>>();
        let global = points.iter().map(|p| p.usd_per_ounce).collect::<Vec<_>>();
        Self {
            domestic: rebase(&domestic).unwrap_or_default(),
            global: rebase(&global).unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.domestic.is_empty() && self.global.is_empty()
    }
}
