//! Field-level change detection between successive spot records.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::SpotRecord;

pub const DEFAULT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Fields that moved since the previous record. `None` means unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    pub domestic_krw_per_gram: Option<Direction>,
    pub gold_price_usd_per_ounce: Option<Direction>,
    pub usd_krw: Option<Direction>,
    pub change_percent: Option<Direction>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.domestic_krw_per_gram.is_none()
            && self.gold_price_usd_per_ounce.is_none()
            && self.usd_krw.is_none()
            && self.change_percent.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeDetector {
    epsilon: f64,
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl ChangeDetector {
    pub fn with_epsilon(epsilon: f64) -> Self {
        Self {
            epsilon: epsilon.abs(),
        }
    }

    pub fn detect(&self, previous: Option<&SpotRecord>, current: &SpotRecord) -> ChangeSet {
        let Some(previous) = previous else {
            return ChangeSet::default();
        };
        ChangeSet {
            domestic_krw_per_gram: self.compare(
                previous.domestic_krw_per_gram,
                current.domestic_krw_per_gram,
            ),
            gold_price_usd_per_ounce: self.compare(
                previous.gold_price_usd_per_ounce,
                current.gold_price_usd_per_ounce,
            ),
            usd_krw: self.compare(previous.usd_krw, current.usd_krw),
            change_percent: self.compare(previous.change_percent, current.change_percent),
        }
    }

    fn compare(&self, old: f64, new: f64) -> Option<Direction> {
        let delta = new - old;
        if delta.abs() <= self.epsilon {
            None
        } else if delta > 0.0 {
            Some(Direction::Up)
        } else {
            Some(Direction::Down)
        }
    }
}

/// Holds the last observed record for one refresh loop.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    detector: ChangeDetector,
    previous: Mutex<Option<SpotRecord>>,
}

impl ChangeTracker {
    pub fn new(detector: ChangeDetector) -> Self {
        Self {
            detector,
            previous: Mutex::new(None),
        }
    }

    /// Compares against the stored record and replaces it under one lock.
    pub fn observe(&self, current: SpotRecord) -> ChangeSet {
        let mut previous = self
            .previous
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let changes = self.detector.detect(previous.as_ref(), &current);
        *previous = Some(current);
        changes
    }

    pub fn last(&self) -> Option<SpotRecord> {
        self.previous
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
