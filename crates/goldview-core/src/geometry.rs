//! SVG path geometry for the history chart.
//!
//! Series are projected into a fixed box. Every series drawn on one chart shares
//! the same value domain so their lines are directly comparable.

use serde::{Deserialize, Serialize};

use crate::rebase::RebasedIndices;
use crate::HistoryPoint;

pub const DEFAULT_WIDTH: f64 = 640.0;
pub const DEFAULT_HEIGHT: f64 = 240.0;
pub const DEFAULT_INSET: f64 = 12.0;

/// Drawing area in SVG user units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartBox {
    pub width: f64,
    pub height: f64,
    pub inset: f64,
}

impl Default for ChartBox {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            inset: DEFAULT_INSET,
        }
    }
}

impl ChartBox {
    pub const fn new(width: f64, height: f64, inset: f64) -> Self {
        Self {
            width,
            height,
            inset,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.height - self.inset
    }
}

/// Shared min/max over the finite values of every series on a chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueDomain {
    pub min: f64,
    pub max: f64,
}

impl ValueDomain {
    pub fn of(series: &[&[f64]]) -> Option<Self> {
        series
            .iter()
            .flat_map(|values| values.iter().copied())
            .filter(|value| value.is_finite())
            .fold(None, |domain, value| match domain {
                None => Some(Self {
                    min: value,
                    max: value,
                }),
                Some(Self { min, max }) => Some(Self {
                    min: min.min(value),
                    max: max.max(value),
                }),
            })
    }

    /// A flat domain is treated as spanning one unit.
    pub fn span(&self) -> f64 {
        let range = self.max - self.min;
        if range == 0.0 {
            1.0
        } else {
            range
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesPaths {
    pub line: String,
    pub area: String,
}

/// Collects the series for one chart, then projects them against their
/// shared domain.
#[derive(Debug, Clone, Default)]
pub struct ChartGeometryBuilder<'a> {
    chart_box: ChartBox,
    series: Vec<&'a [f64]>,
}

impl<'a> ChartGeometryBuilder<'a> {
    pub fn new(chart_box: ChartBox) -> Self {
        Self {
            chart_box,
            series: Vec::new(),
        }
    }

    pub fn series(mut self, values: &'a [f64]) -> Self {
        self.series.push(values);
        self
    }

    /// One [`SeriesPaths`] per added series, in insertion order.
    pub fn build(self) -> Vec<SeriesPaths> {
        let Some(domain) = ValueDomain::of(&self.series) else {
            return vec![SeriesPaths::default(); self.series.len()];
        };
        self.series
            .iter()
            .map(|values| SeriesPaths {
                line: line_path(values, &self.chart_box, &domain),
                area: area_path(values, &self.chart_box, &domain),
            })
            .collect()
    }
}

pub fn x_at(rank: usize, count: usize, chart_box: &ChartBox) -> f64 {
    if count <= 1 {
        return chart_box.inset;
    }
    chart_box.inset + rank as f64 / (count - 1) as f64 * (chart_box.width - 2.0 * chart_box.inset)
}

pub fn y_at(value: f64, chart_box: &ChartBox, domain: &ValueDomain) -> f64 {
    let ratio = (value - domain.min) / domain.span();
    chart_box.inset + (1.0 - ratio) * (chart_box.height - 2.0 * chart_box.inset)
}

fn coordinates(values: &[f64], chart_box: &ChartBox, domain: &ValueDomain) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(rank, value)| {
            (
                x_at(rank, values.len(), chart_box),
                y_at(*value, chart_box, domain),
            )
        })
        .collect()
}

/// `M x,y L x,y ...`, or an empty string for an empty series.
pub fn line_path(values: &[f64], chart_box: &ChartBox, domain: &ValueDomain) -> String {
    coordinates(values, chart_box, domain)
        .iter()
        .enumerate()
        .map(|(rank, (x, y))| {
            let command = if rank == 0 { 'M' } else { 'L' };
            format!("{command} {x:.2},{y:.2}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The line path closed down to the bottom edge of the box.
pub fn area_path(values: &[f64], chart_box: &ChartBox, domain: &ValueDomain) -> String {
    let points = coordinates(values, chart_box, domain);
    let (Some((first_x, _)), Some((last_x, _))) = (points.first(), points.last()) else {
        return String::new();
    };
    let bottom = chart_box.bottom();
    format!(
        "{} L {last_x:.2},{bottom:.2} L {first_x:.2},{bottom:.2} Z",
        line_path(values, chart_box, domain)
    )
}

/// Rebased indices and paths for the domestic and global series of one range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    pub chart_box: ChartBox,
    pub indices: RebasedIndices,
    pub domestic: SeriesPaths,
    pub global: SeriesPaths,
}

impl ChartView {
    pub fn from_points(points: &[HistoryPoint], chart_box: ChartBox) -> Self {
        let indices = RebasedIndices::from_points(points);
        let mut paths = ChartGeometryBuilder::new(chart_box)
            .series(&indices.domestic)
            .series(&indices.global)
            .build()
            .into_iter();
        let domestic = paths.next().unwrap_or_default();
        let global = paths.next().unwrap_or_default();

        Self {
            chart_box,
            indices,
            domestic,
            global,
        }
    }
}
