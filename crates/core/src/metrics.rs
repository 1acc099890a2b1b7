//! Wearable time series and their aggregates.
//!
//! Aggregates are plain arithmetic: mean, min and max over the raw points with no smoothing.

use serde::Serialize;

/// One reading, labelled with the time of day it was taken (e.g. `"06:00"`).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub time: String,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(time: impl Into<String>, value: f64) -> Self {
        Self {
            time: time.into(),
            value,
        }
    }
}

/// Aggregates of one series, in the series' own unit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Summarise a series.
///
/// # Returns
///
/// The arithmetic mean, minimum and maximum of the point values, or `None` for an empty
/// series. Point order does not matter.
pub fn summarize(points: &[SeriesPoint]) -> Option<SeriesSummary> {
    let first = points.first()?.value;
    let (sum, min, max) = points.iter().fold((0.0, first, first), |(sum, min, max), p| {
        (sum + p.value, min.min(p.value), max.max(p.value))
    });
    Some(SeriesSummary {
        mean: sum / points.len() as f64,
        min,
        max,
    })
}

/// One night of sleep, in hours per stage.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SleepNight {
    pub date: String,
    pub deep: f64,
    pub light: f64,
    pub awake: f64,
}

impl SleepNight {
    /// Hours in bed: deep, light and awake time added together.
    pub fn total_hours(&self) -> f64 {
        self.deep + self.light + self.awake
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepDay {
    pub date: String,
    pub steps: u32,
}

/// Mean steps per day.
///
/// # Returns
///
/// `None` when there are no days. Totals are summed as `u64`, so long ranges cannot overflow.
pub fn average_steps(days: &[StepDay]) -> Option<f64> {
    if days.is_empty() {
        return None;
    }
    let total: u64 = days.iter().map(|d| u64::from(d.steps)).sum();
    Some(total as f64 / days.len() as f64)
}
