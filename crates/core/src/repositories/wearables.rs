//! Wearable device readings.

use crate::constants::{BLOOD_OXYGEN_SERIES, HEART_RATE_SERIES, SLEEP_WEEK, STEP_WEEK};
use crate::metrics::{SeriesPoint, SleepNight, StepDay};
use serde::Serialize;

/// Everything the wearables page displays.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WearableSnapshot {
    pub heart_rate: Vec<SeriesPoint>,
    pub blood_oxygen: Vec<SeriesPoint>,
    pub sleep: Vec<SleepNight>,
    pub steps: Vec<StepDay>,
}

/// Source of wearable readings.
#[derive(Clone, Debug)]
pub struct WearableFeed {
    snapshot: WearableSnapshot,
}

impl WearableFeed {
    pub fn new(snapshot: WearableSnapshot) -> Self {
        Self { snapshot }
    }

    /// The dashboard's mock device data.
    pub fn mock() -> Self {
        let series = |rows: &[(&str, f64)]| -> Vec<SeriesPoint> {
            rows.iter().map(|(t, v)| SeriesPoint::new(*t, *v)).collect()
        };
        Self::new(WearableSnapshot {
            heart_rate: series(HEART_RATE_SERIES),
            blood_oxygen: series(BLOOD_OXYGEN_SERIES),
            sleep: SLEEP_WEEK
                .iter()
                .map(|(date, deep, light, awake)| SleepNight {
                    date: date.to_string(),
                    deep: *deep,
                    light: *light,
                    awake: *awake,
                })
                .collect(),
            steps: STEP_WEEK
                .iter()
                .map(|(date, steps)| StepDay {
                    date: date.to_string(),
                    steps: *steps,
                })
                .collect(),
        })
    }

    pub fn snapshot(&self) -> &WearableSnapshot {
        &self.snapshot
    }

    /// Reload readings from the device. The mock source has nothing new, so the current snapshot
    /// is returned unchanged.
    pub fn refresh(&mut self) -> &WearableSnapshot {
        tracing::debug!("wearable data refreshed");
        &self.snapshot
    }
}
