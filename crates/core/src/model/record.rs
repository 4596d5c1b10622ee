use serde::{Deserialize, Serialize};

/// One observation of one vehicle at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    pub run_id: i64,
    pub vehicle_id: i64,
    /// Seconds since the start of the recording.
    pub time: i64,
    pub x: f64,
    pub y: f64,
    /// `None` when the tracker could not assign a lane.
    pub lane: Option<i64>,
    /// m/s
    pub speed: f64,
    /// m/s²
    pub acceleration: f64,
}

impl TrajectoryRecord {
    /// Sort key used by the store: run, then vehicle, then time.
    pub fn sort_key(&self) -> (i64, i64, i64) {
        (self.run_id, self.vehicle_id, self.time)
    }
}
