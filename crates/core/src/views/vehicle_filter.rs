use std::fmt;

use log::debug;

use crate::error::PipelineError;
use crate::model::{LaneFilter, TimeWindow, TrajectoryStore};
use crate::views::lifecycle::lifecycles;

/// One selectable vehicle, as listed to the analyst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleEntry {
    pub vehicle_id: i64,
    pub lane_change_count: usize,
}

impl fmt::Display for VehicleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} lane changes)",
            self.vehicle_id, self.lane_change_count
        )
    }
}

/// Vehicles with at least one record inside `window`, ascending by id.
pub fn candidates(store: &TrajectoryStore, run_id: i64, window: &TimeWindow) -> Vec<i64> {
    let mut ids: Vec<i64> = store
        .run(run_id)
        .iter()
        .filter(|r| window.contains(r.time))
        .map(|r| r.vehicle_id)
        .collect();
    ids.dedup();
    ids
}

/// Vehicles present in `window` whose full-trajectory initial and exit lanes
/// pass the filters.
///
/// The window only decides which vehicles are candidates; their lifecycles
/// are always computed over the entire run, so a vehicle seen briefly in the
/// window is still filtered by where it really entered and left. Entries come
/// in ascending vehicle id order.
pub fn selectable(
    store: &TrajectoryStore,
    run_id: i64,
    window: &TimeWindow,
    initial_lane: LaneFilter,
    exit_lane: LaneFilter,
) -> Result<Vec<VehicleEntry>, PipelineError> {
    if store.run(run_id).is_empty() {
        return Err(PipelineError::selection(format!("no data for run {run_id}")));
    }

    let ids = candidates(store, run_id, window);
    let entries: Vec<VehicleEntry> = lifecycles(store, run_id, &ids)
        .into_iter()
        .filter(|(_, lc)| initial_lane.accepts(lc.initial_lane) && exit_lane.accepts(lc.exit_lane))
        .map(|(vehicle_id, lc)| VehicleEntry {
            vehicle_id,
            lane_change_count: lc.lane_change_count,
        })
        .collect();

    debug!(
        "run {run_id} window {window} initial {initial_lane} exit {exit_lane}: {} of {} candidates",
        entries.len(),
        ids.len()
    );
    Ok(entries)
}
