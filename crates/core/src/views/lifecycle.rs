use std::collections::BTreeMap;

use log::debug;

use crate::model::{TrajectoryRecord, TrajectoryStore};

/// Whole-trajectory lane summary of one vehicle in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleLifecycle {
    /// Lane of the earliest record; `None` if that record has no lane.
    pub initial_lane: Option<i64>,
    /// Lane of the latest record; `None` if that record has no lane.
    pub exit_lane: Option<i64>,
    pub lane_change_count: usize,
}

impl VehicleLifecycle {
    /// Sort the records by time, then fold over the lane sequence.
    ///
    /// The first record only sets the baseline. Every later record whose lane
    /// differs from its predecessor's counts as one change, with a missing
    /// lane treated as its own value: `1 → None` and `None → 1` count,
    /// `None → None` does not. Returns `None` for an empty trajectory.
    ///
    /// This differs from a pandas `groupby().agg(first, last, diff)` summary,
    /// where `first`/`last` skip NaN lanes and `diff().fillna(0)` never counts
    /// a transition touching NaN. Here the initial and exit lanes are those of
    /// the literal first and last records, and lane loss or gain is a change.
    pub fn from_trajectory<'a>(
        records: impl IntoIterator<Item = &'a TrajectoryRecord>,
    ) -> Option<Self> {
        let mut timeline: Vec<(i64, Option<i64>)> =
            records.into_iter().map(|r| (r.time, r.lane)).collect();
        timeline.sort_by_key(|&(time, _)| time);

        let (&(_, first), rest) = timeline.split_first()?;
        let (exit_lane, lane_change_count) =
            rest.iter().fold((first, 0), |(prev, changes), &(_, lane)| {
                (lane, if lane != prev { changes + 1 } else { changes })
            });

        Some(Self {
            initial_lane: first,
            exit_lane,
            lane_change_count,
        })
    }
}

/// Lifecycles of `vehicle_ids` in `run_id`, always over full trajectories.
///
/// Vehicles with no records in the run are left out of the result.
pub fn lifecycles(
    store: &TrajectoryStore,
    run_id: i64,
    vehicle_ids: &[i64],
) -> BTreeMap<i64, VehicleLifecycle> {
    let result: BTreeMap<i64, VehicleLifecycle> = vehicle_ids
        .iter()
        .filter_map(|&id| {
            VehicleLifecycle::from_trajectory(store.vehicle(run_id, id)).map(|lc| (id, lc))
        })
        .collect();
    debug!(
        "run {run_id}: {} lifecycles from {} requested vehicles",
        result.len(),
        vehicle_ids.len()
    );
    result
}
