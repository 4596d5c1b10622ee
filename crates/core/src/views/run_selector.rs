use std::collections::BTreeSet;

use crate::error::PipelineError;
use crate::model::{TimeWindow, TrajectoryStore, WINDOW_SECONDS};

/// Time extent and lane set of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunBounds {
    pub min_time: i64,
    pub max_time: i64,
    /// Distinct non-missing lanes, ascending.
    pub lanes: Vec<i64>,
}

pub fn bounds_and_lanes(store: &TrajectoryStore, run_id: i64) -> Result<RunBounds, PipelineError> {
    let records = store.run(run_id);
    if records.is_empty() {
        return Err(PipelineError::EmptyRun { run_id });
    }

    let mut min_time = i64::MAX;
    let mut max_time = i64::MIN;
    let mut lanes = BTreeSet::new();
    for r in records {
        min_time = min_time.min(r.time);
        max_time = max_time.max(r.time);
        if let Some(lane) = r.lane {
            lanes.insert(lane);
        }
    }

    Ok(RunBounds {
        min_time,
        max_time,
        lanes: lanes.into_iter().collect(),
    })
}

/// `Entire` followed by 60 s buckets anchored at `min_time`.
///
/// A bucket is emitted for every start strictly below `max_time`, so a run
/// whose records all share one timestamp only offers `Entire`.
pub fn time_windows(min_time: i64, max_time: i64) -> Vec<TimeWindow> {
    let mut windows = vec![TimeWindow::Entire];
    let mut start = min_time;
    while start < max_time {
        windows.push(TimeWindow::bucket(start));
        start += WINDOW_SECONDS;
    }
    windows
}
