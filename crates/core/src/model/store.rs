use crate::model::TrajectoryRecord;

/// The full multi-run record table, read-only once built.
///
/// Records are kept sorted by `(run_id, vehicle_id, time)`, so every run and
/// every vehicle within a run is a contiguous, time-ordered slice.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryStore {
    records: Vec<TrajectoryRecord>,
}

impl TrajectoryStore {
    pub fn new(mut records: Vec<TrajectoryRecord>) -> Self {
        // Stable: records sharing a timestamp keep their file order.
        records.sort_by_key(TrajectoryRecord::sort_key);
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct run ids, ascending.
    pub fn run_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.records.iter().map(|r| r.run_id).collect();
        ids.dedup();
        ids
    }

    /// All records of a run. Empty when the run is unknown.
    pub fn run(&self, run_id: i64) -> &[TrajectoryRecord] {
        let start = self.records.partition_point(|r| r.run_id < run_id);
        let end = self.records.partition_point(|r| r.run_id <= run_id);
        &self.records[start..end]
    }

    /// The complete, time-ordered trajectory of one vehicle in a run.
    pub fn vehicle(&self, run_id: i64, vehicle_id: i64) -> &[TrajectoryRecord] {
        let run = self.run(run_id);
        let start = run.partition_point(|r| r.vehicle_id < vehicle_id);
        let end = run.partition_point(|r| r.vehicle_id <= vehicle_id);
        &run[start..end]
    }

    /// Distinct vehicle ids of a run, ascending.
    pub fn vehicle_ids(&self, run_id: i64) -> Vec<i64> {
        let mut ids: Vec<i64> = self.run(run_id).iter().map(|r| r.vehicle_id).collect();
        ids.dedup();
        ids
    }
}
