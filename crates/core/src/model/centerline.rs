use std::collections::BTreeMap;
use std::path::Path;

use lanetrace_protocol::Point;
use log::{info, warn};

use crate::config::centerline_path;
use crate::parsers::centerline::parse_centerline;

/// The reference polyline of one lane.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneCenterline {
    /// Lane identifier taken from the `x_<lane>` / `y_<lane>` column pair.
    pub lane: String,
    pub points: Vec<Point>,
}

impl LaneCenterline {
    pub fn end(&self) -> Option<Point> {
        self.points.last().copied()
    }
}

/// Lane centerline geometry of one run, in file column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CenterlineTable {
    pub lanes: Vec<LaneCenterline>,
}

/// Per-run centerline tables, loaded once and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct CenterlineCatalog {
    tables: BTreeMap<i64, CenterlineTable>,
}

impl CenterlineCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, run_id: i64, table: CenterlineTable) {
        self.tables.insert(run_id, table);
    }

    pub fn get(&self, run_id: i64) -> Option<&CenterlineTable> {
        self.tables.get(&run_id)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Load the geometry file of every run in `run_ids` from `dir`.
    ///
    /// Runs without a file are left out; plotting them later reports missing
    /// geometry. Files that fail to read or parse are logged and left out too.
    pub fn load_dir(dir: &Path, run_ids: &[i64]) -> Self {
        let mut catalog = Self::new();
        for &run_id in run_ids {
            let path = centerline_path(dir, run_id);
            if !path.exists() {
                info!("no centerline for run {run_id} at {}", path.display());
                continue;
            }
            let data = match std::fs::read(&path) {
                Ok(data) => data,
                Err(e) => {
                    warn!("skipping centerline {}: {e}", path.display());
                    continue;
                }
            };
            match parse_centerline(&data) {
                Ok(table) => {
                    info!(
                        "loaded {} centerline lanes for run {run_id}",
                        table.lanes.len()
                    );
                    catalog.insert(run_id, table);
                }
                Err(e) => warn!("skipping centerline {}: {e}", path.display()),
            }
        }
        catalog
    }
}
