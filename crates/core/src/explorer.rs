use std::path::PathBuf;

use lanetrace_protocol::{Palette, PlotSpec};
use log::warn;

use crate::config::Paths;
use crate::error::PipelineError;
use crate::html::write_artifact;
use crate::model::{CenterlineCatalog, LaneFilter, SelectionState, TrajectoryStore};
use crate::views::{VehicleEntry, bounds_and_lanes, build_plot, selectable, time_windows};

/// Picker values for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// `"all"` followed by the 60 s bucket labels.
    pub time_windows: Vec<String>,
    /// `"any"` followed by the run's lanes, ascending.
    pub lane_options: Vec<String>,
}

/// Result of a plot action.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOutcome {
    pub spec: PlotSpec,
    /// Where the artifact was written, or why it could not be.
    pub artifact: Result<PathBuf, String>,
}

/// Entry point for the interactive layer.
///
/// Holds the two read-only tables and answers each user action with a pure
/// computation over them and the caller's [`SelectionState`].
#[derive(Debug)]
pub struct Explorer {
    store: TrajectoryStore,
    centerlines: CenterlineCatalog,
    palette: Palette,
    output_file: PathBuf,
}

impl Explorer {
    pub fn new(store: TrajectoryStore, centerlines: CenterlineCatalog, output_file: PathBuf) -> Self {
        Self {
            store,
            centerlines,
            palette: Palette::tableau(),
            output_file,
        }
    }

    /// Load centerlines for every run in `store` from `paths.centerline_dir`.
    pub fn load(store: TrajectoryStore, paths: &Paths) -> Self {
        let centerlines = CenterlineCatalog::load_dir(&paths.centerline_dir, &store.run_ids());
        Self::new(store, centerlines, paths.output_file.clone())
    }

    /// Run picker values.
    pub fn run_options(&self) -> Vec<i64> {
        self.store.run_ids()
    }

    pub fn run_options_for(&self, run_id: i64) -> Result<RunOptions, PipelineError> {
        let bounds = bounds_and_lanes(&self.store, run_id)?;
        let any = LaneFilter::Any.to_string();
        Ok(RunOptions {
            time_windows: time_windows(bounds.min_time, bounds.max_time)
                .iter()
                .map(ToString::to_string)
                .collect(),
            lane_options: std::iter::once(any)
                .chain(bounds.lanes.iter().map(ToString::to_string))
                .collect(),
        })
    }

    pub fn vehicle_options(
        &self,
        selection: &SelectionState,
    ) -> Result<Vec<VehicleEntry>, PipelineError> {
        selectable(
            &self.store,
            selection.run_id,
            &selection.window,
            selection.initial_lane,
            selection.exit_lane,
        )
    }

    /// Build the plot and write the artifact.
    ///
    /// Writing is best effort: a failure is logged and reported in
    /// [`PlotOutcome::artifact`] while the plot itself is still returned for
    /// interactive display.
    pub fn plot(&self, selection: &SelectionState) -> Result<PlotOutcome, PipelineError> {
        let spec = build_plot(
            &self.store,
            &self.centerlines,
            selection.run_id,
            &selection.vehicles,
            &self.palette,
        )?;
        let artifact = match write_artifact(&spec, &self.output_file) {
            Ok(()) => Ok(self.output_file.clone()),
            Err(e) => {
                warn!("plot artifact not written: {e}");
                Err(e.to_string())
            }
        };
        Ok(PlotOutcome { spec, artifact })
    }
}
