//! Trajectory filtering and plot assembly for traffic-study recordings.
//!
//! ```text
//!   CSV ──▶ parsers ──▶ TrajectoryStore ─┬─▶ run_selector ─┐
//!                       CenterlineCatalog │   lifecycle ────┼─▶ vehicle_filter ──▶ plot ──▶ PlotSpec ──▶ html
//!                                         └─────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod explorer;
pub mod html;
pub mod model;
pub mod parsers;
pub mod views;

pub use error::PipelineError;
pub use explorer::{Explorer, PlotOutcome, RunOptions};
