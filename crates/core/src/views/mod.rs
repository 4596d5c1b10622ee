pub mod lifecycle;
pub mod plot;
pub mod run_selector;
pub mod vehicle_filter;

pub use lifecycle::{VehicleLifecycle, lifecycles};
pub use plot::build_plot;
pub use run_selector::{RunBounds, bounds_and_lanes, time_windows};
pub use vehicle_filter::{VehicleEntry, candidates, selectable};
