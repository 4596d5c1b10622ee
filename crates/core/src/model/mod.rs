pub mod centerline;
pub mod record;
pub mod selection;
pub mod store;

pub use centerline::{CenterlineCatalog, CenterlineTable, LaneCenterline};
pub use record::TrajectoryRecord;
pub use selection::{LaneFilter, SelectionState, TimeWindow, WINDOW_SECONDS};
pub use store::TrajectoryStore;
