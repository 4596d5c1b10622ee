pub mod palette;
pub mod plot;
pub mod types;

pub use palette::Palette;
pub use plot::{AxisRange, PlotSpec, Series, SeriesKind};
pub use types::{Color, Point};
