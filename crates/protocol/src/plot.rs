use serde::{Deserialize, Serialize};

use crate::types::{Color, Point};

/// A renderer-agnostic description of one trajectory plot.
///
/// The core assembles a `PlotSpec`; renderers (the HTML artifact writer,
/// the terminal canvas) consume it without further domain knowledge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSpec {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub x_range: AxisRange,
    pub y_range: AxisRange,
    /// Drawn in order: lane references first, vehicles on top.
    pub series: Vec<Series>,
}

impl PlotSpec {
    /// Marker series, in selection order.
    pub fn marker_series(&self) -> impl Iterator<Item = &Series> {
        self.series
            .iter()
            .filter(|s| matches!(s.kind, SeriesKind::Markers { .. }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SeriesKind {
    /// Connected polyline.
    Lines { width: f64 },
    /// Unconnected point markers.
    Markers { size: f64 },
    /// Text placed at each point; `Series::text` holds the strings.
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub kind: SeriesKind,
    /// `None` lets the renderer choose (used for text labels).
    pub color: Option<Color>,
    pub points: Vec<Point>,
    /// Per-point text: hover text for markers, the label for text series.
    /// Empty for plain lines.
    pub text: Vec<String>,
    pub show_legend: bool,
}

impl Series {
    pub fn lines(name: impl Into<String>, color: Color, width: f64, points: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            kind: SeriesKind::Lines { width },
            color: Some(color),
            points,
            text: Vec::new(),
            show_legend: true,
        }
    }

    /// A single text label that stays out of the legend.
    pub fn label(name: impl Into<String>, at: Point, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SeriesKind::Text,
            color: None,
            points: vec![at],
            text: vec![text.into()],
            show_legend: false,
        }
    }

    pub fn markers(
        name: impl Into<String>,
        color: Color,
        size: f64,
        points: Vec<Point>,
        hover: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: SeriesKind::Markers { size },
            color: Some(color),
            points,
            text: hover,
            show_legend: true,
        }
    }

    /// Text attached to point `index`, if any.
    pub fn text_at(&self, index: usize) -> Option<&str> {
        self.text.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_series_skips_lanes_and_labels() {
        let spec = PlotSpec {
            title: "t".into(),
            x_title: "x".into(),
            y_title: "y".into(),
            x_range: AxisRange::new(0.0, 10.0),
            y_range: AxisRange::new(0.0, 5.0),
            series: vec![
                Series::lines("Lane 1", Color::rgb(211, 211, 211), 1.5, vec![]),
                Series::label("Lane 1", Point::new(1.0, 1.0), "Lane 1"),
                Series::markers(
                    "Vehicle 7",
                    Color::rgb(0, 0, 0),
                    5.0,
                    vec![Point::new(2.0, 3.0)],
                    vec!["ID:7".into()],
                ),
            ],
        };
        let names: Vec<_> = spec.marker_series().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Vehicle 7"]);
        assert_eq!(spec.x_range.span(), 10.0);
    }

    #[test]
    fn serializes_to_json() {
        let series = Series::label("Lane 2", Point::new(4.0, 5.0), "Lane 2");
        let json = serde_json::to_string(&series).unwrap();
        assert!(json.contains("\"Text\""));
        let back: Series = serde_json::from_str(&json).unwrap();
        assert_eq!(back, series);
        assert_eq!(back.text_at(0), Some("Lane 2"));
        assert_eq!(back.text_at(1), None);
    }
}
