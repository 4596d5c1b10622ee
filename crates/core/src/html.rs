//! HTML artifact writer: renders a `PlotSpec` as one self-contained page
//! with an inline SVG chart and the plot data embedded as JSON.

use std::path::Path;

use lanetrace_protocol::{AxisRange, Color, PlotSpec, Point, SeriesKind};
use log::info;
use thiserror::Error;

const WIDTH: f64 = 1100.0;
const HEIGHT: f64 = 700.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 180.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
const TICKS: usize = 5;
const TEXT_COLOR: &str = "#2a3f5f";
const GRID_COLOR: &str = "#ebf0f8";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("serialize plot data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Maps data coordinates into the SVG plot area (y grows upwards).
struct Frame {
    x: AxisRange,
    y: AxisRange,
}

impl Frame {
    fn plot_width() -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height() -> f64 {
        HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn map(&self, p: Point) -> (f64, f64) {
        let sx = MARGIN_LEFT + (p.x - self.x.min) / nonzero(self.x.span()) * Self::plot_width();
        let sy = MARGIN_TOP + Self::plot_height()
            - (p.y - self.y.min) / nonzero(self.y.span()) * Self::plot_height();
        (sx, sy)
    }
}

fn nonzero(span: f64) -> f64 {
    if span.abs() < f64::EPSILON { 1.0 } else { span }
}

/// Render the plot as a standalone HTML document.
pub fn render_html(spec: &PlotSpec) -> Result<String, ArtifactError> {
    let frame = Frame {
        x: spec.x_range,
        y: spec.y_range,
    };
    let title = escape_xml(&spec.title);
    let mut html = String::with_capacity(4096 + spec.series.len() * 512);

    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body{{margin:0;font-family:system-ui,-apple-system,sans-serif;background:#fff;color:{TEXT_COLOR}}}
svg circle:hover{{stroke:#000;stroke-width:1.5}}
</style>
</head>
<body>
"#
    ));
    html.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" width="{WIDTH}" height="{HEIGHT}" style="font-size:12px">"#
    ));
    html.push_str(r##"<rect width="100%" height="100%" fill="#ffffff"/>"##);
    html.push_str(&format!(
        r#"<text x="{}" y="30" fill="{TEXT_COLOR}" style="font-size:18px">{title}</text>"#,
        MARGIN_LEFT
    ));

    push_axes(&mut html, spec, &frame);

    html.push_str(&format!(
        r#"<clipPath id="plot-area"><rect x="{MARGIN_LEFT}" y="{MARGIN_TOP}" width="{}" height="{}"/></clipPath><g clip-path="url(#plot-area)">"#,
        Frame::plot_width(),
        Frame::plot_height()
    ));
    for series in &spec.series {
        let color = series
            .color
            .map_or_else(|| TEXT_COLOR.to_string(), Color::to_hex);
        match series.kind {
            SeriesKind::Lines { width } => {
                let points: Vec<String> = series
                    .points
                    .iter()
                    .map(|&p| {
                        let (x, y) = frame.map(p);
                        format!("{x:.2},{y:.2}")
                    })
                    .collect();
                html.push_str(&format!(
                    r#"<polyline points="{}" fill="none" stroke="{color}" stroke-width="{width}"><title>{}</title></polyline>"#,
                    points.join(" "),
                    escape_xml(&series.name)
                ));
            }
            SeriesKind::Markers { size } => {
                html.push_str(&format!(r#"<g fill="{color}">"#));
                for (i, &p) in series.points.iter().enumerate() {
                    let (x, y) = frame.map(p);
                    html.push_str(&format!(
                        r#"<circle cx="{x:.2}" cy="{y:.2}" r="{}"><title>{}&#10;x: {}&#10;y: {}</title></circle>"#,
                        size / 2.0,
                        escape_xml(series.text_at(i).unwrap_or(&series.name)),
                        p.x,
                        p.y
                    ));
                }
                html.push_str("</g>");
            }
            SeriesKind::Text => {
                for (i, &p) in series.points.iter().enumerate() {
                    let (x, y) = frame.map(p);
                    html.push_str(&format!(
                        r#"<text x="{:.2}" y="{:.2}" fill="{color}">{}</text>"#,
                        x + 4.0,
                        y - 4.0,
                        escape_xml(series.text_at(i).unwrap_or(&series.name))
                    ));
                }
            }
        }
    }
    html.push_str("</g>");

    push_legend(&mut html, spec);
    html.push_str("</svg>\n");

    // `</` inside the JSON would close the script element early.
    let data = serde_json::to_string(spec)?.replace("</", "<\\/");
    html.push_str(&format!(
        "<script type=\"application/json\" id=\"plot-data\">{data}</script>\n</body>\n</html>\n"
    ));
    Ok(html)
}

fn push_axes(html: &mut String, spec: &PlotSpec, frame: &Frame) {
    let bottom = MARGIN_TOP + Frame::plot_height();
    let right = MARGIN_LEFT + Frame::plot_width();

    for i in 0..=TICKS {
        let t = i as f64 / TICKS as f64;
        let xv = spec.x_range.min + spec.x_range.span() * t;
        let yv = spec.y_range.min + spec.y_range.span() * t;
        let (sx, _) = frame.map(Point::new(xv, spec.y_range.min));
        let (_, sy) = frame.map(Point::new(spec.x_range.min, yv));
        html.push_str(&format!(
            r#"<line x1="{sx:.2}" y1="{MARGIN_TOP}" x2="{sx:.2}" y2="{bottom}" stroke="{GRID_COLOR}"/><text x="{sx:.2}" y="{}" fill="{TEXT_COLOR}" text-anchor="middle">{xv:.0}</text>"#,
            bottom + 18.0
        ));
        html.push_str(&format!(
            r#"<line x1="{MARGIN_LEFT}" y1="{sy:.2}" x2="{right}" y2="{sy:.2}" stroke="{GRID_COLOR}"/><text x="{}" y="{:.2}" fill="{TEXT_COLOR}" text-anchor="end">{yv:.1}</text>"#,
            MARGIN_LEFT - 8.0,
            sy + 4.0
        ));
    }

    html.push_str(&format!(
        r#"<text x="{}" y="{}" fill="{TEXT_COLOR}" text-anchor="middle">{}</text>"#,
        MARGIN_LEFT + Frame::plot_width() / 2.0,
        HEIGHT - 15.0,
        escape_xml(&spec.x_title)
    ));
    let cy = MARGIN_TOP + Frame::plot_height() / 2.0;
    html.push_str(&format!(
        r#"<text x="20" y="{cy}" fill="{TEXT_COLOR}" text-anchor="middle" transform="rotate(-90 20 {cy})">{}</text>"#,
        escape_xml(&spec.y_title)
    ));
}

fn push_legend(html: &mut String, spec: &PlotSpec) {
    let x = WIDTH - MARGIN_RIGHT + 15.0;
    html.push_str(&format!(
        r#"<text x="{x}" y="{MARGIN_TOP}" fill="{TEXT_COLOR}">Legend</text>"#
    ));
    let mut y = MARGIN_TOP + 20.0;
    for series in spec.series.iter().filter(|s| s.show_legend) {
        let Some(color) = series.color else {
            continue;
        };
        let swatch = match series.kind {
            SeriesKind::Markers { .. } => format!(
                r#"<circle cx="{}" cy="{}" r="4" fill="{color}"/>"#,
                x + 8.0,
                y - 4.0
            ),
            _ => format!(
                r#"<line x1="{x}" y1="{}" x2="{}" y2="{}" stroke="{color}" stroke-width="2"/>"#,
                y - 4.0,
                x + 16.0,
                y - 4.0
            ),
        };
        html.push_str(&swatch);
        html.push_str(&format!(
            r#"<text x="{}" y="{y}" fill="{TEXT_COLOR}">{}</text>"#,
            x + 22.0,
            escape_xml(&series.name)
        ));
        y += 18.0;
    }
}

/// Render and write the artifact, replacing any previous file at `path`.
pub fn write_artifact(spec: &PlotSpec, path: &Path) -> Result<(), ArtifactError> {
    let html = render_html(spec)?;
    std::fs::write(path, html).map_err(|source| ArtifactError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!("wrote {} ({} series)", path.display(), spec.series.len());
    Ok(())
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
        .replace('\n', "&#10;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanetrace_protocol::Series;

    fn spec() -> PlotSpec {
        PlotSpec {
            title: "Vehicle Trajectories for Run 1".into(),
            x_title: "X Coordinate".into(),
            y_title: "Y Coordinate".into(),
            x_range: AxisRange::new(0.0, 100.0),
            y_range: AxisRange::new(0.0, 10.0),
            series: vec![
                Series::lines(
                    "Lane 1",
                    Color::rgb(0xd3, 0xd3, 0xd3),
                    1.5,
                    vec![Point::new(0.0, 2.0), Point::new(100.0, 2.0)],
                ),
                Series::label("Lane 1", Point::new(100.0, 2.0), "Lane 1"),
                Series::markers(
                    "Vehicle 10",
                    Color::rgb(0x1f, 0x77, 0xb4),
                    5.0,
                    vec![Point::new(50.0, 5.0)],
                    vec!["ID:10\nTime: 0s\nLane: <none>".into()],
                ),
            ],
        }
    }

    #[test]
    fn renders_series_and_hover() {
        let html = render_html(&spec()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<polyline"));
        assert!(html.contains("#d3d3d3"));
        assert!(html.contains(r##"<g fill="#1f77b4">"##));
        assert!(html.contains("ID:10&#10;Time: 0s&#10;Lane: &lt;none&gt;"));
        assert!(html.contains(">Lane 1</text>"));
        assert!(html.contains("Vehicle 10"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn embeds_plot_data_safely() {
        let mut spec = spec();
        spec.title = "</script><b>".into();
        let html = render_html(&spec).unwrap();
        assert!(html.contains(r#"id="plot-data""#));
        assert_eq!(html.matches("</script>").count(), 1);
    }

    #[test]
    fn maps_corners_of_the_frame() {
        let frame = Frame {
            x: AxisRange::new(0.0, 100.0),
            y: AxisRange::new(0.0, 10.0),
        };
        let (x0, y0) = frame.map(Point::new(0.0, 0.0));
        assert_eq!(x0, MARGIN_LEFT);
        assert_eq!(y0, HEIGHT - MARGIN_BOTTOM);
        let (x1, y1) = frame.map(Point::new(100.0, 10.0));
        assert!((x1 - (WIDTH - MARGIN_RIGHT)).abs() < 1e-9);
        assert!((y1 - MARGIN_TOP).abs() < 1e-9);
    }

    #[test]
    fn writes_and_overwrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.html");
        std::fs::write(&path, "old").unwrap();
        write_artifact(&spec(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Vehicle Trajectories for Run 1"));
    }

    #[test]
    fn write_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("plot.html");
        assert!(matches!(
            write_artifact(&spec(), &path),
            Err(ArtifactError::Io { .. })
        ));
    }
}
