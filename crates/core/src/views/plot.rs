use lanetrace_protocol::{AxisRange, Color, Palette, PlotSpec, Point, Series};
use log::debug;

use crate::error::PipelineError;
use crate::model::{CenterlineCatalog, TrajectoryRecord, TrajectoryStore};

/// Light gray used for every lane reference line.
pub const LANE_COLOR: Color = Color::rgb(0xd3, 0xd3, 0xd3);
pub const LANE_WIDTH: f64 = 1.5;
pub const MARKER_SIZE: f64 = 5.0;

/// Assemble the plot of `vehicles` (in selection order) over the run's lane map.
///
/// Every lane of the run's centerline table is drawn, whether or not a
/// selected vehicle used it, each with a `Lane <n>` label at its last vertex.
/// Vehicle `i` in the selection gets `palette.color_at(i)`. Axis ranges start
/// at zero and extend to the largest coordinate of the whole run, so
/// different selections of the same run share one frame.
pub fn build_plot(
    store: &TrajectoryStore,
    centerlines: &CenterlineCatalog,
    run_id: i64,
    vehicles: &[i64],
    palette: &Palette,
) -> Result<PlotSpec, PipelineError> {
    if vehicles.is_empty() {
        return Err(PipelineError::EmptySelection);
    }
    let run = store.run(run_id);
    if run.is_empty() {
        return Err(PipelineError::EmptyRun { run_id });
    }
    let geometry = centerlines
        .get(run_id)
        .ok_or(PipelineError::MissingGeometry { run_id })?;

    let max_x = run.iter().map(|r| r.x).fold(f64::NEG_INFINITY, f64::max);
    let max_y = run.iter().map(|r| r.y).fold(f64::NEG_INFINITY, f64::max);

    let mut series = Vec::with_capacity(geometry.lanes.len() * 2 + vehicles.len());
    for lane in &geometry.lanes {
        let Some(end) = lane.end() else {
            continue;
        };
        let name = format!("Lane {}", lane.lane);
        series.push(Series::lines(
            name.clone(),
            LANE_COLOR,
            LANE_WIDTH,
            lane.points.clone(),
        ));
        series.push(Series::label(name.clone(), end, name));
    }

    for (i, &vehicle_id) in vehicles.iter().enumerate() {
        let trajectory = store.vehicle(run_id, vehicle_id);
        if trajectory.is_empty() {
            continue;
        }
        series.push(Series::markers(
            format!("Vehicle {vehicle_id}"),
            palette.color_at(i),
            MARKER_SIZE,
            trajectory.iter().map(|r| Point::new(r.x, r.y)).collect(),
            trajectory.iter().map(hover_text).collect(),
        ));
    }

    debug!(
        "run {run_id}: plot with {} lanes and {} vehicles",
        geometry.lanes.len(),
        vehicles.len()
    );

    Ok(PlotSpec {
        title: format!("Vehicle Trajectories for Run {run_id}"),
        x_title: "X Coordinate".into(),
        y_title: "Y Coordinate".into(),
        x_range: AxisRange::new(0.0, max_x),
        y_range: AxisRange::new(0.0, max_y),
        series,
    })
}

/// Hover text of one trajectory point, one field per line.
pub fn hover_text(record: &TrajectoryRecord) -> String {
    let lane = record.lane.map(|l| l.to_string()).unwrap_or_default();
    format!(
        "ID:{}\nTime: {}s\nLane: {lane}\nSpeed: {:.2} m/s\nAcceleration: {:.2} m/s²",
        record.vehicle_id, record.time, record.speed, record.acceleration
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CenterlineTable, LaneCenterline};
    use lanetrace_protocol::SeriesKind;

    fn rec(vehicle_id: i64, time: i64, x: f64, y: f64, lane: Option<i64>) -> TrajectoryRecord {
        TrajectoryRecord {
            run_id: 1,
            vehicle_id,
            time,
            x,
            y,
            lane,
            speed: 12.3456,
            acceleration: -0.5,
        }
    }

    fn store() -> TrajectoryStore {
        TrajectoryStore::new(vec![
            rec(10, 0, 1.0, 2.0, Some(1)),
            rec(10, 30, 40.0, 2.5, Some(1)),
            rec(10, 70, 90.0, 6.0, Some(2)),
            rec(11, 0, 5.0, 9.0, Some(3)),
            rec(11, 50, 120.0, 9.5, None),
        ])
    }

    fn catalog() -> CenterlineCatalog {
        let mut catalog = CenterlineCatalog::new();
        catalog.insert(
            1,
            CenterlineTable {
                lanes: vec![
                    LaneCenterline {
                        lane: "1".into(),
                        points: vec![Point::new(0.0, 2.0), Point::new(150.0, 2.0)],
                    },
                    LaneCenterline {
                        lane: "2".into(),
                        points: vec![Point::new(0.0, 6.0), Point::new(150.0, 6.5)],
                    },
                    LaneCenterline {
                        lane: "9".into(),
                        points: Vec::new(),
                    },
                ],
            },
        );
        catalog
    }

    #[test]
    fn builds_lanes_labels_and_vehicles() {
        let spec = build_plot(&store(), &catalog(), 1, &[11, 10], &Palette::tableau()).unwrap();
        assert_eq!(spec.title, "Vehicle Trajectories for Run 1");

        // Two drawable lanes (line + label each), then two vehicles.
        assert_eq!(spec.series.len(), 6);
        assert!(matches!(spec.series[0].kind, SeriesKind::Lines { .. }));
        assert_eq!(spec.series[1].kind, SeriesKind::Text);
        assert_eq!(spec.series[1].points, vec![Point::new(150.0, 2.0)]);
        assert_eq!(spec.series[1].text_at(0), Some("Lane 1"));
        assert!(!spec.series[1].show_legend);

        let names: Vec<&str> = spec.marker_series().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Vehicle 11", "Vehicle 10"]);
        let vehicle_10 = &spec.series[5];
        assert_eq!(vehicle_10.points.len(), 3);
        assert_eq!(vehicle_10.points[2], Point::new(90.0, 6.0));
    }

    #[test]
    fn colors_follow_selection_order() {
        let palette = Palette::tableau();
        let spec = build_plot(&store(), &catalog(), 1, &[11, 10], &palette).unwrap();
        let colors: Vec<_> = spec.marker_series().map(|s| s.color).collect();
        assert_eq!(colors, vec![Some(palette.color_at(0)), Some(palette.color_at(1))]);

        let again = build_plot(&store(), &catalog(), 1, &[11, 10], &palette).unwrap();
        assert_eq!(spec, again);
    }

    #[test]
    fn axis_bounds_cover_whole_run() {
        let spec = build_plot(&store(), &catalog(), 1, &[10], &Palette::tableau()).unwrap();
        assert_eq!(spec.x_range, AxisRange::new(0.0, 120.0));
        assert_eq!(spec.y_range, AxisRange::new(0.0, 9.5));
    }

    #[test]
    fn hover_text_fields() {
        let text = hover_text(&rec(11, 50, 0.0, 0.0, Some(3)));
        assert_eq!(
            text,
            "ID:11\nTime: 50s\nLane: 3\nSpeed: 12.35 m/s\nAcceleration: -0.50 m/s²"
        );
        let blank = hover_text(&rec(11, 50, 0.0, 0.0, None));
        assert!(blank.contains("\nLane: \n"));
    }

    #[test]
    fn errors() {
        let palette = Palette::tableau();
        assert_eq!(
            build_plot(&store(), &catalog(), 1, &[], &palette),
            Err(PipelineError::EmptySelection)
        );
        assert_eq!(
            build_plot(&store(), &CenterlineCatalog::new(), 1, &[10], &palette),
            Err(PipelineError::MissingGeometry { run_id: 1 })
        );
        assert_eq!(
            build_plot(&store(), &catalog(), 2, &[10], &palette),
            Err(PipelineError::EmptyRun { run_id: 2 })
        );
    }

    #[test]
    fn unknown_vehicle_keeps_its_color_slot() {
        let palette = Palette::tableau();
        let spec = build_plot(&store(), &catalog(), 1, &[99, 10], &palette).unwrap();
        let vehicles: Vec<_> = spec.marker_series().collect();
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].color, Some(palette.color_at(1)));
    }
}
