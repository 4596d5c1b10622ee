use lanetrace_core::model::{LaneFilter, SelectionState, TimeWindow};
use lanetrace_core::views::VehicleEntry;
use lanetrace_core::{Explorer, PipelineError};
use lanetrace_protocol::{PlotSpec, Series};
use log::info;

/// User intents, decoupled from concrete key bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NextField,
    PrevField,
    Up,
    Down,
    Left,
    Right,
    Toggle,
    Activate,
    Plot,
    Back,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Run,
    Window,
    InitialLane,
    ExitLane,
    Vehicles,
    PlotButton,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::Run,
        Focus::Window,
        Focus::InitialLane,
        Focus::ExitLane,
        Focus::Vehicles,
        Focus::PlotButton,
    ];

    fn step(self, forward: bool) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let n = Self::ORDER.len();
        Self::ORDER[if forward { (i + 1) % n } else { (i + n - 1) % n }]
    }
}

/// A combobox: fixed values and the chosen index.
#[derive(Debug, Clone, Default)]
pub struct Picker {
    pub values: Vec<String>,
    pub index: usize,
}

impl Picker {
    fn set_values(&mut self, values: Vec<String>) {
        self.values = values;
        self.index = 0;
    }

    pub fn current(&self) -> Option<&str> {
        self.values.get(self.index).map(String::as_str)
    }

    /// Returns true when the choice changed.
    fn step(&mut self, forward: bool) -> bool {
        if self.values.is_empty() {
            return false;
        }
        let before = self.index;
        self.index = if forward {
            (self.index + 1).min(self.values.len() - 1)
        } else {
            self.index.saturating_sub(1)
        };
        before != self.index
    }
}

/// Interactive plot with a hover cursor on one vehicle's points.
#[derive(Debug, Clone)]
pub struct PlotView {
    pub spec: PlotSpec,
    pub vehicle: usize,
    pub point: usize,
}

impl PlotView {
    pub fn hovered_series(&self) -> Option<&Series> {
        self.spec.marker_series().nth(self.vehicle)
    }

    pub fn hover_text(&self) -> Option<&str> {
        self.hovered_series()?.text_at(self.point)
    }

    fn vehicle_count(&self) -> usize {
        self.spec.marker_series().count()
    }

    fn move_point(&mut self, forward: bool) {
        let len = self.hovered_series().map_or(0, |s| s.points.len());
        if len == 0 {
            return;
        }
        self.point = if forward {
            (self.point + 1).min(len - 1)
        } else {
            self.point.saturating_sub(1)
        };
    }

    fn next_vehicle(&mut self) {
        let n = self.vehicle_count();
        if n > 0 {
            self.vehicle = (self.vehicle + 1) % n;
            self.point = 0;
        }
    }
}

#[derive(Debug, Clone)]
pub enum Screen {
    Select,
    Plot(PlotView),
}

/// Widget state plus the only mutable copy of the analyst's selection.
pub struct App {
    explorer: Explorer,
    pub runs: Picker,
    pub windows: Picker,
    pub initial_lanes: Picker,
    pub exit_lanes: Picker,
    pub vehicles: Vec<VehicleEntry>,
    /// Parallel to `vehicles`.
    pub marked: Vec<bool>,
    pub vehicle_cursor: usize,
    pub focus: Focus,
    pub screen: Screen,
    pub notice: Option<String>,
    pub selection: Option<SelectionState>,
    pub should_quit: bool,
}

impl App {
    pub fn new(explorer: Explorer) -> Self {
        let runs = Picker {
            values: explorer
                .run_options()
                .iter()
                .map(ToString::to_string)
                .collect(),
            index: 0,
        };
        let mut app = Self {
            explorer,
            runs,
            windows: Picker::default(),
            initial_lanes: Picker::default(),
            exit_lanes: Picker::default(),
            vehicles: Vec::new(),
            marked: Vec::new(),
            vehicle_cursor: 0,
            focus: Focus::Run,
            screen: Screen::Select,
            notice: None,
            selection: None,
            should_quit: false,
        };
        if app.runs.values.is_empty() {
            app.notice = Some("no runs in trajectory table".into());
        } else {
            app.on_run_changed();
        }
        app
    }

    pub fn handle(&mut self, action: Action) {
        if action == Action::Quit {
            self.should_quit = true;
            return;
        }
        if let Screen::Plot(view) = &mut self.screen {
            match action {
                Action::Left => view.move_point(false),
                Action::Right => view.move_point(true),
                Action::NextField | Action::Down => view.next_vehicle(),
                _ => {}
            }
            if action == Action::Back {
                self.screen = Screen::Select;
            }
            return;
        }

        match action {
            Action::NextField => self.focus = self.focus.step(true),
            Action::PrevField => self.focus = self.focus.step(false),
            Action::Up | Action::Down => self.step_focused(action == Action::Down),
            Action::Toggle => self.toggle_vehicle(),
            Action::Activate if self.focus == Focus::Vehicles => self.toggle_vehicle(),
            Action::Activate | Action::Plot => self.plot(),
            Action::Back => self.notice = None,
            _ => {}
        }
    }

    fn step_focused(&mut self, forward: bool) {
        match self.focus {
            Focus::Run => {
                if self.runs.step(forward) {
                    self.on_run_changed();
                }
            }
            Focus::Window => {
                if self.windows.step(forward) {
                    self.on_filter_changed();
                }
            }
            Focus::InitialLane => {
                if self.initial_lanes.step(forward) {
                    self.on_filter_changed();
                }
            }
            Focus::ExitLane => {
                if self.exit_lanes.step(forward) {
                    self.on_filter_changed();
                }
            }
            Focus::Vehicles => {
                if forward {
                    if self.vehicle_cursor + 1 < self.vehicles.len() {
                        self.vehicle_cursor += 1;
                    }
                } else {
                    self.vehicle_cursor = self.vehicle_cursor.saturating_sub(1);
                }
            }
            Focus::PlotButton => {}
        }
    }

    /// New run: rebuild the window and lane pickers, reset filters.
    fn on_run_changed(&mut self) {
        self.notice = None;
        let run_id = match self.runs.current().map(str::parse::<i64>) {
            Some(Ok(run_id)) => run_id,
            _ => {
                self.fail_refresh(PipelineError::Selection("invalid run index".into()));
                return;
            }
        };
        match self.explorer.run_options_for(run_id) {
            Ok(options) => {
                self.windows.set_values(options.time_windows);
                self.initial_lanes.set_values(options.lane_options.clone());
                self.exit_lanes.set_values(options.lane_options);
                self.selection = Some(SelectionState::new(run_id));
                self.refresh_vehicles();
            }
            Err(e) => self.fail_refresh(e),
        }
    }

    /// Window or lane filter changed: parse the picker labels into the selection.
    fn on_filter_changed(&mut self) {
        self.notice = None;
        match self.parse_filters() {
            Ok((window, initial_lane, exit_lane)) => {
                if let Some(selection) = self.selection.as_mut() {
                    selection.window = window;
                    selection.initial_lane = initial_lane;
                    selection.exit_lane = exit_lane;
                }
                self.refresh_vehicles();
            }
            Err(e) => self.fail_refresh(e),
        }
    }

    fn parse_filters(&self) -> Result<(TimeWindow, LaneFilter, LaneFilter), PipelineError> {
        Ok((
            self.windows.current().unwrap_or("all").parse()?,
            self.initial_lanes.current().unwrap_or("any").parse()?,
            self.exit_lanes.current().unwrap_or("any").parse()?,
        ))
    }

    fn refresh_vehicles(&mut self) {
        let Some(selection) = self.selection.as_mut() else {
            return;
        };
        selection.vehicles.clear();
        match self.explorer.vehicle_options(selection) {
            Ok(vehicles) => {
                self.marked = vec![false; vehicles.len()];
                self.vehicles = vehicles;
                self.vehicle_cursor = 0;
            }
            Err(e) => self.fail_refresh(e),
        }
    }

    fn toggle_vehicle(&mut self) {
        if self.focus != Focus::Vehicles {
            return;
        }
        if let Some(mark) = self.marked.get_mut(self.vehicle_cursor) {
            *mark = !*mark;
        }
    }

    /// Vehicles marked for plotting, in list order.
    pub fn chosen(&self) -> Vec<i64> {
        self.vehicles
            .iter()
            .zip(&self.marked)
            .filter(|(_, marked)| **marked)
            .map(|(entry, _)| entry.vehicle_id)
            .collect()
    }

    fn plot(&mut self) {
        let chosen = self.chosen();
        let Some(selection) = self.selection.as_mut() else {
            self.notice = Some("select a run first".into());
            return;
        };
        selection.vehicles = chosen;
        match self.explorer.plot(selection) {
            Ok(outcome) => {
                self.notice = Some(match &outcome.artifact {
                    Ok(path) => format!("saved {}", path.display()),
                    Err(e) => format!("plot not saved: {e}"),
                });
                info!(
                    "plotted run {} with {} vehicles",
                    selection.run_id,
                    selection.vehicles.len()
                );
                self.screen = Screen::Plot(PlotView {
                    spec: outcome.spec,
                    vehicle: 0,
                    point: 0,
                });
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, error: PipelineError) {
        self.notice = Some(format!("Error: {error}"));
    }

    /// A run or filter change failed, so the listed vehicles no longer match it.
    fn fail_refresh(&mut self, error: PipelineError) {
        self.fail(error);
        self.vehicles.clear();
        self.marked.clear();
        self.vehicle_cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanetrace_core::model::{
        CenterlineCatalog, CenterlineTable, LaneCenterline, TrajectoryRecord, TrajectoryStore,
    };
    use lanetrace_protocol::Point;

    fn rec(run_id: i64, vehicle_id: i64, time: i64, lane: Option<i64>) -> TrajectoryRecord {
        TrajectoryRecord {
            run_id,
            vehicle_id,
            time,
            x: time as f64,
            y: 2.0,
            lane,
            speed: 10.0,
            acceleration: 0.0,
        }
    }

    fn app() -> (App, tempfile::TempDir) {
        let store = TrajectoryStore::new(vec![
            rec(1, 10, 0, Some(1)),
            rec(1, 10, 30, Some(1)),
            rec(1, 10, 70, Some(2)),
            rec(1, 11, 0, Some(3)),
            rec(1, 11, 50, Some(3)),
            rec(2, 20, 0, Some(1)),
        ]);
        let mut centerlines = CenterlineCatalog::new();
        centerlines.insert(
            1,
            CenterlineTable {
                lanes: vec![LaneCenterline {
                    lane: "1".into(),
                    points: vec![Point::new(0.0, 2.0), Point::new(80.0, 2.0)],
                }],
            },
        );
        let dir = tempfile::tempdir().unwrap();
        let explorer = Explorer::new(store, centerlines, dir.path().join("plot.html"));
        (App::new(explorer), dir)
    }

    #[test]
    fn starts_on_first_run() {
        let (app, _dir) = app();
        assert_eq!(app.runs.values, ["1", "2"]);
        assert_eq!(app.windows.values, ["all", "0-60", "60-120"]);
        assert_eq!(app.initial_lanes.values, ["any", "1", "2", "3"]);
        assert_eq!(app.vehicles.len(), 2);
    }

    #[test]
    fn exit_lane_filter_narrows_list() {
        let (mut app, _dir) = app();
        app.handle(Action::NextField); // window
        app.handle(Action::Down); // 0-60
        app.handle(Action::NextField);
        app.handle(Action::NextField); // exit lane
        app.handle(Action::Down); // 1
        app.handle(Action::Down); // 2
        assert_eq!(app.exit_lanes.current(), Some("2"));
        let labels: Vec<String> = app.vehicles.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["10 (1 lane changes)"]);
    }

    #[test]
    fn plot_without_selection_is_a_notice() {
        let (mut app, _dir) = app();
        app.handle(Action::Plot);
        assert!(matches!(app.screen, Screen::Select));
        assert_eq!(app.notice.as_deref(), Some("Error: no vehicles selected"));
    }

    #[test]
    fn failed_plot_keeps_list_and_marks() {
        let (mut app, _dir) = app();
        app.handle(Action::Plot);
        assert_eq!(app.notice.as_deref(), Some("Error: no vehicles selected"));
        assert_eq!(app.vehicles.len(), 2);
        assert_eq!(app.marked, vec![false, false]);

        // Run 2 has no centerline: the marked vehicle stays marked.
        app.handle(Action::Down);
        app.focus = Focus::Vehicles;
        app.handle(Action::Toggle);
        app.handle(Action::Plot);
        assert!(app.notice.as_deref().unwrap().contains("centerline"));
        assert_eq!(app.chosen(), vec![20]);
        assert_eq!(app.marked, vec![true]);
    }

    #[test]
    fn plot_and_hover() {
        let (mut app, _dir) = app();
        app.focus = Focus::Vehicles;
        app.handle(Action::Toggle);
        app.handle(Action::Down);
        app.handle(Action::Toggle);
        assert_eq!(app.chosen(), vec![10, 11]);

        app.handle(Action::Plot);
        let Screen::Plot(view) = &app.screen else {
            panic!("expected plot screen");
        };
        assert!(view.hover_text().unwrap().starts_with("ID:10\nTime: 0s"));
        assert!(app.notice.as_deref().unwrap().starts_with("saved "));

        app.handle(Action::Right);
        app.handle(Action::Right);
        app.handle(Action::Right);
        let Screen::Plot(view) = &app.screen else {
            panic!("expected plot screen");
        };
        assert_eq!(view.point, 2);

        app.handle(Action::NextField);
        let Screen::Plot(view) = &app.screen else {
            panic!("expected plot screen");
        };
        assert!(view.hover_text().unwrap().starts_with("ID:11"));

        app.handle(Action::Back);
        assert!(matches!(app.screen, Screen::Select));
    }

    #[test]
    fn run_without_geometry_reports_missing_geometry() {
        let (mut app, _dir) = app();
        app.handle(Action::Down); // run 2
        app.focus = Focus::Vehicles;
        app.handle(Action::Toggle);
        app.handle(Action::Plot);
        assert_eq!(
            app.notice.as_deref(),
            Some("Error: centerline file not found for run 2")
        );
    }

    #[test]
    fn quit() {
        let (mut app, _dir) = app();
        app.handle(Action::Quit);
        assert!(app.should_quit);
    }
}
