use thiserror::Error;

use super::{data_lines, is_missing, split_row};
use crate::model::TrajectoryRecord;

#[derive(Debug, Error)]
pub enum TrajectoryParseError {
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("missing column {0:?}")]
    MissingColumn(&'static str),
    #[error("line {line}: invalid {column} value {value:?}")]
    InvalidValue {
        line: usize,
        column: &'static str,
        value: String,
    },
    #[error("no trajectory records found")]
    Empty,
}

const RUN: &str = "run_index";
const ID: &str = "id";
const TIME: &str = "time";
const X: &str = "xloc_kf";
const Y: &str = "yloc_kf";
const LANE: &str = "lane_kf";
const SPEED: &str = "speed_kf";
const ACCEL: &str = "acceleration_kf";

/// Column positions resolved from the header row.
struct Columns {
    run: usize,
    id: usize,
    time: usize,
    x: usize,
    y: usize,
    lane: usize,
    speed: usize,
    accel: usize,
}

impl Columns {
    fn from_header(header: &[&str]) -> Result<Self, TrajectoryParseError> {
        let find = |name: &'static str| {
            header
                .iter()
                .position(|h| *h == name)
                .ok_or(TrajectoryParseError::MissingColumn(name))
        };
        Ok(Self {
            run: find(RUN)?,
            id: find(ID)?,
            time: find(TIME)?,
            x: find(X)?,
            y: find(Y)?,
            lane: find(LANE)?,
            speed: find(SPEED)?,
            accel: find(ACCEL)?,
        })
    }
}

/// Parse the trajectory table (one row per vehicle per timestamp).
///
/// Columns are located by header name, so order and extra columns do not
/// matter. Integer columns also accept integral floats such as `12.0`, which
/// is how exported tables often write them. An empty or `NaN` lane is a
/// missing lane, not an error.
pub fn parse_trajectories(data: &[u8]) -> Result<Vec<TrajectoryRecord>, TrajectoryParseError> {
    let text = std::str::from_utf8(data)?;
    let Some(header) = text.lines().next() else {
        return Err(TrajectoryParseError::Empty);
    };
    let cols = Columns::from_header(&split_row(header.trim_start_matches('\u{feff}')))?;

    let mut records = Vec::new();
    for (line, row) in data_lines(text) {
        let cells = split_row(row);
        let cell = |idx: usize| cells.get(idx).copied().unwrap_or("");
        let lane_cell = cell(cols.lane);

        records.push(TrajectoryRecord {
            run_id: parse_int(cell(cols.run), line, RUN)?,
            vehicle_id: parse_int(cell(cols.id), line, ID)?,
            time: parse_int(cell(cols.time), line, TIME)?,
            x: parse_float(cell(cols.x), line, X)?,
            y: parse_float(cell(cols.y), line, Y)?,
            lane: if is_missing(lane_cell) {
                None
            } else {
                Some(parse_int(lane_cell, line, LANE)?)
            },
            speed: parse_float(cell(cols.speed), line, SPEED)?,
            acceleration: parse_float(cell(cols.accel), line, ACCEL)?,
        });
    }

    if records.is_empty() {
        return Err(TrajectoryParseError::Empty);
    }
    Ok(records)
}

fn invalid(value: &str, line: usize, column: &'static str) -> TrajectoryParseError {
    TrajectoryParseError::InvalidValue {
        line,
        column,
        value: value.to_string(),
    }
}

fn parse_int(value: &str, line: usize, column: &'static str) -> Result<i64, TrajectoryParseError> {
    if let Ok(n) = value.parse::<i64>() {
        return Ok(n);
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
        _ => Err(invalid(value, line, column)),
    }
}

fn parse_float(value: &str, line: usize, column: &'static str) -> Result<f64, TrajectoryParseError> {
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(f),
        _ => Err(invalid(value, line, column)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "run_index,id,time,xloc_kf,yloc_kf,lane_kf,speed_kf,acceleration_kf";

    #[test]
    fn parses_rows_and_missing_lanes() {
        let input = format!("{HEADER}\n1,10,0,5.5,2.0,1,12.345,-0.5\n1,10,30,50.0,2.1,,13.0,0.25\n1.0,11,0.0,1,1,3.0,9,0\n");
        let records = parse_trajectories(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].lane, Some(1));
        assert_eq!(records[0].speed, 12.345);
        assert_eq!(records[1].lane, None);
        assert_eq!(records[2].run_id, 1);
        assert_eq!(records[2].lane, Some(3));
    }

    #[test]
    fn columns_found_by_name() {
        let input = "speed_kf,lane_kf,extra,acceleration_kf,yloc_kf,xloc_kf,time,id,run_index\n\
                     3.0,2,foo,0.1,7.0,8.0,42,99,4\n";
        let records = parse_trajectories(input.as_bytes()).unwrap();
        let r = &records[0];
        assert_eq!((r.run_id, r.vehicle_id, r.time), (4, 99, 42));
        assert_eq!((r.x, r.y), (8.0, 7.0));
        assert_eq!(r.lane, Some(2));
    }

    #[test]
    fn reports_missing_column() {
        let err = parse_trajectories(b"run_index,id,time\n1,2,3\n").unwrap_err();
        assert!(matches!(err, TrajectoryParseError::MissingColumn("xloc_kf")));
    }

    #[test]
    fn reports_bad_value_with_line() {
        let input = format!("{HEADER}\n1,10,0,5,2,1,1,1\n1,10,3.5,5,2,1,1,1\n");
        let err = parse_trajectories(input.as_bytes()).unwrap_err();
        match err {
            TrajectoryParseError::InvalidValue { line, column, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, "time");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_only_is_empty() {
        assert!(matches!(
            parse_trajectories(HEADER.as_bytes()),
            Err(TrajectoryParseError::Empty)
        ));
        assert!(matches!(
            parse_trajectories(b""),
            Err(TrajectoryParseError::Empty)
        ));
    }
}
