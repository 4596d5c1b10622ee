use lanetrace_protocol::Point;
use thiserror::Error;

use super::{data_lines, is_missing, split_row};
use crate::model::{CenterlineTable, LaneCenterline};

#[derive(Debug, Error)]
pub enum CenterlineParseError {
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("no x_<lane>/y_<lane> column pairs in header")]
    NoLanes,
    #[error("line {line}: invalid coordinate {value:?} in column {column}")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
    },
}

/// Parse a per-run lane geometry table.
///
/// The header holds `x_<lane>`, `y_<lane>` column pairs; each row is the
/// next vertex of every lane's polyline. Lanes have different vertex
/// counts, so shorter columns are padded with empty cells. A vertex is kept
/// only when both of its cells are present.
pub fn parse_centerline(data: &[u8]) -> Result<CenterlineTable, CenterlineParseError> {
    let text = std::str::from_utf8(data)?;
    let header = split_row(text.lines().next().unwrap_or("").trim_start_matches('\u{feff}'));

    // (lane, x column, y column) in header order; an x_ without its y_ is ignored.
    let pairs: Vec<(String, usize, usize)> = header
        .iter()
        .enumerate()
        .filter_map(|(xi, name)| {
            let lane = name.strip_prefix("x_")?;
            let yi = header.iter().position(|h| *h == format!("y_{lane}"))?;
            Some((lane.to_string(), xi, yi))
        })
        .collect();
    if pairs.is_empty() {
        return Err(CenterlineParseError::NoLanes);
    }

    let mut lanes: Vec<LaneCenterline> = pairs
        .iter()
        .map(|(lane, _, _)| LaneCenterline {
            lane: lane.clone(),
            points: Vec::new(),
        })
        .collect();

    for (line, row) in data_lines(text) {
        let cells = split_row(row);
        for ((_, xi, yi), lane) in pairs.iter().zip(lanes.iter_mut()) {
            let x = cells.get(*xi).copied().unwrap_or("");
            let y = cells.get(*yi).copied().unwrap_or("");
            if is_missing(x) || is_missing(y) {
                continue;
            }
            let x = coordinate(x, line, &header[*xi])?;
            let y = coordinate(y, line, &header[*yi])?;
            lane.points.push(Point::new(x, y));
        }
    }

    Ok(CenterlineTable { lanes })
}

fn coordinate(value: &str, line: usize, column: &str) -> Result<f64, CenterlineParseError> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CenterlineParseError::InvalidValue {
            line,
            column: column.to_string(),
            value: value.to_string(),
        }),
    }
}
