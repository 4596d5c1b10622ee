use std::fmt;
use std::str::FromStr;

use crate::error::PipelineError;

/// Width of one time-window bucket, in seconds.
pub const WINDOW_SECONDS: i64 = 60;

/// Either the whole run or one fixed-width bucket `[start, end]`.
///
/// Buckets are derived as half-open ranges but membership is tested on the
/// closed interval, so a record at a bucket boundary belongs to both
/// neighbouring buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeWindow {
    Entire,
    Bucket { start: i64, end: i64 },
}

impl TimeWindow {
    pub fn bucket(start: i64) -> Self {
        Self::Bucket {
            start,
            end: start + WINDOW_SECONDS,
        }
    }

    /// Closed-interval membership.
    pub fn contains(&self, time: i64) -> bool {
        match *self {
            Self::Entire => true,
            Self::Bucket { start, end } => start <= time && time <= end,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entire => f.write_str("all"),
            Self::Bucket { start, end } => write!(f, "{start}-{end}"),
        }
    }
}

impl FromStr for TimeWindow {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "all" {
            return Ok(Self::Entire);
        }
        // A leading '-' is a sign, not the separator.
        let Some(sep) = s.char_indices().skip(1).find(|&(_, c)| c == '-').map(|(i, _)| i) else {
            return Err(PipelineError::selection(format!("time window {s:?}")));
        };
        let (start, end) = (&s[..sep], &s[sep + 1..]);
        match (start.trim().parse(), end.trim().parse()) {
            (Ok(start), Ok(end)) => Ok(Self::Bucket { start, end }),
            _ => Err(PipelineError::selection(format!("time window {s:?}"))),
        }
    }
}

/// Initial/exit lane filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LaneFilter {
    #[default]
    Any,
    Lane(i64),
}

impl LaneFilter {
    /// A missing lane only passes `Any`.
    pub fn accepts(&self, lane: Option<i64>) -> bool {
        match self {
            Self::Any => true,
            Self::Lane(wanted) => lane == Some(*wanted),
        }
    }
}

impl fmt::Display for LaneFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Lane(lane) => write!(f, "{lane}"),
        }
    }
}

impl FromStr for LaneFilter {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "any" | "all" => Ok(Self::Any),
            other => other
                .parse()
                .map(Self::Lane)
                .map_err(|_| PipelineError::selection(format!("lane filter {other:?}"))),
        }
    }
}

/// The analyst's current choices. Owned by the interactive layer and handed
/// by reference to pipeline calls, which never modify it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    pub run_id: i64,
    pub window: TimeWindow,
    pub initial_lane: LaneFilter,
    pub exit_lane: LaneFilter,
    /// Vehicles chosen for plotting, in selection order.
    pub vehicles: Vec<i64>,
}

impl SelectionState {
    pub fn new(run_id: i64) -> Self {
        Self {
            run_id,
            window: TimeWindow::Entire,
            initial_lane: LaneFilter::Any,
            exit_lane: LaneFilter::Any,
            vehicles: Vec::new(),
        }
    }
}
