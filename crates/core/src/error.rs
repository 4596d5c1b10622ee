use thiserror::Error;

/// Recoverable failures of the trajectory pipeline.
///
/// None of these is fatal: the interactive layer turns each one into a
/// user-facing notice and keeps running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("no data for run {run_id}")]
    EmptyRun { run_id: i64 },
    #[error("invalid selection: {0}")]
    Selection(String),
    #[error("centerline file not found for run {run_id}")]
    MissingGeometry { run_id: i64 },
    #[error("no vehicles selected")]
    EmptySelection,
}

impl PipelineError {
    pub(crate) fn selection(message: impl Into<String>) -> Self {
        Self::Selection(message.into())
    }
}
