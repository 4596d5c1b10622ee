use std::path::{Path, PathBuf};

pub const DEFAULT_TRAJECTORY_FILE: &str = "TGSIM_Stationary.csv";
pub const DEFAULT_CENTERLINE_DIR: &str = "centerline";
pub const DEFAULT_OUTPUT_FILE: &str = "Stationary_Full_Plot.html";

/// File locations used by the explorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub trajectory_file: PathBuf,
    pub centerline_dir: PathBuf,
    /// Overwritten on every plot action.
    pub output_file: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            trajectory_file: PathBuf::from(DEFAULT_TRAJECTORY_FILE),
            centerline_dir: PathBuf::from(DEFAULT_CENTERLINE_DIR),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }
}

/// `<dir>/I-90-stationary-Run_<run>-geometry-with-ramps.csv`
pub fn centerline_path(dir: &Path, run_id: i64) -> PathBuf {
    dir.join(format!("I-90-stationary-Run_{run_id}-geometry-with-ramps.csv"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centerline_file_name() {
        let path = centerline_path(Path::new("centerline"), 3);
        assert_eq!(
            path,
            Path::new("centerline/I-90-stationary-Run_3-geometry-with-ramps.csv")
        );
    }
}
