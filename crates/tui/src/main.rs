mod app;
mod renderer;

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use lanetrace_core::Explorer;
use lanetrace_core::config::{
    DEFAULT_CENTERLINE_DIR, DEFAULT_OUTPUT_FILE, DEFAULT_TRAJECTORY_FILE, Paths,
};
use lanetrace_core::model::TrajectoryStore;
use lanetrace_core::parsers::trajectory::parse_trajectories;
use log::info;

/// Explore vehicle trajectories from traffic-study recordings.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Trajectory table (CSV, one row per vehicle per timestamp)
    #[arg(long, default_value = DEFAULT_TRAJECTORY_FILE)]
    trajectories: PathBuf,

    /// Directory holding the per-run centerline geometry files
    #[arg(long, default_value = DEFAULT_CENTERLINE_DIR)]
    centerline_dir: PathBuf,

    /// Plot artifact, overwritten on every plot
    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Log file (the terminal is taken by the UI)
    #[arg(long, default_value = "lanetrace.log")]
    log_file: PathBuf,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let paths = Paths {
        trajectory_file: args.trajectories,
        centerline_dir: args.centerline_dir,
        output_file: args.output,
    };

    let data = std::fs::read(&paths.trajectory_file)
        .with_context(|| format!("reading {}", paths.trajectory_file.display()))?;
    let records = parse_trajectories(&data)
        .with_context(|| format!("parsing {}", paths.trajectory_file.display()))?;
    info!(
        "loaded {} records from {}",
        records.len(),
        paths.trajectory_file.display()
    );

    let explorer = Explorer::load(TrajectoryStore::new(records), &paths);
    let mut app = app::App::new(explorer);
    renderer::run_tui(&mut app)
}
