//! rollcall CLI entry point.
//!
//! Scans `logs/` and `roster/` in the working directory (configurable via
//! `rollcall.json`), runs the reconciliation pipeline, and writes one CSV per
//! group into a timestamped folder under `output/`.

use std::path::Path;

use rollcall::config::Config;
use rollcall::error::RollcallError;
use rollcall::types::{LogTable, RosterTable};
use rollcall::{export, pipeline, reader};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), RollcallError> {
    let cwd = std::env::current_dir()?;
    let config = Config::load(&cwd.join("rollcall.json"))?;

    let log_dir = cwd.join(&config.log_dir);
    let roster_dir = cwd.join(&config.roster_dir);
    ensure_input_dir(&log_dir, "attendance log")?;
    ensure_input_dir(&roster_dir, "roster")?;

    let log_files = reader::list_acceptable_files(&log_dir)?;
    if log_files.is_empty() {
        return Err(RollcallError::MissingInput { dir: log_dir });
    }
    for path in &log_files {
        log::info!("found log file {}", path.display());
    }

    let roster_files = reader::list_acceptable_files(&roster_dir)?;
    if roster_files.is_empty() {
        log::warn!(
            "no roster files in {}, participants will come from the logs alone",
            roster_dir.display()
        );
    }

    let roster_tables: Vec<RosterTable> = roster_files
        .iter()
        .map(|path| {
            log::info!("loading {}", path.display());
            reader::read_roster_table(path, &config)
        })
        .collect::<Result<_, _>>()?;

    let log_tables: Vec<LogTable> = log_files
        .iter()
        .map(|path| {
            log::info!("loading {}", path.display());
            reader::read_log_table(path, &config)
        })
        .collect::<Result<_, _>>()?;

    let output = pipeline::run(&roster_tables, &log_tables)?;

    let started_at = chrono::Local::now().naive_local();
    let dir = export::export_blocks(
        &cwd.join(&config.output_dir),
        started_at,
        &output.blocks,
        &output.sessions,
        &config,
    )?;

    log::info!(
        "wrote {} group files to {}",
        output.blocks.len(),
        dir.display()
    );
    Ok(())
}

/// Create a missing input directory so the user has somewhere to drop files.
fn ensure_input_dir(dir: &Path, kind: &str) -> Result<(), RollcallError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        log::info!("created empty {} directory {}", kind, dir.display());
    }
    Ok(())
}
