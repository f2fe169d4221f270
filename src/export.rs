//! Output collaborator: one CSV artifact per group block.
//!
//! Each run gets its own timestamped directory under the output base; a
//! pre-existing directory for the same second is fatal rather than merged,
//! keeping runs strictly separate. Files are written with a UTF-8 BOM so
//! spreadsheet applications detect the encoding instead of guessing.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::config::Config;
use crate::error::RollcallError;
use crate::partition::GroupBlock;
use crate::types::{Mark, Session};
use crate::util::{atomic_write_str, sanitize_filename};

/// Directory for one run, named by its start time.
pub fn run_dir(output_base: &Path, started_at: NaiveDateTime) -> PathBuf {
    output_base.join(started_at.format("%Y-%m-%d_%H.%M.%S").to_string())
}

/// Create the run directory and write every group block into it.
pub fn export_blocks(
    output_base: &Path,
    started_at: NaiveDateTime,
    blocks: &[GroupBlock],
    sessions: &[Session],
    config: &Config,
) -> Result<PathBuf, RollcallError> {
    std::fs::create_dir_all(output_base)?;

    let dir = run_dir(output_base, started_at);
    if dir.exists() {
        return Err(RollcallError::OutputExists { dir });
    }
    std::fs::create_dir(&dir)?;

    for block in blocks {
        let filename = format!("{}.csv", sanitize_filename(&block.group));
        let path = dir.join(&filename);
        log::info!("exporting {} ({} rows)", filename, block.rows.len());
        atomic_write_str(&path, &block_to_csv(block, sessions, config))?;
    }

    Ok(dir)
}

/// Render one block as CSV: `group,name` plus one column per session in
/// chronological order, cells as the configured presence markers.
pub fn block_to_csv(block: &GroupBlock, sessions: &[Session], config: &Config) -> String {
    let mut out = String::from("\u{feff}");

    let mut header: Vec<String> = vec!["group".to_string(), "name".to_string()];
    header.extend(sessions.iter().map(|s| s.id.clone()));
    out.push_str(&join_csv_row(&header));

    for row in &block.rows {
        let mut cells: Vec<String> = vec![
            row.participant.group.clone(),
            row.participant.name.clone(),
        ];
        cells.extend(row.marks.iter().map(|mark| match mark {
            Mark::Present => config.present_marker.clone(),
            Mark::Absent => config.absent_marker.clone(),
        }));
        out.push_str(&join_csv_row(&cells));
    }

    out
}

fn join_csv_row(cells: &[String]) -> String {
    let mut line = cells
        .iter()
        .map(|cell| csv_escape(cell))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

fn csv_escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
