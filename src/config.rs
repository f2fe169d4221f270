//! Run configuration.
//!
//! Loaded from an optional `rollcall.json` next to the input directories;
//! a missing file means built-in defaults, a malformed one is fatal. Input
//! headers are *declared* here, not sniffed from the files — attendance
//! exports routinely carry banner rows and renamed columns, so the declared
//! list is mapped onto cells by position and the file's own header ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RollcallError;

/// Declared layout of an attendance-log file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogColumns {
    /// Ordered header list matching the file's columns.
    pub columns: Vec<String>,
    /// Which of `columns` holds the session identifier.
    pub session: String,
    /// Which of `columns` holds the raw identity token.
    pub identity: String,
    /// Which of `columns` holds the group.
    pub group: String,
    /// Which of `columns` holds the attendance timestamp.
    pub time: String,
}

impl Default for LogColumns {
    fn default() -> Self {
        LogColumns {
            columns: ["session", "group", "identity", "time"]
                .map(String::from)
                .to_vec(),
            session: "session".to_string(),
            identity: "identity".to_string(),
            group: "group".to_string(),
            time: "time".to_string(),
        }
    }
}

/// Declared layout of a roster file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RosterColumns {
    pub columns: Vec<String>,
    pub group: String,
    pub name: String,
    pub id: String,
}

impl Default for RosterColumns {
    fn default() -> Self {
        RosterColumns {
            columns: ["group", "name", "id"].map(String::from).to_vec(),
            group: "group".to_string(),
            name: "name".to_string(),
            id: "id".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Directory of attendance-log files, relative to the working directory.
    pub log_dir: String,
    /// Directory of roster files.
    pub roster_dir: String,
    /// Base directory for per-run output folders.
    pub output_dir: String,
    /// Text encoding of CSV log files (label as understood by encoding_rs,
    /// e.g. "utf-8", "gbk"). Spreadsheet formats carry their own encoding.
    pub log_encoding: String,
    /// Text encoding of CSV roster files.
    pub roster_encoding: String,
    /// Leading rows to skip in every input file (banner + header).
    pub skip_rows: usize,
    /// Trailing rows to skip (summary footer).
    pub skip_footer: usize,
    pub log_columns: LogColumns,
    pub roster_columns: RosterColumns,
    /// Cell value for an attended session.
    pub present_marker: String,
    /// Cell value for a missed session.
    pub absent_marker: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_dir: "logs".to_string(),
            roster_dir: "roster".to_string(),
            output_dir: "output".to_string(),
            log_encoding: "utf-8".to_string(),
            roster_encoding: "utf-8".to_string(),
            skip_rows: 1,
            skip_footer: 1,
            log_columns: LogColumns::default(),
            roster_columns: RosterColumns::default(),
            present_marker: "√".to_string(),
            absent_marker: "×".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Config, RollcallError> {
        if !path.exists() {
            log::debug!("{} not found, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            RollcallError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), RollcallError> {
        let log = &self.log_columns;
        for key in [&log.session, &log.identity, &log.group, &log.time] {
            if !log.columns.contains(key) {
                return Err(RollcallError::Config(format!(
                    "logColumns.columns does not contain {key:?}"
                )));
            }
        }
        let roster = &self.roster_columns;
        for key in [&roster.group, &roster.name, &roster.id] {
            if !roster.columns.contains(key) {
                return Err(RollcallError::Config(format!(
                    "rosterColumns.columns does not contain {key:?}"
                )));
            }
        }
        Ok(())
    }
}
