//! Input collaborator: turns log and roster files into in-memory tables.
//!
//! Accepts `.csv`, `.xlsx`, `.xls` and `.ods` (extension match is
//! case-insensitive). CSV files are decoded with a configurable encoding —
//! attendance exports from legacy systems commonly arrive as GBK/GB2312 —
//! while spreadsheet formats carry their own. The declared column layout from
//! the config is mapped onto cells by position; the file's own header row is
//! skipped along with any banner/footer rows.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime};

use crate::config::{Config, LogColumns, RosterColumns};
use crate::error::RollcallError;
use crate::types::{LogTable, RawLogRow, RawRosterRow, RosterTable};

const ACCEPTABLE_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls", "ods"];

/// Whether a file has an extension this reader understands.
pub fn is_acceptable(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    ACCEPTABLE_EXTENSIONS.contains(&ext.as_str())
}

/// List acceptable files in a directory, sorted by file name so runs are
/// deterministic regardless of directory iteration order.
pub fn list_acceptable_files(dir: &Path) -> Result<Vec<PathBuf>, RollcallError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_acceptable(path))
        .collect();
    files.sort();
    Ok(files)
}

/// Read an attendance-log file into a [`LogTable`].
pub fn read_log_table(path: &Path, config: &Config) -> Result<LogTable, RollcallError> {
    let rows = read_rows(path, &config.log_encoding, config.skip_rows, config.skip_footer)?;
    let columns = LogColumnIndex::new(&config.log_columns);
    let source = display_name(path);

    let rows = rows
        .iter()
        .map(|cells| RawLogRow {
            session_id: columns.get(cells, columns.session),
            identity: columns.get(cells, columns.identity),
            group: columns.get(cells, columns.group),
            timestamp: parse_timestamp(&columns.get(cells, columns.time)),
        })
        .collect();

    Ok(LogTable { source, rows })
}

/// Read a roster file into a [`RosterTable`].
pub fn read_roster_table(path: &Path, config: &Config) -> Result<RosterTable, RollcallError> {
    let rows = read_rows(
        path,
        &config.roster_encoding,
        config.skip_rows,
        config.skip_footer,
    )?;
    let columns = RosterColumnIndex::new(&config.roster_columns);
    let source = display_name(path);

    let rows = rows
        .iter()
        .map(|cells| RawRosterRow {
            group: columns.get(cells, columns.group),
            name: columns.get(cells, columns.name),
            id: columns.get(cells, columns.id),
        })
        .collect();

    Ok(RosterTable { source, rows })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unnamed>")
        .to_string()
}

/// Positions of the key log columns within the declared layout.
struct LogColumnIndex {
    session: usize,
    identity: usize,
    group: usize,
    time: usize,
}

impl LogColumnIndex {
    fn new(layout: &LogColumns) -> Self {
        let index: HashMap<&str, usize> = layout
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();
        // Key presence is checked by Config::validate before any reading.
        LogColumnIndex {
            session: index[layout.session.as_str()],
            identity: index[layout.identity.as_str()],
            group: index[layout.group.as_str()],
            time: index[layout.time.as_str()],
        }
    }

    /// Cell at a declared position; rows shorter than the layout read as empty.
    fn get(&self, cells: &[String], position: usize) -> String {
        cells.get(position).map(|s| s.trim().to_string()).unwrap_or_default()
    }
}

struct RosterColumnIndex {
    group: usize,
    name: usize,
    id: usize,
}

impl RosterColumnIndex {
    fn new(layout: &RosterColumns) -> Self {
        let index: HashMap<&str, usize> = layout
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();
        RosterColumnIndex {
            group: index[layout.group.as_str()],
            name: index[layout.name.as_str()],
            id: index[layout.id.as_str()],
        }
    }

    fn get(&self, cells: &[String], position: usize) -> String {
        cells.get(position).map(|s| s.trim().to_string()).unwrap_or_default()
    }
}

/// Read a file as rows of string cells, applying skip windows.
fn read_rows(
    path: &Path,
    encoding: &str,
    skip_rows: usize,
    skip_footer: usize,
) -> Result<Vec<Vec<String>>, RollcallError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut rows = match ext.as_str() {
        "csv" => read_csv_rows(path, encoding)?,
        _ => read_sheet_rows(path)?,
    };

    let keep = rows.len().saturating_sub(skip_footer);
    rows.truncate(keep);
    if skip_rows > 0 {
        rows.drain(..skip_rows.min(rows.len()));
    }
    Ok(rows)
}

fn read_csv_rows(path: &Path, encoding: &str) -> Result<Vec<Vec<String>>, RollcallError> {
    let label = encoding_rs::Encoding::for_label(encoding.as_bytes()).ok_or_else(|| {
        RollcallError::Config(format!("unknown text encoding {encoding:?}"))
    })?;

    let bytes = std::fs::read(path)?;
    let (text, _, had_errors) = label.decode(&bytes);
    if had_errors {
        log::warn!(
            "{}: some bytes did not decode as {}, cells may be garbled",
            path.display(),
            label.name()
        );
    }

    Ok(text
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(split_csv_line)
        .collect())
}

/// Split one CSV line, honoring double-quoted fields and `""` escapes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

fn read_sheet_rows(path: &Path) -> Result<Vec<Vec<String>>, RollcallError> {
    let sheet_error = |message: String| RollcallError::Sheet {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| sheet_error(e.to_string()))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| sheet_error("workbook has no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| sheet_error(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        Data::Float(f) => {
            // Integral floats (ids stored as numbers) print without ".0".
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#ERR({:?})", e),
        Data::DateTime(dt) => excel_to_datetime(dt.as_f64())
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Convert an Excel serial date (days since 1899-12-30) to a datetime.
fn excel_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * 86_400.0).round() as i64;
    base.checked_add_signed(chrono::Duration::seconds(seconds))
}

/// Parse a timestamp cell, trying the formats attendance exports use.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    const FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
    ];
    for format in FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(value, format) {
            return Some(t);
        }
    }

    // Date-only cells land at midnight.
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(value, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}
