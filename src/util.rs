//! Small filesystem helpers shared by the export path.

use std::io::Write;
use std::path::Path;

/// Write a string to a file atomically (temp file + rename), so a failed run
/// never leaves a half-written artifact behind.
pub fn atomic_write_str(path: &Path, content: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("tmp");
    {
        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }
    std::fs::rename(&tmp, path)
}

/// Replace path-hostile characters in a name destined for a filename.
///
/// Group names come straight from input cells and may contain separators or
/// other characters the filesystem rejects. Unicode (CJK group names) passes
/// through untouched.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if sanitized.is_empty() {
        "_".to_string()
    } else {
        sanitized
    }
}
