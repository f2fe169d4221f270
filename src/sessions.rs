//! Session discovery and chronological ordering.
//!
//! Sessions are never declared anywhere — they are implied by the log rows.
//! Each table's rows are grouped by session id and a mean timestamp computed
//! per group; the first table to introduce an id fixes its representative
//! time, and later tables' means for the same id are ignored.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDateTime};

use crate::types::{LogRow, Session};

/// Mean of a non-empty set of timestamps, at second precision.
fn mean_timestamp(times: &[NaiveDateTime]) -> NaiveDateTime {
    let sum: i64 = times.iter().map(|t| t.and_utc().timestamp()).sum();
    let mean = sum / times.len() as i64;
    DateTime::from_timestamp(mean, 0)
        .map(|dt| dt.naive_utc())
        .unwrap_or(times[0])
}

/// Discover every distinct session across the normalized tables, ordered
/// ascending by representative time.
///
/// The sort is stable, so sessions with equal representative times keep their
/// first-seen order.
pub fn extract(tables: &[Vec<LogRow>]) -> Vec<Session> {
    let mut sessions: Vec<Session> = Vec::new();
    let mut known: HashSet<String> = HashSet::new();

    for table in tables {
        // Per-table grouping, in row order so first-seen order is deterministic.
        let mut order: Vec<&str> = Vec::new();
        let mut times_by_id: HashMap<&str, Vec<NaiveDateTime>> = HashMap::new();
        for row in table {
            let entry = times_by_id.entry(row.session_id.as_str()).or_default();
            if entry.is_empty() {
                order.push(row.session_id.as_str());
            }
            entry.push(row.timestamp);
        }

        for id in order {
            if known.contains(id) {
                continue;
            }
            let times = &times_by_id[id];
            known.insert(id.to_string());
            sessions.push(Session {
                id: id.to_string(),
                representative_time: mean_timestamp(times),
            });
        }
    }

    sessions.sort_by_key(|s| s.representative_time);
    sessions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn row(session: &str, t: NaiveDateTime) -> LogRow {
        LogRow {
            session_id: session.to_string(),
            group: "G1".to_string(),
            resolved_name: "Alice".to_string(),
            timestamp: t,
        }
    }

    #[test]
    fn test_sessions_sorted_by_representative_time() {
        // Discovered out of chronological order, across two tables.
        let tables = vec![
            vec![row("S3", ts(21, 10)), row("S1", ts(7, 10))],
            vec![row("S2", ts(14, 10))],
        ];
        let sessions = extract(&tables);
        let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["S1", "S2", "S3"]);
    }

    #[test]
    fn test_representative_time_is_mean_of_observations() {
        let tables = vec![vec![row("S1", ts(7, 10)), row("S1", ts(7, 12))]];
        let sessions = extract(&tables);
        assert_eq!(sessions[0].representative_time, ts(7, 11));
    }

    #[test]
    fn test_first_table_to_introduce_an_id_wins() {
        let tables = vec![
            vec![row("S1", ts(7, 10))],
            // Same session, much later timestamps — must not move it.
            vec![row("S1", ts(28, 23))],
        ];
        let sessions = extract(&tables);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].representative_time, ts(7, 10));
    }

    #[test]
    fn test_equal_times_keep_first_seen_order() {
        let tables = vec![vec![row("B", ts(7, 10)), row("A", ts(7, 10))]];
        let sessions = extract(&tables);
        let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn test_no_rows_no_sessions() {
        assert!(extract(&[]).is_empty());
        assert!(extract(&[vec![]]).is_empty());
    }
}
