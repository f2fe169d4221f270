//! End-to-end orchestration over in-memory tables.
//!
//! The binary reads files into [`RosterTable`]/[`LogTable`] values and hands
//! them here; everything after that point is pure in-memory work, which is
//! what the end-to-end tests below exercise.

use crate::error::RollcallError;
use crate::matrix::PresenceMatrix;
use crate::partition::{self, GroupBlock};
use crate::types::{LogRow, LogTable, ParticipantSet, RosterTable, Session};
use crate::{normalize, roster, sessions};

/// Everything a run produces, ready for export.
#[derive(Debug)]
pub struct RunOutput {
    /// Sessions in chronological (column) order.
    pub sessions: Vec<Session>,
    /// Group blocks in group-sorted order.
    pub blocks: Vec<GroupBlock>,
}

/// Run the full reconciliation pipeline.
///
/// All-or-nothing: the first fatal condition (duplicate roster id) aborts
/// with no output.
pub fn run(
    roster_tables: &[RosterTable],
    log_tables: &[LogTable],
) -> Result<RunOutput, RollcallError> {
    let mut participants = ParticipantSet::new();

    let id_to_name = roster::build(roster_tables, &mut participants)?;
    log::info!(
        "roster: {} ids, {} participants",
        id_to_name.len(),
        participants.len()
    );

    let normalized: Vec<Vec<LogRow>> = log_tables
        .iter()
        .map(|table| normalize::normalize(table, &id_to_name, &mut participants))
        .collect();

    let sessions = sessions::extract(&normalized);
    log::info!(
        "discovered {} sessions across {} log files, {} participants total",
        sessions.len(),
        log_tables.len(),
        participants.len()
    );

    let matrix = PresenceMatrix::build(&participants, &sessions, &normalized);
    let blocks = partition::partition(&matrix);

    Ok(RunOutput { sessions, blocks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Mark, Participant, RawLogRow, RawRosterRow};
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn roster_table(rows: &[(&str, &str, &str)]) -> RosterTable {
        RosterTable {
            source: "roster.csv".to_string(),
            rows: rows
                .iter()
                .map(|(group, name, id)| RawRosterRow {
                    group: group.to_string(),
                    name: name.to_string(),
                    id: id.to_string(),
                })
                .collect(),
        }
    }

    fn log_table(source: &str, rows: &[(&str, &str, &str, u32)]) -> LogTable {
        LogTable {
            source: source.to_string(),
            rows: rows
                .iter()
                .map(|(session, identity, group, hour)| RawLogRow {
                    session_id: session.to_string(),
                    identity: identity.to_string(),
                    group: group.to_string(),
                    timestamp: Some(ts(*hour)),
                })
                .collect(),
        }
    }

    fn block_row<'a>(
        output: &'a RunOutput,
        group: &str,
        name: &str,
    ) -> &'a crate::partition::BlockRow {
        output
            .blocks
            .iter()
            .find(|b| b.group == group)
            .unwrap()
            .rows
            .iter()
            .find(|r| r.participant.name == name)
            .unwrap()
    }

    #[test]
    fn test_end_to_end_single_roster_single_log() {
        let rosters = vec![roster_table(&[("G1", "Alice", "id1")])];
        let logs = vec![log_table(
            "log.csv",
            &[("S1", "id1", "G1", 10), ("S2", "id1", "G1", 11)],
        )];

        let output = run(&rosters, &logs).unwrap();

        let ids: Vec<&str> = output.sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["S1", "S2"]);
        assert_eq!(output.sessions[0].representative_time, ts(10));
        assert_eq!(output.sessions[1].representative_time, ts(11));

        assert_eq!(output.blocks.len(), 1);
        assert_eq!(output.blocks[0].group, "G1");
        assert_eq!(output.blocks[0].rows.len(), 1);

        let alice = block_row(&output, "G1", "Alice");
        assert_eq!(alice.marks, vec![Mark::Present, Mark::Present]);
    }

    #[test]
    fn test_rostered_absentee_appears_all_absent() {
        let rosters = vec![roster_table(&[
            ("G1", "Alice", "id1"),
            ("G1", "Bob", "id2"),
        ])];
        let logs = vec![log_table("log.csv", &[("S1", "id1", "G1", 10)])];

        let output = run(&rosters, &logs).unwrap();
        let bob = block_row(&output, "G1", "Bob");
        assert_eq!(bob.marks, vec![Mark::Absent]);
    }

    #[test]
    fn test_duplicate_roster_id_aborts_run() {
        let rosters = vec![
            roster_table(&[("G1", "Alice", "id1")]),
            roster_table(&[("G2", "Bob", "id1")]),
        ];
        let logs = vec![log_table("log.csv", &[("S1", "id1", "G1", 10)])];

        assert!(matches!(
            run(&rosters, &logs),
            Err(RollcallError::DuplicateIdentity { .. })
        ));
    }

    #[test]
    fn test_no_roster_still_produces_matrix() {
        let logs = vec![log_table(
            "log.csv",
            &[("S1", "张三", "G1", 10), ("S1", "李四", "G1", 10)],
        )];

        let output = run(&[], &logs).unwrap();
        assert_eq!(output.blocks.len(), 1);
        assert_eq!(output.blocks[0].rows.len(), 2);
        let zhang = block_row(&output, "G1", "张三");
        assert_eq!(zhang.marks, vec![Mark::Present]);
    }

    #[test]
    fn test_cross_file_duplicate_rows_are_idempotent() {
        let rosters = vec![roster_table(&[("G1", "Alice", "id1")])];
        let once = vec![log_table("a.csv", &[("S1", "id1", "G1", 10)])];
        let twice = vec![
            log_table("a.csv", &[("S1", "id1", "G1", 10)]),
            log_table("b.csv", &[("S1", "id1", "G1", 10)]),
        ];

        let o1 = run(&rosters, &once).unwrap();
        let o2 = run(&rosters, &twice).unwrap();
        assert_eq!(o1.blocks, o2.blocks);
    }

    #[test]
    fn test_sessions_ordered_regardless_of_file_order() {
        let logs = vec![
            log_table("late.csv", &[("S3", "id3", "G1", 15)]),
            log_table("early.csv", &[("S1", "id1", "G1", 9), ("S2", "id2", "G1", 12)]),
        ];

        let output = run(&[], &logs).unwrap();
        let ids: Vec<&str> = output.sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["S1", "S2", "S3"]);
    }

    #[test]
    fn test_blocks_are_group_sorted_and_exhaustive() {
        let logs = vec![log_table(
            "log.csv",
            &[
                ("S1", "Eve1", "G3", 10),
                ("S1", "Alice1", "G1", 10),
                ("S1", "Bob1", "G2", 10),
            ],
        )];

        let output = run(&[], &logs).unwrap();
        let groups: Vec<&str> = output.blocks.iter().map(|b| b.group.as_str()).collect();
        assert_eq!(groups, vec!["G1", "G2", "G3"]);

        let total: usize = output.blocks.iter().map(|b| b.rows.len()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_unresolvable_identity_degrades_to_unnamed_row() {
        let logs = vec![log_table("log.csv", &[("S1", "A1-B2", "G1", 10)])];

        let output = run(&[], &logs).unwrap();
        assert_eq!(output.blocks[0].rows.len(), 1);
        assert_eq!(
            output.blocks[0].rows[0].participant,
            Participant {
                group: "G1".to_string(),
                name: String::new(),
            }
        );
        assert_eq!(output.blocks[0].rows[0].marks, vec![Mark::Present]);
    }
}
