//! Roster index construction.
//!
//! Rosters seed two things: the id→name lookup the identity resolver falls
//! back on, and the initial participant set. Roster ids must be unique across
//! every roster file loaded in one run — a duplicate halts the whole run
//! before any output is produced.

use std::collections::{HashMap, HashSet};

use crate::error::RollcallError;
use crate::types::{Participant, ParticipantSet, RawRosterRow, RosterTable};

/// Drop rows with any empty field, then exact duplicates, preserving order.
fn clean(rows: &[RawRosterRow]) -> Vec<RawRosterRow> {
    let mut seen: HashSet<&RawRosterRow> = HashSet::new();
    rows.iter()
        .filter(|r| !r.group.is_empty() && !r.name.is_empty() && !r.id.is_empty())
        .filter(|r| seen.insert(*r))
        .cloned()
        .collect()
}

/// Build the id→name lookup from all roster tables, seeding `participants`
/// with every (group, name) pair listed.
///
/// Fails fast on the first id seen twice, naming both source files.
pub fn build(
    tables: &[RosterTable],
    participants: &mut ParticipantSet,
) -> Result<HashMap<String, String>, RollcallError> {
    let mut id_to_name: HashMap<String, String> = HashMap::new();
    let mut id_source: HashMap<String, String> = HashMap::new();

    for table in tables {
        let rows = clean(&table.rows);
        log::debug!("roster {}: {} rows after cleaning", table.source, rows.len());

        for row in rows {
            if let Some(first_source) = id_source.get(&row.id) {
                return Err(RollcallError::DuplicateIdentity {
                    id: row.id,
                    first_source: first_source.clone(),
                    second_source: table.source.clone(),
                });
            }
            id_to_name.insert(row.id.clone(), row.name.clone());
            id_source.insert(row.id, table.source.clone());
            participants.insert(Participant {
                group: row.group,
                name: row.name,
            });
        }
    }

    Ok(id_to_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(group: &str, name: &str, id: &str) -> RawRosterRow {
        RawRosterRow {
            group: group.to_string(),
            name: name.to_string(),
            id: id.to_string(),
        }
    }

    fn table(source: &str, rows: Vec<RawRosterRow>) -> RosterTable {
        RosterTable {
            source: source.to_string(),
            rows,
        }
    }

    #[test]
    fn test_build_maps_ids_and_seeds_participants() {
        let tables = vec![table(
            "roster.csv",
            vec![row("G1", "Alice", "id1"), row("G2", "Bob", "id2")],
        )];
        let mut participants = ParticipantSet::new();
        let map = build(&tables, &mut participants).unwrap();

        assert_eq!(map.get("id1"), Some(&"Alice".to_string()));
        assert_eq!(map.get("id2"), Some(&"Bob".to_string()));
        assert_eq!(participants.len(), 2);
        assert!(participants.contains(&Participant {
            group: "G1".to_string(),
            name: "Alice".to_string(),
        }));
    }

    #[test]
    fn test_duplicate_id_within_one_file_is_fatal() {
        let tables = vec![table(
            "roster.csv",
            vec![row("G1", "Alice", "id1"), row("G2", "Bob", "id1")],
        )];
        let err = build(&tables, &mut ParticipantSet::new()).unwrap_err();
        assert!(matches!(
            err,
            RollcallError::DuplicateIdentity { ref id, .. } if id == "id1"
        ));
    }

    #[test]
    fn test_duplicate_id_across_files_is_fatal() {
        let tables = vec![
            table("a.csv", vec![row("G1", "Alice", "id1")]),
            table("b.csv", vec![row("G2", "Bob", "id1")]),
        ];
        let err = build(&tables, &mut ParticipantSet::new()).unwrap_err();
        match err {
            RollcallError::DuplicateIdentity {
                id,
                first_source,
                second_source,
            } => {
                assert_eq!(id, "id1");
                assert_eq!(first_source, "a.csv");
                assert_eq!(second_source, "b.csv");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_exact_duplicate_row_is_dropped_not_fatal() {
        let tables = vec![table(
            "roster.csv",
            vec![row("G1", "Alice", "id1"), row("G1", "Alice", "id1")],
        )];
        let mut participants = ParticipantSet::new();
        let map = build(&tables, &mut participants).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(participants.len(), 1);
    }

    #[test]
    fn test_rows_with_missing_fields_are_dropped() {
        let tables = vec![table(
            "roster.csv",
            vec![row("", "Alice", "id1"), row("G1", "", "id2"), row("G1", "Carol", "")],
        )];
        let mut participants = ParticipantSet::new();
        let map = build(&tables, &mut participants).unwrap();
        assert!(map.is_empty());
        assert!(participants.is_empty());
    }

    #[test]
    fn test_empty_roster_is_fine() {
        let mut participants = ParticipantSet::new();
        let map = build(&[], &mut participants).unwrap();
        assert!(map.is_empty());
        assert!(participants.is_empty());
    }
}
