//! Log-table cleaning and row normalization.
//!
//! Each log table is cleaned independently: rows with a missing field or an
//! unparseable timestamp are dropped, then exact duplicates within that table.
//! Duplicates *across* tables are kept — they later mark the same cell
//! present twice, which is idempotent.
//!
//! Normalization resolves each row's identity token to a display name and
//! folds newly seen (group, name) pairs into the shared participant set, so
//! people absent from every roster still appear in the final matrix under
//! whatever group their log row carried.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;

use crate::identity;
use crate::types::{LogRow, LogTable, Participant, ParticipantSet};

/// Clean one log table and resolve its identities.
///
/// `participants` accumulates across every table of the run; it only grows.
pub fn normalize(
    table: &LogTable,
    id_to_name: &HashMap<String, String>,
    participants: &mut ParticipantSet,
) -> Vec<LogRow> {
    let mut seen: HashSet<(String, String, String, NaiveDateTime)> = HashSet::new();
    let mut out = Vec::new();
    let mut dropped = 0usize;

    for row in &table.rows {
        let timestamp = match row.timestamp {
            Some(t) => t,
            None => {
                dropped += 1;
                continue;
            }
        };
        if row.session_id.is_empty() || row.identity.is_empty() || row.group.is_empty() {
            dropped += 1;
            continue;
        }
        if !seen.insert((
            row.session_id.clone(),
            row.identity.clone(),
            row.group.clone(),
            timestamp,
        )) {
            dropped += 1;
            continue;
        }

        let resolved_name = identity::resolve_name(&row.identity, id_to_name);
        participants.insert(Participant {
            group: row.group.clone(),
            name: resolved_name.clone(),
        });
        out.push(LogRow {
            session_id: row.session_id.clone(),
            group: row.group.clone(),
            resolved_name,
            timestamp,
        });
    }

    if dropped > 0 {
        log::debug!(
            "{}: dropped {} incomplete or duplicate rows, kept {}",
            table.source,
            dropped,
            out.len()
        );
    }
    out
}
