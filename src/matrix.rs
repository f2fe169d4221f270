//! Presence matrix construction.
//!
//! The matrix is a complete participant × session grid: every cell exists and
//! defaults to absent, then every normalized log row flips its cell to
//! present. Marking present twice (the same row in two files) is a no-op.

use std::collections::HashMap;

use crate::types::{LogRow, Mark, Participant, ParticipantSet, Session};

/// Complete participant × session presence grid.
///
/// Rows are in participant insertion order; columns in the chronological
/// session order handed to [`PresenceMatrix::build`].
#[derive(Debug)]
pub struct PresenceMatrix {
    participants: Vec<Participant>,
    session_ids: Vec<String>,
    /// cells[row][col], row parallel to `participants`, col to `session_ids`.
    cells: Vec<Vec<Mark>>,
    participant_index: HashMap<Participant, usize>,
    session_index: HashMap<String, usize>,
}

impl PresenceMatrix {
    /// Build the grid: all cells absent, then one present mark per log row.
    pub fn build(
        participants: &ParticipantSet,
        sessions: &[Session],
        tables: &[Vec<LogRow>],
    ) -> PresenceMatrix {
        let participants: Vec<Participant> = participants.as_slice().to_vec();
        let session_ids: Vec<String> = sessions.iter().map(|s| s.id.clone()).collect();

        let participant_index: HashMap<Participant, usize> = participants
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), i))
            .collect();
        let session_index: HashMap<String, usize> = session_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        let mut cells = vec![vec![Mark::Absent; session_ids.len()]; participants.len()];

        for table in tables {
            for row in table {
                let key = Participant {
                    group: row.group.clone(),
                    name: row.resolved_name.clone(),
                };
                match (
                    participant_index.get(&key),
                    session_index.get(&row.session_id),
                ) {
                    (Some(&p), Some(&s)) => cells[p][s] = Mark::Present,
                    _ => {
                        // Normalization registers every participant and the
                        // extractor every session, so this indicates the
                        // tables were not produced by this run's pipeline.
                        log::warn!(
                            "log row ({}, {}, {}) has no matrix cell, skipping",
                            row.group,
                            row.resolved_name,
                            row.session_id
                        );
                    }
                }
            }
        }

        PresenceMatrix {
            participants,
            session_ids,
            cells,
            participant_index,
            session_index,
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn session_ids(&self) -> &[String] {
        &self.session_ids
    }

    /// Marks for one participant row, in session column order.
    pub fn row(&self, index: usize) -> &[Mark] {
        &self.cells[index]
    }

    pub fn get(&self, participant: &Participant, session_id: &str) -> Option<Mark> {
        let p = *self.participant_index.get(participant)?;
        let s = *self.session_index.get(session_id)?;
        Some(self.cells[p][s])
    }
}
