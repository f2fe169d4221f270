//! Group partitioning of the presence matrix.
//!
//! The export format is one artifact per group, so the matrix is sorted by
//! group (stable — ties keep participant insertion order) and sliced into
//! contiguous blocks wherever the group value changes.

use crate::matrix::PresenceMatrix;
use crate::types::{Mark, Participant};

/// One participant's row of an export block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRow {
    pub participant: Participant,
    /// Marks in the matrix's chronological session-column order.
    pub marks: Vec<Mark>,
}

/// A contiguous run of rows sharing one group value.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBlock {
    pub group: String,
    pub rows: Vec<BlockRow>,
}

/// Slice the matrix into per-group blocks.
///
/// Concatenating the returned blocks in order reconstructs exactly the
/// group-sorted matrix, with no row duplicated or omitted.
pub fn partition(matrix: &PresenceMatrix) -> Vec<GroupBlock> {
    let mut rows: Vec<BlockRow> = matrix
        .participants()
        .iter()
        .enumerate()
        .map(|(i, participant)| BlockRow {
            participant: participant.clone(),
            marks: matrix.row(i).to_vec(),
        })
        .collect();
    rows.sort_by(|a, b| a.participant.group.cmp(&b.participant.group));

    let mut blocks: Vec<GroupBlock> = Vec::new();
    for row in rows {
        match blocks.last_mut() {
            Some(block) if block.group == row.participant.group => block.rows.push(row),
            _ => blocks.push(GroupBlock {
                group: row.participant.group.clone(),
                rows: vec![row],
            }),
        }
    }
    blocks
}
