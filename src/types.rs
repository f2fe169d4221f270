//! Core data types for the reconciliation pipeline.
//!
//! Everything here is owned by a single batch run. Participants are
//! identified by value equality of (group, name) — two same-named people in
//! the same group are indistinguishable by design, and the same person
//! recorded under two group spellings counts as two participants.

use std::collections::HashSet;

use chrono::NaiveDateTime;

/// Split of a raw identity token into its id and name parts.
///
/// Either component may be empty, but not both (an empty token never parses).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIdentity {
    pub id: String,
    pub name: String,
}

/// A participant known to the run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Participant {
    pub group: String,
    pub name: String,
}

/// One roster row: (group, name, id) with a run-globally unique id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawRosterRow {
    pub group: String,
    pub name: String,
    pub id: String,
}

/// A roster file materialized as rows, before index construction.
#[derive(Debug, Clone)]
pub struct RosterTable {
    /// Display name of the file this table came from (for log messages).
    pub source: String,
    pub rows: Vec<RawRosterRow>,
}

/// One attendance-log row as read, before cleaning and identity resolution.
///
/// `timestamp` is `None` when the time cell was empty or unparseable — the
/// normalizer drops such rows along with any other missing field.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLogRow {
    pub session_id: String,
    pub identity: String,
    pub group: String,
    pub timestamp: Option<NaiveDateTime>,
}

/// An attendance-log file materialized as rows.
#[derive(Debug, Clone)]
pub struct LogTable {
    pub source: String,
    pub rows: Vec<RawLogRow>,
}

/// One attendance-log row surviving cleaning, with its identity resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRow {
    pub session_id: String,
    pub group: String,
    pub resolved_name: String,
    pub timestamp: NaiveDateTime,
}

/// A session discovered from the logs.
///
/// `representative_time` is the mean of the timestamps the session was first
/// observed with; later sightings of the same id do not move it.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: String,
    pub representative_time: NaiveDateTime,
}

/// Presence marker for one matrix cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Present,
    Absent,
}

/// Insertion-ordered set of participants, shared across the whole run.
///
/// The set only grows: rosters seed it, then every normalized log row may add
/// a pair the rosters never listed. Insertion order is what breaks ties when
/// the exporter group-sorts the matrix, so it is preserved exactly.
#[derive(Debug, Default)]
pub struct ParticipantSet {
    ordered: Vec<Participant>,
    seen: HashSet<Participant>,
}

impl ParticipantSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant if not already present. Returns true when added.
    pub fn insert(&mut self, participant: Participant) -> bool {
        if self.seen.contains(&participant) {
            return false;
        }
        self.seen.insert(participant.clone());
        self.ordered.push(participant);
        true
    }

    pub fn contains(&self, participant: &Participant) -> bool {
        self.seen.contains(participant)
    }

    pub fn as_slice(&self) -> &[Participant] {
        &self.ordered
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
