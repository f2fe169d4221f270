//! rollcall — reconciles attendance-log files against participant rosters
//! and produces per-group presence matrices.
//!
//! The pipeline is a single-threaded batch: read every roster and log file,
//! resolve each row's free-form identity token to a canonical participant,
//! discover the set of sessions implied by the data, build a complete
//! participant × session presence grid, and export one artifact per group.
//! All-or-nothing: any fatal condition aborts before output is produced.

pub mod config;
pub mod error;
pub mod export;
pub mod identity;
pub mod matrix;
pub mod normalize;
pub mod partition;
pub mod pipeline;
pub mod reader;
pub mod roster;
pub mod sessions;
pub mod types;
pub mod util;
