//! Core types for the oven cycle detector library
//!
//! This module defines the records the reader produces, the identity key used
//! to partition them, the cycle records the aggregator emits and the error type
//! shared by every fallible operation in the crate.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type used throughout the detector (controller clocks carry no zone)
pub type Timestamp = NaiveDateTime;

/// Result type for detector operations
pub type Result<T> = std::result::Result<T, DetectorError>;

/// Controller event codes with a meaning for cycle detection.
///
/// The detector treats them as opaque tags; any other value is simply a code
/// that breaks the current attempt.
pub mod codes {
    /// Program selected (the only valid attempt start)
    pub const PROGRAM_SELECTED: i64 = 15;
    /// Preheating completed
    pub const PREHEAT_COMPLETED: i64 = 1;
    /// Door opened
    pub const DOOR_OPENED: i64 = 20;
    /// Door closed and confirmed
    pub const DOOR_CLOSED: i64 = 21;
    /// Baking started
    pub const BAKING_STARTED: i64 = 16;
    /// Baking finished normally
    pub const BAKING_FINISHED: i64 = 17;
    /// Baking aborted
    pub const BAKING_ABORTED: i64 = 18;
    /// Baking interrupted
    pub const BAKING_INTERRUPTED: i64 = 8;

    /// Codes that complete an attempt from the baking-finish state
    pub const TERMINAL: [i64; 3] = [BAKING_FINISHED, BAKING_ABORTED, BAKING_INTERRUPTED];

    /// Check whether a code completes a cycle
    pub fn is_terminal(code: i64) -> bool {
        TERMINAL.contains(&code)
    }
}

/// One row of the controller event log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// When the controller logged the event
    pub timestamp: Timestamp,
    /// Oven identifier
    pub oven_id: String,
    /// Baking program number
    pub program_id: String,
    /// Stove (cooking chamber) number
    pub stove_id: String,
    /// Number of stoves in the oven
    pub stove_count: i64,
    /// Event code (see [`codes`])
    pub event_id: i64,
}

impl EventRecord {
    /// Identity key of the group this record belongs to
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            stove_id: self.stove_id.clone(),
            program_id: self.program_id.clone(),
            oven_id: self.oven_id.clone(),
        }
    }

    /// True if this record can open a new detection attempt
    pub fn is_valid_start(&self) -> bool {
        self.event_id == codes::PROGRAM_SELECTED
    }
}

/// Ordered list of records accumulated during one detection attempt
pub type Sequence = Vec<EventRecord>;

/// Identity of a group: (stove, program, oven)
///
/// Field order defines the ordering, so groups are processed stove first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub stove_id: String,
    pub program_id: String,
    pub oven_id: String,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.stove_id, self.program_id, self.oven_id)
    }
}

/// A detected baking cycle, ready for the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRecord {
    /// Timestamp of the baking-start record
    pub start_time: Timestamp,
    /// Timestamp of the terminal record
    pub end_time: Timestamp,
    pub oven_id: String,
    pub program_id: String,
    pub stove_id: String,
    pub stove_count: i64,
    /// Elapsed time formatted as `"{days} days HH:MM:SS"`
    pub duration: String,
}

/// Errors that can occur while reading, detecting or reporting
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Row {row}: missing column {column}")]
    MissingColumn { row: u64, column: usize },

    #[error("Row {row}: invalid {field} value {value:?}: {reason}")]
    InvalidField {
        row: u64,
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Group {group}: row {row} is earlier than the row before it")]
    OutOfOrder { group: GroupKey, row: usize },

    #[error("Sequence of {len} record(s) cannot describe a cycle")]
    MalformedSequence { len: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
