//! Cycle aggregation
//!
//! Turns saved sequences into [`CycleRecord`]s. The last two records of a
//! saved sequence are the baking start and the terminal event, so the
//! reported interval covers the bake and not the setup before it.

use crate::types::{CycleRecord, DetectorError, EventRecord, Result, Sequence, Timestamp};

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Build one cycle record per sequence, preserving order
pub fn aggregate(sequences: &[Sequence]) -> Result<Vec<CycleRecord>> {
    sequences.iter().map(|sequence| to_cycle(sequence)).collect()
}

/// Build the cycle record of a single saved sequence
pub fn to_cycle(sequence: &[EventRecord]) -> Result<CycleRecord> {
    let len = sequence.len();
    if len < 2 {
        return Err(DetectorError::MalformedSequence { len });
    }

    let identity = &sequence[0];
    let start_time = sequence[len - 2].timestamp;
    let end_time = sequence[len - 1].timestamp;

    Ok(CycleRecord {
        start_time,
        end_time,
        oven_id: identity.oven_id.clone(),
        program_id: identity.program_id.clone(),
        stove_id: identity.stove_id.clone(),
        stove_count: identity.stove_count,
        duration: format_elapsed(start_time, end_time),
    })
}

/// Format the time between two timestamps as `"{days} days HH:MM:SS"`
pub fn format_elapsed(start: Timestamp, end: Timestamp) -> String {
    let millis = (end - start).num_milliseconds();
    format_duration(millis.div_euclid(1000))
}

/// Format whole seconds as `"{days} days HH:MM:SS"`
///
/// Uses floor division throughout, so negative values keep a positive clock
/// part: `-10` formats as `"-1 days 23:59:50"`.
pub fn format_duration(total_seconds: i64) -> String {
    let days = total_seconds.div_euclid(SECONDS_PER_DAY);
    let hours = total_seconds.rem_euclid(SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = total_seconds.rem_euclid(SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = total_seconds.rem_euclid(SECONDS_PER_MINUTE);
    format!("{} days {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}
