//! Main extraction API
//!
//! [`CycleExtractor`] runs the whole pipeline sequentially:
//! read → group → order → detect → aggregate. Callers who want to spread
//! groups over threads use [`detect_group`] directly on the output of
//! [`CycleExtractor::prepare`].

use crate::aggregator;
use crate::config::SourceConfig;
use crate::detector::SequenceDetector;
use crate::grouping::{group_records, GroupedEvents};
use crate::reader::EventReader;
use crate::types::{CycleRecord, EventRecord, GroupKey, Result, Sequence};
use std::path::Path;

/// How each group is brought into chronological order before detection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderingPolicy {
    /// Stable-sort every group by timestamp
    #[default]
    Sort,
    /// Trust the input order but fail on the first group that goes back in time
    Validate,
}

/// Outcome of one extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Records read
    pub rows: usize,
    /// Identity groups seen
    pub groups: usize,
    /// Sequences the detector saved
    pub sequences: usize,
    /// One cycle per saved sequence, grouped in key order
    pub cycles: Vec<CycleRecord>,
}

/// Entry point for cycle extraction
#[derive(Debug, Clone, Default)]
pub struct CycleExtractor {
    source: SourceConfig,
    ordering: OrderingPolicy,
}

impl CycleExtractor {
    /// Create an extractor for the given source layout
    pub fn new(source: SourceConfig) -> Self {
        Self {
            source,
            ordering: OrderingPolicy::default(),
        }
    }

    /// Builder method: choose how groups are ordered
    pub fn with_ordering(mut self, ordering: OrderingPolicy) -> Self {
        self.ordering = ordering;
        self
    }

    /// Source layout in use
    pub fn source(&self) -> &SourceConfig {
        &self.source
    }

    /// Read an export file and extract its cycles
    ///
    /// # Example
    /// ```no_run
    /// use oven_cycle_detector::{CycleExtractor, SourceConfig};
    /// use std::path::Path;
    ///
    /// let extractor = CycleExtractor::new(SourceConfig::new());
    /// let summary = extractor.extract_file(Path::new("events.csv")).unwrap();
    /// for cycle in &summary.cycles {
    ///     println!("{} {} {}", cycle.oven_id, cycle.start_time, cycle.duration);
    /// }
    /// ```
    pub fn extract_file(&self, path: &Path) -> Result<ExtractionSummary> {
        let records = EventReader::from_path(path, &self.source)?.read_all()?;
        self.extract_records(records)
    }

    /// Extract cycles from records already in memory
    pub fn extract_records(&self, records: Vec<EventRecord>) -> Result<ExtractionSummary> {
        let rows = records.len();
        let grouped = self.prepare(records)?;
        let groups = grouped.len();

        let mut sequences = 0;
        let mut cycles = Vec::new();
        for (key, group) in grouped.iter() {
            let saved = detect_group(key, group);
            sequences += saved.len();
            cycles.extend(aggregator::aggregate(&saved)?);
        }

        log::info!(
            "Extracted {} cycle(s) from {} rows in {} groups",
            cycles.len(),
            rows,
            groups
        );
        Ok(ExtractionSummary {
            rows,
            groups,
            sequences,
            cycles,
        })
    }

    /// Group records and bring every group into chronological order
    pub fn prepare(&self, records: Vec<EventRecord>) -> Result<GroupedEvents> {
        let mut grouped = group_records(records);
        match self.ordering {
            OrderingPolicy::Sort => grouped.sort_chronologically(),
            OrderingPolicy::Validate => grouped.validate_chronological()?,
        }
        Ok(grouped)
    }
}

/// Run a fresh detector over one ordered group
pub fn detect_group(key: &GroupKey, records: &[EventRecord]) -> Vec<Sequence> {
    let sequences = SequenceDetector::detect(records);
    log::debug!(
        "Group {}: {} record(s), {} sequence(s)",
        key,
        records.len(),
        sequences.len()
    );
    sequences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DetectorError;
    use chrono::{Duration, NaiveDate};

    fn record(stove: &str, minute: i64, event_id: i64) -> EventRecord {
        EventRecord {
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(6, 0, 0)
                .unwrap()
                + Duration::minutes(minute),
            oven_id: "OV-1".to_string(),
            program_id: "7".to_string(),
            stove_id: stove.to_string(),
            stove_count: 2,
            event_id,
        }
    }

    #[test]
    fn test_interleaved_groups_are_independent() {
        // Stove 1 completes a cycle; stove 2 breaks its attempt halfway.
        let records = vec![
            record("1", 0, 15),
            record("2", 0, 15),
            record("1", 10, 1),
            record("2", 10, 1),
            record("1", 20, 21),
            record("2", 20, 99),
            record("1", 30, 16),
            record("2", 30, 21),
            record("1", 90, 17),
            record("2", 90, 16),
        ];

        let summary = CycleExtractor::default().extract_records(records).unwrap();
        assert_eq!(summary.rows, 10);
        assert_eq!(summary.groups, 2);
        assert_eq!(summary.sequences, 1);
        assert_eq!(summary.cycles.len(), 1);
        assert_eq!(summary.cycles[0].stove_id, "1");
        assert_eq!(summary.cycles[0].duration, "0 days 01:00:00");
    }

    #[test]
    fn test_state_does_not_leak_between_groups() {
        // Stove 1 ends mid-attempt; stove 2 starts without a program selection.
        let records = vec![
            record("1", 0, 15),
            record("1", 1, 1),
            record("1", 2, 21),
            record("2", 3, 16),
            record("2", 4, 17),
        ];

        let summary = CycleExtractor::default().extract_records(records).unwrap();
        assert!(summary.cycles.is_empty());
    }

    #[test]
    fn test_sort_policy_reorders_input() {
        let records = vec![
            record("1", 30, 16),
            record("1", 0, 15),
            record("1", 20, 21),
            record("1", 10, 1),
            record("1", 45, 18),
        ];

        let summary = CycleExtractor::default().extract_records(records).unwrap();
        assert_eq!(summary.cycles.len(), 1);
        assert_eq!(summary.cycles[0].duration, "0 days 00:15:00");
    }

    #[test]
    fn test_validate_policy_rejects_unsorted_group() {
        let records = vec![record("1", 10, 15), record("1", 0, 1)];
        let extractor =
            CycleExtractor::new(SourceConfig::new()).with_ordering(OrderingPolicy::Validate);

        let err = extractor.extract_records(records).unwrap_err();
        assert!(matches!(err, DetectorError::OutOfOrder { row: 1, .. }));
    }

    #[test]
    fn test_cycles_follow_group_key_order() {
        let mut records = Vec::new();
        for stove in ["3", "1", "2"] {
            for (minute, code) in [(0, 15), (1, 1), (2, 21), (3, 16), (4, 17)] {
                records.push(record(stove, minute, code));
            }
        }

        let summary = CycleExtractor::default().extract_records(records).unwrap();
        let stoves: Vec<&str> = summary.cycles.iter().map(|c| c.stove_id.as_str()).collect();
        assert_eq!(stoves, vec!["1", "2", "3"]);
    }
}
