//! Parallel cycle extraction
//!
//! Each group gets its own detector, so groups are spread over the rayon pool
//! with no shared state. Results are collected in group-key order, which keeps
//! the report identical to a sequential run.

use anyhow::{Context, Result};
use oven_cycle_detector::{
    aggregate, detect_group, CycleExtractor, CycleRecord, EventRecord, ExtractionSummary,
};
use rayon::prelude::*;

/// Run detection and aggregation over all groups in parallel
pub fn extract_parallel(
    extractor: &CycleExtractor,
    records: Vec<EventRecord>,
) -> Result<ExtractionSummary> {
    let rows = records.len();
    let grouped = extractor
        .prepare(records)
        .context("Failed to order event groups")?;
    let groups = grouped.len();

    let per_group = grouped
        .into_groups()
        .into_par_iter()
        .map(|(key, group)| -> Result<(usize, Vec<CycleRecord>)> {
            let sequences = detect_group(&key, &group);
            let cycles = aggregate(&sequences)
                .with_context(|| format!("Failed to aggregate cycles of group {}", key))?;
            Ok((sequences.len(), cycles))
        })
        .collect::<Result<Vec<_>>>()?;

    let sequences = per_group.iter().map(|(count, _)| count).sum();
    let cycles: Vec<CycleRecord> = per_group
        .into_iter()
        .flat_map(|(_, cycles)| cycles)
        .collect();

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

/// Order cycles by start time; ties keep group order
pub fn sort_by_start(cycles: &mut [CycleRecord]) {
    cycles.sort_by_key(|cycle| cycle.start_time);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use oven_cycle_detector::{OrderingPolicy, SourceConfig};

    fn records() -> Vec<EventRecord> {
        let base = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        let mut records = Vec::new();
        for (stove, offset) in [("3", 0), ("1", 40), ("2", 20)] {
            for (step, code) in [15, 1, 20, 21, 16, 17].into_iter().enumerate() {
                records.push(EventRecord {
                    timestamp: base + Duration::minutes(offset + step as i64),
                    oven_id: "OV-1".to_string(),
                    program_id: "7".to_string(),
                    stove_id: stove.to_string(),
                    stove_count: 3,
                    event_id: code,
                });
            }
        }
        records
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let extractor = CycleExtractor::new(SourceConfig::new());
        let parallel = extract_parallel(&extractor, records()).unwrap();
        let sequential = extractor.extract_records(records()).unwrap();

        assert_eq!(parallel, sequential);
        assert_eq!(parallel.cycles.len(), 3);
        assert_eq!(parallel.sequences, 3);
    }

    #[test]
    fn test_sort_by_start() {
        let extractor = CycleExtractor::new(SourceConfig::new());
        let mut summary = extract_parallel(&extractor, records()).unwrap();

        let by_group: Vec<&str> = summary.cycles.iter().map(|c| c.stove_id.as_str()).collect();
        assert_eq!(by_group, vec!["1", "2", "3"]);

        sort_by_start(&mut summary.cycles);
        let by_start: Vec<&str> = summary.cycles.iter().map(|c| c.stove_id.as_str()).collect();
        assert_eq!(by_start, vec!["3", "2", "1"]);
    }

    #[test]
    fn test_validation_failure_is_reported() {
        let mut unsorted = records();
        unsorted.swap(0, 1);
        let extractor = CycleExtractor::new(SourceConfig::new())
            .with_ordering(OrderingPolicy::Validate);

        let err = extract_parallel(&extractor, unsorted).unwrap_err();
        assert!(err.to_string().contains("Failed to order event groups"));
    }
}
