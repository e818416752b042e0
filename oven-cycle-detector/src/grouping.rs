//! Partitioning records into identity groups
//!
//! Groups are kept in a `BTreeMap`, so iteration follows [`GroupKey`] order and
//! every run over the same input visits groups in the same order.

use crate::types::{DetectorError, EventRecord, GroupKey, Result};
use std::collections::BTreeMap;

/// Records partitioned by (stove, program, oven)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedEvents {
    groups: BTreeMap<GroupKey, Vec<EventRecord>>,
}

/// Partition records by identity, keeping input order inside each group
pub fn group_records<I>(records: I) -> GroupedEvents
where
    I: IntoIterator<Item = EventRecord>,
{
    let mut groups: BTreeMap<GroupKey, Vec<EventRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.group_key()).or_default().push(record);
    }
    log::debug!("Partitioned records into {} groups", groups.len());
    GroupedEvents { groups }
}

impl GroupedEvents {
    /// Sort every group by timestamp
    ///
    /// The sort is stable: records sharing a timestamp keep their input order.
    pub fn sort_chronologically(&mut self) {
        for rows in self.groups.values_mut() {
            rows.sort_by_key(|record| record.timestamp);
        }
    }

    /// Check that no group goes back in time
    ///
    /// Equal timestamps are allowed. Fails on the first offending row with its
    /// position inside the group.
    pub fn validate_chronological(&self) -> Result<()> {
        for (key, rows) in &self.groups {
            if let Some(row) = rows
                .windows(2)
                .position(|pair| pair[1].timestamp < pair[0].timestamp)
            {
                return Err(DetectorError::OutOfOrder {
                    group: key.clone(),
                    row: row + 1,
                });
            }
        }
        Ok(())
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True if there are no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of records across all groups
    pub fn record_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Records of one group
    pub fn get(&self, key: &GroupKey) -> Option<&[EventRecord]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Iterate over groups in key order
    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &[EventRecord])> {
        self.groups.iter().map(|(key, rows)| (key, rows.as_slice()))
    }

    /// Take the groups out, in key order
    pub fn into_groups(self) -> Vec<(GroupKey, Vec<EventRecord>)> {
        self.groups.into_iter().collect()
    }
}
