//! Grouping of sample identifiers by a categorical attribute.
//!
//! The attribute table arrives as already-parsed rows; this module does no
//! file I/O. Samples are bucketed into named groups by the value of one
//! attribute column, and two interchangeable membership indexes are
//! provided: a linear-scan list for small group counts and a fixed-capacity
//! probing hash table for large ones. Both produce the same `GroupTable`,
//! with groups in first-encounter order and members in row order.

mod probe;

pub use probe::ProbeTable;

use indexmap::IndexMap;
use log::warn;
use std::str::FromStr;

use crate::error::{ExtractError, Result};

/// Name of the column holding sample identifiers in the attribute table.
pub const SAMPLE_ID_COLUMN: &str = "SAMPID";

/// How group membership is indexed while the table is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStrategy {
    /// Linear scan of the groups seen so far. O(g) per row.
    Array,
    /// Open-addressing hash table with linear probing. Expected O(1) per
    /// row; `capacity` must exceed the number of distinct groups.
    Hash { capacity: usize },
}

/// Default slot count for the hash strategy, comfortably above the number
/// of tissue types in any attribute dump we have seen.
pub const DEFAULT_HASH_CAPACITY: usize = 1024;

impl FromStr for GroupStrategy {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "array" | "a" => Ok(GroupStrategy::Array),
            "hash" | "h" => Ok(GroupStrategy::Hash {
                capacity: DEFAULT_HASH_CAPACITY,
            }),
            _ => Err(ExtractError::InvalidStrategy {
                selector: s.to_string(),
            }),
        }
    }
}

/// Group name -> ordered member sample identifiers.
///
/// Group order is first-encounter order and member order is attribute-row
/// order, regardless of which construction strategy built the table. The
/// table is built once and read-only afterward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupTable {
    groups: Vec<(String, Vec<String>)>,
}

impl GroupTable {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    pub fn members(&self, slot: usize) -> &[String] {
        &self.groups[slot].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(name, members)| (name.as_str(), members.as_slice()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.groups.iter().position(|(n, _)| n == name)
    }

    fn push_group(&mut self, name: String) -> usize {
        self.groups.push((name, Vec::new()));
        self.groups.len() - 1
    }

    fn add_member(&mut self, slot: usize, sample: String) {
        self.groups[slot].1.push(sample);
    }
}

/// Bucket every attribute row's sample id under its value in `group_col`.
///
/// Fails with `Schema` if the header lacks `SAMPID` or `group_col`. Rows too
/// short to carry both columns are skipped with a warning; real attribute
/// dumps contain ragged rows.
pub fn build_group_table(
    header: &[String],
    rows: &[Vec<String>],
    group_col: &str,
    strategy: GroupStrategy,
) -> Result<GroupTable> {
    let mut columns: IndexMap<&str, usize> = IndexMap::new();
    for (idx, name) in header.iter().enumerate() {
        // First occurrence wins if a header name repeats.
        columns.entry(name.as_str()).or_insert(idx);
    }
    let sample_idx = *columns
        .get(SAMPLE_ID_COLUMN)
        .ok_or_else(|| ExtractError::Schema {
            column: SAMPLE_ID_COLUMN.to_string(),
        })?;
    let group_idx = *columns.get(group_col).ok_or_else(|| ExtractError::Schema {
        column: group_col.to_string(),
    })?;

    let mut table = GroupTable::default();
    let mut index = match strategy {
        GroupStrategy::Hash { capacity } => Some(ProbeTable::with_capacity(capacity)),
        GroupStrategy::Array => None,
    };
    for row in rows {
        let (Some(sample), Some(group)) = (row.get(sample_idx), row.get(group_idx)) else {
            warn!(
                "attribute row with {} fields is too short for columns {} and {}, skipped",
                row.len(),
                sample_idx,
                group_idx
            );
            continue;
        };
        let slot = match index.as_mut() {
            Some(probe) => match probe.get(group) {
                Some(slot) => slot,
                None => {
                    let slot = table.push_group(group.clone());
                    probe.insert(group, slot)?;
                    slot
                }
            },
            None => match table.position(group) {
                Some(slot) => slot,
                None => table.push_group(group.clone()),
            },
        };
        table.add_member(slot, sample.clone());
    }
    Ok(table)
}
