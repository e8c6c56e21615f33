//! Lookup over the expression matrix's column-name header row.

use std::str::FromStr;

use crate::error::ExtractError;

/// How sample identifiers are resolved to column offsets.
///
/// A purely performance knob: on headers without duplicate names both
/// strategies return identical results. Binary pays an O(n log n) sort at
/// construction and O(log n) per lookup; linear pays nothing upfront and
/// O(n) per lookup. Many repeated lookups favor binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    Binary,
    Linear,
}

impl FromStr for SearchStrategy {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "binary" | "b" => Ok(SearchStrategy::Binary),
            "linear" | "l" => Ok(SearchStrategy::Linear),
            _ => Err(ExtractError::InvalidStrategy {
                selector: s.to_string(),
            }),
        }
    }
}

/// Maps a sample identifier to its zero-based column offset in the header
/// row. Built once per scan, read-only afterward.
///
/// Known limitation: if the header repeats a name, the binary strategy may
/// resolve it to any of the tied offsets while the linear strategy always
/// takes the first. Offsets themselves are unique either way.
pub struct HeaderIndex {
    entries: Vec<(String, usize)>,
    strategy: SearchStrategy,
}

impl HeaderIndex {
    pub fn new<I, S>(fields: I, strategy: SearchStrategy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries: Vec<(String, usize)> = fields
            .into_iter()
            .enumerate()
            .map(|(offset, name)| (name.into(), offset))
            .collect();
        if strategy == SearchStrategy::Binary {
            entries.sort_by(|a, b| a.0.cmp(&b.0));
        }
        Self { entries, strategy }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Column offset of `sample`, or `None` if the header does not contain
    /// it. `None` is the not-found sentinel; missing samples are expected.
    pub fn offset_of(&self, sample: &str) -> Option<usize> {
        match self.strategy {
            SearchStrategy::Binary => self
                .entries
                .binary_search_by(|(name, _)| name.as_str().cmp(sample))
                .ok()
                .map(|at| self.entries[at].1),
            SearchStrategy::Linear => self
                .entries
                .iter()
                .find(|(name, _)| name == sample)
                .map(|&(_, offset)| offset),
        }
    }
}
