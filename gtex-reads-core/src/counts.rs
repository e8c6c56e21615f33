//! Single-pass scan of the expression matrix for one gene's read counts.
//!
//! The matrix is line-oriented and far too large to hold in memory, so the
//! scan is one forward pass that stops at the first row matching the
//! requested gene. Expected layout:
//!
//! line 1: version marker (opaque, ignored)
//! line 2: whitespace-separated row and column counts
//! line 3: tab-separated column header
//! line 4+: one gene per row, gene name in the first field, counts aligned
//! to the header

use std::io::BufRead;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use itertools::Itertools;
use log::info;

use crate::error::{ExtractError, Result};
use crate::grouping::GroupTable;
use crate::header::{HeaderIndex, SearchStrategy};

/// Zero-based field holding the gene name in data rows.
pub const GENE_NAME_COLUMN: usize = 0;

/// Per-group read counts, parallel to the `GroupTable`'s group order.
/// Members absent from the matrix header contribute nothing, so a group's
/// sequence may be shorter than its member list, or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupCounts {
    counts: Vec<Vec<i64>>,
}

/// Descriptive statistics for one group, for plot annotation downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub len: usize,
    pub mean: Option<f64>,
    pub stdev: Option<f64>,
}

impl GroupCounts {
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn group(&self, slot: usize) -> &[i64] {
        &self.counts[slot]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[i64]> {
        self.counts.iter().map(|c| c.as_slice())
    }

    /// True when no group collected any counts, e.g. the gene was not in
    /// the matrix.
    pub fn all_empty(&self) -> bool {
        self.counts.iter().all(|c| c.is_empty())
    }

    /// Mean and population standard deviation per group. Empty groups get
    /// `None` statistics rather than an error.
    pub fn summary(&self) -> Vec<GroupSummary> {
        self.counts
            .iter()
            .map(|counts| {
                let len = counts.len();
                if len == 0 {
                    return GroupSummary {
                        len,
                        mean: None,
                        stdev: None,
                    };
                }
                let mean = counts.iter().sum::<i64>() as f64 / len as f64;
                let variance = counts
                    .iter()
                    .map(|&c| {
                        let d = c as f64 - mean;
                        d * d
                    })
                    .sum::<f64>()
                    / len as f64;
                GroupSummary {
                    len,
                    mean: Some(mean),
                    stdev: Some(variance.sqrt()),
                }
            })
            .collect()
    }
}

/// Stream the expression matrix once and collect the counts of `gene` for
/// every group member resolvable through the header.
///
/// Scanning stops at the first matching row; a gene absent from the matrix
/// yields all-empty counts, not an error. A resolved count field that is
/// not an integer is fatal; counts are never coerced.
pub fn collect_group_counts<R: BufRead>(
    reader: R,
    gene: &str,
    groups: &GroupTable,
    strategy: SearchStrategy,
) -> Result<GroupCounts> {
    let mut lines = reader.lines();

    // Version marker, kept for forward compatibility and not interpreted.
    next_line(&mut lines, "version marker")?;
    let (n_rows, n_cols) = parse_dimensions(&next_line(&mut lines, "dimension declaration")?)?;
    let header_line = next_line(&mut lines, "column header")?;
    let index = HeaderIndex::new(header_line.trim_end().split('\t'), strategy);
    info!(
        "expression matrix declares {} rows x {} columns, header has {} fields",
        n_rows,
        n_cols,
        index.len()
    );

    let mut counts = vec![Vec::new(); groups.len()];
    let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr_with_hz(1))
        .with_style(
            ProgressStyle::with_template(
                "{spinner} Scanned {human_pos} gene rows in {elapsed} ({per_sec}) ...",
            )
            .unwrap(),
        );
    for line in lines {
        let line = line?;
        spinner.inc(1);
        let fields: Vec<&str> = line.trim_end().split('\t').collect();
        if fields.get(GENE_NAME_COLUMN).copied() != Some(gene) {
            continue;
        }
        for (slot, (_, members)) in groups.iter().enumerate() {
            for member in members {
                let Some(offset) = index.offset_of(member) else {
                    // Not every attribute-table sample is in the matrix.
                    continue;
                };
                let field = fields.get(offset).ok_or_else(|| {
                    ExtractError::malformed(format!(
                        "row for gene {} has {} fields, sample {} expects offset {}",
                        gene,
                        fields.len(),
                        member,
                        offset
                    ))
                })?;
                let value: i64 = lexical::parse(field).map_err(|_| {
                    ExtractError::malformed(format!(
                        "count field for sample {} is not an integer: {:?}",
                        member, field
                    ))
                })?;
                counts[slot].push(value);
            }
        }
        spinner.finish_and_clear();
        return Ok(GroupCounts { counts });
    }
    spinner.finish_and_clear();
    info!("gene {} not found in the expression matrix", gene);
    Ok(GroupCounts { counts })
}

fn next_line(lines: &mut std::io::Lines<impl BufRead>, what: &str) -> Result<String> {
    match lines.next() {
        Some(line) => Ok(line?),
        None => Err(ExtractError::malformed(format!(
            "expression file ended before the {}",
            what
        ))),
    }
}

fn parse_dimensions(line: &str) -> Result<(u64, u64)> {
    let Some((rows, cols)) = line.split_whitespace().collect_tuple() else {
        return Err(ExtractError::malformed(format!(
            "dimension line must hold exactly two tokens: {:?}",
            line
        )));
    };
    let rows = lexical::parse(rows).map_err(|_| {
        ExtractError::malformed(format!("row count is not an integer: {:?}", rows))
    })?;
    let cols = lexical::parse(cols).map_err(|_| {
        ExtractError::malformed(format!("column count is not an integer: {:?}", cols))
    })?;
    Ok((rows, cols))
}
