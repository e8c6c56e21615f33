//! End-to-end composition: attribute table -> group table -> matrix scan.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;

use crate::counts::{collect_group_counts, GroupCounts};
use crate::error::{ExtractError, Result};
use crate::grouping::{build_group_table, GroupStrategy};
use crate::header::SearchStrategy;
use crate::utils::open_file_for_read;

/// Strategy selection for one run. Built (and validated) before any file
/// is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub group_strategy: GroupStrategy,
    pub search_strategy: SearchStrategy,
}

impl Config {
    /// Parse the textual selectors handed over by the invocation layer.
    /// An unrecognized selector fails here, before any I/O.
    pub fn from_selectors(group: &str, search: &str) -> Result<Self> {
        Ok(Self {
            group_strategy: group.parse()?,
            search_strategy: search.parse()?,
        })
    }
}

/// Run the whole extraction: group the attribute table's samples by
/// `group_col`, then stream the expression matrix once for `gene`.
///
/// Returns the ordered group names (axis labels for the plotting consumer)
/// and the per-group counts, parallel to each other. The attribute file is
/// small and read fully into memory; the expression file is streamed and
/// both handles are released on every exit path.
pub fn run(
    attribute_path: &Path,
    expression_path: &Path,
    gene: &str,
    group_col: &str,
    config: &Config,
) -> Result<(Vec<String>, GroupCounts)> {
    let (header, rows) = read_attribute_table(attribute_path)?;
    let groups = build_group_table(&header, &rows, group_col, config.group_strategy)?;
    info!(
        "grouped {} attribute rows into {} {:?} groups",
        rows.len(),
        groups.len(),
        group_col
    );

    let reader = BufReader::new(open_file_for_read(expression_path)?);
    let counts = collect_group_counts(reader, gene, &groups, config.search_strategy)?;

    let names = groups.names().map(str::to_string).collect();
    Ok((names, counts))
}

/// Read the whole attribute table: tab-split header plus tab-split rows.
/// Blank lines are ignored.
fn read_attribute_table(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();
    let header = match lines.next() {
        Some(line) => split_tabs(line?.trim_end()),
        None => {
            return Err(ExtractError::malformed(format!(
                "attribute file is empty: {}",
                path.display()
            )))
        }
    };
    let mut rows = Vec::new();
    for line in lines {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        rows.push(split_tabs(line));
    }
    Ok((header, rows))
}

fn split_tabs(line: &str) -> Vec<String> {
    line.split('\t').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ATTRIBUTES: &str = "SAMPID\tSMTS\tSMTSD\n\
        S1\tLung\tLung\n\
        S2\tLung\tLung\n\
        S3\tHeart\tHeart - Left Ventricle\n";

    const EXPRESSION: &str = "v1.2\n2 5\nName\tID\tS1\tS2\tS3\n\
        TP53\t0\t1\t2\t3\nBRCA1\t1\t10\t20\t30\n";

    fn write_attributes() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(ATTRIBUTES.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn write_expression_gz() -> NamedTempFile {
        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(EXPRESSION.as_bytes()).unwrap();
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&encoder.finish().unwrap()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn invalid_selector_fails_before_io() {
        let err = Config::from_selectors("trie", "binary").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidStrategy { selector } if selector == "trie"));
        assert!(Config::from_selectors("hash", "bogus").is_err());
        assert!(Config::from_selectors("array", "l").is_ok());
    }

    #[test]
    fn extracts_grouped_counts_from_gzip_matrix() {
        let attributes = write_attributes();
        let expression = write_expression_gz();
        let config = Config::from_selectors("hash", "binary").unwrap();
        let (names, counts) =
            run(attributes.path(), expression.path(), "BRCA1", "SMTS", &config).unwrap();
        assert_eq!(names, vec!["Lung", "Heart"]);
        assert_eq!(counts.group(0), &[10, 20]);
        assert_eq!(counts.group(1), &[30]);
    }

    #[test]
    fn all_strategy_combinations_agree() {
        let attributes = write_attributes();
        let expression = write_expression_gz();
        let mut results = Vec::new();
        for group in ["array", "hash"] {
            for search in ["binary", "linear"] {
                let config = Config::from_selectors(group, search).unwrap();
                results.push(
                    run(attributes.path(), expression.path(), "BRCA1", "SMTS", &config).unwrap(),
                );
            }
        }
        for pair in results.windows(2) {
            assert_eq!(pair[0], pair[1]);
        }
    }

    #[test]
    fn repeated_runs_are_idempotent() {
        let attributes = write_attributes();
        let expression = write_expression_gz();
        let config = Config::from_selectors("array", "binary").unwrap();
        let first = run(attributes.path(), expression.path(), "BRCA1", "SMTS", &config).unwrap();
        let second = run(attributes.path(), expression.path(), "BRCA1", "SMTS", &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn grouping_by_the_finer_attribute_changes_labels() {
        let attributes = write_attributes();
        let expression = write_expression_gz();
        let config = Config::from_selectors("array", "linear").unwrap();
        let (names, counts) =
            run(attributes.path(), expression.path(), "BRCA1", "SMTSD", &config).unwrap();
        assert_eq!(names, vec!["Lung", "Heart - Left Ventricle"]);
        assert_eq!(counts.group(1), &[30]);
    }

    #[test]
    fn unknown_gene_degrades_to_empty_groups() {
        let attributes = write_attributes();
        let expression = write_expression_gz();
        let config = Config::from_selectors("hash", "linear").unwrap();
        let (names, counts) =
            run(attributes.path(), expression.path(), "NOPE", "SMTS", &config).unwrap();
        assert_eq!(names.len(), 2);
        assert!(counts.all_empty());
    }

    #[test]
    fn missing_group_column_is_a_schema_error() {
        let attributes = write_attributes();
        let expression = write_expression_gz();
        let config = Config::from_selectors("array", "binary").unwrap();
        let err = run(attributes.path(), expression.path(), "BRCA1", "SMNABTCH", &config)
            .unwrap_err();
        assert!(matches!(err, ExtractError::Schema { .. }));
    }

    #[test]
    fn plain_text_expression_file_also_streams() {
        let attributes = write_attributes();
        let mut expression = NamedTempFile::new().unwrap();
        expression.write_all(EXPRESSION.as_bytes()).unwrap();
        expression.flush().unwrap();
        let config = Config::from_selectors("array", "binary").unwrap();
        let (_, counts) =
            run(attributes.path(), expression.path(), "BRCA1", "SMTS", &config).unwrap();
        assert_eq!(counts.group(0), &[10, 20]);
    }
}
