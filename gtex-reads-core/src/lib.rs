//! Grouping-and-lookup engine for wide gene-expression matrices.
//!
//! Given a tab-delimited sample-attribute table and a (possibly gzip or
//! zstd compressed) expression matrix, this crate buckets sample columns
//! into named groups by one categorical attribute and extracts the
//! per-group read counts of a single gene in one streaming pass. The
//! output, ordered group labels plus parallel numeric sequences, is what a
//! plotting frontend consumes.
//!
//! The interesting parts are the two strategy knobs: group membership can
//! be indexed by a linear-scan list or a fixed-capacity linear-probing
//! hash table ([`grouping`]), and sample columns can be resolved through a
//! sorted binary-search index or an unsorted linear scan ([`header`]).
//! Either choice of either knob yields identical results on well-formed
//! input.

pub mod counts;
pub mod error;
pub mod grouping;
pub mod header;
pub mod pipeline;
pub mod utils;

pub use counts::{collect_group_counts, GroupCounts, GroupSummary};
pub use error::{ExtractError, Result};
pub use grouping::{build_group_table, GroupStrategy, GroupTable};
pub use header::{HeaderIndex, SearchStrategy};
pub use pipeline::{run, Config};
