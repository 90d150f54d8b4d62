//! Tabular dataset loading and train/test splitting.
//!
//! The trainer reads a delimited text file whose separator is not known up front. Loading sniffs
//! the delimiter, normalizes column labels and parses every cell as a number; splitting shuffles
//! row indices with a seeded RNG so runs are reproducible.

pub mod loader;
pub mod split;

pub use loader::{
    DatasetLoadError, LabeledData, Table, load_table, normalize_label, parse_table,
    sniff_delimiter,
};
pub use split::train_test_split;
