//! Delimited-text loader for training tables.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Separators tried while sniffing, in tie-break order.
const DELIMITER_CANDIDATES: [u8; 5] = [b',', b';', b'\t', b'|', b':'];
/// Non-empty lines inspected while sniffing.
const SNIFF_LINES: usize = 10;
/// Bytes inspected while sniffing.
const SNIFF_BYTES: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum DatasetLoadError {
    #[error("Failed to read dataset {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset has no data rows")]
    Empty,
    #[error("duplicate column `{0}` after label normalization")]
    DuplicateColumn(String),
    #[error("row {row}, column `{column}`: `{value}` is not a number")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
    #[error("No '{0}' column found. Check dataset file.")]
    MissingTarget(String),
    #[error("invalid split: {0}")]
    InvalidSplit(String),
}

/// Fully numeric table with normalized column labels.
#[derive(Debug, Clone)]
pub struct Table {
    /// Normalized labels in file order.
    pub columns: Vec<String>,
    /// Row-major cell values aligned with `columns`.
    pub rows: Vec<Vec<f64>>,
    /// Separator detected for the file.
    pub delimiter: u8,
}

/// Feature matrix split from its regression target.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledData {
    /// Feature column labels in file order (target removed).
    pub feature_names: Vec<String>,
    /// Feature matrix, row-major.
    pub x: Vec<Vec<f64>>,
    /// Target values aligned with `x`.
    pub y: Vec<f64>,
}

impl LabeledData {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Copy the rows at `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            x: indices.iter().map(|&idx| self.x[idx].clone()).collect(),
            y: indices.iter().map(|&idx| self.y[idx]).collect(),
        }
    }
}

impl Table {
    /// Borrow up to the first `n` rows.
    pub fn head(&self, n: usize) -> &[Vec<f64>] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Index of a normalized column label.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Separate the `target` column from the remaining feature columns.
    pub fn split_target(&self, target: &str) -> Result<LabeledData, DatasetLoadError> {
        let target_idx = self
            .column_index(target)
            .ok_or_else(|| DatasetLoadError::MissingTarget(target.to_string()))?;
        let feature_names = self
            .columns
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != target_idx)
            .map(|(_, name)| name.clone())
            .collect();
        let mut x = Vec::with_capacity(self.rows.len());
        let mut y = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let features = row
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != target_idx)
                .map(|(_, &value)| value)
                .collect();
            x.push(features);
            y.push(row[target_idx]);
        }
        Ok(LabeledData { feature_names, x, y })
    }
}

/// Trim and lowercase a column label.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Guess the field separator of delimited text.
///
/// A candidate qualifies when it occurs the same non-zero number of times (outside quotes) on
/// every inspected line; the qualifying candidate with the most occurrences wins. Without a
/// consistent candidate the one most frequent on the header line is used, then `,`.
pub fn sniff_delimiter(text: &str) -> u8 {
    let lines: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();
    let Some(header) = lines.first() else {
        return b',';
    };

    let mut best: Option<(u8, usize)> = None;
    for candidate in DELIMITER_CANDIDATES {
        let first = count_unquoted(header, candidate);
        if first == 0 {
            continue;
        }
        let consistent = lines
            .iter()
            .all(|line| count_unquoted(line, candidate) == first);
        if consistent && best.is_none_or(|(_, count)| first > count) {
            best = Some((candidate, first));
        }
    }
    if let Some((delimiter, _)) = best {
        return delimiter;
    }

    let mut fallback: Option<(u8, usize)> = None;
    for candidate in DELIMITER_CANDIDATES {
        let count = count_unquoted(header, candidate);
        if count > 0 && fallback.is_none_or(|(_, best)| count > best) {
            fallback = Some((candidate, count));
        }
    }
    fallback.map(|(delimiter, _)| delimiter).unwrap_or(b',')
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0usize;
    for byte in line.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
        } else if byte == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

/// Read and parse a delimited file.
pub fn load_table(path: &Path) -> Result<Table, DatasetLoadError> {
    let bytes = std::fs::read(path).map_err(|source| DatasetLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_table(&bytes)
}

/// Parse delimited bytes with a header row into a numeric table.
pub fn parse_table(bytes: &[u8]) -> Result<Table, DatasetLoadError> {
    let sniff_len = bytes.len().min(SNIFF_BYTES);
    let delimiter = sniff_delimiter(&String::from_utf8_lossy(&bytes[..sniff_len]));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(bytes);
    let columns: Vec<String> = reader.headers()?.iter().map(normalize_label).collect();
    for (idx, column) in columns.iter().enumerate() {
        if columns[..idx].contains(column) {
            return Err(DatasetLoadError::DuplicateColumn(column.clone()));
        }
    }

    let mut rows = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let mut row = Vec::with_capacity(columns.len());
        for (column, field) in columns.iter().zip(record.iter()) {
            let value = field
                .trim()
                .parse::<f64>()
                .map_err(|_| DatasetLoadError::InvalidValue {
                    row: row_idx + 1,
                    column: column.clone(),
                    value: field.to_string(),
                })?;
            row.push(value);
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(DatasetLoadError::Empty);
    }

    Ok(Table {
        columns,
        rows,
        delimiter,
    })
}
