//! Symbol universe — ordered, deduplicated ticker list from a CSV column.
//!
//! The universe file is a plain CSV with a header row; the symbol column
//! (default `SYMBOL`) is read in order, trimmed, and deduplicated. An
//! unreadable universe is a setup failure and aborts the batch.

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_SYMBOL_COLUMN: &str = "SYMBOL";

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("read universe file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse universe CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("universe CSV has no '{column}' column")]
    MissingColumn { column: String },
}

/// The ordered, deduplicated ticker list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Universe {
    symbols: Vec<String>,
}

impl Universe {
    /// Build from any symbol iterator, preserving first-seen order.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let symbols = symbols
            .into_iter()
            .map(Into::into)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect();
        Self { symbols }
    }

    /// Load from a CSV file, taking symbols from the named column.
    pub fn from_csv_file(path: &Path, column: &str) -> Result<Self, UniverseError> {
        let mut reader = csv::Reader::from_path(path)?;

        let headers = reader.headers()?;
        let index = headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| UniverseError::MissingColumn {
                column: column.to_string(),
            })?;

        let mut symbols = Vec::new();
        for record in reader.records() {
            let record = record?;
            if let Some(field) = record.get(index) {
                symbols.push(field.to_string());
            }
        }

        Ok(Self::from_symbols(symbols))
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn dedup_preserves_first_seen_order() {
        let universe =
            Universe::from_symbols(["RELIANCE", "TCS", "RELIANCE", " INFY ", "", "TCS"]);
        assert_eq!(universe.symbols(), ["RELIANCE", "TCS", "INFY"]);
    }

    #[test]
    fn loads_symbol_column_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("universe.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "COMPANY,SYMBOL,SERIES").unwrap();
        writeln!(file, "Reliance Industries,RELIANCE,EQ").unwrap();
        writeln!(file, "Tata Consultancy,TCS,EQ").unwrap();
        writeln!(file, "Reliance Industries,RELIANCE,EQ").unwrap();

        let universe = Universe::from_csv_file(&path, DEFAULT_SYMBOL_COLUMN).unwrap();
        assert_eq!(universe.symbols(), ["RELIANCE", "TCS"]);
        assert_eq!(universe.len(), 2);
    }

    #[test]
    fn missing_column_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("universe.csv");
        std::fs::write(&path, "TICKER\nRELIANCE\n").unwrap();

        match Universe::from_csv_file(&path, "SYMBOL") {
            Err(UniverseError::MissingColumn { column }) => assert_eq!(column, "SYMBOL"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = Path::new("/nonexistent/universe.csv");
        assert!(Universe::from_csv_file(path, "SYMBOL").is_err());
    }
}
