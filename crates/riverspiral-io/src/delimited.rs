//! Delimited text (CSV) reader.
//!
//! The first record is the header row. Rows may have fewer or more
//! fields than the header; missing trailing fields read as empty and
//! extra fields are kept but never looked up.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use riverspiral_pipeline::{ContinentGroups, LayoutConfig, PipelineError, Table};

/// Errors that can occur while loading a river table.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The input file could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The delimited text could not be read.
    #[error("failed to read delimited text: {0}")]
    Csv(#[from] csv::Error),

    /// The table was read but its contents are unusable.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Options for reading delimited text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl CsvOptions {
    /// Comma, the default delimiter.
    pub const DEFAULT_DELIMITER: u8 = b',';
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: Self::DEFAULT_DELIMITER,
        }
    }
}

/// Read a header-first delimited table from `reader`.
///
/// # Errors
///
/// Returns [`LoadError::Csv`] if the text is not valid delimited text
/// (e.g. invalid UTF-8 or an unterminated quote).
pub fn read_table<R: Read>(reader: R, options: &CsvOptions) -> Result<Table, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut table = Table::new(csv_reader.headers()?.iter());
    for record in csv_reader.records() {
        let record = record?;
        table.push_row(record.iter());
    }

    tracing::debug!(
        columns = table.headers().len(),
        rows = table.row_count(),
        "read delimited table"
    );
    Ok(table)
}

/// Read a header-first delimited table from the file at `path`.
///
/// # Errors
///
/// Returns [`LoadError::Open`] if the file cannot be opened, otherwise
/// the same errors as [`read_table`].
pub fn load_table(path: &Path, options: &CsvOptions) -> Result<Table, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "loading river table");
    read_table(file, options)
}

/// Load the file at `path` and run the pipeline's load pass on it.
///
/// # Errors
///
/// Returns the errors of [`load_table`], and [`LoadError::Pipeline`] if
/// deduplication or aggregation rejects the table.
pub fn load_groups(
    path: &Path,
    options: &CsvOptions,
    config: &LayoutConfig,
) -> Result<ContinentGroups, LoadError> {
    let table = load_table(path, options)?;
    Ok(riverspiral_pipeline::process(&table, config)?)
}
