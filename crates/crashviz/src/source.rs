//! Record sources for crashviz.
//!
//! A [`RecordSource`] supplies raw crash rows. Loading is the only
//! asynchronous step in a session: once [`load_dataset`] returns, every
//! aggregation and render is synchronous.

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::record::RawRow;

/// Trait for anything that can supply raw crash rows.
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    /// A short description of this source (for logging).
    fn describe(&self) -> String;

    /// Fetch every raw row, in input order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying data cannot be read or tokenised.
    async fn fetch(&self) -> Result<Vec<RawRow>>;
}

/// Reads rows from a CSV file with a header line.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    /// Create a source for the given file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the CSV file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl RecordSource for CsvFileSource {
    fn describe(&self) -> String {
        format!("csv file {}", self.path.display())
    }

    async fn fetch(&self) -> Result<Vec<RawRow>> {
        debug!("Reading {}", self.path.display());
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| Error::DataFile {
                path: self.path.clone(),
                source,
            })?;
        read_rows(bytes.as_slice())
    }
}

/// Serves rows held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: Vec<RawRow>,
}

impl MemorySource {
    /// Create a source over the given rows.
    #[must_use]
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }
}

#[async_trait::async_trait]
impl RecordSource for MemorySource {
    fn describe(&self) -> String {
        format!("{} in-memory rows", self.rows.len())
    }

    async fn fetch(&self) -> Result<Vec<RawRow>> {
        Ok(self.rows.clone())
    }
}

/// Deserialize CSV rows from any reader.
///
/// Rows may have more or fewer fields than the header; missing optional
/// columns come back empty.
///
/// # Errors
///
/// Returns [`Error::Csv`] if the input cannot be tokenised or a row lacks the
/// `Date` column.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::with_capacity(8_192);
    for result in rdr.deserialize() {
        let row: RawRow = result?;
        rows.push(row);
    }
    Ok(rows)
}

/// Fetch every row from `source` and build the session dataset.
///
/// # Errors
///
/// Returns an error if fetching fails or any row is malformed; no partial
/// dataset is returned.
pub async fn load_dataset(source: &dyn RecordSource, date_format: &str) -> Result<Dataset> {
    let rows = source.fetch().await?;
    let dataset = Dataset::from_rows(rows, date_format)?;

    match dataset.year_bounds() {
        Some((first, last)) => info!(
            records = dataset.len(),
            first_year = first,
            last_year = last,
            "Loaded dataset from {}",
            source.describe()
        ),
        None => info!("Loaded empty dataset from {}", source.describe()),
    }
    Ok(dataset)
}
