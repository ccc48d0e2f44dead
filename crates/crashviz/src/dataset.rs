//! The in-memory crash dataset.
//!
//! A [`Dataset`] is built once per session and then shared read-only by every
//! aggregation and render. Cloning is cheap.

use std::sync::Arc;

use tracing::debug;

use crate::aggregate;
use crate::error::Result;
use crate::record::{CrashRecord, RawRow};

/// Immutable, shared set of crash records.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Arc<[CrashRecord]>,
    bounds: Option<(i32, i32)>,
}

impl Dataset {
    /// Wrap already-parsed records.
    #[must_use]
    pub fn new(records: Vec<CrashRecord>) -> Self {
        let bounds = aggregate::year_bounds(&records);
        Self {
            records: records.into(),
            bounds,
        }
    }

    /// Parse raw rows, failing on the first malformed record.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MalformedRecord`] for the first row whose date
    /// cannot be parsed. No partial dataset is produced.
    pub fn from_rows<I>(rows: I, date_format: &str) -> Result<Self>
    where
        I: IntoIterator<Item = RawRow>,
    {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, raw)| CrashRecord::parse(&raw, i + 1, date_format))
            .collect::<Result<Vec<_>>>()?;
        debug!(records = records.len(), "Parsed crash records");
        Ok(Self::new(records))
    }

    /// All records in input order.
    #[must_use]
    pub fn records(&self) -> &[CrashRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest year present, or `None` when empty.
    #[must_use]
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.bounds
    }
}
