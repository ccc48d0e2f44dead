//! Crash record types for crashviz.
//!
//! This module defines the raw row shape read from the crash CSV and the
//! typed [`CrashRecord`] every other component works with.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One row of the crash CSV, exactly as written in the file.
///
/// Only `Date` is required; the other columns fall back to empty text
/// when absent. Columns not listed here are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// Crash date, `MM/DD/YYYY` in the source data.
    #[serde(rename = "Date")]
    pub date: String,

    /// Airline or other operator of the aircraft.
    #[serde(rename = "Operator", default)]
    pub operator: String,

    /// Number of people killed; may be blank.
    #[serde(rename = "Fatalities", default)]
    pub fatalities: String,

    /// Free-text description of the crash.
    #[serde(rename = "Summary", default)]
    pub summary: String,

    /// Crash location.
    #[serde(rename = "Location", default)]
    pub location: String,

    /// Aircraft type.
    #[serde(rename = "Type", default)]
    pub aircraft_type: String,

    /// Number of people aboard; may be blank.
    #[serde(rename = "Aboard", default)]
    pub aboard: String,
}

/// A single crash, normalized and immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrashRecord {
    /// When the crash occurred.
    pub date: NaiveDate,

    /// Calendar year of `date`.
    pub year: i32,

    /// Operator name, trimmed. May be empty.
    pub operator: String,

    /// Number of fatalities (0 when unknown).
    pub fatalities: u32,

    /// Free-text description of the crash.
    pub summary: String,

    /// Crash location, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Aircraft type, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aircraft_type: Option<String>,

    /// Number of people aboard, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aboard: Option<u32>,
}

impl CrashRecord {
    /// Create a record from already-typed fields.
    ///
    /// The year is derived from `date`.
    #[must_use]
    pub fn new(
        date: NaiveDate,
        operator: impl Into<String>,
        fatalities: u32,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            date,
            year: date.year(),
            operator: operator.into(),
            fatalities,
            summary: summary.into(),
            location: None,
            aircraft_type: None,
            aboard: None,
        }
    }

    /// Parse a raw CSV row into a record.
    ///
    /// `row` is the one-based data row number, used only for error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRecord`] if the date does not match
    /// `date_format`.
    pub fn parse(raw: &RawRow, row: usize, date_format: &str) -> Result<Self> {
        let date_text = raw.date.trim();
        let date = NaiveDate::parse_from_str(date_text, date_format)
            .map_err(|_| Error::malformed_record(row, date_text))?;

        Ok(Self {
            date,
            year: date.year(),
            operator: raw.operator.trim().to_string(),
            fatalities: parse_count(&raw.fatalities).unwrap_or(0),
            summary: raw.summary.trim().to_string(),
            location: non_empty(&raw.location),
            aircraft_type: non_empty(&raw.aircraft_type),
            aboard: parse_count(&raw.aboard),
        })
    }

    /// Format the date the way tooltips display it.
    #[must_use]
    pub fn display_date(&self) -> String {
        self.date.format("%-m/%-d/%Y").to_string()
    }
}

/// Parse a non-negative count, accepting `"12"` and `"12.0"`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_count(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(n) = text.parse::<u32>() {
        return Some(n);
    }
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 && n <= f64::from(u32::MAX) => Some(n as u32),
        _ => None,
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
