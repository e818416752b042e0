//! Source and report configuration types
//!
//! This module defines how the library finds the logical event fields inside a
//! delimited text file and how it lays out the cycle report. Column references
//! are validated and resolved to positions once, when a reader is built.

use crate::types::{DetectorError, Result};
use serde::{Deserialize, Serialize};

/// Default timestamp layout of controller exports (millisecond precision)
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Configuration of the event source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Field delimiter (must be a single ASCII character)
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Whether the first line is a header row
    #[serde(default = "default_true")]
    pub has_header: bool,

    /// `chrono` format string for the timestamp column
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Where each logical field lives in the file
    #[serde(default)]
    pub columns: ColumnMapping,
}

fn default_delimiter() -> char {
    ';'
}

fn default_true() -> bool {
    true
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            has_header: true,
            timestamp_format: default_timestamp_format(),
            columns: ColumnMapping::default(),
        }
    }
}

impl SourceConfig {
    /// Create a source configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the field delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder method: declare whether the file starts with a header row
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Builder method: set the timestamp format
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Builder method: replace the column mapping
    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = columns;
        self
    }

    /// Delimiter as the byte the CSV parser expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        delimiter_byte(self.delimiter)
    }

    /// Check settings that do not depend on the file contents
    pub fn validate(&self) -> Result<()> {
        self.delimiter_byte()?;
        if self.timestamp_format.trim().is_empty() {
            return Err(DetectorError::InvalidConfig(
                "timestamp format must not be empty".to_string(),
            ));
        }
        if !self.has_header {
            if let Some(field) = self.columns.first_named() {
                return Err(DetectorError::InvalidConfig(format!(
                    "column for {} is referenced by name but the source has no header row",
                    field
                )));
            }
        }
        Ok(())
    }
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    if delimiter.is_ascii() && delimiter != '\n' && delimiter != '\r' && delimiter != '"' {
        Ok(delimiter as u8)
    } else {
        Err(DetectorError::InvalidConfig(format!(
            "delimiter {:?} must be a single ASCII character other than a quote or line break",
            delimiter
        )))
    }
}

/// Reference to a source column, by position or by header name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    Index(usize),
    Name(String),
}

impl From<usize> for ColumnRef {
    fn from(index: usize) -> Self {
        ColumnRef::Index(index)
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        ColumnRef::Name(name.to_string())
    }
}

/// Mapping from logical event fields to source columns
///
/// The defaults match the controller export layout:
/// `date;stove;program name;program;event;oven;stove count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    #[serde(default = "default_timestamp_column")]
    pub timestamp: ColumnRef,
    #[serde(default = "default_stove_column")]
    pub stove_id: ColumnRef,
    #[serde(default = "default_program_column")]
    pub program_id: ColumnRef,
    #[serde(default = "default_event_column")]
    pub event_id: ColumnRef,
    #[serde(default = "default_oven_column")]
    pub oven_id: ColumnRef,
    #[serde(default = "default_stove_count_column")]
    pub stove_count: ColumnRef,
}

fn default_timestamp_column() -> ColumnRef {
    ColumnRef::Index(0)
}

fn default_stove_column() -> ColumnRef {
    ColumnRef::Index(1)
}

fn default_program_column() -> ColumnRef {
    ColumnRef::Index(3)
}

fn default_event_column() -> ColumnRef {
    ColumnRef::Index(4)
}

fn default_oven_column() -> ColumnRef {
    ColumnRef::Index(5)
}

fn default_stove_count_column() -> ColumnRef {
    ColumnRef::Index(6)
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            timestamp: default_timestamp_column(),
            stove_id: default_stove_column(),
            program_id: default_program_column(),
            event_id: default_event_column(),
            oven_id: default_oven_column(),
            stove_count: default_stove_count_column(),
        }
    }
}

impl ColumnMapping {
    fn entries(&self) -> [(&'static str, &ColumnRef); 6] {
        [
            ("timestamp", &self.timestamp),
            ("stove_id", &self.stove_id),
            ("program_id", &self.program_id),
            ("event_id", &self.event_id),
            ("oven_id", &self.oven_id),
            ("stove_count", &self.stove_count),
        ]
    }

    fn first_named(&self) -> Option<&'static str> {
        self.entries()
            .iter()
            .find(|(_, column)| matches!(column, ColumnRef::Name(_)))
            .map(|(field, _)| *field)
    }

    /// Resolve every column reference to a position
    ///
    /// `headers` is the header row, if the source has one. Fails when a name
    /// is unknown or when two fields point at the same column.
    pub fn resolve(&self, headers: Option<&csv::StringRecord>) -> Result<ResolvedColumns> {
        let mut positions = [0usize; 6];

        for (slot, (field, column)) in positions.iter_mut().zip(self.entries()) {
            *slot = match column {
                ColumnRef::Index(index) => *index,
                ColumnRef::Name(name) => {
                    let headers = headers.ok_or_else(|| {
                        DetectorError::InvalidConfig(format!(
                            "column for {} is referenced by name but the source has no header row",
                            field
                        ))
                    })?;
                    headers
                        .iter()
                        .position(|header| header.trim() == name.trim())
                        .ok_or_else(|| {
                            DetectorError::InvalidConfig(format!(
                                "column {:?} for {} not found in header",
                                name, field
                            ))
                        })?
                }
            };
        }

        let entries = self.entries();
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                if positions[i] == positions[j] {
                    return Err(DetectorError::InvalidConfig(format!(
                        "fields {} and {} both map to column {}",
                        entries[i].0, entries[j].0, positions[i]
                    )));
                }
            }
        }

        let [timestamp, stove_id, program_id, event_id, oven_id, stove_count] = positions;
        Ok(ResolvedColumns {
            timestamp,
            stove_id,
            program_id,
            event_id,
            oven_id,
            stove_count,
        })
    }
}

/// Column positions after validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub timestamp: usize,
    pub stove_id: usize,
    pub program_id: usize,
    pub event_id: usize,
    pub oven_id: usize,
    pub stove_count: usize,
}

/// Report output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

/// Configuration of the cycle report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: ReportFormat,

    /// Field delimiter for CSV output
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// `chrono` format string for start and end times in CSV output
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::default(),
            delimiter: default_delimiter(),
            timestamp_format: default_timestamp_format(),
        }
    }
}

impl ReportConfig {
    /// Create a report configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the output format
    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    /// Builder method: set the CSV delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder method: set the timestamp format
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Delimiter as the byte the CSV writer expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        delimiter_byte(self.delimiter)
    }
}
