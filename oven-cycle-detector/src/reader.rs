//! Delimited-text event reader
//!
//! Parses controller exports into [`EventRecord`]s. The column mapping is
//! resolved against the header once, when the reader is built; every row
//! after that is read by position.

use crate::config::{ResolvedColumns, SourceConfig};
use crate::types::{DetectorError, EventRecord, Result, Timestamp};
use std::fs::File;
use std::io;
use std::path::Path;

/// Streaming reader over an event export
pub struct EventReader<R: io::Read> {
    reader: csv::Reader<R>,
    columns: ResolvedColumns,
    timestamp_format: String,
    record: csv::StringRecord,
    row: u64,
}

impl EventReader<File> {
    /// Open an export file
    ///
    /// # Example
    /// ```no_run
    /// use oven_cycle_detector::{EventReader, SourceConfig};
    /// use std::path::Path;
    ///
    /// let reader = EventReader::from_path(Path::new("events.csv"), &SourceConfig::new()).unwrap();
    /// let records = reader.read_all().unwrap();
    /// println!("{} events", records.len());
    /// ```
    pub fn from_path(path: &Path, config: &SourceConfig) -> Result<Self> {
        log::info!("Reading events from: {:?}", path);
        let file = File::open(path)?;
        Self::from_reader(file, config)
    }
}

impl<R: io::Read> EventReader<R> {
    /// Wrap any byte source
    pub fn from_reader(source: R, config: &SourceConfig) -> Result<Self> {
        config.validate()?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(config.delimiter_byte()?)
            .has_headers(config.has_header)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        let columns = if config.has_header {
            let headers = reader.headers()?.clone();
            log::debug!("Source header: {:?}", headers);
            config.columns.resolve(Some(&headers))?
        } else {
            config.columns.resolve(None)?
        };
        log::debug!("Resolved columns: {:?}", columns);

        Ok(Self {
            reader,
            columns,
            timestamp_format: config.timestamp_format.clone(),
            record: csv::StringRecord::new(),
            row: 0,
        })
    }

    /// Column positions in use
    pub fn columns(&self) -> ResolvedColumns {
        self.columns
    }

    /// Read every remaining record, stopping at the first bad row
    pub fn read_all(self) -> Result<Vec<EventRecord>> {
        let records = self.collect::<Result<Vec<_>>>()?;
        log::info!("Read {} event records", records.len());
        Ok(records)
    }

    fn parse_current(&self) -> Result<EventRecord> {
        let columns = self.columns;
        Ok(EventRecord {
            timestamp: self.timestamp(columns.timestamp)?,
            oven_id: self.field(columns.oven_id)?.to_string(),
            program_id: self.field(columns.program_id)?.to_string(),
            stove_id: self.field(columns.stove_id)?.to_string(),
            stove_count: self.integer(columns.stove_count, "stove_count")?,
            event_id: self.integer(columns.event_id, "event_id")?,
        })
    }

    fn field(&self, column: usize) -> Result<&str> {
        self.record
            .get(column)
            .ok_or(DetectorError::MissingColumn {
                row: self.row,
                column,
            })
    }

    fn integer(&self, column: usize, name: &'static str) -> Result<i64> {
        let value = self.field(column)?;
        value.parse().map_err(|e: std::num::ParseIntError| DetectorError::InvalidField {
            row: self.row,
            field: name,
            value: value.to_string(),
            reason: e.to_string(),
        })
    }

    fn timestamp(&self, column: usize) -> Result<Timestamp> {
        let value = self.field(column)?;
        Timestamp::parse_from_str(value, &self.timestamp_format).map_err(|e| {
            DetectorError::InvalidField {
                row: self.row,
                field: "timestamp",
                value: value.to_string(),
                reason: e.to_string(),
            }
        })
    }
}

impl<R: io::Read> Iterator for EventReader<R> {
    type Item = Result<EventRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(true) => {
                self.row += 1;
                Some(self.parse_current())
            }
            Ok(false) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}
