//! Cycle report output
//!
//! Writes [`CycleRecord`]s as delimited text (one row per cycle) or as a
//! JSON array.

use crate::config::{ReportConfig, ReportFormat};
use crate::types::{CycleRecord, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Column headers of the delimited report, in output order
pub const REPORT_HEADERS: [&str; 7] = [
    "Start time",
    "End time",
    "Oven",
    "Program number",
    "Stove number",
    "Stove count",
    "Duration",
];

/// Report writer over any byte sink
pub struct ReportWriter<W: Write> {
    sink: W,
    config: ReportConfig,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W, config: ReportConfig) -> Self {
        Self { sink, config }
    }

    /// Write all cycles and flush the sink
    pub fn write(&mut self, cycles: &[CycleRecord]) -> Result<()> {
        match self.config.format {
            ReportFormat::Csv => self.write_csv(cycles)?,
            ReportFormat::Json => {
                serde_json::to_writer_pretty(&mut self.sink, cycles)?;
                writeln!(self.sink)?;
            }
        }
        self.sink.flush()?;
        log::debug!("Wrote {} cycle(s) as {:?}", cycles.len(), self.config.format);
        Ok(())
    }

    fn write_csv(&mut self, cycles: &[CycleRecord]) -> Result<()> {
        let format = self.config.timestamp_format.as_str();
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.config.delimiter_byte()?)
            .from_writer(&mut self.sink);

        writer.write_record(REPORT_HEADERS)?;
        for cycle in cycles {
            let stove_count = cycle.stove_count.to_string();
            writer.write_record([
                cycle.start_time.format(format).to_string().as_str(),
                cycle.end_time.format(format).to_string().as_str(),
                cycle.oven_id.as_str(),
                cycle.program_id.as_str(),
                cycle.stove_id.as_str(),
                stove_count.as_str(),
                cycle.duration.as_str(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Give back the underlying sink
    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Write a report file
pub fn write_report(path: &Path, cycles: &[CycleRecord], config: &ReportConfig) -> Result<()> {
    log::info!("Writing {} cycle(s) to: {:?}", cycles.len(), path);
    let file = File::create(path)?;
    ReportWriter::new(BufWriter::new(file), config.clone()).write(cycles)
}

/// Write a report to standard output
pub fn write_report_stdout(cycles: &[CycleRecord], config: &ReportConfig) -> Result<()> {
    let stdout = io::stdout();
    ReportWriter::new(stdout.lock(), config.clone()).write(cycles)
}
