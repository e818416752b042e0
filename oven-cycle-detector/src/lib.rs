//! Oven Cycle Detector Library
//!
//! Extracts baking cycles from oven controller event exports and reports the
//! start, end and duration of each one per (stove, program, oven) group.
//!
//! # Architecture
//!
//! - [`reader`] parses delimited text into typed event records
//! - [`grouping`] partitions records by identity and orders each group
//! - [`detector`] runs the baking protocol state machine over one group
//! - [`aggregator`] turns saved sequences into cycle records
//! - [`report`] writes cycle records as delimited text or JSON
//!
//! The library keeps no state between calls and does no process-level setup
//! (logging, thread pools). Those belong to the application layer
//! (oven-cycle-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use oven_cycle_detector::{write_report, CycleExtractor, ReportConfig, SourceConfig};
//! use std::path::Path;
//!
//! let source = SourceConfig::new().with_delimiter(';');
//! let summary = CycleExtractor::new(source)
//!     .extract_file(Path::new("sources_dataset.csv"))
//!     .unwrap();
//!
//! write_report(Path::new("output.csv"), &summary.cycles, &ReportConfig::new()).unwrap();
//! ```

// Public modules
pub mod aggregator;
pub mod config;
pub mod detector;
pub mod extractor;
pub mod grouping;
pub mod reader;
pub mod report;
pub mod types;

// Re-export main types for convenience
pub use aggregator::{aggregate, format_duration};
pub use config::{ColumnMapping, ColumnRef, ReportConfig, ReportFormat, SourceConfig};
pub use detector::{Action, SequenceDetector, State};
pub use extractor::{detect_group, CycleExtractor, ExtractionSummary, OrderingPolicy};
pub use grouping::{group_records, GroupedEvents};
pub use reader::EventReader;
pub use report::{write_report, write_report_stdout, ReportWriter};
pub use types::{
    codes, CycleRecord, DetectorError, EventRecord, GroupKey, Result, Sequence, Timestamp,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
