//! Configuration loading and parsing

use anyhow::{Context, Result};
use oven_cycle_detector::{ReportConfig, SourceConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
///
/// Every section is optional; an empty file reproduces the defaults of the
/// controller export format.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    pub file: Option<PathBuf>,
    #[serde(flatten)]
    pub source: SourceConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    pub file: Option<PathBuf>,
    #[serde(flatten)]
    pub report: ReportConfig,
    /// Order cycles by start time instead of by group
    #[serde(default)]
    pub sort_by_start: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProcessingConfig {
    /// Sort groups by timestamp (false: validate the input order instead)
    #[serde(default = "default_true")]
    pub sort_groups: bool,
    /// Worker threads for group detection (default: one per core)
    pub threads: Option<usize>,
}

fn default_true() -> bool {
    true
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            sort_groups: true,
            threads: None,
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .input
        .source
        .validate()
        .with_context(|| format!("Invalid input section in config file: {:?}", path))?;
    config
        .output
        .report
        .delimiter_byte()
        .with_context(|| format!("Invalid output section in config file: {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oven_cycle_detector::{ColumnRef, ReportFormat};

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [input]
            file = "files/sources_dataset.csv"
            delimiter = ","
            timestamp_format = "%Y-%m-%dT%H:%M:%S"

            [input.columns]
            event_id = "EVENT_ID"
            oven_id = 2

            [output]
            file = "files/output.csv"
            format = "json"
            sort_by_start = true

            [processing]
            sort_groups = false
            threads = 2
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(
            config.input.file,
            Some(PathBuf::from("files/sources_dataset.csv"))
        );
        assert_eq!(config.input.source.delimiter, ',');
        assert!(config.input.source.has_header);
        assert_eq!(
            config.input.source.columns.event_id,
            ColumnRef::Name("EVENT_ID".to_string())
        );
        assert_eq!(config.input.source.columns.oven_id, ColumnRef::Index(2));
        assert_eq!(config.input.source.columns.timestamp, ColumnRef::Index(0));
        assert_eq!(config.output.report.format, ReportFormat::Json);
        assert!(config.output.sort_by_start);
        assert!(!config.processing.sort_groups);
        assert_eq!(config.processing.threads, Some(2));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.input.file.is_none());
        assert_eq!(config.input.source, SourceConfig::default());
        assert_eq!(config.output.report, ReportConfig::default());
        assert!(config.processing.sort_groups);
    }

    #[test]
    fn test_load_config_rejects_bad_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[input]\ndelimiter = \"\\n\"\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("delimiter"));
    }

    #[test]
    fn test_load_missing_config() {
        let err = load_config(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
