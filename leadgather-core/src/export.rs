// Listing export: JSON and CSV files, plus the raw page fallback

use crate::error::{ConfigError, ExportError};
use leadgather_scanner::{ListingRecord, RawPageFallback};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Csv,
    Both,
}

impl FromStr for ExportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "both" | "all" => Ok(ExportFormat::Both),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

impl ExportFormat {
    pub fn includes_json(&self) -> bool {
        matches!(self, ExportFormat::Json | ExportFormat::Both)
    }

    pub fn includes_csv(&self) -> bool {
        matches!(self, ExportFormat::Csv | ExportFormat::Both)
    }
}

/// Pretty-printed JSON array. Non-ASCII text is written as-is.
pub fn render_json(records: &[ListingRecord]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn parse_json(content: &str) -> Result<Vec<ListingRecord>, ExportError> {
    Ok(serde_json::from_str(content)?)
}

/// CSV with a header row even when there are no records.
pub fn render_csv(records: &[ListingRecord]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(ListingRecord::FIELDS)?;
    for record in records {
        writer.serialize(record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

pub fn save_export(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Write every file the format asks for, overwriting earlier runs.
/// Returns the paths written, JSON first.
pub fn export_records(
    records: &[ListingRecord],
    format: ExportFormat,
    json_path: &Path,
    csv_path: &Path,
) -> Result<Vec<PathBuf>, ExportError> {
    let mut written = Vec::new();

    if format.includes_json() {
        save_export(&render_json(records)?, json_path)?;
        info!("Wrote {} listing(s) to {}", records.len(), json_path.display());
        written.push(json_path.to_path_buf());
    }

    if format.includes_csv() {
        save_export(&render_csv(records)?, csv_path)?;
        info!("Wrote {} listing(s) to {}", records.len(), csv_path.display());
        written.push(csv_path.to_path_buf());
    }

    Ok(written)
}

pub fn write_raw_fallback(fallback: &RawPageFallback, path: &Path) -> Result<(), ExportError> {
    save_export(&fallback.markup, path)?;
    info!(
        "Saved raw page ({} bytes, title {:?}) to {}",
        fallback.markup.len(),
        fallback.title,
        path.display()
    );
    Ok(())
}
