//! Import and export of the whole task collection
//!
//! Exports read through [`TaskStore::get_all`]. Imports parse the file
//! completely, then replace the store contents in a single transaction:
//! a bad file or a failing insert leaves the existing tasks untouched.

pub mod csv;
pub mod json;

use chrono::Local;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use thiserror::Error;
use crate::db::DbConnection;
use crate::models::TaskRecord;
use crate::store::TaskStore;

/// Why an import did not apply
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid file format: no tasks found")]
    MissingTasks,
    #[error("No tasks found in CSV file")]
    NoRows,
    #[error("Error importing data: {0:#}")]
    Failed(#[from] anyhow::Error),
}

/// Result of a successful import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub count: usize,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Successfully imported {} tasks", self.count)
    }
}

/// Export format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Csv,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Csv => "csv",
        }
    }
}

/// Directory generated export files land in: `<data dir>/exports`
pub fn default_export_dir() -> Result<PathBuf> {
    Ok(DbConnection::data_dir()?.join("exports"))
}

/// Import/export adapter over a task store
pub struct DataExchange<'a> {
    store: &'a TaskStore,
    export_dir: PathBuf,
}

impl<'a> DataExchange<'a> {
    pub fn new(store: &'a TaskStore, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            export_dir: export_dir.into(),
        }
    }

    /// Timestamped file name under the export directory
    pub fn default_export_path(&self, format: Format) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        self.export_dir
            .join(format!("eisenhower_matrix_export_{}.{}", stamp, format.extension()))
    }

    /// Write every task to `path` (or a generated path) as an indented JSON envelope
    pub fn export_json(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = self.resolve_output(path, Format::Json);
        let envelope = json::Envelope::new(self.store.get_all());
        let bytes = serde_json::to_vec_pretty(&envelope)?;
        write_atomic(&path, &bytes)?;
        log::info!("Exported {} tasks to {}", envelope.tasks.len(), path.display());
        Ok(path)
    }

    /// Write every task to `path` (or a generated path) as CSV
    pub fn export_csv(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = self.resolve_output(path, Format::Csv);
        let records = self.store.get_all();
        write_atomic(&path, csv::write_records(&records).as_bytes())?;
        log::info!("Exported {} tasks to {}", records.len(), path.display());
        Ok(path)
    }

    /// Replace all tasks with the contents of a JSON export
    pub fn import_json(&self, path: &Path) -> Result<ImportSummary, ImportError> {
        let text = read_file(path)?;
        let parsed = json::parse(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        match parsed {
            json::Parsed::Tasks(records) => self.replace(&records),
            json::Parsed::MissingTasks => Err(ImportError::MissingTasks),
        }
    }

    /// Replace all tasks with the rows of a CSV export
    pub fn import_csv(&self, path: &Path) -> Result<ImportSummary, ImportError> {
        let text = read_file(path)?;
        let records = csv::read_records(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        if records.is_empty() {
            return Err(ImportError::NoRows);
        }
        self.replace(&records)
    }

    fn replace(&self, records: &[TaskRecord]) -> Result<ImportSummary, ImportError> {
        let count = self.store.replace_all(records)?;
        log::info!("Imported {} tasks", count);
        Ok(ImportSummary { count })
    }

    fn resolve_output(&self, path: Option<&Path>, format: Format) -> PathBuf {
        match path {
            Some(p) => p.to_path_buf(),
            None => self.default_export_path(format),
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write through a temporary sibling file and rename into place
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);
    fs::write(&tmp, bytes).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seeded_store() -> TaskStore {
        let store = TaskStore::in_memory().unwrap();
        store.add("a", "Important & Urgent", "File taxes", false);
        store.add("b", "Important & Urgent", "Pay rent, today", true);
        store.add("c", "Not Important & Not Urgent", "Sort \"junk\" drawer", false);
        store
    }

    #[test]
    fn test_json_round_trip_into_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let source = seeded_store();
        let path = DataExchange::new(&source, temp_dir.path())
            .export_json(None)
            .unwrap();
        assert!(path.starts_with(temp_dir.path()));
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("eisenhower_matrix_export_"));

        let target = TaskStore::in_memory().unwrap();
        let summary = DataExchange::new(&target, temp_dir.path()).import_json(&path).unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.to_string(), "Successfully imported 3 tasks");
        assert_eq!(target.get_all(), source.get_all());
    }

    #[test]
    fn test_csv_round_trip_preserves_done() {
        let temp_dir = TempDir::new().unwrap();
        let source = seeded_store();
        let path = temp_dir.path().join("out.csv");
        let written = DataExchange::new(&source, temp_dir.path())
            .export_csv(Some(path.as_path()))
            .unwrap();
        assert_eq!(written, path);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("ID,Quadrant,Description,Status\r\n"));
        assert!(text.contains(",Done\r\n"));
        assert!(text.contains(",Pending\r\n"));

        let target = TaskStore::in_memory().unwrap();
        DataExchange::new(&target, temp_dir.path()).import_csv(&path).unwrap();
        assert_eq!(target.get_all(), source.get_all());
    }

    #[test]
    fn test_import_replaces_existing_tasks() {
        let temp_dir = TempDir::new().unwrap();
        let source = seeded_store();
        let path = DataExchange::new(&source, temp_dir.path()).export_json(None).unwrap();

        let target = TaskStore::in_memory().unwrap();
        target.add("old", "Q9", "will be cleared", false);
        DataExchange::new(&target, temp_dir.path()).import_json(&path).unwrap();

        assert!(target.get("old").is_none());
        assert_eq!(target.get_all().len(), 3);
    }

    #[test]
    fn test_json_without_tasks_key_leaves_store_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, r#"{"version": "1.0", "exported_at": "2026-01-01T00:00:00"}"#).unwrap();

        let store = seeded_store();
        let err = DataExchange::new(&store, temp_dir.path()).import_json(&path).unwrap_err();
        assert!(matches!(err, ImportError::MissingTasks));
        assert_eq!(err.to_string(), "Invalid file format: no tasks found");
        assert_eq!(store.get_all().len(), 3);
    }

    #[test]
    fn test_empty_csv_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.csv");
        fs::write(&path, "ID,Quadrant,Description,Status\n").unwrap();

        let store = seeded_store();
        let err = DataExchange::new(&store, temp_dir.path()).import_csv(&path).unwrap_err();
        assert_eq!(err.to_string(), "No tasks found in CSV file");
        assert_eq!(store.get_all().len(), 3);
    }

    #[test]
    fn test_failed_insert_rolls_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dup.csv");
        fs::write(&path, "ID,Quadrant,Description,Status\nx,Q1,one,Done\nx,Q2,two,Pending\n").unwrap();

        let store = seeded_store();
        let err = DataExchange::new(&store, temp_dir.path()).import_csv(&path).unwrap_err();
        assert!(err.to_string().starts_with("Error importing data:"));
        assert_eq!(store.get_all().len(), 3);
    }

    #[test]
    fn test_short_csv_row_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("short.csv");
        fs::write(&path, "ID,Quadrant,Description,Status\nx,Q1,one,Done\n,Q2\n").unwrap();

        let store = seeded_store();
        let err = DataExchange::new(&store, temp_dir.path()).import_csv(&path).unwrap_err();
        assert!(matches!(err, ImportError::Failed(_)));
        assert!(err.to_string().contains("record 2"));
        assert_eq!(store.get_all().len(), 3);
    }

    #[test]
    fn test_missing_file_reports_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store();
        let err = DataExchange::new(&store, temp_dir.path())
            .import_json(&temp_dir.path().join("nope.json"))
            .unwrap_err();
        assert!(matches!(err, ImportError::Failed(_)));
    }
}
