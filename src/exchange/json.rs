// JSON envelope for task exchange

use chrono::Local;
use serde::{Deserialize, Serialize};
use crate::models::TaskRecord;

/// Schema tag written into every export
pub const FORMAT_VERSION: &str = "1.0";

/// Export document: `{version, exported_at, tasks}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub version: String,
    pub exported_at: String,
    pub tasks: Vec<TaskRecord>,
}

impl Envelope {
    /// Wrap `tasks` with the current version tag and local time
    pub fn new(tasks: Vec<TaskRecord>) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            exported_at: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            tasks,
        }
    }
}

/// Outcome of reading an import document
#[derive(Debug)]
pub enum Parsed {
    Tasks(Vec<TaskRecord>),
    /// The document has no `tasks` key
    MissingTasks,
}

/// Parse an import document. Only `tasks` is required; `version` and
/// `exported_at` are not checked.
pub fn parse(text: &str) -> serde_json::Result<Parsed> {
    let mut value: serde_json::Value = serde_json::from_str(text)?;
    match value.get_mut("tasks") {
        Some(tasks) => Ok(Parsed::Tasks(serde_json::from_value(tasks.take())?)),
        None => Ok(Parsed::MissingTasks),
    }
}
