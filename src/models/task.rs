use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Quadrant labels tasks are filed under by default
///
/// Stored quadrant values are plain text and do not follow later renames of
/// the display names in the settings document.
pub const DEFAULT_QUADRANT_NAMES: [&str; 4] = [
    "Important & Urgent",
    "Important but Not Urgent",
    "Not Important but Urgent",
    "Not Important & Not Urgent",
];

/// Task model (one row of the `tasks` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub quadrant: String,
    pub description: String,
    pub done: bool,
    pub created_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
    pub deleted: bool,
}

/// Exchange shape of a task: the fields carried through export and import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub quadrant: String,
    pub description: String,
    pub done: bool,
}

impl TaskRecord {
    /// Create a pending task record with a fresh id
    pub fn new(quadrant: &str, description: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            quadrant: quadrant.to_string(),
            description: description.to_string(),
            done: false,
        }
    }
}

/// A task as listed inside its quadrant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuadrantItem {
    pub id: String,
    pub description: String,
    pub done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let record = TaskRecord::new("Q1", "Call dentist");
        assert_eq!(record.quadrant, "Q1");
        assert_eq!(record.description, "Call dentist");
        assert!(!record.done);
        assert!(uuid::Uuid::parse_str(&record.id).is_ok());
        assert_ne!(record.id, TaskRecord::new("Q1", "Call dentist").id);
    }

    #[test]
    fn test_record_json_shape() {
        let record = TaskRecord {
            id: "a".to_string(),
            quadrant: "Q1".to_string(),
            description: "x".to_string(),
            done: true,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], "a");
        assert_eq!(value["done"], true);
        assert_eq!(value.as_object().unwrap().len(), 4);
    }
}
