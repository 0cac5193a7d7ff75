//! Task store facade
//!
//! `TaskStore` owns the process-lifetime database connection and exposes the
//! task operations with the failure contract the presentation layer expects:
//! storage errors are logged and reported as `false` or an empty result
//! rather than propagated. Callers that need the underlying error use
//! [`TaskRepo`] and [`StatsRepo`] directly through [`TaskStore::conn`].
//!
//! Because errors are flattened, "not found" and "storage error" are
//! indistinguishable for `update_*`, `move_task` and `delete`; an unknown id
//! is a successful no-op.

use rusqlite::Connection;
use anyhow::Result;
use crate::db::DbConnection;
use crate::models::{QuadrantItem, Statistics, Task, TaskRecord};
use crate::repo::{StatsRepo, TaskRepo};

pub struct TaskStore {
    conn: Connection,
}

impl TaskStore {
    /// Wrap an already initialized connection
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open the configured database
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(DbConnection::connect()?))
    }

    /// In-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(DbConnection::connect_in_memory()?))
    }

    /// Borrow the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Persist a new task. False if the id exists or the insert fails.
    pub fn add(&self, id: &str, quadrant: &str, description: &str, done: bool) -> bool {
        let record = TaskRecord {
            id: id.to_string(),
            quadrant: quadrant.to_string(),
            description: description.to_string(),
            done,
        };
        report("add", TaskRepo::create(&self.conn, &record)).is_some()
    }

    /// `(id, description, done)` for the tasks in `quadrant`, in insertion order
    pub fn get_by_quadrant(&self, quadrant: &str) -> Vec<QuadrantItem> {
        report("get_by_quadrant", TaskRepo::list_by_quadrant(&self.conn, quadrant))
            .unwrap_or_default()
    }

    /// Full row for one task
    pub fn get(&self, id: &str) -> Option<Task> {
        report("get", TaskRepo::get_by_id(&self.conn, id)).flatten()
    }

    pub fn update_status(&self, id: &str, done: bool) -> bool {
        match report("update_status", TaskRepo::set_status(&self.conn, id, done)) {
            Some(changed) => {
                log::debug!("Task {} status set to {} ({} row(s) changed)", id, done, changed);
                true
            }
            None => false,
        }
    }

    pub fn update_description(&self, id: &str, description: &str) -> bool {
        report("update_description", TaskRepo::set_description(&self.conn, id, description)).is_some()
    }

    pub fn move_task(&self, id: &str, new_quadrant: &str) -> bool {
        report("move_task", TaskRepo::set_quadrant(&self.conn, id, new_quadrant)).is_some()
    }

    /// Hard delete
    pub fn delete(&self, id: &str) -> bool {
        report("delete", TaskRepo::delete(&self.conn, id)).is_some()
    }

    pub fn get_all(&self) -> Vec<TaskRecord> {
        report("get_all", TaskRepo::list_all(&self.conn)).unwrap_or_default()
    }

    /// Remove every task
    pub fn clear_all(&self) -> bool {
        report("clear_all", TaskRepo::delete_all(&self.conn)).is_some()
    }

    /// Statistics over all tasks; zeroed statistics if the query fails
    pub fn get_statistics(&self) -> Statistics {
        report("get_statistics", StatsRepo::compute(&self.conn)).unwrap_or_default()
    }

    /// Atomically replace all tasks. Errors are returned, not flattened,
    /// so import can report the cause.
    pub fn replace_all(&self, records: &[TaskRecord]) -> Result<usize> {
        TaskRepo::replace_all(&self.conn, records)
    }

    /// Resolve a full id or unique prefix to a stored id
    pub fn resolve_id(&self, prefix: &str) -> Result<Option<String>> {
        TaskRepo::resolve_id(&self.conn, prefix)
    }

    /// Distinct quadrant values in use
    pub fn quadrants(&self) -> Vec<String> {
        report("quadrants", TaskRepo::quadrants(&self.conn)).unwrap_or_default()
    }
}

/// Log a storage failure and turn it into `None`
fn report<T>(operation: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Task store {} failed: {:#}", operation, e);
            None
        }
    }
}
