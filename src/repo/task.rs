use rusqlite::{Connection, OptionalExtension};
use crate::models::{QuadrantItem, Task, TaskRecord};
use anyhow::{Context, Result};

/// Row filter shared by every read. Nothing writes `deleted` today; rows
/// flagged by other tools stay invisible everywhere.
pub(crate) const NOT_DELETED: &str = "(deleted = 0 OR deleted IS NULL)";

/// Task repository for database operations
///
/// Every write is a single statement, so each one is atomic for the row it
/// touches. `replace_all` is the only multi-row write and runs in one
/// transaction.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task. Fails if `id` is already taken.
    pub fn create(conn: &Connection, record: &TaskRecord) -> Result<()> {
        conn.execute(
            "INSERT INTO tasks (id, quadrant, description, done) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![record.id, record.quadrant, record.description, record.done],
        )
        .with_context(|| format!("Failed to create task: {}", record.id))?;
        Ok(())
    }

    /// Get task by ID
    pub fn get_by_id(conn: &Connection, id: &str) -> Result<Option<Task>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT id, quadrant, description, done, created_at, completed_at, deleted
             FROM tasks WHERE id = ?1 AND {NOT_DELETED}"
        ))?;

        let task = stmt
            .query_row([id], |row| {
                Ok(Task {
                    id: row.get(0)?,
                    quadrant: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    done: row.get::<_, Option<bool>>(3)?.unwrap_or(false),
                    created_at: row.get(4)?,
                    completed_at: row.get(5)?,
                    deleted: row.get::<_, Option<bool>>(6)?.unwrap_or(false),
                })
            })
            .optional()?;

        Ok(task)
    }

    /// Tasks filed under `quadrant` (exact match), in insertion order
    pub fn list_by_quadrant(conn: &Connection, quadrant: &str) -> Result<Vec<QuadrantItem>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT id, description, done FROM tasks
             WHERE quadrant = ?1 AND {NOT_DELETED} ORDER BY rowid"
        ))?;

        let rows = stmt.query_map([quadrant], |row| {
            Ok(QuadrantItem {
                id: row.get(0)?,
                description: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                done: row.get::<_, Option<bool>>(2)?.unwrap_or(false),
            })
        })?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    /// Every task, in insertion order
    pub fn list_all(conn: &Connection) -> Result<Vec<TaskRecord>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT id, quadrant, description, done FROM tasks WHERE {NOT_DELETED} ORDER BY rowid"
        ))?;

        let rows = stmt.query_map([], |row| {
            Ok(TaskRecord {
                id: row.get(0)?,
                quadrant: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                done: row.get::<_, Option<bool>>(3)?.unwrap_or(false),
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Distinct quadrant values currently in use, sorted
    pub fn quadrants(conn: &Connection) -> Result<Vec<String>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT DISTINCT quadrant FROM tasks
             WHERE quadrant IS NOT NULL AND {NOT_DELETED} ORDER BY quadrant"
        ))?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut quadrants = Vec::new();
        for row in rows {
            quadrants.push(row?);
        }
        Ok(quadrants)
    }

    /// Set the completion flag. Completing stamps `completed_at`, reopening clears it.
    /// Returns the number of rows changed (0 for an unknown id).
    pub fn set_status(conn: &Connection, id: &str, done: bool) -> Result<usize> {
        let sql = if done {
            "UPDATE tasks SET done = 1, completed_at = CURRENT_TIMESTAMP WHERE id = ?1"
        } else {
            "UPDATE tasks SET done = 0, completed_at = NULL WHERE id = ?1"
        };
        let changed = conn
            .execute(sql, [id])
            .with_context(|| format!("Failed to update status of task: {}", id))?;
        Ok(changed)
    }

    /// Overwrite the description
    pub fn set_description(conn: &Connection, id: &str, description: &str) -> Result<usize> {
        let changed = conn
            .execute(
                "UPDATE tasks SET description = ?1 WHERE id = ?2",
                rusqlite::params![description, id],
            )
            .with_context(|| format!("Failed to update description of task: {}", id))?;
        Ok(changed)
    }

    /// Move a task to another quadrant; status and timestamps are untouched
    pub fn set_quadrant(conn: &Connection, id: &str, quadrant: &str) -> Result<usize> {
        let changed = conn
            .execute(
                "UPDATE tasks SET quadrant = ?1 WHERE id = ?2",
                rusqlite::params![quadrant, id],
            )
            .with_context(|| format!("Failed to move task: {}", id))?;
        Ok(changed)
    }

    /// Permanently delete a task
    pub fn delete(conn: &Connection, id: &str) -> Result<usize> {
        let changed = conn
            .execute("DELETE FROM tasks WHERE id = ?1", [id])
            .with_context(|| format!("Failed to delete task: {}", id))?;
        Ok(changed)
    }

    /// Permanently delete every task
    pub fn delete_all(conn: &Connection) -> Result<usize> {
        let changed = conn
            .execute("DELETE FROM tasks", [])
            .context("Failed to clear tasks")?;
        Ok(changed)
    }

    /// Replace the whole collection with `records`
    ///
    /// Runs in a single transaction: if any insert fails (for example a
    /// duplicate id in `records`) the previous contents are kept.
    pub fn replace_all(conn: &Connection, records: &[TaskRecord]) -> Result<usize> {
        let tx = conn.unchecked_transaction()?;
        tx.execute("DELETE FROM tasks", [])
            .context("Failed to clear tasks")?;
        for record in records {
            Self::create(&tx, record)?;
        }
        tx.commit().context("Failed to commit task replacement")?;
        Ok(records.len())
    }

    /// Resolve a full id or a unique id prefix
    pub fn resolve_id(conn: &Connection, prefix: &str) -> Result<Option<String>> {
        if prefix.is_empty() {
            return Ok(None);
        }
        if Self::get_by_id(conn, prefix)?.is_some() {
            return Ok(Some(prefix.to_string()));
        }

        let mut stmt = conn.prepare(&format!(
            "SELECT id FROM tasks WHERE substr(id, 1, length(?1)) = ?1 AND {NOT_DELETED} LIMIT 2"
        ))?;
        let rows = stmt.query_map([prefix], |row| row.get::<_, String>(0))?;

        let mut matches = Vec::new();
        for row in rows {
            matches.push(row?);
        }
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => anyhow::bail!("Task id prefix '{}' is ambiguous", prefix),
        }
    }
}
