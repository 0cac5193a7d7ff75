use rusqlite::{Connection, Result};

/// Columns the `tasks` table must carry
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "id",
    "quadrant",
    "description",
    "done",
    "created_at",
    "completed_at",
    "deleted",
];

/// Columns copied out of a legacy table when the schema is rebuilt.
/// Everything else is reset to its default.
const SALVAGED_COLUMNS: [&str; 4] = ["id", "quadrant", "description", "done"];

const CREATE_TASKS_NEW: &str = "CREATE TABLE tasks_new (
        id TEXT PRIMARY KEY,
        quadrant TEXT,
        description TEXT,
        done BOOLEAN DEFAULT 0,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        completed_at TIMESTAMP,
        deleted BOOLEAN DEFAULT 0
    )";

/// Schema manager for the single `tasks` table
///
/// The schema is checked by column set rather than by a version counter:
/// if any required column is missing, the table is rebuilt and the rows of
/// the old table are salvaged. The salvage is lossy: only `id`, `quadrant`,
/// `description` and `done` survive; `created_at` becomes the migration
/// time, `completed_at` is NULL and `deleted` is 0.
pub struct MigrationManager;

impl MigrationManager {
    /// Create the table or bring it up to the current column set
    pub fn initialize(conn: &Connection) -> Result<()> {
        let existing = Self::table_columns(conn)?;
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| !existing.iter().any(|e| e == c))
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        // Rebuild in a transaction so a failure leaves the old table intact
        let tx = conn.unchecked_transaction()?;
        tx.execute(CREATE_TASKS_NEW, [])?;

        if !existing.is_empty() {
            let salvaged: Vec<&str> = SALVAGED_COLUMNS
                .iter()
                .copied()
                .filter(|c| existing.iter().any(|e| e == c))
                .collect();
            log::info!(
                "Rebuilding tasks table (missing columns: {}); salvaging {}",
                missing.join(", "),
                salvaged.join(", ")
            );
            if !salvaged.is_empty() {
                let cols = salvaged.join(", ");
                tx.execute(
                    &format!("INSERT INTO tasks_new ({cols}) SELECT {cols} FROM tasks"),
                    [],
                )?;
            }
            tx.execute("DROP TABLE tasks", [])?;
        }

        tx.execute("ALTER TABLE tasks_new RENAME TO tasks", [])?;
        tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_quadrant ON tasks(quadrant)", [])?;
        tx.commit()
    }

    /// Required columns the current `tasks` table lacks
    pub fn missing_columns(conn: &Connection) -> Result<Vec<String>> {
        let existing = Self::table_columns(conn)?;
        Ok(REQUIRED_COLUMNS
            .iter()
            .filter(|c| !existing.iter().any(|e| e == *c))
            .map(|c| c.to_string())
            .collect())
    }

    /// Column names of the `tasks` table (empty if the table does not exist)
    fn table_columns(conn: &Connection) -> Result<Vec<String>> {
        let mut stmt = conn.prepare("PRAGMA table_info(tasks)")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row?);
        }
        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn legacy_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(
            "CREATE TABLE tasks (id TEXT PRIMARY KEY, quadrant TEXT, description TEXT, done BOOLEAN)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO tasks (id, quadrant, description, done) VALUES ('a', 'Q1', 'write report', 1)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO tasks (id, quadrant, description, done) VALUES ('b', 'Q2', 'plan week', 0)",
            [],
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_fresh_database_gets_full_schema() {
        let conn = Connection::open_in_memory().unwrap();
        MigrationManager::initialize(&conn).unwrap();

        assert!(MigrationManager::missing_columns(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_migration_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        MigrationManager::initialize(&conn).unwrap();
        conn.execute("INSERT INTO tasks (id, quadrant, description) VALUES ('x', 'Q1', 'keep')", [])
            .unwrap();

        MigrationManager::initialize(&conn).unwrap();

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0)).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_legacy_table_is_salvaged() {
        let conn = legacy_connection();
        assert_eq!(MigrationManager::missing_columns(&conn).unwrap().len(), 3);

        MigrationManager::initialize(&conn).unwrap();
        assert!(MigrationManager::missing_columns(&conn).unwrap().is_empty());

        let (quadrant, description, done, completed_at, deleted): (String, String, bool, Option<String>, bool) = conn
            .query_row(
                "SELECT quadrant, description, done, completed_at, deleted FROM tasks WHERE id = 'a'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
            )
            .unwrap();
        assert_eq!(quadrant, "Q1");
        assert_eq!(description, "write report");
        assert!(done);
        assert!(completed_at.is_none(), "completed_at is reset by the salvage");
        assert!(!deleted);

        let created_at: Option<String> = conn
            .query_row("SELECT created_at FROM tasks WHERE id = 'b'", [], |row| row.get(0))
            .unwrap();
        assert!(created_at.is_some(), "created_at takes the column default");
    }

    #[test]
    fn test_partial_legacy_table_keeps_present_columns() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE tasks (id TEXT PRIMARY KEY, description TEXT)", []).unwrap();
        conn.execute("INSERT INTO tasks (id, description) VALUES ('a', 'only text')", []).unwrap();

        MigrationManager::initialize(&conn).unwrap();

        let (description, done): (String, bool) = conn
            .query_row("SELECT description, done FROM tasks WHERE id = 'a'", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(description, "only text");
        assert!(!done);
    }
}
