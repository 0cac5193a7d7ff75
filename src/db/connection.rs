use rusqlite::Connection;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use crate::db::migrations::MigrationManager;

/// Name of the per-user data directory under HOME
pub const DATA_DIR_NAME: &str = ".eisenhower_matrix";

/// Database connection manager
pub struct DbConnection;

impl DbConnection {
    /// Per-user data directory (database, settings, rc file, exports)
    ///
    /// Resolved from `HOME` so tests can redirect it; falls back to the
    /// platform home directory when `HOME` is not set.
    pub fn data_dir() -> Result<PathBuf> {
        let home = match std::env::var_os("HOME") {
            Some(home) if !home.is_empty() => PathBuf::from(home),
            _ => dirs::home_dir().context("Could not determine home directory")?,
        };
        Ok(home.join(DATA_DIR_NAME))
    }

    /// Get the default database path
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("tasks.db"))
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("rc"))
    }

    /// Get database path from configuration file or default
    pub fn resolve_path() -> Result<PathBuf> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let config = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
            if let Some(path) = parse_data_location(&config) {
                // Relative paths resolve against the config file directory
                if path.is_relative() {
                    if let Some(dir) = config_path.parent() {
                        return Ok(dir.join(path));
                    }
                }
                return Ok(path);
            }
        }

        Self::default_path()
    }

    /// Connect to the configured database, creating it and parent directories if needed
    pub fn connect() -> Result<Connection> {
        let db_path = Self::resolve_path()?;
        Self::open(&db_path)
    }

    /// Open a database at an explicit path and bring its schema up to date
    pub fn open(db_path: &Path) -> Result<Connection> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

        MigrationManager::initialize(&conn)
            .context("Failed to initialize database schema")?;

        Ok(conn)
    }

    /// Connect to an in-memory database (for testing)
    pub fn connect_in_memory() -> Result<Connection> {
        let conn = Connection::open_in_memory()
            .context("Failed to open in-memory database")?;

        MigrationManager::initialize(&conn)
            .context("Failed to initialize database schema")?;

        Ok(conn)
    }
}

/// Extract `data.location=<path>` from rc file contents
fn parse_data_location(config: &str) -> Option<PathBuf> {
    config
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .find_map(|line| line.strip_prefix("data.location="))
        .map(|value| PathBuf::from(value.trim()))
        .filter(|path| !path.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_data_location() {
        let config = "# comment\ndata.location=./custom.db\n";
        assert_eq!(parse_data_location(config), Some(PathBuf::from("./custom.db")));
        assert_eq!(parse_data_location("other=1\n"), None);
        assert_eq!(parse_data_location("data.location=   \n"), None);
        assert_eq!(parse_data_location("#data.location=/x.db\n"), None);
    }

    #[test]
    fn test_open_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("test.db");

        let conn = DbConnection::open(&db_path).unwrap();
        assert!(db_path.exists());
        assert!(MigrationManager::missing_columns(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_connect_in_memory() {
        let conn = DbConnection::connect_in_memory().unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
