use rusqlite::Connection;
use crate::models::{Overview, QuadrantStats, Statistics};
use crate::repo::task::NOT_DELETED;
use anyhow::{Context, Result};

/// Read-side aggregation over the tasks table
pub struct StatsRepo;

impl StatsRepo {
    /// Per-quadrant and overall statistics for non-deleted tasks
    ///
    /// Completion latency is computed with `julianday` arithmetic scaled to
    /// minutes and rounded to two decimals per task before averaging.
    pub fn compute(conn: &Connection) -> Result<Statistics> {
        let mut stats = Statistics::default();

        let mut stmt = conn.prepare(&format!(
            "SELECT
                COALESCE(quadrant, ''),
                COUNT(*),
                COALESCE(SUM(CASE WHEN done = 1 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN done = 0 THEN 1 ELSE 0 END), 0),
                AVG(CASE
                    WHEN done = 1
                    THEN ROUND((julianday(completed_at) - julianday(created_at)) * 24 * 60, 2)
                    ELSE NULL
                END)
             FROM tasks
             WHERE {NOT_DELETED}
             GROUP BY COALESCE(quadrant, '')"
        ))?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                QuadrantStats::new(row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?),
            ))
        })?;

        for row in rows {
            let (quadrant, quadrant_stats) = row.context("Failed to read quadrant statistics")?;
            stats.per_quadrant.insert(quadrant, quadrant_stats);
        }

        stats.overview = conn
            .query_row(
                &format!(
                    "SELECT
                        COUNT(*),
                        COALESCE(SUM(CASE WHEN done = 1 THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN done = 0 THEN 1 ELSE 0 END), 0)
                     FROM tasks
                     WHERE {NOT_DELETED}"
                ),
                [],
                |row| {
                    Ok(Overview {
                        total_created: row.get(0)?,
                        total_completed: row.get(1)?,
                        current_active: row.get(2)?,
                    })
                },
            )
            .context("Failed to read overview statistics")?;

        Ok(stats)
    }
}
