use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregates for one quadrant value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuadrantStats {
    pub total_created: i64,
    pub completed: i64,
    pub active_tasks: i64,
    /// Mean minutes from creation to completion; None when nothing is completed
    pub avg_completion_time: Option<f64>,
    /// Percentage of created tasks that are completed (0 when none were created)
    pub completion_rate: f64,
}

impl QuadrantStats {
    pub fn new(total_created: i64, completed: i64, active_tasks: i64, avg_completion_time: Option<f64>) -> Self {
        let completion_rate = if total_created > 0 {
            completed as f64 / total_created as f64 * 100.0
        } else {
            0.0
        };
        Self {
            total_created,
            completed,
            active_tasks,
            avg_completion_time,
            completion_rate,
        }
    }
}

/// Counts across every quadrant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub total_created: i64,
    pub total_completed: i64,
    pub current_active: i64,
}

/// One slice of the active-task distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSlice {
    pub quadrant: String,
    pub active_tasks: i64,
    pub percent: f64,
}

/// Statistics over all non-deleted tasks
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub per_quadrant: BTreeMap<String, QuadrantStats>,
    pub overview: Overview,
}

impl Statistics {
    /// Share of active tasks held by each quadrant
    ///
    /// Quadrants without active tasks are left out; the result is empty when
    /// nothing is active.
    pub fn distribution(&self) -> Vec<DistributionSlice> {
        let active: i64 = self.per_quadrant.values().map(|q| q.active_tasks).sum();
        if active == 0 {
            return Vec::new();
        }
        self.per_quadrant
            .iter()
            .filter(|(_, q)| q.active_tasks > 0)
            .map(|(name, q)| DistributionSlice {
                quadrant: name.clone(),
                active_tasks: q.active_tasks,
                percent: q.active_tasks as f64 / active as f64 * 100.0,
            })
            .collect()
    }
}
