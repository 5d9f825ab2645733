//! Stored `ai_score` estimate.
//!
//! This is a separate, coarser heuristic from `PriorityScorer`: it is what
//! writes the `ai_score` that the smart queue later reads as base quality.
//! Factors:
//! - priority (40 / 25 / 10, anything else 0)
//! - due date, in whole days rounded down (30 / 20 / 15 / 10 / 5)
//! - momentum for started-but-unfinished work: progress / 5
//! - short descriptions rank higher (10 / 7 / 5)
//!
//! The sum is capped at 100. Only completed tasks are skipped here; deleted
//! ones are still estimated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ranker::RankedTask;
use crate::scorer::ScoringPolicy;
use crate::task::{Priority, Task, TaskStatus};
use crate::time::{due_instant, whole_days_until_due};

pub const AI_SCORE_CAP: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiScoreReport {
    /// Highest estimate first; ties keep input order.
    pub tasks: Vec<RankedTask>,
    pub total_tasks: usize,
    /// Rounded mean estimate; 0 when there are no tasks.
    pub avg_priority_score: u32,
    /// Tasks whose due date has passed.
    pub overdue: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AiScoreEstimator {
    policy: ScoringPolicy,
}

impl AiScoreEstimator {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn estimate(&self, task: &Task, now: DateTime<Utc>) -> u32 {
        let priority = if self.policy.is_high(&task.priority) {
            40.0
        } else {
            match task.priority {
                Priority::Medium => 25.0,
                Priority::Low => 10.0,
                _ => 0.0,
            }
        };

        let due = task
            .due_date
            .map(|d| due_weight(whole_days_until_due(d, now)))
            .unwrap_or(0.0);

        let progress = task.progress();
        let momentum = if progress > 0 && progress < 100 {
            (progress as f64 / 5.0).min(20.0)
        } else {
            0.0
        };

        let total = priority + due + momentum + description_weight(task.description.as_deref());
        total.min(AI_SCORE_CAP as f64).round() as u32
    }

    /// Estimate every non-completed task and sort highest first.
    pub fn estimate_all(&self, tasks: &[Task], now: DateTime<Utc>) -> AiScoreReport {
        let mut scored: Vec<RankedTask> = tasks
            .iter()
            .filter(|t| t.status != TaskStatus::Completed)
            .map(|t| RankedTask {
                priority_score: self.estimate(t, now),
                task: t.clone(),
            })
            .collect();
        scored.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));

        let total_tasks = scored.len();
        let avg_priority_score = if total_tasks == 0 {
            0
        } else {
            let sum: u32 = scored.iter().map(|e| e.priority_score).sum();
            (sum as f64 / total_tasks as f64).round() as u32
        };
        let overdue = scored
            .iter()
            .filter(|e| e.task.due_date.is_some_and(|d| due_instant(d) < now))
            .count();

        debug!(total_tasks, avg_priority_score, overdue, "estimated ai scores");

        AiScoreReport {
            tasks: scored,
            total_tasks,
            avg_priority_score,
            overdue,
        }
    }
}

fn due_weight(days: i64) -> f64 {
    match days {
        d if d <= 1 => 30.0,
        2..=3 => 20.0,
        4..=7 => 15.0,
        8..=14 => 10.0,
        _ => 5.0,
    }
}

/// Length in UTF-16 units, as the storage layer's clients count it.
fn description_weight(description: Option<&str>) -> f64 {
    let len = description.map(|d| d.encode_utf16().count()).unwrap_or(0);
    match len {
        l if l < 100 => 10.0,
        l if l < 300 => 7.0,
        _ => 5.0,
    }
}
