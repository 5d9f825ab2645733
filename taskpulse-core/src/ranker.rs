//! TaskRanker — the bounded "smart queue".
//!
//! Filter to open tasks, score each, stable-sort by score descending, truncate.
//! Every call recomputes from the snapshot it is given; nothing is cached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scorer::PriorityScorer;
use crate::task::{DEFAULT_BASE_QUALITY, Task};
use crate::time::days_until_due;

pub const DEFAULT_QUEUE_BOUND: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTask {
    pub task: Task,
    pub priority_score: u32,
}

/// Reductions over the ranked entries, from the same snapshot and `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueueStats {
    pub ranked: usize,
    /// Rounded mean priority score; 0 for an empty queue.
    pub mean_score: u32,
    pub high_priority: usize,
    /// Due within a day, overdue included.
    pub urgent: usize,
    /// Rounded mean base-quality score; 50 for an empty queue.
    pub mean_base_quality: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartQueue {
    pub entries: Vec<RankedTask>,
    pub stats: QueueStats,
}

impl SmartQueue {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.task.id.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TaskRanker {
    scorer: PriorityScorer,
    bound: usize,
}

impl Default for TaskRanker {
    fn default() -> Self {
        Self::new(PriorityScorer::default(), DEFAULT_QUEUE_BOUND)
    }
}

impl TaskRanker {
    pub fn new(scorer: PriorityScorer, bound: usize) -> Self {
        Self { scorer, bound }
    }

    pub fn with_bound(mut self, bound: usize) -> Self {
        self.bound = bound;
        self
    }

    pub fn bound(&self) -> usize {
        self.bound
    }

    pub fn rank(&self, tasks: &[Task], now: DateTime<Utc>) -> SmartQueue {
        let mut entries: Vec<RankedTask> = tasks
            .iter()
            .filter(|t| t.is_open())
            .map(|t| RankedTask {
                priority_score: self.scorer.score(t, now),
                task: t.clone(),
            })
            .collect();

        let open = entries.len();

        // sort_by is stable: equal scores keep input order.
        entries.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));
        entries.truncate(self.bound);

        let stats = self.stats(&entries, now);
        debug!(
            input = tasks.len(),
            open,
            ranked = stats.ranked,
            mean_score = stats.mean_score,
            "ranked smart queue"
        );

        SmartQueue { entries, stats }
    }

    fn stats(&self, entries: &[RankedTask], now: DateTime<Utc>) -> QueueStats {
        if entries.is_empty() {
            return QueueStats {
                mean_base_quality: DEFAULT_BASE_QUALITY as u32,
                ..QueueStats::default()
            };
        }

        let n = entries.len();
        let score_sum: u32 = entries.iter().map(|e| e.priority_score).sum();
        let quality_sum: i32 = entries.iter().map(|e| e.task.base_quality()).sum();

        let policy = self.scorer.policy();
        let high_priority = entries
            .iter()
            .filter(|e| policy.is_high(&e.task.priority))
            .count();
        let urgent = entries
            .iter()
            .filter(|e| {
                e.task
                    .due_date
                    .is_some_and(|d| days_until_due(d, now) <= 1)
            })
            .count();

        QueueStats {
            ranked: n,
            mean_score: rounded_mean(score_sum as f64, n),
            high_priority,
            urgent,
            mean_base_quality: rounded_mean(quality_sum as f64, n),
        }
    }
}

/// Rank with the default scorer and bound.
pub fn rank(tasks: &[Task], now: DateTime<Utc>) -> SmartQueue {
    TaskRanker::default().rank(tasks, now)
}

fn rounded_mean(sum: f64, n: usize) -> u32 {
    (sum / n as f64).round() as u32
}
