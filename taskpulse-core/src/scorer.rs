//! PriorityScorer — deterministic urgency score for a single task.
//!
//! The score is a plain sum of four weighted factors:
//! - priority level (10..=40)
//! - due-date urgency (0..=30)
//! - progress state (5..=15)
//! - base quality, 15% of `ai_score` (0..=15)
//!
//! The factors are summed, not normalized. Their maxima add up to 100, which
//! is also the highest score reachable; `SCORE_BOUND` is the looser ceiling
//! callers may rely on.
//! Nothing here reads the clock; `now` is always passed in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{Priority, Task};
use crate::time::days_until_due;

/// Highest score `score` can return: 40 + 30 + 15 + 15.
pub const MAX_SCORE: u32 = 100;

/// Documented upper bound for any score. Always >= `MAX_SCORE`.
pub const SCORE_BOUND: u32 = 105;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Score `Priority::Urgent` like `High`. When off, urgent tasks fall into
    /// the unrecognized-priority weight.
    pub urgent_as_high: bool,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            urgent_as_high: true,
        }
    }
}

impl ScoringPolicy {
    /// Whether a priority counts as "high" for weights and stats.
    pub fn is_high(&self, priority: &Priority) -> bool {
        match priority {
            Priority::High => true,
            Priority::Urgent => self.urgent_as_high,
            _ => false,
        }
    }
}

/// Per-factor view of a score, mostly for explaining a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub priority: u32,
    pub due: u32,
    pub progress: u32,
    pub base_quality: u32,
    /// Whole days until due, when the task has a due date.
    pub days_until_due: Option<i64>,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.priority + self.due + self.progress + self.base_quality
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityScorer {
    policy: ScoringPolicy,
}

impl PriorityScorer {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    pub fn score(&self, task: &Task, now: DateTime<Utc>) -> u32 {
        self.breakdown(task, now).total()
    }

    pub fn breakdown(&self, task: &Task, now: DateTime<Utc>) -> ScoreBreakdown {
        let days = task.due_date.map(|d| days_until_due(d, now));
        ScoreBreakdown {
            priority: self.priority_weight(&task.priority),
            due: days.map(due_weight).unwrap_or(0),
            progress: progress_weight(task.progress()),
            base_quality: base_quality_weight(task.base_quality()),
            days_until_due: days,
        }
    }

    fn priority_weight(&self, priority: &Priority) -> u32 {
        if self.policy.is_high(priority) {
            return 40;
        }
        match priority {
            Priority::Medium => 25,
            Priority::Low => 10,
            _ => 15,
        }
    }
}

/// Score a task with the default policy.
pub fn score(task: &Task, now: DateTime<Utc>) -> u32 {
    PriorityScorer::default().score(task, now)
}

fn due_weight(days: i64) -> u32 {
    match days {
        d if d < 0 => 30,
        0..=1 => 25,
        2..=3 => 20,
        4..=7 => 15,
        _ => 5,
    }
}

fn progress_weight(progress: i32) -> u32 {
    match progress {
        p if p > 80 => 5,
        p if p > 50 => 10,
        p if p > 0 => 15,
        // not started: below "just started" on purpose
        _ => 12,
    }
}

/// round(quality * 0.15), half up, in integer arithmetic. `quality` is 0..=100.
fn base_quality_weight(quality: i32) -> u32 {
    ((quality.max(0) as u32) * 15 + 50) / 100
}
