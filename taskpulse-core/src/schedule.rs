//! Optimal schedule for predictive tasks.
//!
//! Simpler than the smart queue: priority descending, then complexity
//! ascending (quick wins first within a priority), top N.

use serde::{Deserialize, Serialize};

use crate::scorer::ScoringPolicy;
use crate::task::Priority;

pub const DEFAULT_SCHEDULE_BOUND: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictiveTask {
    pub id: String,
    pub title: String,
    pub priority: Priority,
    /// 0-100.
    pub complexity: u8,
}

impl PredictiveTask {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            priority: Priority::Medium,
            complexity: 50,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_complexity(mut self, complexity: i32) -> Self {
        self.complexity = complexity.clamp(0, 100) as u8;
        self
    }
}

fn priority_rank(priority: &Priority, policy: ScoringPolicy) -> u8 {
    if policy.is_high(priority) {
        return 3;
    }
    match priority {
        Priority::Medium => 2,
        Priority::Low => 1,
        _ => 0,
    }
}

/// Order `tasks` for the suggested schedule and keep the first `bound`.
pub fn optimal_schedule(
    tasks: &[PredictiveTask],
    bound: usize,
    policy: ScoringPolicy,
) -> Vec<PredictiveTask> {
    let mut out = tasks.to_vec();
    out.sort_by(|a, b| {
        priority_rank(&b.priority, policy)
            .cmp(&priority_rank(&a.priority, policy))
            .then_with(|| a.complexity.cmp(&b.complexity))
    });
    out.truncate(bound);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(tasks: &[PredictiveTask]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn priority_then_complexity() {
        let tasks = vec![
            PredictiveTask::new("low", "").with_priority(Priority::Low).with_complexity(5),
            PredictiveTask::new("high-hard", "").with_priority(Priority::High).with_complexity(90),
            PredictiveTask::new("med", "").with_priority(Priority::Medium).with_complexity(10),
            PredictiveTask::new("high-easy", "").with_priority(Priority::High).with_complexity(20),
        ];
        let out = optimal_schedule(&tasks, DEFAULT_SCHEDULE_BOUND, ScoringPolicy::default());
        assert_eq!(ids(&out), vec!["high-easy", "high-hard", "med", "low"]);
    }

    #[test]
    fn bounded_and_stable() {
        let tasks: Vec<PredictiveTask> = (0..7)
            .map(|i| PredictiveTask::new(format!("p{i}"), "").with_complexity(30))
            .collect();
        let out = optimal_schedule(&tasks, DEFAULT_SCHEDULE_BOUND, ScoringPolicy::default());
        assert_eq!(ids(&out), vec!["p0", "p1", "p2", "p3", "p4"]);
    }

    #[test]
    fn urgent_ranks_with_high_unless_disabled() {
        let tasks = vec![
            PredictiveTask::new("med", "").with_complexity(0),
            PredictiveTask::new("urgent", "").with_priority(Priority::Urgent).with_complexity(80),
        ];
        let out = optimal_schedule(&tasks, 5, ScoringPolicy::default());
        assert_eq!(ids(&out), vec!["urgent", "med"]);

        let out = optimal_schedule(&tasks, 5, ScoringPolicy { urgent_as_high: false });
        assert_eq!(ids(&out), vec!["med", "urgent"]);
    }

    #[test]
    fn complexity_is_clamped() {
        assert_eq!(PredictiveTask::new("x", "").with_complexity(250).complexity, 100);
        assert_eq!(PredictiveTask::new("y", "").with_complexity(-4).complexity, 0);
    }
}
