//! Snapshot analytics over the whole task list (terminal tasks included).

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::scorer::ScoringPolicy;
use crate::task::{Priority, Task, TaskStatus};
use crate::time::due_instant;

/// Window for the "due soon" count.
pub const DUE_SOON_DAYS: i64 = 3;

/// Days covered by `productivity_trend`, today included.
pub const TREND_DAYS: i64 = 7;

const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Productivity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Workload {
    Overloaded,
    Busy,
    Manageable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prioritization {
    Good,
    NeedsImprovement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub productivity: Productivity,
    pub workload: Workload,
    pub prioritization: Prioritization,
}

/// Activity for one UTC day, bucketed by `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTrend {
    pub date: NaiveDate,
    pub completed: usize,
    /// Tasks touched that day. Named for the dashboard field it feeds.
    pub created: usize,
    pub avg_progress: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberPerformance {
    pub member: String,
    /// Percent of the member's tasks completed.
    pub score: u32,
    pub tasks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAnalytics {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub pending: usize,
    pub overdue: usize,
    pub due_soon: usize,
    pub high_priority: usize,
    pub medium_priority: usize,
    pub low_priority: usize,
    pub assigned: usize,
    pub unassigned: usize,
    pub avg_progress: u32,
    /// Mean `ai_score`, absent counted as 0.
    pub avg_base_quality: u32,
    /// Percent of tasks completed.
    pub completion_rate: u32,
    pub categories: BTreeMap<String, usize>,
    /// Oldest day first, ending on `now`'s UTC date.
    pub productivity_trend: Vec<DailyTrend>,
    /// Best completion rate first; ties keep first-assignment order.
    pub team_performance: Vec<MemberPerformance>,
    pub insights: Insights,
}

impl TaskAnalytics {
    pub fn compute(tasks: &[Task], now: DateTime<Utc>, policy: ScoringPolicy) -> Self {
        let total = tasks.len();
        let count = |f: &dyn Fn(&Task) -> bool| count_where(tasks, f);

        let completed = count(&|t: &Task| t.status == TaskStatus::Completed);
        let in_progress = count(&|t: &Task| t.status == TaskStatus::InProgress);
        let pending = count(&|t: &Task| t.status == TaskStatus::Pending);

        let high_priority = count(&|t: &Task| policy.is_high(&t.priority));
        let medium_priority = count(&|t: &Task| t.priority == Priority::Medium);
        let low_priority = count(&|t: &Task| t.priority == Priority::Low);

        let soon = now + Duration::days(DUE_SOON_DAYS);
        let open_due = |t: &Task| t.due_date.filter(|_| t.is_open()).map(due_instant);
        let overdue = count(&|t: &Task| open_due(t).is_some_and(|due| due < now));
        let due_soon = count(&|t: &Task| open_due(t).is_some_and(|due| due <= soon));

        let assigned = count(&|t: &Task| t.assigned_to.as_deref().is_some_and(|a| !a.is_empty()));

        let mut categories = BTreeMap::new();
        for t in tasks {
            let key = t
                .category
                .as_deref()
                .filter(|c| !c.is_empty())
                .unwrap_or(UNCATEGORIZED);
            *categories.entry(key.to_string()).or_insert(0) += 1;
        }

        let avg_progress = mean(tasks.iter().map(|t| t.progress() as f64), total);
        let avg_base_quality = mean(
            tasks.iter().map(|t| t.ai_score.unwrap_or(0).clamp(0, 100) as f64),
            total,
        );
        let completion_rate = percent(completed, total);

        let insights = Insights {
            productivity: match avg_progress {
                p if p > 75.0 => Productivity::High,
                p if p > 50.0 => Productivity::Medium,
                _ => Productivity::Low,
            },
            workload: if overdue > 5 {
                Workload::Overloaded
            } else if due_soon > 3 {
                Workload::Busy
            } else {
                Workload::Manageable
            },
            prioritization: if total > 0 && high_priority as f64 / total as f64 > 0.3 {
                Prioritization::Good
            } else {
                Prioritization::NeedsImprovement
            },
        };

        Self {
            total,
            completed,
            in_progress,
            pending,
            overdue,
            due_soon,
            high_priority,
            medium_priority,
            low_priority,
            assigned,
            unassigned: total - assigned,
            avg_progress: avg_progress.round() as u32,
            avg_base_quality: avg_base_quality.round() as u32,
            completion_rate,
            categories,
            productivity_trend: productivity_trend(tasks, now),
            team_performance: team_performance(tasks),
            insights,
        }
    }
}

fn productivity_trend(tasks: &[Task], now: DateTime<Utc>) -> Vec<DailyTrend> {
    let today = now.date_naive();
    (0..TREND_DAYS)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            let day: Vec<&Task> = tasks
                .iter()
                .filter(|t| t.updated_at.is_some_and(|u| u.date_naive() == date))
                .collect();
            let avg = mean(day.iter().map(|t| t.progress() as f64), day.len());
            DailyTrend {
                date,
                completed: day
                    .iter()
                    .filter(|t| t.status == TaskStatus::Completed)
                    .count(),
                created: day.len(),
                avg_progress: avg.round() as u32,
            }
        })
        .collect()
}

fn team_performance(tasks: &[Task]) -> Vec<MemberPerformance> {
    let mut members: Vec<&str> = Vec::new();
    let assignees = tasks
        .iter()
        .filter_map(|t| t.assigned_to.as_deref())
        .filter(|a| !a.is_empty());
    for a in assignees {
        if !members.contains(&a) {
            members.push(a);
        }
    }

    let mut out: Vec<MemberPerformance> = members
        .into_iter()
        .map(|member| {
            let mine = count_where(tasks, &|t: &Task| t.assigned_to.as_deref() == Some(member));
            let done = count_where(tasks, &|t: &Task| {
                t.assigned_to.as_deref() == Some(member) && t.status == TaskStatus::Completed
            });
            MemberPerformance {
                member: member.to_string(),
                score: percent(done, mine),
                tasks: mine,
            }
        })
        .collect();
    out.sort_by(|a, b| b.score.cmp(&a.score));
    out
}

fn count_where(tasks: &[Task], f: &dyn Fn(&Task) -> bool) -> usize {
    tasks.iter().filter(|&t| f(t)).count()
}

fn mean(values: impl Iterator<Item = f64>, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap()
    }

    #[test]
    fn empty_snapshot() {
        let a = TaskAnalytics::compute(&[], now(), ScoringPolicy::default());
        assert_eq!(a.total, 0);
        assert_eq!(a.completion_rate, 0);
        assert_eq!(a.avg_progress, 0);
        assert_eq!(a.insights.productivity, Productivity::Low);
        assert_eq!(a.insights.workload, Workload::Manageable);
        assert_eq!(a.insights.prioritization, Prioritization::NeedsImprovement);
        assert_eq!(a.productivity_trend.len(), 7);
        assert!(a.productivity_trend.iter().all(|d| d.created == 0 && d.avg_progress == 0));
        assert!(a.team_performance.is_empty());
    }

    #[test]
    fn mixed_snapshot() {
        let today = now().date_naive();
        let tasks = vec![
            Task::new("a", "")
                .with_priority(Priority::High)
                .with_due_date(today - Duration::days(1))
                .with_progress(60)
                .with_ai_score(90)
                .with_assignee("sam")
                .with_category("ops"),
            Task::new("b", "")
                .with_priority(Priority::Urgent)
                .with_status(TaskStatus::InProgress)
                .with_due_date(today + Duration::days(2))
                .with_progress(100)
                .with_category("ops"),
            Task::new("c", "")
                .with_priority(Priority::Low)
                .with_status(TaskStatus::Completed)
                .with_due_date(today - Duration::days(5))
                .with_progress(100)
                .with_ai_score(30),
            Task::new("d", "").with_due_date(today + Duration::days(20)),
        ];
        let a = TaskAnalytics::compute(&tasks, now(), ScoringPolicy::default());

        assert_eq!(a.total, 4);
        assert_eq!((a.completed, a.in_progress, a.pending), (1, 1, 2));
        assert_eq!((a.high_priority, a.medium_priority, a.low_priority), (2, 1, 1));
        // c is overdue but completed
        assert_eq!(a.overdue, 1);
        assert_eq!(a.due_soon, 2);
        assert_eq!((a.assigned, a.unassigned), (1, 3));
        assert_eq!(a.avg_progress, 65);
        assert_eq!(a.avg_base_quality, 30);
        assert_eq!(a.completion_rate, 25);
        assert_eq!(a.categories.get("ops"), Some(&2));
        assert_eq!(a.categories.get("uncategorized"), Some(&2));
        assert_eq!(a.insights.productivity, Productivity::Medium);
        assert_eq!(a.insights.prioritization, Prioritization::Good);
    }

    #[test]
    fn trend_buckets_by_updated_utc_day() {
        let at = |d: u32, h: u32| Utc.with_ymd_and_hms(2026, 3, d, h, 0, 0).unwrap();
        let tasks = vec![
            Task::new("a", "").with_progress(40).with_updated_at(at(10, 8)),
            Task::new("b", "")
                .with_status(TaskStatus::Completed)
                .with_progress(100)
                .with_updated_at(at(10, 1)),
            Task::new("c", "").with_progress(15).with_updated_at(at(4, 23)),
            // eight days back: outside the window
            Task::new("d", "").with_updated_at(at(2, 12)),
            // later today than `now`, still today's bucket
            Task::new("e", "").with_progress(10).with_updated_at(at(10, 20)),
            Task::new("f", ""),
        ];
        let trend = TaskAnalytics::compute(&tasks, now(), ScoringPolicy::default()).productivity_trend;

        let dates: Vec<u32> = trend.iter().map(|d| d.date.day()).collect();
        assert_eq!(dates, vec![4, 5, 6, 7, 8, 9, 10]);

        assert_eq!(
            trend[6],
            DailyTrend {
                date: now().date_naive(),
                completed: 1,
                created: 3,
                avg_progress: 50,
            }
        );
        assert_eq!((trend[0].created, trend[0].avg_progress), (1, 15));
        assert!(
            trend[1..6]
                .iter()
                .all(|d| d.created == 0 && d.completed == 0 && d.avg_progress == 0)
        );
    }

    #[test]
    fn team_performance_ranks_by_completion() {
        let done = |id: &str, who: &str| {
            Task::new(id, "")
                .with_assignee(who)
                .with_status(TaskStatus::Completed)
        };
        let open = |id: &str, who: &str| Task::new(id, "").with_assignee(who);
        let tasks = vec![
            open("1", "sam"),
            done("2", "ana"),
            open("3", "lee"),
            done("4", "sam"),
            open("5", "sam"),
            done("6", "lee"),
            Task::new("7", "").with_assignee(""),
            open("8", "kim"),
        ];
        let team = TaskAnalytics::compute(&tasks, now(), ScoringPolicy::default()).team_performance;
        let rows: Vec<(&str, u32, usize)> = team
            .iter()
            .map(|m| (m.member.as_str(), m.score, m.tasks))
            .collect();
        assert_eq!(
            rows,
            vec![("ana", 100, 1), ("lee", 50, 2), ("sam", 33, 3), ("kim", 0, 1)]
        );
    }

    #[test]
    fn team_ties_keep_first_assignment_order() {
        let tasks = vec![
            Task::new("1", "").with_assignee("zed"),
            Task::new("2", "").with_assignee("amy"),
        ];
        let team = TaskAnalytics::compute(&tasks, now(), ScoringPolicy::default()).team_performance;
        let names: Vec<&str> = team.iter().map(|m| m.member.as_str()).collect();
        assert_eq!(names, vec!["zed", "amy"]);
    }
}
