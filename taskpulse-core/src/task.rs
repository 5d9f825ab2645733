//! Task model consumed by the scoring core.
//!
//! Tasks are owned by the storage layer; this crate only reads them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Base-quality score used when a task carries none.
pub const DEFAULT_BASE_QUALITY: i32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Deleted,
    /// Anything the storage layer sends that we don't know. Treated as open.
    Other(String),
}

impl TaskStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            "deleted" => Self::Deleted,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// Completed and deleted tasks never enter the smart queue.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Deleted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    /// Used by some producers as a stronger "high".
    Urgent,
    Unrecognized(String),
}

impl Priority {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "urgent" => Self::Urgent,
            _ => Self::Unrecognized(raw.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,

    pub status: TaskStatus,
    pub priority: Priority,

    /// Stored percentage. May be out of range; read through `progress()`.
    pub progress: i32,

    /// Calendar date, no time of day.
    pub due_date: Option<NaiveDate>,

    /// 0-100 externally supplied quality score.
    pub ai_score: Option<i32>,

    pub assigned_to: Option<String>,
    pub category: Option<String>,

    /// Free text; its length feeds the `ai_score` estimate.
    pub description: Option<String>,

    /// Last write in storage.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            progress: 0,
            due_date: None,
            ai_score: None,
            assigned_to: None,
            category: None,
            description: None,
            updated_at: None,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_progress(mut self, progress: i32) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_ai_score(mut self, score: i32) -> Self {
        self.ai_score = Some(score);
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assigned_to = Some(assignee.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    pub fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Progress clamped to 0..=100.
    pub fn progress(&self) -> i32 {
        self.progress.clamp(0, 100)
    }

    /// `ai_score` clamped to 0..=100, or 50 when absent.
    pub fn base_quality(&self) -> i32 {
        self.ai_score
            .map(|s| s.clamp(0, 100))
            .unwrap_or(DEFAULT_BASE_QUALITY)
    }
}
