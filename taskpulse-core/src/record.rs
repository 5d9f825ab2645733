//! TaskRecord: the loosely-typed row shape the storage layer hands us.
//!
//! Conversion into `Task` is permissive for everything the scorer can default
//! (priority, progress, ai_score, title) and strict only where a row is
//! unusable: no id, no status, or a due date / timestamp we can't read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::task::{Priority, Task, TaskStatus};
use crate::time::parse_due_date;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: Option<String>,
    pub title: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub progress: Option<i32>,
    pub due_date: Option<String>,
    pub ai_score: Option<i32>,
    pub assigned_to: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("task record has no id")]
    MissingId,
    #[error("task {id} has no status")]
    MissingStatus { id: String },
    #[error("task {id} has unreadable due_date '{value}'")]
    InvalidDueDate { id: String, value: String },
    #[error("task {id} has unreadable updated_at '{value}'")]
    InvalidUpdatedAt { id: String, value: String },
}

impl TryFrom<TaskRecord> for Task {
    type Error = RecordError;

    fn try_from(r: TaskRecord) -> Result<Self, Self::Error> {
        let id = r
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or(RecordError::MissingId)?;

        let status = match r.status.as_deref() {
            Some(s) if !s.trim().is_empty() => TaskStatus::parse(s),
            _ => return Err(RecordError::MissingStatus { id }),
        };

        let due_date = match r.due_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match parse_due_date(raw) {
                Some(d) => Some(d),
                None => {
                    return Err(RecordError::InvalidDueDate {
                        id,
                        value: raw.to_string(),
                    })
                }
            },
        };

        let updated_at = match r.updated_at.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match DateTime::parse_from_rfc3339(raw) {
                Ok(dt) => Some(dt.with_timezone(&Utc)),
                Err(_) => {
                    return Err(RecordError::InvalidUpdatedAt {
                        id,
                        value: raw.to_string(),
                    })
                }
            },
        };

        Ok(Task {
            id,
            title: r.title.unwrap_or_default(),
            status,
            priority: Priority::parse(r.priority.as_deref().unwrap_or_default()),
            progress: r.progress.unwrap_or(0),
            due_date,
            ai_score: r.ai_score,
            assigned_to: r.assigned_to,
            category: r.category,
            description: r.description,
            updated_at,
        })
    }
}

/// Result of converting a batch of rows.
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub tasks: Vec<Task>,
    pub rejected: Vec<RecordError>,
}

/// Convert rows in order, skipping (and logging) the unusable ones.
pub fn ingest_records(records: impl IntoIterator<Item = TaskRecord>) -> Ingested {
    let mut out = Ingested::default();
    for r in records {
        match Task::try_from(r) {
            Ok(t) => out.tasks.push(t),
            Err(e) => {
                warn!(error = %e, "skipping task record");
                out.rejected.push(e);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn row(id: &str, status: &str) -> TaskRecord {
        TaskRecord {
            id: Some(id.to_string()),
            status: Some(status.to_string()),
            ..TaskRecord::default()
        }
    }

    #[test]
    fn converts_a_full_row() {
        let json = r#"{
            "id": "t1",
            "title": "Write report",
            "status": "in_progress",
            "priority": "high",
            "progress": 40,
            "due_date": "2026-03-12",
            "ai_score": 70,
            "assigned_to": "sam",
            "category": "ops",
            "description": "Numbers for Q1",
            "updated_at": "2026-03-09T17:30:00+02:00"
        }"#;
        let r: TaskRecord = serde_json::from_str(json).unwrap();
        let t = Task::try_from(r).unwrap();
        assert_eq!(t.status, TaskStatus::InProgress);
        assert_eq!(t.priority, Priority::High);
        assert_eq!(t.due_date, NaiveDate::from_ymd_opt(2026, 3, 12));
        assert_eq!(t.ai_score, Some(70));
        assert_eq!(t.description.as_deref(), Some("Numbers for Q1"));
        assert_eq!(
            t.updated_at,
            Some(Utc.with_ymd_and_hms(2026, 3, 9, 15, 30, 0).unwrap())
        );
    }

    #[test]
    fn permissive_defaults() {
        let r: TaskRecord = serde_json::from_str(r#"{"id": "t2", "status": "pending"}"#).unwrap();
        let t = Task::try_from(r).unwrap();
        assert_eq!(t.title, "");
        assert_eq!(t.priority, Priority::Unrecognized(String::new()));
        assert_eq!(t.progress, 0);
        assert_eq!(t.due_date, None);
        assert_eq!(t.base_quality(), 50);
    }

    #[test]
    fn rejects_unusable_rows() {
        assert_eq!(Task::try_from(row("  ", "pending")), Err(RecordError::MissingId));
        assert_eq!(
            Task::try_from(TaskRecord {
                id: Some("t3".into()),
                ..TaskRecord::default()
            }),
            Err(RecordError::MissingStatus { id: "t3".into() })
        );

        let mut bad_due = row("t4", "pending");
        bad_due.due_date = Some("next friday".into());
        assert_eq!(
            Task::try_from(bad_due),
            Err(RecordError::InvalidDueDate {
                id: "t4".into(),
                value: "next friday".into(),
            })
        );

        let mut bad_stamp = row("t5", "pending");
        bad_stamp.updated_at = Some("yesterday".into());
        assert_eq!(
            Task::try_from(bad_stamp),
            Err(RecordError::InvalidUpdatedAt {
                id: "t5".into(),
                value: "yesterday".into(),
            })
        );
    }

    #[test]
    fn ingest_keeps_order_and_collects_rejects() {
        let rows = vec![row("a", "pending"), TaskRecord::default(), row("b", "completed")];
        let ingested = ingest_records(rows);
        let ids: Vec<&str> = ingested.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(ingested.rejected, vec![RecordError::MissingId]);
    }
}
