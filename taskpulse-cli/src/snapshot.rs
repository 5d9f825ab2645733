//! Reading task snapshots exported from the storage layer.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use taskpulse_core::{PredictiveTask, Priority, Task, TaskRecord, ingest_records};

#[derive(Debug, Clone, Deserialize)]
struct PredictiveRecord {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    complexity: Option<i32>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        bail!("snapshot not found: {}", path.display());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

/// Load task rows and convert them; unusable rows are logged and skipped.
pub fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    let records: Vec<TaskRecord> = read_json(path)?;
    let ingested = ingest_records(records);
    if !ingested.rejected.is_empty() {
        tracing::warn!(
            rejected = ingested.rejected.len(),
            path = %path.display(),
            "some task records were skipped"
        );
    }
    Ok(ingested.tasks)
}

pub fn load_predictive_tasks(path: &Path) -> Result<Vec<PredictiveTask>> {
    let records: Vec<PredictiveRecord> = read_json(path)?;
    Ok(records
        .into_iter()
        .map(|r| {
            PredictiveTask::new(r.id, r.title)
                .with_priority(Priority::parse(r.priority.as_deref().unwrap_or("medium")))
                .with_complexity(r.complexity.unwrap_or(50))
        })
        .collect())
}
