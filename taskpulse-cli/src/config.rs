use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use taskpulse_core::{DEFAULT_QUEUE_BOUND, DEFAULT_SCHEDULE_BOUND, ScoringPolicy};

use crate::state::taskpulse_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub queue: QueueSection,
    pub schedule: ScheduleSection,
    pub scoring: ScoringSection,
    pub time: TimeSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueSection {
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSection {
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSection {
    /// Score "urgent" like "high" instead of the unrecognized-priority weight.
    pub urgent_as_high: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSection {
    /// IANA zone used to read `--now` when it has no offset.
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Filter used when RUST_LOG is unset.
    pub level: String,
}

impl Default for QueueSection {
    fn default() -> Self {
        Self {
            limit: DEFAULT_QUEUE_BOUND,
        }
    }
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SCHEDULE_BOUND,
        }
    }
}

impl Default for ScoringSection {
    fn default() -> Self {
        Self {
            urgent_as_high: ScoringPolicy::default().urgent_as_high,
        }
    }
}

impl Default for TimeSection {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn scoring_policy(&self) -> ScoringPolicy {
        ScoringPolicy {
            urgent_as_high: self.scoring.urgent_as_high,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(taskpulse_home()?.join("config.toml"))
}

/// Load from `path`, or the default location. A missing file means defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

/// Write `cfg` to `path`, creating parent dirs as needed.
pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))
}

/// Write the default config unless one is already there.
pub fn init_config(path: Option<&Path>) -> Result<PathBuf> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(p);
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(p)
}
