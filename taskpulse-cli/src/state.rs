use anyhow::{Context, Result};
use std::path::PathBuf;

/// Per-user state directory, `~/.taskpulse`.
pub fn taskpulse_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".taskpulse"))
}
