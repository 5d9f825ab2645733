//! Time utilities: day arithmetic against due dates and timezone-aware "now" parsing.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// A due date is a calendar day; it falls due at midnight UTC.
pub fn due_instant(due: NaiveDate) -> DateTime<Utc> {
    due.and_hms_opt(0, 0, 0)
        .map(|ndt| ndt.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Whole days until `due`, rounded up. Negative once the due instant has passed
/// by more than a full day.
pub fn days_until_due(due: NaiveDate, now: DateTime<Utc>) -> i64 {
    let ms = (due_instant(due) - now).num_milliseconds();
    let days = ms.div_euclid(MILLIS_PER_DAY);
    if ms.rem_euclid(MILLIS_PER_DAY) != 0 {
        days + 1
    } else {
        days
    }
}

/// Whole days until `due`, rounded down. Overdue tasks and tasks due later
/// today both come out at or below zero.
pub fn whole_days_until_due(due: NaiveDate, now: DateTime<Utc>) -> i64 {
    (due_instant(due) - now)
        .num_milliseconds()
        .div_euclid(MILLIS_PER_DAY)
}

/// Parse a wall-clock time like "2026-02-20 23:59" in an IANA tz like "America/Chicago",
/// returning UTC.
pub fn parse_local_to_utc(local: &str, tz: &str) -> Result<DateTime<Utc>> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;

    let ndt = NaiveDateTime::parse_from_str(local, "%Y-%m-%d %H:%M")
        .map_err(|e| anyhow::anyhow!("invalid local datetime '{local}': {e}"))?;

    let local_dt = tz
        .from_local_datetime(&ndt)
        .single()
        .ok_or_else(|| anyhow::anyhow!("ambiguous or invalid local time (DST?): {local} {tz}"))?;

    Ok(local_dt.with_timezone(&Utc))
}

/// Accept either RFC3339 or "YYYY-MM-DD HH:MM" local to `tz`.
pub fn parse_instant(raw: &str, tz: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    parse_local_to_utc(raw, tz)
}

/// Parse a stored due date. Accepts "YYYY-MM-DD" or a full RFC3339 timestamp
/// (only the date part is kept).
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
