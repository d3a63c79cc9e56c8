pub mod doctor;
pub mod export;
pub mod greet;
pub mod reminders;
pub mod run;
pub mod session;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

const LOCAL_FORMATS: &[&str] = &["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Parse an absolute trigger time: RFC 3339, or a local `YYYY-MM-DD HH:MM`.
pub fn parse_at(input: &str) -> Result<i64> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.timestamp_millis());
    }
    for format in LOCAL_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            let local = Local
                .from_local_datetime(&naive)
                .earliest()
                .with_context(|| format!("{input} does not exist in the local time zone"))?;
            return Ok(local.timestamp_millis());
        }
    }
    bail!("unrecognized time {input:?}; use RFC 3339 or \"YYYY-MM-DD HH:MM\"")
}

/// Parse a relative offset such as `90s`, `15m`, `2h`, or `1d` into milliseconds.
pub fn parse_in(input: &str) -> Result<i64> {
    let input = input.trim();
    let split = input
        .find(|c: char| !c.is_ascii_digit() && c != '-')
        .unwrap_or(input.len());
    let (amount, unit) = input.split_at(split);
    let amount: i64 = amount
        .parse()
        .with_context(|| format!("invalid offset {input:?}"))?;
    let unit_ms = match unit {
        "" | "m" | "min" => 60_000,
        "s" => 1_000,
        "h" => 3_600_000,
        "d" => 86_400_000,
        other => bail!("unknown offset unit {other:?}; use s, m, h, or d"),
    };
    amount
        .checked_mul(unit_ms)
        .with_context(|| format!("offset {input:?} is out of range"))
}

/// Resolve `--at` / `--in` into epoch milliseconds.
pub fn resolve_when(at: Option<&str>, r#in: Option<&str>, now: i64) -> Result<Option<i64>> {
    match (at, r#in) {
        (Some(at), None) => parse_at(at).map(Some),
        (None, Some(offset)) => {
            let at = now
                .checked_add(parse_in(offset)?)
                .with_context(|| format!("offset {offset:?} is out of range"))?;
            Ok(Some(at))
        }
        (None, None) => Ok(None),
        (Some(_), Some(_)) => bail!("use either --at or --in, not both"),
    }
}

#[cfg(test)]
pub mod test_support {
    use std::sync::Arc;

    use chronos::app::App;
    use chronos::clock::FixedClock;
    use chronos::config::ChronosConfig;
    use chronos::db;

    pub const USER: &str = "alice";
    pub const NOW: i64 = 1_772_355_600_000;

    /// An in-memory app signed in as [`USER`] with the clock pinned at [`NOW`].
    pub fn test_app() -> App {
        let mut config = ChronosConfig::default();
        config.session.user_id = Some(USER.into());
        let conn = db::open_memory_database().unwrap();
        App::with_connection(config, conn, Arc::new(FixedClock::new(NOW)))
    }
}
