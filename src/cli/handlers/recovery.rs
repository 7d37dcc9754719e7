use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};

use crate::cli::commands::{RecoveryAction, RecoveryCmd};
use crate::io::recovery::RecoveryLog;

const DEFAULT_LIMIT: usize = 10;

pub fn cmd_recovery(
    args: RecoveryCmd,
    store_dir: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let log = RecoveryLog::new(store_dir);
    match args.action {
        Some(RecoveryAction::Path) => println!("{}", log.path().display()),
        Some(RecoveryAction::Prune(prune)) => {
            let before = prune.before.as_deref().map(parse_before).transpose()?;
            let removed = log.prune(before, prune.all)?;
            println!("removed {} entries", removed);
        }
        None => {
            let entries = log.entries(Some(args.limit.unwrap_or(DEFAULT_LIMIT)));
            if json {
                let values: Vec<_> = entries.iter().map(|e| e.to_json()).collect();
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else if entries.is_empty() {
                println!("recovery log is empty");
            } else {
                for entry in &entries {
                    print!("{}", entry.to_markdown());
                }
            }
        }
    }
    Ok(())
}

/// RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC)
fn parse_before(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("invalid timestamp: {} (expected RFC 3339 or YYYY-MM-DD)", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn before_accepts_dates_and_timestamps() {
        let midnight = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_before("2026-03-01"), Ok(midnight));
        assert_eq!(parse_before("2026-03-01T02:00:00+02:00"), Ok(midnight));
        assert!(parse_before("last week").is_err());
    }
}
