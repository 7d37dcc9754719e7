use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use super::lock::try_flock;

/// File name of the recovery log inside the store directory
pub const RECOVERY_FILE: &str = ".recovery.log";

/// Entries older than this are removed by a default prune
pub const PRUNE_AGE_DAYS: i64 = 30;

/// Above this size, old entries are trimmed before appending
const MAX_LOG_SIZE: u64 = 1_048_576;

const FILE_HEADER: &str = "\
<!-- stickerboard recovery log
     Boards that could not be saved, documents that failed to import and
     deleted lists/groups are kept here as JSON.
     View with: sb recovery
     Prune old entries: sb recovery prune -->

---
";

const SEPARATOR: &str = " | ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// A board that could not be written to the store
    Write,
    /// A deleted list or sub-list
    Delete,
    /// A document or share link that was rejected
    Import,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecoveryCategory::Write => "write",
            RecoveryCategory::Delete => "delete",
            RecoveryCategory::Import => "import",
        })
    }
}

impl RecoveryCategory {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "write" => Some(RecoveryCategory::Write),
            "delete" => Some(RecoveryCategory::Delete),
            "import" => Some(RecoveryCategory::Import),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

impl RecoveryEntry {
    pub fn new(category: RecoveryCategory, description: impl Into<String>) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category,
            description: description.into(),
            fields: Vec::new(),
            body: String::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.fields.push((key.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Markdown block as stored in the log
    pub fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {}{}{}: {}\n\n",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            SEPARATOR,
            self.category,
            self.description,
        );
        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }
        if !self.body.is_empty() {
            out.push_str("\n```json\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }
        out.push_str("\n---\n");
        out
    }

    pub fn to_json(&self) -> serde_json::Value {
        let fields: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();
        serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            "category": self.category.to_string(),
            "description": self.description,
            "fields": fields,
            "body": self.body,
        })
    }
}

/// Append-only markdown log of data that would otherwise be lost.
#[derive(Debug, Clone)]
pub struct RecoveryLog {
    path: PathBuf,
}

impl RecoveryLog {
    pub fn new(store_dir: &Path) -> Self {
        RecoveryLog {
            path: store_dir.join(RECOVERY_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an entry. Failures are logged and otherwise ignored.
    pub fn record(&self, entry: RecoveryEntry) {
        if let Err(e) = self.append(&entry) {
            tracing::warn!(path = %self.path.display(), error = %e, "could not write recovery log");
        }
    }

    fn append(&self, entry: &RecoveryEntry) -> io::Result<()> {
        if std::fs::metadata(&self.path).is_ok_and(|m| m.len() > MAX_LOG_SIZE) {
            let cutoff = Utc::now() - Duration::days(PRUNE_AGE_DAYS);
            let _ = self.rewrite_locked(|content| drop_entries_before(content, &cutoff), false);
        }
        let needs_header = std::fs::metadata(&self.path).map_or(true, |m| m.len() == 0);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if needs_header {
            file.write_all(FILE_HEADER.as_bytes())?;
        }
        file.write_all(entry.to_markdown().as_bytes())
    }

    /// Entries newest first, at most `limit` of them
    pub fn entries(&self, limit: Option<usize>) -> Vec<RecoveryEntry> {
        let Ok(content) = std::fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        let mut entries = parse_entries(&content);
        entries.reverse();
        if let Some(n) = limit {
            entries.truncate(n);
        }
        entries
    }

    /// Remove entries older than `before` (default: 30 days), or every
    /// entry with `all`. Returns how many were removed.
    pub fn prune(&self, before: Option<DateTime<Utc>>, all: bool) -> io::Result<usize> {
        if !self.path.exists() {
            return Ok(0);
        }
        let cutoff = before.unwrap_or_else(|| Utc::now() - Duration::days(PRUNE_AGE_DAYS));
        self.rewrite_locked(
            |content| {
                if all {
                    FILE_HEADER.to_string()
                } else {
                    drop_entries_before(content, &cutoff)
                }
            },
            true,
        )
    }

    /// Rewrite the log under an exclusive lock, returning how many entries
    /// disappeared. With `wait`, retries the lock for about a second.
    fn rewrite_locked(&self, f: impl FnOnce(&str) -> String, wait: bool) -> io::Result<usize> {
        let file = OpenOptions::new().read(true).write(true).open(&self.path)?;
        let attempts = if wait { 10 } else { 1 };
        let mut locked = false;
        for attempt in 0..attempts {
            if try_flock(&file).is_ok() {
                locked = true;
                break;
            }
            if attempt + 1 < attempts {
                std::thread::sleep(std::time::Duration::from_millis(100));
            }
        }
        if !locked {
            return Err(io::Error::new(
                io::ErrorKind::WouldBlock,
                "recovery log is in use, try again later",
            ));
        }

        let content = std::fs::read_to_string(&self.path)?;
        let before = parse_entries(&content).len();
        let next = f(&content);
        let after = parse_entries(&next).len();
        std::fs::write(&self.path, next)?;
        Ok(before - after)
    }
}

fn parse_header(header: &str) -> Option<(DateTime<Utc>, RecoveryCategory, String)> {
    let (ts, rest) = header.split_once(SEPARATOR)?;
    let timestamp = DateTime::parse_from_rfc3339(ts).ok()?.with_timezone(&Utc);
    let (category, description) = rest.split_once(": ")?;
    Some((
        timestamp,
        RecoveryCategory::parse(category)?,
        description.to_string(),
    ))
}

/// Parse entries oldest first
fn parse_entries(content: &str) -> Vec<RecoveryEntry> {
    let mut entries = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some((timestamp, category, description)) =
            line.strip_prefix("## ").and_then(parse_header)
        else {
            continue;
        };

        let mut fields = Vec::new();
        let mut body = String::new();
        let mut in_body = false;
        for line in lines.by_ref() {
            if in_body {
                if line == "```" {
                    in_body = false;
                } else {
                    if !body.is_empty() {
                        body.push('\n');
                    }
                    body.push_str(line);
                }
                continue;
            }
            if line == "---" {
                break;
            }
            if line.starts_with("```") {
                in_body = true;
            } else if let Some((k, v)) = line.trim().split_once(": ") {
                fields.push((k.to_string(), v.to_string()));
            }
        }

        entries.push(RecoveryEntry {
            timestamp,
            category,
            description,
            fields,
            body,
        });
    }
    entries
}

/// Drop entries stamped before `cutoff`, keeping the file header.
fn drop_entries_before(content: &str, cutoff: &DateTime<Utc>) -> String {
    let mut out = String::new();
    let mut current = String::new();
    let mut keep = false;
    let mut in_header = true;

    for line in content.lines() {
        if in_header {
            out.push_str(line);
            out.push('\n');
            in_header = line != "---";
            continue;
        }
        if let Some(header) = line.strip_prefix("## ") {
            if keep {
                out.push_str(&current);
            }
            current.clear();
            keep = parse_header(header).is_some_and(|(ts, _, _)| ts >= *cutoff);
        }
        current.push_str(line);
        current.push('\n');
    }
    if keep {
        out.push_str(&current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn deleted_list(days_ago: i64, name: &str) -> RecoveryEntry {
        let mut entry = RecoveryEntry::new(RecoveryCategory::Delete, format!("list {} deleted", name))
            .field("List", name)
            .body(format!("{{\"name\":\"{}\"}}", name));
        entry.timestamp = Utc::now() - Duration::days(days_ago);
        entry
    }

    #[test]
    fn markdown_layout() {
        let md = deleted_list(0, "Option A").to_markdown();
        assert!(md.starts_with("## "));
        assert!(md.contains(" | delete: list Option A deleted\n"));
        assert!(md.contains("List: Option A\n"));
        assert!(md.contains("```json\n{\"name\":\"Option A\"}\n```\n"));
        assert!(md.ends_with("---\n"));
    }

    #[test]
    fn record_and_read_back_newest_first() {
        let tmp = TempDir::new().unwrap();
        let log = RecoveryLog::new(tmp.path());
        log.record(deleted_list(0, "first"));
        log.record(
            RecoveryEntry::new(RecoveryCategory::Write, "save failed")
                .field("Error", "Permission denied")
                .body("[]"),
        );

        let entries = log.entries(None);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].category, RecoveryCategory::Write);
        assert_eq!(entries[0].fields[0], ("Error".into(), "Permission denied".into()));
        assert_eq!(entries[0].body, "[]");
        assert_eq!(entries[1].description, "list first deleted");

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert!(content.starts_with("<!-- stickerboard recovery log"));
        assert_eq!(log.entries(Some(1)).len(), 1);
    }

    #[test]
    fn prune_by_age_and_all() {
        let tmp = TempDir::new().unwrap();
        let log = RecoveryLog::new(tmp.path());
        log.record(deleted_list(60, "old"));
        log.record(deleted_list(0, "new"));

        assert_eq!(log.prune(None, false).unwrap(), 1);
        let entries = log.entries(None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].fields[0].1, "new");

        assert_eq!(log.prune(None, true).unwrap(), 1);
        assert!(log.entries(None).is_empty());
    }

    #[test]
    fn missing_log_is_empty() {
        let tmp = TempDir::new().unwrap();
        let log = RecoveryLog::new(&tmp.path().join("nowhere"));
        assert!(log.entries(None).is_empty());
        assert_eq!(log.prune(None, true).unwrap(), 0);
    }

    #[test]
    fn json_shape() {
        let json = deleted_list(0, "x").to_json();
        assert_eq!(json["category"], "delete");
        assert_eq!(json["fields"]["List"], "x");
    }

    #[test]
    fn header_parse_rejects_unknown_category() {
        assert!(parse_header("2026-02-10T14:32:05Z | delete: gone").is_some());
        assert!(parse_header("2026-02-10T14:32:05Z | other: gone").is_none());
        assert!(parse_header("not a header").is_none());
    }
}
