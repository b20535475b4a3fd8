//! SQLite-backed memo storage.
//!
//! Every public operation opens its own connection, runs one statement and
//! drops the connection before returning, so no handle outlives a call and
//! the store file can be copied or replaced between calls.

mod fold;
mod memo;
mod search;

pub use fold::{AsciiFold, CaseFold, TurkicFold, UnicodeFold};
pub use search::{parse_date, MAX_LIKE_PATTERN};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::{Connection, OpenFlags};
use serde::{Deserialize, Serialize};

use crate::error::MemoError;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const NO_TITLE: &str = "[Untitled]";
pub const NO_BODY: &str = "[Empty memo]";
pub const NO_TAG: &str = "#no_tag";
pub const TAG_MARKER: char = '#';

/// How many memos `view-last` shows.
pub const DEFAULT_LAST_N: usize = 5;

const BUSY_TIMEOUT_SECS: u64 = 5;

// AUTOINCREMENT keeps ids monotonic across deletes, including DELETE FROM memos.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS memos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date_time TEXT NOT NULL,
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    tag TEXT NOT NULL
);
"#;

const MEMO_COLS: &str = "id, date_time, title, body, tag";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    pub id: i64,
    /// Last write to this memo, `YYYY-MM-DD HH:MM:SS` local time.
    pub created_at: String,
    pub title: String,
    pub body: String,
    pub tag: String,
}

/// A memo before the store has given it an id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoInput {
    /// Defaults to now.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tag: String,
}

impl MemoInput {
    pub fn new(title: impl Into<String>, body: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            created_at: None,
            title: title.into(),
            body: body.into(),
            tag: tag.into(),
        }
    }

    pub fn created_at(mut self, ts: impl Into<String>) -> Self {
        self.created_at = Some(ts.into());
        self
    }

    /// Apply placeholders and the tag marker; stamp with now if unset.
    pub fn normalized(&self) -> Result<NormalizedMemo, MemoError> {
        let created_at = match &self.created_at {
            Some(ts) => validate_timestamp(ts)?,
            None => now_stamp(),
        };
        Ok(NormalizedMemo {
            created_at,
            title: normalize_title(&self.title),
            body: normalize_body(&self.body),
            tag: normalize_tag(&self.tag),
        })
    }
}

/// Exactly what gets written to a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedMemo {
    pub created_at: String,
    pub title: String,
    pub body: String,
    pub tag: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Date,
    Title,
    Body,
    Tag,
}

impl SearchField {
    fn column(self) -> &'static str {
        match self {
            SearchField::Date => "date_time",
            SearchField::Title => "title",
            SearchField::Body => "body",
            SearchField::Tag => "tag",
        }
    }
}

/// Outcome of [`MemoDB::search`]. `Blank` means no pattern was given, which
/// is not the same as a pattern that matched nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    Blank,
    Found(Vec<Memo>),
}

impl SearchResult {
    pub fn memos(&self) -> &[Memo] {
        match self {
            SearchResult::Blank => &[],
            SearchResult::Found(m) => m,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Integrity {
    Ok,
    /// Messages reported by the engine.
    Corrupt(Vec<String>),
}

pub fn now_stamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

fn validate_timestamp(ts: &str) -> Result<String, MemoError> {
    let ts = ts.trim();
    chrono::NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT)
        .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
        .map_err(|_| MemoError::BadTimestamp(ts.to_string()))
}

pub fn normalize_title(title: &str) -> String {
    let t = title.trim();
    if t.is_empty() { NO_TITLE.into() } else { t.to_string() }
}

pub fn normalize_body(body: &str) -> String {
    let b = body.trim();
    if b.is_empty() { NO_BODY.into() } else { b.to_string() }
}

/// `"errand"`, `"#errand"` and `"##errand"` all become `"#errand"`.
pub fn normalize_tag(tag: &str) -> String {
    let t = tag.trim().trim_start_matches(TAG_MARKER).trim_start();
    if t.is_empty() {
        NO_TAG.into()
    } else {
        format!("{TAG_MARKER}{t}")
    }
}

/// Handle on one store file. Holds no open connection.
pub struct MemoDB {
    path: PathBuf,
    fold: Arc<dyn CaseFold>,
}

impl MemoDB {
    /// No I/O; the file is touched by the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_fold(path, Arc::new(UnicodeFold))
    }

    pub fn with_fold(path: impl Into<PathBuf>, fold: Arc<dyn CaseFold>) -> Self {
        Self { path: path.into(), fold }
    }

    /// `new` followed by `initialize`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, MemoError> {
        let db = Self::new(path);
        db.initialize()?;
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the memos table if absent. Safe on a populated store.
    pub fn initialize(&self) -> Result<(), MemoError> {
        let conn = self.connect(true)?;
        conn.execute_batch(SCHEMA)?;
        tracing::debug!(path = %self.path.display(), "store initialized");
        Ok(())
    }

    /// Connection to an existing store. Closed when dropped.
    pub(crate) fn conn(&self) -> Result<Connection, MemoError> {
        self.connect(false)
    }

    fn connect(&self, create: bool) -> Result<Connection, MemoError> {
        if !create && !self.path.is_file() {
            return Err(MemoError::StoreMissing(self.path.display().to_string()));
        }
        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if create {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }
        let conn = Connection::open_with_flags(&self.path, flags)?;
        conn.busy_timeout(std::time::Duration::from_secs(BUSY_TIMEOUT_SECS))?;
        fold::register(&conn, &self.fold)?;
        Ok(conn)
    }
}

fn row_to_memo(row: &rusqlite::Row) -> rusqlite::Result<Memo> {
    Ok(Memo {
        id: row.get("id")?,
        created_at: row.get("date_time")?,
        title: row.get("title")?,
        body: row.get("body")?,
        tag: row.get("tag")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_gets_single_marker() {
        assert_eq!(normalize_tag("errand"), "#errand");
        assert_eq!(normalize_tag("  #errand "), "#errand");
        assert_eq!(normalize_tag("##errand"), "#errand");
        assert_eq!(normalize_tag(""), NO_TAG);
        assert_eq!(normalize_tag(" # "), NO_TAG);
    }

    #[test]
    fn placeholders_for_blank_text() {
        assert_eq!(normalize_title("   "), NO_TITLE);
        assert_eq!(normalize_body("\n\t"), NO_BODY);
        assert_eq!(normalize_title(" Groceries "), "Groceries");
    }

    #[test]
    fn input_keeps_explicit_timestamp() {
        let n = MemoInput::new("t", "b", "x")
            .created_at("2024-03-01 09:15:00")
            .normalized()
            .unwrap();
        assert_eq!(n.created_at, "2024-03-01 09:15:00");
        assert_eq!(n.tag, "#x");
    }

    #[test]
    fn input_rejects_bad_timestamp() {
        let err = MemoInput::new("t", "b", "x")
            .created_at("yesterday")
            .normalized()
            .unwrap_err();
        assert!(matches!(err, MemoError::BadTimestamp(_)));
    }

    #[test]
    fn now_stamp_round_trips_format() {
        let s = now_stamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT).is_ok(), "{s}");
    }

    #[test]
    fn conn_refuses_missing_store() {
        let tmp = tempfile::tempdir().unwrap();
        let db = MemoDB::new(tmp.path().join("absent.db"));
        assert!(matches!(db.conn(), Err(MemoError::StoreMissing(_))));
        assert!(!db.path().exists(), "a failed open must not create the file");
    }
}
