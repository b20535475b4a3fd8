//! Field search and engine consistency check.

use rusqlite::{params, ErrorCode};

use super::*;

const LIKE_ESCAPE: char = '\\';

/// SQLite refuses LIKE patterns longer than this many bytes
/// (`SQLITE_MAX_LIKE_PATTERN_LENGTH`).
pub const MAX_LIKE_PATTERN: usize = 50_000;

/// Escape LIKE wildcards so user text matches literally.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

/// `%text%` with wildcards escaped. Longer than [`MAX_LIKE_PATTERN`] is a
/// validation error.
fn like_pattern(folded: &str) -> Result<String, MemoError> {
    let pattern = format!("%{}%", escape_like(folded));
    if pattern.len() > MAX_LIKE_PATTERN {
        return Err(MemoError::Validation(format!(
            "search text is too long ({} bytes, at most {} allowed)",
            pattern.len(),
            MAX_LIKE_PATTERN
        )));
    }
    Ok(pattern)
}

/// Accepts `YYYY-MM-DD` (single-digit month/day tolerated), returns it canonical.
pub fn parse_date(pattern: &str) -> Result<String, MemoError> {
    chrono::NaiveDate::parse_from_str(pattern, DATE_FORMAT)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .map_err(|_| MemoError::BadDate(pattern.to_string()))
}

impl MemoDB {
    /// Search one field. A blank pattern returns [`SearchResult::Blank`]
    /// without touching the store.
    ///
    /// `Date` compares the calendar day of `date_time`; the text fields do a
    /// case-folded substring match using this store's [`CaseFold`].
    pub fn search(&self, field: SearchField, pattern: &str) -> Result<SearchResult, MemoError> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Ok(SearchResult::Blank);
        }

        let (sql, arg) = match field {
            SearchField::Date => (
                format!("SELECT {MEMO_COLS} FROM memos WHERE date(date_time) = ?1 ORDER BY id"),
                parse_date(pattern)?,
            ),
            SearchField::Title | SearchField::Body | SearchField::Tag => (
                format!(
                    "SELECT {MEMO_COLS} FROM memos \
                     WHERE {}({}) LIKE ?1 ESCAPE '{LIKE_ESCAPE}' ORDER BY id",
                    fold::FOLD_FN,
                    field.column(),
                ),
                like_pattern(&self.fold.fold(pattern))?,
            ),
        };

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![arg], row_to_memo)?
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(?field, hits = rows.len(), "search");
        Ok(SearchResult::Found(rows))
    }

    /// `PRAGMA integrity_check`. A file the engine rejects as damaged or not
    /// a database at all is `Corrupt`; a missing store is an error.
    pub fn integrity_check(&self) -> Result<Integrity, MemoError> {
        let conn = self.conn()?;
        let checked = conn.prepare("PRAGMA integrity_check").and_then(|mut stmt| {
            let lines = stmt
                .query_map([], |r| r.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(lines)
        });
        match checked {
            Ok(lines) if lines.len() == 1 && lines[0] == "ok" => Ok(Integrity::Ok),
            Ok(lines) => Ok(Integrity::Corrupt(lines)),
            Err(rusqlite::Error::SqliteFailure(e, msg))
                if matches!(e.code, ErrorCode::DatabaseCorrupt | ErrorCode::NotADatabase) =>
            {
                Ok(Integrity::Corrupt(vec![msg.unwrap_or_else(|| e.to_string())]))
            }
            Err(e) => Err(e.into()),
        }
    }
}
