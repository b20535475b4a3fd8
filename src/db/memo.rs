//! Memo CRUD operations.

use rusqlite::{params, OptionalExtension};

use super::*;

/// Column an edit replaces, alongside `date_time`.
#[derive(Debug, Clone, Copy)]
enum EditField {
    Title,
    Body,
    Tag,
}

impl EditField {
    fn column(self) -> &'static str {
        match self {
            EditField::Title => "title",
            EditField::Body => "body",
            EditField::Tag => "tag",
        }
    }

    fn normalize(self, value: &str) -> String {
        match self {
            EditField::Title => normalize_title(value),
            EditField::Body => normalize_body(value),
            EditField::Tag => normalize_tag(value),
        }
    }
}

impl MemoDB {
    /// Append one row; returns the id the engine assigned.
    pub fn insert(&self, input: &MemoInput) -> Result<i64, MemoError> {
        let memo = input.normalized()?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO memos (date_time, title, body, tag) VALUES (?1, ?2, ?3, ?4)",
            params![memo.created_at, memo.title, memo.body, memo.tag],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(id, "memo inserted");
        Ok(id)
    }

    /// Row count. Engine errors are logged and reported as 0; use
    /// [`MemoDB::try_count`] when the caller must tell "empty" from "unreadable".
    pub fn count(&self) -> usize {
        self.try_count().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "count failed");
            0
        })
    }

    pub fn try_count(&self) -> Result<usize, MemoError> {
        let n: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM memos", [], |r| r.get(0))?;
        Ok(usize::try_from(n).unwrap_or(0))
    }

    /// `Ok(None)` for ids that are not positive or have no row.
    pub fn get(&self, id: i64) -> Result<Option<Memo>, MemoError> {
        if id <= 0 {
            return Ok(None);
        }
        let conn = self.conn()?;
        let memo = conn
            .query_row(
                &format!("SELECT {MEMO_COLS} FROM memos WHERE id = ?1"),
                params![id],
                row_to_memo,
            )
            .optional()?;
        Ok(memo)
    }

    /// Most recently inserted memo.
    pub fn recent(&self) -> Result<Option<Memo>, MemoError> {
        Ok(self.last_n(1)?.into_iter().next())
    }

    /// Up to `n` memos, newest first.
    pub fn last_n(&self, n: usize) -> Result<Vec<Memo>, MemoError> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare(&format!("SELECT {MEMO_COLS} FROM memos ORDER BY id DESC LIMIT ?1"))?;
        let limit = i64::try_from(n).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![limit], row_to_memo)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Every memo in creation order.
    pub fn list_all(&self) -> Result<Vec<Memo>, MemoError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {MEMO_COLS} FROM memos ORDER BY id"))?;
        let rows = stmt
            .query_map([], row_to_memo)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn update_title(&self, id: i64, title: &str) -> Result<bool, MemoError> {
        self.update_field(id, EditField::Title, title)
    }

    pub fn update_body(&self, id: i64, body: &str) -> Result<bool, MemoError> {
        self.update_field(id, EditField::Body, body)
    }

    pub fn update_tag(&self, id: i64, tag: &str) -> Result<bool, MemoError> {
        self.update_field(id, EditField::Tag, tag)
    }

    /// Replace one field and restamp the row. `false` if no such row.
    fn update_field(&self, id: i64, field: EditField, value: &str) -> Result<bool, MemoError> {
        if id <= 0 {
            return Ok(false);
        }
        let value = field.normalize(value);
        let sql = format!(
            "UPDATE memos SET date_time = ?1, {} = ?2 WHERE id = ?3",
            field.column()
        );
        let n = self.conn()?.execute(&sql, params![now_stamp(), value, id])?;
        if n > 0 {
            tracing::debug!(id, field = field.column(), "memo updated");
        }
        Ok(n > 0)
    }

    pub fn delete(&self, id: i64) -> Result<bool, MemoError> {
        if id <= 0 {
            return Ok(false);
        }
        let n = self
            .conn()?
            .execute("DELETE FROM memos WHERE id = ?1", params![id])?;
        if n > 0 {
            tracing::debug!(id, "memo deleted");
        }
        Ok(n > 0)
    }

    /// Remove every memo. Id sequencing continues where it was.
    pub fn delete_all(&self) -> Result<usize, MemoError> {
        let n = self.conn()?.execute("DELETE FROM memos", [])?;
        tracing::info!(removed = n, "all memos deleted");
        Ok(n)
    }
}
