//! Case-folding strategies for substring search.
//!
//! SQLite's built-in `lower()`/`LIKE` only fold ASCII. Instead of loading an
//! ICU extension, each connection gets a `memo_fold()` scalar function backed
//! by one of these strategies, and both sides of a comparison go through it.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

pub(super) const FOLD_FN: &str = "memo_fold";

pub trait CaseFold: Send + Sync {
    fn fold(&self, text: &str) -> String;
}

/// Unicode lowercase plus the common multi-letter folds: `ß`/`ẞ` → `ss` and
/// final `ς` → `σ`, so "STRASSE" finds "Straße". Not the complete
/// CaseFolding.txt table (ligatures like `ﬁ` stay as they are).
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeFold;

impl CaseFold for UnicodeFold {
    fn fold(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.to_lowercase().chars() {
            match c {
                'ß' => out.push_str("ss"),
                'ς' => out.push('σ'),
                _ => out.push(c),
            }
        }
        out
    }
}

/// Turkish/Azerbaijani rules: `I` → `ı`, `İ` → `i`, otherwise Unicode.
#[derive(Debug, Default, Clone, Copy)]
pub struct TurkicFold;

impl CaseFold for TurkicFold {
    fn fold(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                'I' => out.push('ı'),
                'İ' => out.push('i'),
                _ => out.extend(c.to_lowercase()),
            }
        }
        out
    }
}

/// ASCII-only, the engine's native behavior.
#[derive(Debug, Default, Clone, Copy)]
pub struct AsciiFold;

impl CaseFold for AsciiFold {
    fn fold(&self, text: &str) -> String {
        text.to_ascii_lowercase()
    }
}

pub(super) fn register(conn: &Connection, fold: &Arc<dyn CaseFold>) -> rusqlite::Result<()> {
    let fold = AssertUnwindSafe(Arc::clone(fold));
    conn.create_scalar_function(
        FOLD_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        move |ctx| {
            let text: String = ctx.get(0)?;
            Ok(fold.fold(&text))
        },
    )
}
