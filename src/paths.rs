//! Store and backup locations.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::MemoError;

pub const APP_DIR: &str = ".memopad";
pub const STORE_FILE: &str = "memos.db";
pub const BACKUP_SUFFIX: &str = ".backup";

/// `~/.memopad/memos.db`, creating `~/.memopad` if needed.
pub fn store_path() -> Result<PathBuf, MemoError> {
    let home = dirs::home_dir().ok_or(MemoError::NoHomeDir)?;
    store_path_in(&home.join(APP_DIR))
}

/// Store path inside `dir`. Creates `dir` (and parents); idempotent.
pub fn store_path_in(dir: &Path) -> Result<PathBuf, MemoError> {
    fs::create_dir_all(dir)?;
    Ok(dir.join(STORE_FILE))
}

/// Make sure an explicitly configured store path has its directory.
pub fn prepare_store_path(path: &Path) -> Result<PathBuf, MemoError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)?,
        _ => {}
    }
    Ok(path.to_path_buf())
}

/// Same directory, file name plus [`BACKUP_SUFFIX`]. No I/O.
pub fn backup_path(store: &Path) -> PathBuf {
    let mut name = store
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| STORE_FILE.into());
    name.push(BACKUP_SUFFIX);
    store.with_file_name(name)
}

/// Rollback journal SQLite leaves next to the store after a crash.
pub(crate) fn journal_path(store: &Path) -> PathBuf {
    let mut name = store
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| STORE_FILE.into());
    name.push("-journal");
    store.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_sits_next_to_store() {
        let p = backup_path(Path::new("/home/u/.memopad/memos.db"));
        assert_eq!(p, PathBuf::from("/home/u/.memopad/memos.db.backup"));
    }

    #[test]
    fn backup_of_relative_store() {
        assert_eq!(backup_path(Path::new("notes.db")), PathBuf::from("notes.db.backup"));
    }

    #[test]
    fn journal_name() {
        let p = journal_path(Path::new("/tmp/x/memos.db"));
        assert_eq!(p, PathBuf::from("/tmp/x/memos.db-journal"));
    }

    #[test]
    fn store_dir_created_idempotently() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a").join("b");
        let first = store_path_in(&dir).unwrap();
        let second = store_path_in(&dir).unwrap();
        assert_eq!(first, second);
        assert!(dir.is_dir());
        assert_eq!(first.file_name().unwrap(), STORE_FILE);
        assert!(!first.exists(), "resolver must not create the store itself");
    }
}
