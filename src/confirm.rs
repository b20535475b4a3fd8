//! Confirmation seam between the store and whoever is asking the user.

use std::path::PathBuf;

/// A destructive step awaiting a yes/no answer. The wording is up to the
/// implementor of [`Confirm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Question {
    /// Create or overwrite the backup file.
    Backup { backup: PathBuf },
    /// Replace the live store with the backup.
    OverwriteStore { store: PathBuf },
    /// Store is gone but a backup exists; restore it?
    RestoreMissingStore { backup: PathBuf },
    /// Delete the store and start empty.
    Recreate { store: PathBuf },
    DeleteMemo(i64),
    DeleteAll,
    SaveTitle(i64),
    SaveBody(i64),
    SaveTag(i64),
}

pub trait Confirm {
    fn confirm(&mut self, question: &Question) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&Question) -> bool,
{
    fn confirm(&mut self, question: &Question) -> bool {
        self(question)
    }
}
