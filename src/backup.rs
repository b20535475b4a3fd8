//! Backup, restore, integrity check and recreation of the store file.
//!
//! Works purely on the two file paths. Anything that would overwrite existing
//! data asks a [`Confirm`] first; purely additive steps (creating an empty
//! store, restoring into a store that does not exist) do not.
//!
//! Not atomic with respect to writers: callers must not run these while a
//! store operation against the same path is in progress.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::confirm::{Confirm, Question};
use crate::db::{Integrity, MemoDB};
use crate::error::MemoError;
use crate::paths;

/// Which of the two files are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    NoStoreNoBackup,
    StoreOnly,
    BackupOnly,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    Created(PathBuf),
    Declined,
    NoStore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Store was absent and has been created from the backup.
    Restored(PathBuf),
    /// Live store replaced by the backup.
    Overwritten(PathBuf),
    Declined,
    BackupMissing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecreateOutcome {
    Recreated,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupOutcome {
    Existing,
    /// Fresh empty store. `backup_kept` when a backup was offered and declined.
    Created { backup_kept: bool },
    Restored,
}

pub struct BackupManager {
    store: PathBuf,
    backup: PathBuf,
}

impl BackupManager {
    pub fn new(store: impl Into<PathBuf>) -> Self {
        let store = store.into();
        let backup = paths::backup_path(&store);
        Self { store, backup }
    }

    pub fn store_path(&self) -> &Path {
        &self.store
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup
    }

    pub fn state(&self) -> FileState {
        match (self.store.is_file(), self.backup.is_file()) {
            (false, false) => FileState::NoStoreNoBackup,
            (true, false) => FileState::StoreOnly,
            (false, true) => FileState::BackupOnly,
            (true, true) => FileState::Both,
        }
    }

    /// Bring the store up at program start.
    pub fn startup(&self, confirm: &mut dyn Confirm) -> Result<StartupOutcome, MemoError> {
        let outcome = match self.state() {
            FileState::StoreOnly | FileState::Both => {
                MemoDB::new(&self.store).initialize()?;
                StartupOutcome::Existing
            }
            FileState::BackupOnly => {
                let q = Question::RestoreMissingStore { backup: self.backup.clone() };
                if confirm.confirm(&q) {
                    self.copy_backup_in()?;
                    StartupOutcome::Restored
                } else {
                    MemoDB::new(&self.store).initialize()?;
                    StartupOutcome::Created { backup_kept: true }
                }
            }
            FileState::NoStoreNoBackup => {
                MemoDB::new(&self.store).initialize()?;
                StartupOutcome::Created { backup_kept: false }
            }
        };
        info!(store = %self.store.display(), ?outcome, "startup");
        Ok(outcome)
    }

    /// Snapshot the store into the backup file.
    pub fn backup(&self, confirm: &mut dyn Confirm) -> Result<BackupOutcome, MemoError> {
        if !self.store.is_file() {
            warn!(store = %self.store.display(), "backup skipped, no store");
            return Ok(BackupOutcome::NoStore);
        }
        if !confirm.confirm(&Question::Backup { backup: self.backup.clone() }) {
            return Ok(BackupOutcome::Declined);
        }
        let bytes = fs::copy(&self.store, &self.backup)?;
        info!(backup = %self.backup.display(), bytes, "backup written");
        Ok(BackupOutcome::Created(self.backup.clone()))
    }

    pub fn restore(&self, confirm: &mut dyn Confirm) -> Result<RestoreOutcome, MemoError> {
        match self.state() {
            FileState::BackupOnly => {
                self.copy_backup_in()?;
                Ok(RestoreOutcome::Restored(self.store.clone()))
            }
            FileState::Both => {
                if !confirm.confirm(&Question::OverwriteStore { store: self.store.clone() }) {
                    return Ok(RestoreOutcome::Declined);
                }
                self.copy_backup_in()?;
                Ok(RestoreOutcome::Overwritten(self.store.clone()))
            }
            FileState::StoreOnly | FileState::NoStoreNoBackup => Ok(RestoreOutcome::BackupMissing),
        }
    }

    pub fn check_integrity(&self) -> Result<Integrity, MemoError> {
        let report = MemoDB::new(&self.store).integrity_check()?;
        match &report {
            Integrity::Ok => info!(store = %self.store.display(), "integrity ok"),
            Integrity::Corrupt(lines) => {
                warn!(store = %self.store.display(), problems = lines.len(), "integrity check failed")
            }
        }
        Ok(report)
    }

    /// Delete the store (after confirmation) and start with an empty one.
    /// With no store present there is nothing to lose, so no question is asked.
    pub fn recreate(&self, confirm: &mut dyn Confirm) -> Result<RecreateOutcome, MemoError> {
        if self.store.exists() {
            if !confirm.confirm(&Question::Recreate { store: self.store.clone() }) {
                return Ok(RecreateOutcome::Declined);
            }
            fs::remove_file(&self.store)?;
            remove_stale_journal(&self.store)?;
            warn!(store = %self.store.display(), "store deleted");
        }
        MemoDB::new(&self.store).initialize()?;
        info!(store = %self.store.display(), "store recreated");
        Ok(RecreateOutcome::Recreated)
    }

    fn copy_backup_in(&self) -> Result<(), MemoError> {
        remove_stale_journal(&self.store)?;
        let bytes = fs::copy(&self.backup, &self.store)?;
        info!(store = %self.store.display(), bytes, "store restored from backup");
        Ok(())
    }
}

// A journal left by a crash would be rolled back onto whatever file we put in place.
fn remove_stale_journal(store: &Path) -> Result<(), MemoError> {
    match fs::remove_file(paths::journal_path(store)) {
        Ok(()) => {
            warn!(store = %store.display(), "removed stale rollback journal");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
