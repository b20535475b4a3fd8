/// Coarse classification used by the shell to pick a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Store cannot be opened, written, or is structurally damaged.
    EngineUnavailable,
    NotFound,
    ValidationFailed,
}

#[derive(Debug, thiserror::Error)]
pub enum MemoError {
    #[error("invalid memo id '{0}'")]
    InvalidId(String),

    #[error("malformed date '{0}' (expected YYYY-MM-DD)")]
    BadDate(String),

    #[error("malformed timestamp '{0}' (expected YYYY-MM-DD HH:MM:SS)")]
    BadTimestamp(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("memo with ID {0} not found")]
    NotFound(i64),

    #[error("home directory could not be determined")]
    NoHomeDir,

    #[error("store file not found: {0}")]
    StoreMissing(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl MemoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidId(_) | Self::BadDate(_) | Self::BadTimestamp(_) | Self::Validation(_) => {
                ErrorKind::ValidationFailed
            }
            Self::NoHomeDir | Self::StoreMissing(_) | Self::Database(_) | Self::Io(_) => {
                ErrorKind::EngineUnavailable
            }
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.kind() == ErrorKind::EngineUnavailable
    }
}
