use thiserror::Error;

use super::bookmark::DuplicateKind;

// === BookmarkError ===

/// Errors related to bookmark and folder operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookmarkError {
    /// The new bookmark collides with an existing one of the same owner.
    #[error("{}", .0.message())]
    Duplicate(DuplicateKind),
    /// The target folder does not exist or belongs to another user.
    #[error("Bookmark folder not found: {0}")]
    FolderNotFound(String),
    /// A folder or bookmark name failed validation.
    #[error("Invalid name: {0}")]
    InvalidName(String),
    /// A storage-level constraint rejected the write.
    #[error("Bookmark constraint violated: {0}")]
    Constraint(String),
    /// Database operation failed.
    #[error("Bookmark database error: {0}")]
    Database(String),
}

impl BookmarkError {
    /// Returns the duplicate classification if this is a duplicate rejection.
    pub fn duplicate_kind(&self) -> Option<DuplicateKind> {
        match self {
            BookmarkError::Duplicate(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for BookmarkError {
    fn from(e: rusqlite::Error) -> Self {
        match e.sqlite_error_code() {
            Some(rusqlite::ErrorCode::ConstraintViolation) => {
                BookmarkError::Constraint(e.to_string())
            }
            _ => BookmarkError::Database(e.to_string()),
        }
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === DatabaseError ===

/// Errors raised while opening or migrating the database.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// A configured table name is not a plain SQL identifier.
    #[error("Invalid table configuration: {0}")]
    InvalidTableName(String),
    /// SQLite rejected the connection or a migration statement.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
