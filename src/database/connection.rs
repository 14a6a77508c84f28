//! SQLite database connection management for page bookmarks.
//!
//! Provides the [`Database`] struct that wraps a `rusqlite::Connection`
//! and automatically runs schema migrations on open.

use rusqlite::Connection;
use std::path::Path;

use super::migrations;
use crate::types::errors::DatabaseError;
use crate::types::settings::TableSettings;

/// Core database wrapper providing SQLite connection management.
///
/// The `Database` owns a `rusqlite::Connection` together with the table names
/// it was migrated for, so stores built on top of it query the right tables.
pub struct Database {
    conn: Connection,
    tables: TableSettings,
}

impl Database {
    /// Opens (or creates) a SQLite database at the given file path and runs migrations.
    ///
    /// # Errors
    /// Returns [`DatabaseError::InvalidTableName`] if `tables` does not validate,
    /// or [`DatabaseError::Sqlite`] if the connection or a migration fails.
    pub fn open<P: AsRef<Path>>(path: P, tables: &TableSettings) -> Result<Self, DatabaseError> {
        tables.validate().map_err(DatabaseError::InvalidTableName)?;
        let conn = Connection::open(path)?;
        Self::with_connection(conn, tables)
    }

    /// Opens an in-memory SQLite database and runs migrations.
    ///
    /// Useful for testing. The database is discarded when the `Database` is dropped.
    pub fn open_in_memory(tables: &TableSettings) -> Result<Self, DatabaseError> {
        tables.validate().map_err(DatabaseError::InvalidTableName)?;
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, tables)
    }

    fn with_connection(conn: Connection, tables: &TableSettings) -> Result<Self, DatabaseError> {
        let db = Self {
            conn,
            tables: tables.clone(),
        };
        migrations::run_all(&db.conn, &db.tables)?;
        tracing::debug!(
            bookmarks = %db.tables.bookmarks,
            folders = %db.tables.bookmark_folders,
            "database ready"
        );
        Ok(db)
    }

    /// Returns a reference to the underlying `rusqlite::Connection`.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns the table names this database was migrated for.
    pub fn tables(&self) -> &TableSettings {
        &self.tables
    }
}
