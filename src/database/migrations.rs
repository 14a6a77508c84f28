//! Schema migrations for the page bookmarks SQLite database.
//!
//! Uses a `schema_version` table to track which migrations have been applied.
//! Versions are recorded per pair of configured table names (see
//! [`schema_scope`]), so overriding either name gets its own schema. Each
//! migration runs exactly once per scope.

use rusqlite::{Connection, OptionalExtension};

use crate::types::settings::TableSettings;

/// Current schema version. Bump this when adding a new migration.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// The `schema_version` scope for a pair of table names: `bookmarks:folders`.
pub fn schema_scope(tables: &TableSettings) -> String {
    format!("{}:{}", tables.bookmarks, tables.bookmark_folders)
}

/// Returns the schema version applied for the given scope (0 if none).
pub fn get_schema_version(conn: &Connection, scope: &str) -> Result<i32, rusqlite::Error> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version WHERE scope = ?1",
        [scope],
        |row| row.get(0),
    )
}

/// Runs all pending schema migrations against the provided connection.
///
/// Safe to call on every startup.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn run_all(conn: &Connection, tables: &TableSettings) -> Result<(), rusqlite::Error> {
    // Always on, not versioned
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         CREATE TABLE IF NOT EXISTS schema_version (
             scope TEXT NOT NULL,
             version INTEGER NOT NULL,
             applied_at INTEGER NOT NULL,
             description TEXT NOT NULL,
             PRIMARY KEY (scope, version)
         );",
    )?;

    let scope = schema_scope(tables);
    let scope = scope.as_str();
    let current = get_schema_version(conn, scope)?;

    if current < 1 {
        migration_v1(conn, tables)?;
        record_version(conn, scope, 1, "Initial schema: bookmarks and bookmark folders")?;
        tracing::info!(scope, "applied schema migration v1");
    }

    if current < 2 {
        migration_v2(conn, tables)?;
        record_version(conn, scope, 2, "Per-user unique bookmark names and urls")?;
        tracing::info!(scope, "applied schema migration v2");
    }

    relink_folders(conn, tables)?;

    Ok(())
}

/// Returns the table the bookmarks table's folder foreign key points at.
pub fn folder_reference(conn: &Connection, bookmarks: &str) -> Result<Option<String>, rusqlite::Error> {
    conn.query_row(
        "SELECT \"table\" FROM pragma_foreign_key_list(?1) WHERE \"from\" = 'bookmark_folder_id'",
        [bookmarks],
        |row| row.get(0),
    )
    .optional()
}

/// Points the bookmarks table at the configured folders table.
///
/// An existing bookmarks table keeps the foreign key it was created with, so
/// after a `bookmark_folders` override it is rebuilt. Folder references that
/// do not exist in the new folders table are cleared to root.
fn relink_folders(conn: &Connection, tables: &TableSettings) -> Result<(), rusqlite::Error> {
    let folders = &tables.bookmark_folders;
    let bookmarks = &tables.bookmarks;
    let Some(current) = folder_reference(conn, bookmarks)? else {
        return Ok(());
    };
    if current == *folders {
        return Ok(());
    }

    let rebuilt = format!("{bookmarks}_relink");
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(&format!(
        "
        {create}

        INSERT INTO {rebuilt} (id, user_id, name, url, bookmark_folder_id, created_at, updated_at)
        SELECT id, user_id, name, url,
               CASE WHEN bookmark_folder_id IN (SELECT id FROM {folders}) THEN bookmark_folder_id END,
               created_at, updated_at
        FROM {bookmarks};

        DROP TABLE {bookmarks};
        ALTER TABLE {rebuilt} RENAME TO {bookmarks};
        ",
        create = bookmarks_table_sql(&rebuilt, folders),
    ))?;
    // Indexes went with the dropped table
    migration_v1(&tx, tables)?;
    migration_v2(&tx, tables)?;
    tx.commit()?;

    tracing::info!(%bookmarks, from = %current, to = %folders, "bookmarks relinked to folders table");
    Ok(())
}

fn bookmarks_table_sql(bookmarks: &str, folders: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {bookmarks} (
            id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            url TEXT NOT NULL,
            bookmark_folder_id TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            FOREIGN KEY (bookmark_folder_id) REFERENCES {folders}(id)
        );"
    )
}

fn record_version(
    conn: &Connection,
    scope: &str,
    version: i32,
    description: &str,
) -> Result<(), rusqlite::Error> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (scope, version, applied_at, description) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![scope, version, now, description],
    )?;
    Ok(())
}

/// V1: Create the folder and bookmark tables.
fn migration_v1(conn: &Connection, tables: &TableSettings) -> Result<(), rusqlite::Error> {
    let folders = &tables.bookmark_folders;
    let bookmarks = &tables.bookmarks;
    conn.execute_batch(&format!(
        "
        CREATE TABLE IF NOT EXISTS {folders} (
            id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_{folders}_user ON {folders}(user_id);

        {create}

        CREATE INDEX IF NOT EXISTS idx_{bookmarks}_user ON {bookmarks}(user_id);
        CREATE INDEX IF NOT EXISTS idx_{bookmarks}_folder ON {bookmarks}(bookmark_folder_id);
        ",
        create = bookmarks_table_sql(bookmarks, folders),
    ))
}

/// V2: Storage-level backstop for the per-user uniqueness of names and urls.
fn migration_v2(conn: &Connection, tables: &TableSettings) -> Result<(), rusqlite::Error> {
    let bookmarks = &tables.bookmarks;
    conn.execute_batch(&format!(
        "
        CREATE UNIQUE INDEX IF NOT EXISTS uq_{bookmarks}_user_name ON {bookmarks}(user_id, name);
        CREATE UNIQUE INDEX IF NOT EXISTS uq_{bookmarks}_user_url ON {bookmarks}(user_id, url);
        "
    ))
}
