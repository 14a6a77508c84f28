//! Bookmark Store for page bookmarks.
//!
//! Implements `BookmarkStoreTrait`: owner-scoped CRUD primitives for bookmarks
//! and folders, backed by SQLite via `rusqlite`. Every query filters by the
//! owning user; nothing here decides about duplicates.

use rusqlite::{params, Connection, OptionalExtension};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::database::Database;
use crate::types::bookmark::{Bookmark, BookmarkFolder, BookmarkWithFolder, UserId};
use crate::types::errors::BookmarkError;
use crate::types::settings::TableSettings;

const BOOKMARK_COLUMNS: &str =
    "b.id, b.user_id, b.name, b.url, b.bookmark_folder_id, b.created_at, b.updated_at";
const FOLDER_COLUMNS: &str = "f.id, f.user_id, f.name, f.created_at, f.updated_at";

/// Trait defining owner-scoped bookmark storage operations.
pub trait BookmarkStoreTrait {
    fn list_folders(&self, user_id: UserId) -> Result<Vec<BookmarkFolder>, BookmarkError>;
    fn get_folder(&self, user_id: UserId, id: &str) -> Result<Option<BookmarkFolder>, BookmarkError>;
    fn list_bookmarks(&self, user_id: UserId) -> Result<Vec<BookmarkWithFolder>, BookmarkError>;
    /// First bookmark (in insertion order) whose name OR url matches.
    fn find_bookmark(&self, user_id: UserId, name: &str, url: &str) -> Result<Option<Bookmark>, BookmarkError>;
    fn create_folder(&mut self, user_id: UserId, name: &str) -> Result<BookmarkFolder, BookmarkError>;
    fn create_bookmark(&mut self, user_id: UserId, name: &str, url: &str, folder_id: Option<&str>) -> Result<Bookmark, BookmarkError>;
    /// Returns `false` when no bookmark with that id belongs to the user.
    fn delete_bookmark(&mut self, user_id: UserId, id: &str) -> Result<bool, BookmarkError>;
    fn delete_folder(&mut self, user_id: UserId, id: &str) -> Result<bool, BookmarkError>;
    fn root_bookmarks(&self, user_id: UserId) -> Result<Vec<Bookmark>, BookmarkError>;
    fn bookmarks_in_folder(&self, user_id: UserId, folder_id: &str) -> Result<Vec<Bookmark>, BookmarkError>;
    fn bookmarks_count(&self, user_id: UserId) -> Result<i64, BookmarkError>;
    fn bookmark_folders_count(&self, user_id: UserId) -> Result<i64, BookmarkError>;

    fn has_bookmarks(&self, user_id: UserId) -> Result<bool, BookmarkError> {
        Ok(self.bookmarks_count(user_id)? > 0)
    }

    fn has_bookmark_folders(&self, user_id: UserId) -> Result<bool, BookmarkError> {
        Ok(self.bookmark_folders_count(user_id)? > 0)
    }
}

/// Bookmark store backed by a SQLite connection.
pub struct BookmarkStore<'a> {
    conn: &'a Connection,
    tables: &'a TableSettings,
}

fn sql_err(e: rusqlite::Error) -> BookmarkError {
    tracing::warn!(error = %e, "bookmark query failed");
    BookmarkError::from(e)
}

impl<'a> BookmarkStore<'a> {
    /// Creates a new `BookmarkStore` over the given database.
    pub fn new(db: &'a Database) -> Self {
        Self {
            conn: db.connection(),
            tables: db.tables(),
        }
    }

    /// Returns the connection this store runs on.
    pub fn connection(&self) -> &'a Connection {
        self.conn
    }

    /// Returns the current UNIX timestamp in seconds.
    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn row_to_bookmark(row: &rusqlite::Row) -> rusqlite::Result<Bookmark> {
        Ok(Bookmark {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            url: row.get(3)?,
            folder_id: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    fn row_to_folder_at(row: &rusqlite::Row, offset: usize) -> rusqlite::Result<BookmarkFolder> {
        Ok(BookmarkFolder {
            id: row.get(offset)?,
            user_id: row.get(offset + 1)?,
            name: row.get(offset + 2)?,
            created_at: row.get(offset + 3)?,
            updated_at: row.get(offset + 4)?,
        })
    }

    fn row_to_folder(row: &rusqlite::Row) -> rusqlite::Result<BookmarkFolder> {
        Self::row_to_folder_at(row, 0)
    }

    /// Reads a joined bookmark/folder row; folder columns start at index 7.
    fn row_to_bookmark_with_folder(row: &rusqlite::Row) -> rusqlite::Result<BookmarkWithFolder> {
        let bookmark = Self::row_to_bookmark(row)?;
        let folder_id: Option<String> = row.get(7)?;
        let folder = match folder_id {
            Some(_) => Some(Self::row_to_folder_at(row, 7)?),
            None => None,
        };
        Ok(BookmarkWithFolder { bookmark, folder })
    }

    /// Runs a bookmark query scoped by `user_id` (always `?1`).
    fn query_bookmarks<P: rusqlite::Params>(
        &self,
        filter: &str,
        params: P,
    ) -> Result<Vec<Bookmark>, BookmarkError> {
        let sql = format!(
            "SELECT {BOOKMARK_COLUMNS} FROM {} b WHERE b.user_id = ?1 {filter} ORDER BY b.name, b.rowid",
            self.tables.bookmarks
        );
        let mut stmt = self.conn.prepare(&sql).map_err(sql_err)?;
        let rows = stmt.query_map(params, Self::row_to_bookmark).map_err(sql_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
    }

    fn count(&self, table: &str, user_id: UserId) -> Result<i64, BookmarkError> {
        self.conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {table} WHERE user_id = ?1"),
                params![user_id],
                |row| row.get(0),
            )
            .map_err(sql_err)
    }
}

impl<'a> BookmarkStoreTrait for BookmarkStore<'a> {
    /// Lists the user's folders, ordered by name.
    fn list_folders(&self, user_id: UserId) -> Result<Vec<BookmarkFolder>, BookmarkError> {
        let sql = format!(
            "SELECT {FOLDER_COLUMNS} FROM {} f WHERE f.user_id = ?1 ORDER BY f.name, f.rowid",
            self.tables.bookmark_folders
        );
        let mut stmt = self.conn.prepare(&sql).map_err(sql_err)?;
        let rows = stmt.query_map(params![user_id], Self::row_to_folder).map_err(sql_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
    }

    fn get_folder(&self, user_id: UserId, id: &str) -> Result<Option<BookmarkFolder>, BookmarkError> {
        let sql = format!(
            "SELECT {FOLDER_COLUMNS} FROM {} f WHERE f.id = ?1 AND f.user_id = ?2",
            self.tables.bookmark_folders
        );
        self.conn
            .query_row(&sql, params![id, user_id], Self::row_to_folder)
            .optional()
            .map_err(sql_err)
    }

    /// Lists the user's bookmarks with their folders resolved, ordered by name.
    fn list_bookmarks(&self, user_id: UserId) -> Result<Vec<BookmarkWithFolder>, BookmarkError> {
        let sql = format!(
            "SELECT {BOOKMARK_COLUMNS}, {FOLDER_COLUMNS} \
             FROM {} b LEFT JOIN {} f ON f.id = b.bookmark_folder_id AND f.user_id = b.user_id \
             WHERE b.user_id = ?1 ORDER BY b.name, b.rowid",
            self.tables.bookmarks, self.tables.bookmark_folders
        );
        let mut stmt = self.conn.prepare(&sql).map_err(sql_err)?;
        let rows = stmt
            .query_map(params![user_id], Self::row_to_bookmark_with_folder)
            .map_err(sql_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
    }

    fn find_bookmark(
        &self,
        user_id: UserId,
        name: &str,
        url: &str,
    ) -> Result<Option<Bookmark>, BookmarkError> {
        let sql = format!(
            "SELECT {BOOKMARK_COLUMNS} FROM {} b \
             WHERE b.user_id = ?1 AND (b.name = ?2 OR b.url = ?3) ORDER BY b.rowid LIMIT 1",
            self.tables.bookmarks
        );
        self.conn
            .query_row(&sql, params![user_id, name, url], Self::row_to_bookmark)
            .optional()
            .map_err(sql_err)
    }

    /// Creates a folder owned by `user_id`.
    fn create_folder(&mut self, user_id: UserId, name: &str) -> Result<BookmarkFolder, BookmarkError> {
        let now = Self::now();
        let folder = BookmarkFolder {
            id: Uuid::new_v4().to_string(),
            user_id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.conn
            .execute(
                &format!(
                    "INSERT INTO {} (id, user_id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                    self.tables.bookmark_folders
                ),
                params![folder.id, folder.user_id, folder.name, folder.created_at, folder.updated_at],
            )
            .map_err(sql_err)?;

        Ok(folder)
    }

    /// Creates a bookmark owned by `user_id`.
    ///
    /// A `folder_id` must name a folder of the same user.
    fn create_bookmark(
        &mut self,
        user_id: UserId,
        name: &str,
        url: &str,
        folder_id: Option<&str>,
    ) -> Result<Bookmark, BookmarkError> {
        if let Some(fid) = folder_id {
            if self.get_folder(user_id, fid)?.is_none() {
                return Err(BookmarkError::FolderNotFound(fid.to_string()));
            }
        }

        let now = Self::now();
        let bookmark = Bookmark {
            id: Uuid::new_v4().to_string(),
            user_id,
            name: name.to_string(),
            url: url.to_string(),
            folder_id: folder_id.map(str::to_string),
            created_at: now,
            updated_at: now,
        };

        self.conn
            .execute(
                &format!(
                    "INSERT INTO {} (id, user_id, name, url, bookmark_folder_id, created_at, updated_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    self.tables.bookmarks
                ),
                params![
                    bookmark.id,
                    bookmark.user_id,
                    bookmark.name,
                    bookmark.url,
                    bookmark.folder_id,
                    bookmark.created_at,
                    bookmark.updated_at
                ],
            )
            .map_err(sql_err)?;

        Ok(bookmark)
    }

    fn delete_bookmark(&mut self, user_id: UserId, id: &str) -> Result<bool, BookmarkError> {
        let affected = self
            .conn
            .execute(
                &format!("DELETE FROM {} WHERE id = ?1 AND user_id = ?2", self.tables.bookmarks),
                params![id, user_id],
            )
            .map_err(sql_err)?;
        Ok(affected > 0)
    }

    /// Deletes a folder of the user. Bookmarks inside it become uncategorized.
    fn delete_folder(&mut self, user_id: UserId, id: &str) -> Result<bool, BookmarkError> {
        let tx = self.conn.unchecked_transaction().map_err(sql_err)?;

        tx.execute(
            &format!(
                "UPDATE {} SET bookmark_folder_id = NULL, updated_at = ?1 \
                 WHERE bookmark_folder_id = ?2 AND user_id = ?3",
                self.tables.bookmarks
            ),
            params![Self::now(), id, user_id],
        )
        .map_err(sql_err)?;

        let affected = tx
            .execute(
                &format!(
                    "DELETE FROM {} WHERE id = ?1 AND user_id = ?2",
                    self.tables.bookmark_folders
                ),
                params![id, user_id],
            )
            .map_err(sql_err)?;

        tx.commit().map_err(sql_err)?;
        Ok(affected > 0)
    }

    fn root_bookmarks(&self, user_id: UserId) -> Result<Vec<Bookmark>, BookmarkError> {
        self.query_bookmarks("AND b.bookmark_folder_id IS NULL", params![user_id])
    }

    fn bookmarks_in_folder(&self, user_id: UserId, folder_id: &str) -> Result<Vec<Bookmark>, BookmarkError> {
        self.query_bookmarks("AND b.bookmark_folder_id = ?2", params![user_id, folder_id])
    }

    fn bookmarks_count(&self, user_id: UserId) -> Result<i64, BookmarkError> {
        self.count(&self.tables.bookmarks, user_id)
    }

    fn bookmark_folders_count(&self, user_id: UserId) -> Result<i64, BookmarkError> {
        self.count(&self.tables.bookmark_folders, user_id)
    }
}
