//! Bookmark workflow: duplicate-checked saving and folder grouping.
//!
//! Layered on top of [`BookmarkStore`]. Every operation takes the current
//! owner explicitly as `Option<UserId>`; `None` means nobody is signed in and
//! degrades to an empty result or a no-op instead of an error.

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::database::Database;
use crate::managers::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use crate::types::bookmark::{
    Bookmark, BookmarkDraft, BookmarkFolder, DuplicateKind, UserId,
};
use crate::types::errors::BookmarkError;

/// Longest folder name accepted by [`BookmarkWorkflow::create_folder`].
pub const MAX_FOLDER_NAME_CHARS: usize = 255;

/// Bookmarks grouped by display label, in first-seen order.
pub type GroupedBookmarks = IndexMap<String, Vec<Bookmark>>;

/// Save, delete and grouping logic for one database.
pub struct BookmarkWorkflow<'a> {
    store: BookmarkStore<'a>,
}

impl<'a> BookmarkWorkflow<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            store: BookmarkStore::new(db),
        }
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &BookmarkStore<'a> {
        &self.store
    }

    /// Groups the owner's bookmarks by folder name.
    ///
    /// Bookmarks come back sorted by name; each one is appended to the group
    /// of its folder's name (or "Uncategorized"), so group order follows the
    /// first bookmark seen for each label. Two folders sharing a name end up
    /// in a single group.
    pub fn group_by_folder(&self, owner: Option<UserId>) -> Result<GroupedBookmarks, BookmarkError> {
        let Some(user_id) = owner else {
            return Ok(GroupedBookmarks::new());
        };

        let mut groups = GroupedBookmarks::new();
        for entry in self.store.list_bookmarks(user_id)? {
            let label = entry.group_label().to_string();
            groups.entry(label).or_default().push(entry.bookmark);
        }
        Ok(groups)
    }

    /// Folder choices for the owner as `id -> name`.
    pub fn available_folders(&self, owner: Option<UserId>) -> Result<IndexMap<String, String>, BookmarkError> {
        let Some(user_id) = owner else {
            return Ok(IndexMap::new());
        };
        Ok(self
            .store
            .list_folders(user_id)?
            .into_iter()
            .map(|folder| (folder.id, folder.name))
            .collect())
    }

    /// Saves a new bookmark unless it duplicates an existing one.
    ///
    /// Looks up the first bookmark of the owner sharing the name or the url.
    /// If there is one, the save is rejected with [`BookmarkError::Duplicate`]
    /// classified against that row, and nothing is written. Returns `Ok(None)`
    /// when there is no owner.
    pub fn save(
        &mut self,
        owner: Option<UserId>,
        name: &str,
        url: &str,
        folder_id: Option<&str>,
    ) -> Result<Option<Bookmark>, BookmarkError> {
        let Some(user_id) = owner else {
            debug!("save skipped: no authenticated user");
            return Ok(None);
        };

        let tx = self.store.connection().unchecked_transaction()?;

        if let Some(existing) = self.store.find_bookmark(user_id, name, url)? {
            let kind = DuplicateKind::classify(&existing, name, url);
            info!(user_id, ?kind, existing = %existing.id, "duplicate bookmark rejected");
            return Err(BookmarkError::Duplicate(kind));
        }

        let bookmark = self.store.create_bookmark(user_id, name, url, folder_id)?;
        tx.commit()?;

        info!(user_id, id = %bookmark.id, "bookmark saved");
        Ok(Some(bookmark))
    }

    /// Resolves draft defaults against the current page url, then saves.
    pub fn save_draft(
        &mut self,
        owner: Option<UserId>,
        draft: BookmarkDraft,
        current_url: &str,
    ) -> Result<Option<Bookmark>, BookmarkError> {
        let resolved = draft.resolve(current_url);
        self.save(owner, &resolved.name, &resolved.url, resolved.folder_id.as_deref())
    }

    /// Creates a folder for the owner. The name is required and at most 255 characters.
    pub fn create_folder(
        &mut self,
        owner: Option<UserId>,
        name: &str,
    ) -> Result<Option<BookmarkFolder>, BookmarkError> {
        let Some(user_id) = owner else {
            return Ok(None);
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(BookmarkError::InvalidName("folder name is required".to_string()));
        }
        if name.chars().count() > MAX_FOLDER_NAME_CHARS {
            return Err(BookmarkError::InvalidName(format!(
                "folder name must not exceed {} characters",
                MAX_FOLDER_NAME_CHARS
            )));
        }

        let folder = self.store.create_folder(user_id, name)?;
        info!(user_id, id = %folder.id, "bookmark folder created");
        Ok(Some(folder))
    }

    /// Deletes one of the owner's bookmarks.
    ///
    /// `false` covers unknown ids, other users' bookmarks and a missing owner alike.
    pub fn delete_bookmark(&mut self, owner: Option<UserId>, id: &str) -> Result<bool, BookmarkError> {
        let Some(user_id) = owner else {
            return Ok(false);
        };
        let deleted = self.store.delete_bookmark(user_id, id)?;
        if !deleted {
            debug!(user_id, id, "delete ignored: bookmark not found for user");
        }
        Ok(deleted)
    }

    /// Deletes one of the owner's folders; its bookmarks become uncategorized.
    pub fn delete_folder(&mut self, owner: Option<UserId>, id: &str) -> Result<bool, BookmarkError> {
        let Some(user_id) = owner else {
            return Ok(false);
        };
        self.store.delete_folder(user_id, id)
    }
}
