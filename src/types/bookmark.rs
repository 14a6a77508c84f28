use serde::{Deserialize, Serialize};

/// Identifier of the user that owns bookmarks and folders.
pub type UserId = i64;

/// Display label for bookmarks that are not filed in any folder.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Represents a saved bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub user_id: UserId,
    pub name: String,
    pub url: String,
    pub folder_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Represents a folder for organizing bookmarks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkFolder {
    pub id: String,
    pub user_id: UserId,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A bookmark together with the folder it references, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkWithFolder {
    #[serde(flatten)]
    pub bookmark: Bookmark,
    pub folder: Option<BookmarkFolder>,
}

impl BookmarkWithFolder {
    /// Label of the display group this bookmark belongs to.
    pub fn group_label(&self) -> &str {
        match &self.folder {
            Some(folder) => &folder.name,
            None => UNCATEGORIZED_LABEL,
        }
    }
}

/// Which fields of a new bookmark collide with an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKind {
    NameAndUrl,
    NameOnly,
    UrlOnly,
}

impl DuplicateKind {
    /// Classifies a conflict between a candidate and the existing row that matched it.
    ///
    /// The caller guarantees `existing` matched on name or url.
    pub fn classify(existing: &Bookmark, name: &str, url: &str) -> Self {
        if existing.name == name && existing.url == url {
            DuplicateKind::NameAndUrl
        } else if existing.name == name {
            DuplicateKind::NameOnly
        } else {
            DuplicateKind::UrlOnly
        }
    }

    /// User-facing warning shown when a save is rejected.
    pub fn message(&self) -> &'static str {
        match self {
            DuplicateKind::NameAndUrl => "You already have a bookmark with this name and URL",
            DuplicateKind::NameOnly => "You already have a bookmark with this name",
            DuplicateKind::UrlOnly => "You already have a bookmark for this URL",
        }
    }
}

/// Raw bookmark input as submitted by the presentation layer.
///
/// Any field may be missing; [`BookmarkDraft::resolve`] fills in the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkDraft {
    pub name: Option<String>,
    pub url: Option<String>,
    pub folder_id: Option<String>,
}

/// A draft with every default applied, ready for the save workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDraft {
    pub name: String,
    pub url: String,
    pub folder_id: Option<String>,
}

impl BookmarkDraft {
    /// Applies defaults: missing name becomes empty, missing url becomes the
    /// page the user is currently on, and a blank folder id means no folder.
    pub fn resolve(self, current_url: &str) -> ResolvedDraft {
        ResolvedDraft {
            name: self.name.unwrap_or_default(),
            url: self.url.unwrap_or_else(|| current_url.to_string()),
            folder_id: self.folder_id.filter(|id| !id.trim().is_empty()),
        }
    }
}
