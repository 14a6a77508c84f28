use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Top-level settings container for the bookmarks add-on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PluginSettings {
    pub tables: TableSettings,
    pub icons: IndexMap<String, String>,
    pub render_hooks: RenderHookSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            tables: TableSettings::default(),
            icons: Self::default_icons(),
            render_hooks: RenderHookSettings::default(),
            notifications: NotificationSettings::default(),
        }
    }
}

impl PluginSettings {
    /// Returns the default icon set, keyed by UI slot.
    pub fn default_icons() -> IndexMap<String, String> {
        [
            ("bookmark_manager", "heroicon-o-folder-plus"),
            ("bookmark_viewer", "heroicon-o-bookmark"),
            ("bookmark_item", "heroicon-o-bookmark"),
            ("folder", "heroicon-o-folder"),
            ("search", "heroicon-o-magnifying-glass"),
            ("delete", "heroicon-o-trash"),
            ("chevron_down", "heroicon-o-chevron-down"),
            ("empty_state", "heroicon-o-bookmark"),
        ]
        .into_iter()
        .map(|(slot, icon)| (slot.to_string(), icon.to_string()))
        .collect()
    }
}

/// Table name overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableSettings {
    pub bookmarks: String,
    pub bookmark_folders: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            bookmarks: "bookmarks".to_string(),
            bookmark_folders: "bookmark_folders".to_string(),
        }
    }
}

impl TableSettings {
    /// Checks that both table names are plain SQL identifiers.
    ///
    /// Table names are interpolated into SQL text, so nothing else is accepted.
    pub fn validate(&self) -> Result<(), String> {
        for name in [&self.bookmarks, &self.bookmark_folders] {
            if !is_sql_identifier(name) {
                return Err(format!("invalid table name: {:?}", name));
            }
        }
        if self.bookmarks == self.bookmark_folders {
            return Err(format!(
                "bookmarks and bookmark_folders must use different tables, both are {:?}",
                self.bookmarks
            ));
        }
        Ok(())
    }
}

fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Where the presentation layer mounts the bookmark widgets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderHookSettings {
    pub add_bookmark: String,
    pub view_bookmarks: String,
}

impl Default for RenderHookSettings {
    fn default() -> Self {
        Self {
            add_bookmark: "global-search.after".to_string(),
            view_bookmarks: "global-search.after".to_string(),
        }
    }
}

/// Display hints returned alongside success messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationSettings {
    pub saved_duration_ms: u32,
    pub deleted_duration_ms: u32,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            saved_duration_ms: 3000,
            deleted_duration_ms: 1200,
        }
    }
}
