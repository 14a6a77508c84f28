//! App Core for page bookmarks.
//!
//! Central struct holding the database and settings engine.

use anyhow::Context;

use crate::database::connection::Database;
use crate::managers::bookmark_store::BookmarkStore;
use crate::managers::bookmark_workflow::BookmarkWorkflow;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

/// Central application struct.
///
/// The store and workflow borrow the connection with a lifetime, so they are
/// created on demand via [`App::store`] and [`App::workflow`].
pub struct App {
    pub db: Database,
    pub settings_engine: SettingsEngine,
}

impl App {
    /// Creates a new App using the default settings location.
    pub fn new(db_path: &str) -> anyhow::Result<Self> {
        Self::with_settings_path(db_path, None)
    }

    /// Creates a new App, loading settings first so table overrides apply to the database.
    pub fn with_settings_path(db_path: &str, settings_path: Option<String>) -> anyhow::Result<Self> {
        let mut settings_engine = SettingsEngine::new(settings_path);
        let settings = settings_engine
            .load()
            .with_context(|| format!("loading settings from {}", settings_engine.get_config_path()))?;

        let db = Database::open(db_path, &settings.tables)
            .with_context(|| format!("opening database {}", db_path))?;

        tracing::info!(db_path, settings = settings_engine.get_config_path(), "app initialized");
        Ok(Self { db, settings_engine })
    }

    pub fn store(&self) -> BookmarkStore<'_> {
        BookmarkStore::new(&self.db)
    }

    pub fn workflow(&self) -> BookmarkWorkflow<'_> {
        BookmarkWorkflow::new(&self.db)
    }
}
