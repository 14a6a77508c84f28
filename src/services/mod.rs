// Page bookmarks services

pub mod settings_engine;
