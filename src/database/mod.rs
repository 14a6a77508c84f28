//! Page bookmarks database layer.
//!
//! Provides SQLite connection management and schema migrations.
//!
//! # Usage
//!
//! ```no_run
//! use page_bookmarks::database::Database;
//! use page_bookmarks::types::settings::TableSettings;
//!
//! // Open a persistent database
//! let db = Database::open("bookmarks.db", &TableSettings::default()).expect("failed to open database");
//!
//! // Or use an in-memory database for testing
//! let db = Database::open_in_memory(&TableSettings::default()).expect("failed to open in-memory database");
//!
//! // Access the underlying connection for queries
//! let conn = db.connection();
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
