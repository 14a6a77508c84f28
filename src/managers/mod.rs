// Page bookmarks managers
// The store owns the SQL; the workflow owns the decisions made on top of it.

pub mod bookmark_store;
pub mod bookmark_workflow;
