//! RPC method handler for the page bookmarks JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches a method call to the bookmark workflow or the
//! settings engine held by the `App`.
//!
//! The caller's identity travels as `params.user_id`. Without it every
//! method behaves as for a signed-out user: reads are empty, writes do nothing.

use std::sync::Mutex;

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::bookmark_store::BookmarkStoreTrait;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::bookmark::{BookmarkDraft, UserId};
use crate::types::errors::BookmarkError;

pub const SAVED_MESSAGE: &str = "Bookmark saved successfully";
pub const DELETED_MESSAGE: &str = "Bookmark deleted successfully";

fn owner(params: &Value) -> Option<UserId> {
    params.get("user_id").and_then(Value::as_i64)
}

fn opt_str(params: &Value, key: &str) -> Option<String> {
    params.get(key).and_then(Value::as_str).map(str::to_string)
}

fn req_str<'p>(params: &'p Value, key: &str) -> Result<&'p str, String> {
    params
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("missing {}", key))
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
/// A rejected duplicate is a successful call whose result says `"saved": false`.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    let user = owner(params);
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Bookmarks ───
        "bookmark.save" => {
            let draft = BookmarkDraft {
                name: opt_str(params, "name"),
                url: opt_str(params, "url"),
                folder_id: opt_str(params, "folder_id"),
            };
            let current_url = opt_str(params, "current_url").unwrap_or_default();
            let a = app.lock().map_err(|e| e.to_string())?;
            let duration_ms = a.settings_engine.get_settings().notifications.saved_duration_ms;
            match a.workflow().save_draft(user, draft, &current_url) {
                Ok(Some(bookmark)) => Ok(json!({
                    "saved": true,
                    "bookmark": bookmark,
                    "message": SAVED_MESSAGE,
                    "duration_ms": duration_ms
                })),
                Ok(None) => Ok(json!({"saved": false})),
                Err(BookmarkError::Duplicate(kind)) => Ok(json!({
                    "saved": false,
                    "duplicate": kind,
                    "message": kind.message()
                })),
                Err(e) => Err(e.to_string()),
            }
        }
        "bookmark.delete" => {
            let id = req_str(params, "id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let deleted = a.workflow().delete_bookmark(user, id).map_err(|e| e.to_string())?;
            if deleted {
                let duration_ms = a.settings_engine.get_settings().notifications.deleted_duration_ms;
                Ok(json!({"deleted": true, "message": DELETED_MESSAGE, "duration_ms": duration_ms}))
            } else {
                Ok(json!({"deleted": false}))
            }
        }
        "bookmark.grouped" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let groups = a.workflow().group_by_folder(user).map_err(|e| e.to_string())?;
            // An array keeps the group order; a JSON object would not.
            let arr: Vec<Value> = groups
                .into_iter()
                .map(|(label, bookmarks)| json!({"label": label, "bookmarks": bookmarks}))
                .collect();
            Ok(json!(arr))
        }
        "bookmark.list" => {
            let Some(user_id) = user else {
                return Ok(json!([]));
            };
            let a = app.lock().map_err(|e| e.to_string())?;
            let bms = a.store().list_bookmarks(user_id).map_err(|e| e.to_string())?;
            serde_json::to_value(bms).map_err(|e| e.to_string())
        }

        // ─── Folders ───
        "folder.create" => {
            let name = req_str(params, "name")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let folder = a.workflow().create_folder(user, name).map_err(|e| e.to_string())?;
            Ok(json!({"folder": folder}))
        }
        "folder.list" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let folders = a.workflow().available_folders(user).map_err(|e| e.to_string())?;
            let arr: Vec<Value> = folders
                .into_iter()
                .map(|(id, name)| json!({"id": id, "name": name}))
                .collect();
            Ok(json!(arr))
        }
        "folder.delete" => {
            let id = req_str(params, "id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let deleted = a.workflow().delete_folder(user, id).map_err(|e| e.to_string())?;
            Ok(json!({"deleted": deleted}))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(a.settings_engine.get_settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = req_str(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            // Table overrides apply the next time the database is opened.
            Ok(json!({"ok": true, "restart_required": key.starts_with("tables.")}))
        }
        "settings.reset" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine.reset().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
