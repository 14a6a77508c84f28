//! Page bookmarks RPC server: JSON-RPC over stdin/stdout for the admin panel.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"bookmark.save", "params":{"user_id":7,"name":"...","url":"..."}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Logs go to stderr; stdout carries only protocol lines.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use page_bookmarks::app::App;
use page_bookmarks::rpc_handler::handle_method;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Database path: `PAGE_BOOKMARKS_DATA_DIR`, else the executable's directory.
fn db_path() -> PathBuf {
    if let Ok(dir) = std::env::var("PAGE_BOOKMARKS_DATA_DIR") {
        PathBuf::from(dir).join("page-bookmarks.db")
    } else if let Ok(exe) = std::env::current_exe() {
        exe.parent()
            .unwrap_or(std::path::Path::new("."))
            .join("page-bookmarks.db")
    } else {
        PathBuf::from("page-bookmarks.db")
    }
}

fn respond(out: &mut impl Write, response: &Value) -> io::Result<()> {
    writeln!(out, "{}", response)?;
    out.flush()
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let db_path = db_path();
    let settings_path = std::env::var("PAGE_BOOKMARKS_SETTINGS").ok();
    let app = App::with_settings_path(&db_path.to_string_lossy(), settings_path)
        .context("failed to initialize page bookmarks")?;
    let app = Mutex::new(app);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    respond(&mut out, &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}))?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::warn!(error = %e, "stdin closed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                respond(&mut out, &json!({"id": null, "error": format!("parse error: {}", e)}))?;
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        tracing::debug!(%id, method, "rpc request");
        let response = match handle_method(&app, method, &params) {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => {
                tracing::warn!(%id, method, error = %err, "rpc request failed");
                json!({"id": id, "error": err})
            }
        };
        respond(&mut out, &response)?;
    }

    Ok(())
}
