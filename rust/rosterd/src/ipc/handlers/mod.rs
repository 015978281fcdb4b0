pub mod auth;
pub mod backup;
pub mod core;
pub mod stats;
pub mod students;

use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request};
use crate::roster::DataManager;

/// The open roster, for methods that need a logged-in user.
pub(crate) fn logged_in<'a>(
    state: &'a AppState,
    req: &Request,
) -> Result<&'a DataManager, serde_json::Value> {
    let Some(roster) = state.roster.as_ref() else {
        return Err(err(&req.id, "no_workspace", "select a workspace first", None));
    };
    if state.session.is_none() {
        return Err(err(&req.id, "not_authenticated", "log in first", None));
    }
    Ok(roster)
}

/// Trimmed string param. Numbers read as their decimal text, so `{"id": 2023001}`
/// matches the same records as `{"id": "2023001"}`; other values read as `None`.
pub(crate) fn str_param(req: &Request, key: &str) -> Option<String> {
    match req.params.get(key)? {
        serde_json::Value::String(s) => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
