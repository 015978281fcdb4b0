use super::{logged_in, str_param};
use crate::ipc::error::{err, ok, store_err};
use crate::ipc::types::{AppState, Request, Session};
use serde_json::json;

fn handle_login(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(roster) = state.roster.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let username = str_param(req, "username").unwrap_or_default();
    let password = str_param(req, "password").unwrap_or_default();

    if !roster.validate_login(&username, &password) {
        // A rejected login is an answer, not a failure; the host shows one
        // generic message whatever the cause.
        return ok(&req.id, json!({ "authenticated": false }));
    }

    log::info!("user {} logged in", username);
    state.session = Some(Session {
        username: username.clone(),
        started_at: chrono::Utc::now(),
    });
    ok(
        &req.id,
        json!({ "authenticated": true, "username": username }),
    )
}

fn handle_logout(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.session = None;
    ok(&req.id, json!({ "ok": true }))
}

fn handle_session(state: &mut AppState, req: &Request) -> serde_json::Value {
    let s = state.session.as_ref();
    ok(
        &req.id,
        json!({
            "username": s.map(|s| s.username.clone()),
            "startedAt": s.map(|s| s.started_at.to_rfc3339()),
        }),
    )
}

fn handle_change_password(state: &mut AppState, req: &Request) -> serde_json::Value {
    let roster = match logged_in(state, req) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let username = str_param(req, "username").unwrap_or_default();
    let password = str_param(req, "password").unwrap_or_default();
    if username.is_empty() || password.is_empty() {
        return err(
            &req.id,
            "bad_params",
            "username and password must not be empty",
            None,
        );
    }

    if let Err(e) = roster.change_password(&username, &password) {
        return store_err(&req.id, &e);
    }

    // The old credentials are gone; make the host log in again.
    log::info!("credentials replaced, ending session");
    state.session = None;
    ok(&req.id, json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "auth.login" => Some(handle_login(state, req)),
        "auth.logout" => Some(handle_logout(state, req)),
        "auth.session" => Some(handle_session(state, req)),
        "auth.changePassword" => Some(handle_change_password(state, req)),
        _ => None,
    }
}
