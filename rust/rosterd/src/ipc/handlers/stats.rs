use super::{logged_in, str_param};
use crate::calc::StatsRow;
use crate::config::is_bare_file_name;
use crate::ipc::error::{err, ok, store_err};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_stats_gender(state: &mut AppState, req: &Request) -> serde_json::Value {
    let roster = match logged_in(state, req) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    match roster.stats_by_gender() {
        Ok(rows) => {
            let total: usize = rows.iter().map(|r| r.count).sum();
            ok(&req.id, json!({ "total": total, "rows": rows }))
        }
        Err(e) => store_err(&req.id, &e),
    }
}

fn handle_stats_export(state: &mut AppState, req: &Request) -> serde_json::Value {
    let roster = match logged_in(state, req) {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    let filename = str_param(req, "filename").filter(|s| !s.is_empty());
    if let Some(name) = filename.as_deref() {
        if !is_bare_file_name(name) || roster.config().is_backing_file(name) {
            return err(
                &req.id,
                "bad_params",
                "filename must be a bare file name other than a workspace file",
                Some(json!({ "filename": name })),
            );
        }
    }

    // Hosts normally export what they just displayed; otherwise recompute.
    let rows: Vec<StatsRow> = match req.params.get("rows") {
        Some(v) if !v.is_null() => match serde_json::from_value(v.clone()) {
            Ok(rows) => rows,
            Err(e) => return err(&req.id, "bad_params", format!("invalid rows: {e}"), None),
        },
        _ => match roster.stats_by_gender() {
            Ok(rows) => rows,
            Err(e) => return store_err(&req.id, &e),
        },
    };

    match roster.export_stats(&rows, filename.as_deref()) {
        Ok(path) => ok(
            &req.id,
            json!({
                "path": path.to_string_lossy(),
                "rowCount": rows.len()
            }),
        ),
        Err(e) => store_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "stats.gender" => Some(handle_stats_gender(state, req)),
        "stats.export" => Some(handle_stats_export(state, req)),
        _ => None,
    }
}
