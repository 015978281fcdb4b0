use super::{logged_in, str_param};
use crate::backup;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::PathBuf;

fn handle_backup_export_bundle(state: &mut AppState, req: &Request) -> serde_json::Value {
    let roster = match logged_in(state, req) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let out_path = match str_param(req, "outPath") {
        Some(v) if !v.is_empty() => v,
        _ => return err(&req.id, "bad_params", "missing outPath", None),
    };

    let cfg = roster.config();
    let files = [cfg.students_file.as_str(), cfg.credentials_file.as_str()];
    let export = match backup::export_bundle(roster.data_dir(), &files, &PathBuf::from(&out_path)) {
        Ok(v) => v,
        Err(e) => {
            return err(
                &req.id,
                "io_failed",
                format!("{e:#}"),
                Some(json!({ "path": out_path })),
            )
        }
    };
    log::info!("exported bundle to {}", out_path);

    ok(
        &req.id,
        json!({
            "path": out_path,
            "bundleFormat": export.bundle_format,
            "entryCount": export.entry_count
        }),
    )
}

fn handle_backup_import_bundle(state: &mut AppState, req: &Request) -> serde_json::Value {
    let roster = match logged_in(state, req) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let in_path = match str_param(req, "inPath") {
        Some(v) if !v.is_empty() => v,
        _ => return err(&req.id, "bad_params", "missing inPath", None),
    };
    let src = PathBuf::from(&in_path);
    if !src.is_file() {
        return err(
            &req.id,
            "not_found",
            "bundle file not found",
            Some(json!({ "path": in_path })),
        );
    }

    let cfg = roster.config();
    let files = [cfg.students_file.as_str(), cfg.credentials_file.as_str()];
    let import = match backup::import_bundle(&src, roster.data_dir(), &files) {
        Ok(v) => v,
        Err(e) => {
            return err(
                &req.id,
                "io_failed",
                format!("{e:#}"),
                Some(json!({ "path": in_path })),
            )
        }
    };
    log::info!("restored {} files from {}", import.restored.len(), in_path);

    // Restored credentials may differ from the ones this session logged in with.
    state.session = None;
    ok(
        &req.id,
        json!({
            "bundleFormatDetected": import.bundle_format_detected,
            "restored": import.restored
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "backup.exportBundle" => Some(handle_backup_export_bundle(state, req)),
        "backup.importBundle" => Some(handle_backup_import_bundle(state, req)),
        _ => None,
    }
}
