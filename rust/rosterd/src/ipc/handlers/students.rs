use super::{logged_in, str_param};
use crate::ipc::error::{ok, store_err};
use crate::ipc::types::{AppState, Request};
use crate::roster::StudentFilter;
use serde_json::json;

fn handle_students_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let roster = match logged_in(state, req) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    match roster.load_all_students() {
        Ok(students) => ok(&req.id, json!({ "students": students })),
        Err(e) => store_err(&req.id, &e),
    }
}

fn handle_students_find(state: &mut AppState, req: &Request) -> serde_json::Value {
    let roster = match logged_in(state, req) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let filter = StudentFilter {
        id: str_param(req, "id"),
        name: str_param(req, "name"),
        gender: str_param(req, "gender"),
        class_name: str_param(req, "className"),
    };
    match roster.find_students(&filter) {
        Ok(students) => ok(&req.id, json!({ "students": students })),
        Err(e) => store_err(&req.id, &e),
    }
}

fn handle_students_classes(state: &mut AppState, req: &Request) -> serde_json::Value {
    let roster = match logged_in(state, req) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    match roster.class_names() {
        Ok(classes) => ok(&req.id, json!({ "classes": classes })),
        Err(e) => store_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_students_list(state, req)),
        "students.find" => Some(handle_students_find(state, req)),
        "students.classes" => Some(handle_students_classes(state, req)),
        _ => None,
    }
}
