mod test_support;

use serde_json::json;
use test_support::{open_and_login, request_err, request_ok, spawn_sidecar, temp_dir};

fn ids(result: &serde_json::Value) -> Vec<String> {
    result
        .get("students")
        .and_then(|v| v.as_array())
        .expect("students array")
        .iter()
        .map(|s| s.get("id").and_then(|v| v.as_str()).unwrap_or("").to_string())
        .collect()
}

#[test]
fn seeded_roster_lists_in_file_order() {
    let workspace = temp_dir("rosterd-students-list");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    open_and_login(&mut stdin, &mut reader, &workspace);

    let all = request_ok(&mut stdin, &mut reader, "1", "students.list", json!({}));
    assert_eq!(ids(&all), vec!["2023001", "2023002", "2023003", "2023004"]);
    assert_eq!(
        all.pointer("/students/0"),
        Some(&json!({
            "id": "2023001",
            "name": "张三",
            "gender": "男",
            "className": "一班"
        }))
    );

    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn find_applies_every_supplied_filter() {
    let workspace = temp_dir("rosterd-students-find");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    open_and_login(&mut stdin, &mut reader, &workspace);

    let all = request_ok(&mut stdin, &mut reader, "1", "students.list", json!({}));

    let everything = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "students.find",
        json!({ "gender": "全部", "className": "全部", "id": "", "name": "" }),
    );
    assert_eq!(everything.get("students"), all.get("students"));

    let zhang = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "students.find",
        json!({ "name": "张" }),
    );
    assert_eq!(ids(&zhang), vec!["2023001"]);

    let girls_class2 = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "students.find",
        json!({ "gender": "女", "className": "二班" }),
    );
    assert_eq!(ids(&girls_class2), vec!["2023004"]);

    let by_id = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "students.find",
        json!({ "id": "2023003" }),
    );
    assert_eq!(ids(&by_id), vec!["2023003"]);

    let partial_id = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "students.find",
        json!({ "id": "202300" }),
    );
    assert!(ids(&partial_id).is_empty());

    let numeric_id = request_ok(
        &mut stdin,
        &mut reader,
        "6b",
        "students.find",
        json!({ "id": 2023003 }),
    );
    assert_eq!(ids(&numeric_id), vec!["2023003"]);

    let classes = request_ok(&mut stdin, &mut reader, "7", "students.classes", json!({}));
    let mut expected = vec!["一班".to_string(), "二班".to_string()];
    expected.sort();
    assert_eq!(classes.get("classes"), Some(&json!(expected)));

    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn removed_roster_reports_store_missing() {
    let workspace = temp_dir("rosterd-students-missing");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    open_and_login(&mut stdin, &mut reader, &workspace);

    std::fs::remove_file(workspace.join("students.xlsx")).expect("remove roster");

    let code = request_err(&mut stdin, &mut reader, "1", "students.list", json!({}));
    assert_eq!(code, "store_missing");
    let code = request_err(&mut stdin, &mut reader, "2", "stats.gender", json!({}));
    assert_eq!(code, "store_missing");

    let _ = std::fs::remove_dir_all(workspace);
}
