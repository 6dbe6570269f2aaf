use crate::calc;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{required_str, stats_json};
use crate::ipc::types::{AppState, Request};
use crate::report;
use serde_json::json;

fn handle_list_classes(state: &mut AppState, req: &Request) -> serde_json::Value {
    // Include counts so the shell can show a useful dashboard.
    let classes: Vec<serde_json::Value> = state
        .book
        .classes_by_name()
        .iter()
        .map(|c| {
            json!({
                "name": c.name,
                "studentCount": c.students.len(),
                "savedAt": c.saved_at,
            })
        })
        .collect();
    ok(&req.id, json!({ "classes": classes }))
}

fn handle_export_class(state: &mut AppState, req: &Request) -> serde_json::Value {
    let class_name = match required_str(req, "className") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(class) = state.book.class(&class_name) else {
        return err(
            &req.id,
            "not_found",
            format!("class '{}' not found", class_name),
            None,
        );
    };
    let Some(stats) = calc::score_stats(&class.all_scores()) else {
        return err(
            &req.id,
            "empty_class",
            format!("class '{}' has no scores to report", class_name),
            None,
        );
    };
    let Some(contents) = report::class_report(class) else {
        return err(
            &req.id,
            "empty_class",
            format!("class '{}' has no scores to report", class_name),
            None,
        );
    };
    let rows_exported = class.students.len();

    let file_name = report::report_file_name(&class_name);
    let path = match report::write_report(&state.report_dir(), &file_name, &contents) {
        Ok(p) => p,
        Err(e) => {
            return err(
                &req.id,
                "export_failed",
                e.to_string(),
                Some(json!({ "file": file_name })),
            )
        }
    };

    ok(
        &req.id,
        json!({
            "className": class_name,
            "file": path.to_string_lossy(),
            "rowsExported": rows_exported,
            "stats": stats_json(&stats),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "records.listClasses" => Some(handle_list_classes(state, req)),
        "records.exportClass" => Some(handle_export_class(state, req)),
        _ => None,
    }
}
