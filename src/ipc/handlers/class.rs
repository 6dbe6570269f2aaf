use crate::calc::{self, NumberError};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{required_array, required_str, stats_json, step_err, workflow_session};
use crate::ipc::types::{AppState, Request};
use crate::report;
use crate::session::{GraderMode, GraderStep};
use crate::store::StudentRecord;
use serde_json::json;
use std::collections::HashSet;

fn handle_enter_name(state: &mut AppState, req: &Request) -> serde_json::Value {
    let raw = match required_str(req, "name") {
        Ok(v) => v,
        Err(e) => return e,
    };
    {
        let session = match workflow_session(state, req, GraderMode::Class) {
            Ok(s) => s,
            Err(e) => return e,
        };
        if let Err(e) = session.expect_step(GraderStep::NamePending) {
            return step_err(req, e);
        }
    }

    if !calc::validate_name(&raw) {
        return err(
            &req.id,
            "invalid_format",
            "class name must be letters only (no spaces)",
            Some(json!({ "name": raw })),
        );
    }
    let name = raw.trim().to_string();

    if !state.book.create_class(&name) {
        return err(
            &req.id,
            "duplicate",
            format!("class '{}' already exists", name),
            Some(json!({ "name": name })),
        );
    }

    if let Some(session) = state.session.as_mut() {
        session.accept_name(name.clone());
    }
    ok(
        &req.id,
        json!({ "name": name, "step": GraderStep::CountPending.as_str() }),
    )
}

fn handle_set_student_count(state: &mut AppState, req: &Request) -> serde_json::Value {
    let raw = match required_str(req, "count") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let session = match workflow_session(state, req, GraderMode::Class) {
        Ok(s) => s,
        Err(e) => return e,
    };
    if let Err(e) = session.expect_step(GraderStep::CountPending) {
        return step_err(req, e);
    }

    match calc::parse_count(&raw) {
        Ok(count) => {
            session.accept_count(count);
            ok(
                &req.id,
                json!({ "count": count, "step": GraderStep::ItemsPending.as_str() }),
            )
        }
        Err(NumberError::InvalidFormat) => err(
            &req.id,
            "invalid_format",
            "number of students must be a whole number (no decimals)",
            Some(json!({ "count": raw })),
        ),
        Err(NumberError::OutOfRange) => err(
            &req.id,
            "out_of_range",
            "number of students must be at least 1",
            Some(json!({ "count": raw })),
        ),
    }
}

fn handle_save(state: &mut AppState, req: &Request) -> serde_json::Value {
    let entries = match required_array(req, "students") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let (class_name, slots) = {
        let session = match workflow_session(state, req, GraderMode::Class) {
            Ok(s) => s,
            Err(e) => return e,
        };
        let slots = match session.expected_slots() {
            Ok(n) => n,
            Err(e) => return step_err(req, e),
        };
        let name = match session.entered_name() {
            Ok(n) => n.to_string(),
            Err(e) => return step_err(req, e),
        };
        (name, slots)
    };

    if entries.len() != slots {
        return err(
            &req.id,
            "bad_params",
            format!("expected {} students, got {}", slots, entries.len()),
            None,
        );
    }

    // Validate the whole batch, including duplicates within it, before
    // committing anything. A failure here leaves the store untouched.
    let mut seen: HashSet<String> = HashSet::new();
    let mut batch: Vec<StudentRecord> = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let Some(raw_name) = entry.get("name").and_then(|v| v.as_str()) else {
            return err(
                &req.id,
                "bad_params",
                format!("students[{}].name must be the raw text of the field", idx),
                None,
            );
        };
        let Some(raw_score) = entry.get("score").and_then(|v| v.as_str()) else {
            return err(
                &req.id,
                "bad_params",
                format!("students[{}].score must be the raw text of the field", idx),
                None,
            );
        };

        if !calc::validate_name(raw_name) {
            return err(
                &req.id,
                "invalid_format",
                "student names must be letters only (no spaces)",
                Some(json!({ "index": idx, "value": raw_name })),
            );
        }
        let student_name = raw_name.trim().to_string();
        if !seen.insert(student_name.clone()) {
            return err(
                &req.id,
                "duplicate",
                format!(
                    "student '{}' is duplicated in class '{}'",
                    student_name, class_name
                ),
                Some(json!({ "index": idx, "name": student_name })),
            );
        }
        match calc::parse_score(raw_score) {
            Ok(score) => batch.push(StudentRecord {
                name: student_name,
                scores: vec![score],
            }),
            Err(NumberError::InvalidFormat) => {
                return err(
                    &req.id,
                    "invalid_format",
                    "scores must be whole numbers (no decimals)",
                    Some(json!({ "index": idx, "value": raw_score })),
                )
            }
            Err(NumberError::OutOfRange) => {
                return err(
                    &req.id,
                    "out_of_range",
                    "scores must be between 0 and 100",
                    Some(json!({ "index": idx, "value": raw_score })),
                )
            }
        }
    }

    // A re-save replaces whatever roster the class held before.
    if !state.book.replace_students(&class_name, batch) {
        return err(
            &req.id,
            "not_found",
            format!("class '{}' not found", class_name),
            None,
        );
    }
    state.book.mark_saved(&class_name);

    let Some(class) = state.book.class(&class_name) else {
        return err(
            &req.id,
            "not_found",
            format!("class '{}' not found", class_name),
            None,
        );
    };
    let Some(stats) = calc::score_stats(&class.all_scores()) else {
        return err(&req.id, "bad_params", "no scores to save", None);
    };
    let Some(contents) = report::class_report(class) else {
        return err(&req.id, "bad_params", "no scores to save", None);
    };
    let student_count = class.students.len();

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

    if let Some(session) = state.session.as_mut() {
        session.mark_saved();
    }
    ok(
        &req.id,
        json!({
            "className": class_name,
            "file": path.to_string_lossy(),
            "studentCount": student_count,
            "stats": stats_json(&stats),
            "step": GraderStep::Saved.as_str(),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "class.enterName" => Some(handle_enter_name(state, req)),
        "class.setStudentCount" => Some(handle_set_student_count(state, req)),
        "class.save" => Some(handle_save(state, req)),
        _ => None,
    }
}
