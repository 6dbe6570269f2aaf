use crate::calc::{self, NumberError};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{required_array, required_str, stats_json, step_err, workflow_session};
use crate::ipc::types::{AppState, Request};
use crate::report;
use crate::session::{GraderMode, GraderStep};
use serde_json::json;

fn handle_enter_name(state: &mut AppState, req: &Request) -> serde_json::Value {
    let raw = match required_str(req, "name") {
        Ok(v) => v,
        Err(e) => return e,
    };
    {
        let session = match workflow_session(state, req, GraderMode::Individual) {
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
            "student name must be letters only (no spaces)",
            Some(json!({ "name": raw })),
        );
    }
    let name = raw.trim().to_string();

    // Individual records share the class namespace: the record is a
    // class named after its student.
    if !state.book.create_class(&name) {
        return err(
            &req.id,
            "duplicate",
            format!("a record for '{}' already exists", name),
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

fn handle_set_test_count(state: &mut AppState, req: &Request) -> serde_json::Value {
    let raw = match required_str(req, "count") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let session = match workflow_session(state, req, GraderMode::Individual) {
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
            "number of tests must be a whole number (no decimals)",
            Some(json!({ "count": raw })),
        ),
        Err(NumberError::OutOfRange) => err(
            &req.id,
            "out_of_range",
            "number of tests must be at least 1",
            Some(json!({ "count": raw })),
        ),
    }
}

fn handle_save(state: &mut AppState, req: &Request) -> serde_json::Value {
    let raw_scores = match required_array(req, "scores") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let (name, slots) = {
        let session = match workflow_session(state, req, GraderMode::Individual) {
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

    if raw_scores.len() != slots {
        return err(
            &req.id,
            "bad_params",
            format!("expected {} scores, got {}", slots, raw_scores.len()),
            None,
        );
    }

    // Every field is re-validated before anything is committed.
    let mut scores: Vec<i64> = Vec::with_capacity(raw_scores.len());
    for (idx, value) in raw_scores.iter().enumerate() {
        let Some(raw) = value.as_str() else {
            return err(
                &req.id,
                "bad_params",
                format!("scores[{}] must be the raw text of the field", idx),
                None,
            );
        };
        match calc::parse_score(raw) {
            Ok(v) => scores.push(v),
            Err(NumberError::InvalidFormat) => {
                return err(
                    &req.id,
                    "invalid_format",
                    "scores must be whole numbers (no decimals)",
                    Some(json!({ "index": idx, "value": raw })),
                )
            }
            Err(NumberError::OutOfRange) => {
                return err(
                    &req.id,
                    "out_of_range",
                    "scores must be between 0 and 100",
                    Some(json!({ "index": idx, "value": raw })),
                )
            }
        }
    }

    // Contract with the store: names and scores are validated before
    // anything is inserted.
    if !calc::validate_scores(&scores) {
        return err(
            &req.id,
            "out_of_range",
            "scores must be between 0 and 100",
            None,
        );
    }

    let Some(stats) = calc::score_stats(&scores) else {
        return err(&req.id, "bad_params", "no scores to save", None);
    };
    if !state.book.add_student(&name, &name, scores.clone()) {
        return err(
            &req.id,
            "duplicate",
            format!("student '{}' already exists", name),
            Some(json!({ "name": name })),
        );
    }
    state.book.mark_saved(&name);

    let Some(contents) = report::individual_report(&name, &scores) else {
        return err(&req.id, "bad_params", "no scores to save", None);
    };
    let file_name = report::report_file_name(&name);
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
            "name": name,
            "file": path.to_string_lossy(),
            "scoreCount": scores.len(),
            "stats": stats_json(&stats),
            "step": GraderStep::Saved.as_str(),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "individual.enterName" => Some(handle_enter_name(state, req)),
        "individual.setTestCount" => Some(handle_set_test_count(state, req)),
        "individual.save" => Some(handle_save(state, req)),
        _ => None,
    }
}
