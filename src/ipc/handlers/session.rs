use crate::ipc::error::{err, ok};
use crate::ipc::helpers::required_str;
use crate::ipc::types::{AppState, Request};
use crate::session::{GraderMode, GraderSession};
use serde_json::json;

fn handle_session_start(state: &mut AppState, req: &Request) -> serde_json::Value {
    let raw_mode = match required_str(req, "mode") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(mode) = GraderMode::parse(&raw_mode) else {
        return err(
            &req.id,
            "bad_params",
            "mode must be one of: individual, class",
            Some(json!({ "mode": raw_mode })),
        );
    };

    // Starting a workflow from the menu always begins fresh; any prior
    // session and its uncommitted input are dropped.
    let session = GraderSession::new(mode);
    let result = json!({
        "sessionId": session.id,
        "mode": session.mode.as_str(),
        "step": session.step.as_str(),
    });
    state.session = Some(session);
    ok(&req.id, result)
}

fn handle_session_state(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_ref() else {
        return ok(&req.id, json!({ "active": false }));
    };
    ok(
        &req.id,
        json!({
            "active": true,
            "sessionId": session.id,
            "mode": session.mode.as_str(),
            "step": session.step.as_str(),
            "name": session.name,
            "slots": session.slots,
        }),
    )
}

fn handle_session_clear(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_mut() else {
        return err(&req.id, "no_session", "start a grader session first", None);
    };
    session.clear();
    ok(&req.id, json!({ "step": session.step.as_str() }))
}

fn handle_session_restart(state: &mut AppState, req: &Request) -> serde_json::Value {
    // Back to the menu. Idempotent on purpose: a shell may restart from
    // the completion screen or from a stale view.
    state.session = None;
    ok(&req.id, json!({ "active": false }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "session.start" => Some(handle_session_start(state, req)),
        "session.state" => Some(handle_session_state(state, req)),
        "session.clear" => Some(handle_session_clear(state, req)),
        "session.restart" => Some(handle_session_restart(state, req)),
        _ => None,
    }
}
