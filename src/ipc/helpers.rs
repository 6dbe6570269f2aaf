use serde_json::{json, Value};

use crate::calc;
use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request};
use crate::session::{GraderMode, GraderSession, StepError};

pub fn required_str(req: &Request, key: &str) -> Result<String, Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.to_string())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

pub fn required_array(req: &Request, key: &str) -> Result<Vec<Value>, Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_array())
        .cloned()
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

pub fn step_err(req: &Request, e: StepError) -> Value {
    err(&req.id, "bad_state", e.message, None)
}

/// The active session, provided it matches the workflow a handler serves.
/// An optional `sessionId` param lets the shell detect that it raced a
/// restart and is talking to a newer session than the one it rendered.
pub fn workflow_session<'a>(
    state: &'a mut AppState,
    req: &Request,
    mode: GraderMode,
) -> Result<&'a mut GraderSession, Value> {
    let Some(session) = state.session.as_mut() else {
        return Err(err(&req.id, "no_session", "start a grader session first", None));
    };
    if session.mode != mode {
        return Err(err(
            &req.id,
            "bad_state",
            format!("the active session is the {} grader", session.mode.as_str()),
            None,
        ));
    }
    if let Some(given) = req.params.get("sessionId").and_then(|v| v.as_str()) {
        if given != session.id {
            return Err(err(
                &req.id,
                "stale_session",
                "session id does not match the active session",
                Some(json!({ "activeSessionId": session.id })),
            ));
        }
    }
    Ok(session)
}

pub fn stats_json(stats: &calc::ScoreStats) -> Value {
    json!({
        "highest": stats.highest,
        "lowest": stats.lowest,
        "average": calc::round_off_2_decimals(stats.average),
    })
}
