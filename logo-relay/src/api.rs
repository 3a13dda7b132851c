use anyhow::anyhow;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use logo::{InterpreterState, parse_statement, sharing::SessionInfo};
use logo_demos::Demo;
use serde_json::{Value, json};

use crate::{
    AppState,
    err::{ResultExt, WebResult},
};

// ##########################
//     Sessions
// ##########################

pub async fn sessions(State(relay): AppState) -> Json<Vec<SessionInfo>> {
    Json(relay.sessions())
}

pub async fn session(State(relay): AppState, Path(id): Path<String>) -> WebResult<Json<SessionInfo>> {
    let info = relay
        .session(&id)
        .ok_or_else(|| anyhow!("no session with id {id}"))
        .err_status(StatusCode::NOT_FOUND)?;
    Ok(Json(info))
}

// ##########################
//     Scripts
// ##########################

pub async fn demos() -> Json<Value> {
    Json(Value::Array(
        Demo::all()
            .iter()
            .map(|demo| {
                json!({
                    "name": demo.name,
                    "summary": demo.summary.trim(),
                    "code": demo.code,
                    "group": demo.group.to_string(),
                })
            })
            .collect(),
    ))
}

/// Run a whole script and return the drawing.
pub async fn run(code: String) -> WebResult<Json<Value>> {
    let mut state = InterpreterState::default();
    for line in code.split_inclusive('\n') {
        let at = state.next_line();
        state = parse_statement(&state, line);
        if let Some(err) = state.error {
            return Err(anyhow!("line {at}: {}", err.description))
                .err_status(StatusCode::UNPROCESSABLE_ENTITY);
        }
    }
    Ok(Json(json!({
        "drawCommands": state.draw_commands,
        "turtle": state.turtle,
        "incomplete": state.is_incomplete(),
    })))
}
