//! Text command protocol for one command session.
//!
//! Client messages are `COMMAND` or `COMMAND:{json}`; every reply is
//! `KIND:{json}`. Handling is synchronous and touches only the session it is
//! given.

use flow_valve_core::command::{CommandError, CommandSession, DialogInput};
use flow_valve_core::construction::RecordingService;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

/// Format an error as a JSON message for the frontend
pub fn format_error(code: &str, message: &str, severity: &str) -> String {
    format!(
        "ERROR_UPDATE:{}",
        json!({
            "code": code,
            "message": message,
            "severity": severity
        })
    )
}

fn command_error(e: &CommandError) -> String {
    format_error(e.code(), &e.to_string(), "error")
}

fn update<T: Serialize>(kind: &str, value: &T) -> String {
    let json = serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string());
    format!("{}:{}", kind, json)
}

/// First message sent on a new connection.
pub fn session_start(session: &CommandSession) -> String {
    update(
        "SESSION_START",
        &json!({
            "id": session.id().to_string(),
            "fields": session.fields(),
            "readouts": session.readouts(),
        }),
    )
}

/// Handle one client message and return the replies in send order.
pub fn handle_message(session: &mut CommandSession, text: &str) -> Vec<String> {
    let (command, payload) = match text.split_once(':') {
        Some((command, payload)) => (command, payload),
        None => (text, ""),
    };

    match command {
        "SET_INPUT" => {
            // Format: SET_INPUT:{"id": "theta", "value": 70}
            let input: DialogInput = match serde_json::from_str(payload) {
                Ok(input) => input,
                Err(e) => {
                    warn!("Failed to parse SET_INPUT: {}", e);
                    return vec![format_error("BAD_REQUEST", &e.to_string(), "error")];
                }
            };
            match session.apply_input(input) {
                Ok(()) => {
                    info!("Set {} = {}", input.id, input.value);
                    vec![update("READOUT_UPDATE", &session.readouts())]
                }
                Err(e) => vec![command_error(&e)],
            }
        }
        "SET_INPUTS" => {
            // Format: SET_INPUTS:[{"id": "D", "value": 40}, ...]
            let inputs: Vec<DialogInput> = match serde_json::from_str(payload) {
                Ok(inputs) => inputs,
                Err(e) => {
                    warn!("Failed to parse SET_INPUTS: {}", e);
                    return vec![format_error("BAD_REQUEST", &e.to_string(), "error")];
                }
            };
            let count = inputs.len();
            let rejected = session.apply_inputs(inputs);
            info!("Applied {} inputs, {} rejected", count, rejected.len());

            let mut replies = vec![update("READOUT_UPDATE", &session.readouts())];
            replies.extend(rejected.iter().map(|(_, e)| command_error(e)));
            replies
        }
        "FIELDS" => vec![update("FIELDS_UPDATE", &session.fields())],
        "PREVIEW" => match session.preview() {
            Ok(plan) => vec![update("PLAN_UPDATE", &plan)],
            Err(e) => vec![command_error(&e)],
        },
        "EXECUTE" => {
            let mut service = RecordingService::new();
            match session.execute(&mut service) {
                Ok(plan) => {
                    info!("Session {} built {} components", session.id(), service.applied.len());
                    let mut replies = Vec::new();
                    if let Some(params) = session.parameters() {
                        replies.push(update("PARAMETERS_UPDATE", params));
                    }
                    replies.push(update("PLAN_UPDATE", &plan));
                    replies
                }
                Err(e) => {
                    warn!("Execute failed: {}", e);
                    vec![command_error(&e)]
                }
            }
        }
        _ => {
            warn!("Unknown command: {}", command);
            vec![format_error(
                "UNKNOWN_COMMAND",
                &format!("Unknown command '{}'", command),
                "warning",
            )]
        }
    }
}
