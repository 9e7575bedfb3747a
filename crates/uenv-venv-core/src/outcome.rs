use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: CommandStatus,
    pub message: String,
    #[serde(default)]
    pub details: Value,
}

impl ExecutionOutcome {
    pub fn success(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Ok,
            message: message.into(),
            details,
        }
    }

    pub fn failure(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Failure,
            message: message.into(),
            details,
        }
    }

    pub fn user_error(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::UserError,
            message: message.into(),
            details,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CommandStatus {
    Ok,
    UserError,
    Failure,
}

/// A consumed external tool exited non-zero; the child's exit status is
/// preserved so the process can propagate it.
#[derive(thiserror::Error, Debug)]
#[error("`{command}` exited with status {code}")]
pub struct ToolFailure {
    pub command: String,
    pub code: i32,
}

/// Classifies a fatal tool error out of an `anyhow` chain.
#[must_use]
pub fn tool_failure_outcome(err: &anyhow::Error) -> Option<ExecutionOutcome> {
    let failure = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<ToolFailure>())?;
    Some(ExecutionOutcome::failure(
        failure.to_string(),
        json!({
            "reason": "tool_failed",
            "command": failure.command,
            "exit_code": failure.code,
        }),
    ))
}

#[must_use]
pub fn to_json_response(outcome: &ExecutionOutcome) -> Value {
    let status = match outcome.status {
        CommandStatus::Ok => "ok",
        CommandStatus::UserError => "user-error",
        CommandStatus::Failure => "error",
    };
    let details = match &outcome.details {
        Value::Object(_) => outcome.details.clone(),
        Value::Null => json!({}),
        other => json!({ "value": other }),
    };
    json!({
        "status": status,
        "message": outcome.message,
        "details": details,
    })
}
