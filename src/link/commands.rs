//! Inbound client command parsing and dispatch.
//!
//! The wireless transport hands every received text chunk to
//! [`handle_client_text`]. Commands are adjacently-tagged JSON:
//!
//! ```json
//! {"type":"changeMode","content":"write"}
//! {"type":"changeMode","content":"stop"}
//! {"type":"writeData","content":"E2001122"}
//! ```
//!
//! Every dispatch produces exactly one feedback message for the client —
//! including the rejection of a payload queued outside write mode, which
//! the arbiter reports but does not announce itself.

use serde::Deserialize;

use crate::app::arbiter::{Mode, ModeArbiter};
use crate::app::messages::ResultMessage;

/// Commands the client may send.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "camelCase")]
pub enum RemoteCommand {
    /// `"write"` arms write mode, `"stop"` returns to scan mode.
    ChangeMode(String),
    /// Payload for the next write trigger press.
    WriteData(String),
}

/// Parse one inbound text chunk and apply it.
pub fn handle_client_text(text: &str, arbiter: &ModeArbiter) -> ResultMessage {
    let trimmed = text.trim();
    let value: serde_json::Value = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        Err(_) => return ResultMessage::feedback_error("invalid JSON command"),
    };
    match serde_json::from_value::<RemoteCommand>(value) {
        Ok(cmd) => dispatch(cmd, arbiter),
        Err(_) => ResultMessage::feedback_error("unknown command type"),
    }
}

/// Apply a parsed command to the arbiter and build the feedback reply.
pub fn dispatch(cmd: RemoteCommand, arbiter: &ModeArbiter) -> ResultMessage {
    match cmd {
        RemoteCommand::ChangeMode(mode) => match mode.as_str() {
            "write" => {
                arbiter.set_mode(Mode::Write);
                ResultMessage::feedback_ok("write mode activated")
            }
            "stop" => {
                arbiter.set_mode(Mode::Scan);
                ResultMessage::feedback_ok("write mode stopped")
            }
            other => ResultMessage::feedback_error(format!("unknown mode '{other}'")),
        },
        RemoteCommand::WriteData(data) => {
            if arbiter.set_payload(&data) {
                ResultMessage::feedback_ok("payload queued for next write")
            } else {
                ResultMessage::feedback_error("not in write mode, payload discarded")
            }
        }
    }
}
