//! Outbound client messages.
//!
//! Every message the handheld sends to its wireless client is one of these
//! variants, serialised as adjacently-tagged JSON:
//!
//! ```json
//! {"type":"readResult","content":{"uid":"E2001122","text":"..","rssi":90}}
//! {"type":"writeResult","content":{"uid":"31323334","data":"1234","status":"ok","message":"write successful"}}
//! {"type":"feedback","content":{"status":"error","message":"not in write mode"}}
//! ```

use serde::{Deserialize, Serialize};

/// Outcome marker carried by write results and feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// One message on the notification channel, created per event and
/// destroyed when the transport dequeues it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "camelCase")]
pub enum ResultMessage {
    /// A tag was read in scan mode.
    ReadResult {
        uid: String,
        text: String,
        rssi: u8,
    },
    /// Terminal outcome of one write trigger press.
    WriteResult {
        uid: String,
        data: String,
        status: Status,
        message: String,
    },
    /// Command acknowledgement or surfaced validation error.
    Feedback { status: Status, message: String },
}

impl ResultMessage {
    pub fn feedback_ok(message: impl Into<String>) -> Self {
        Self::Feedback {
            status: Status::Ok,
            message: message.into(),
        }
    }

    pub fn feedback_error(message: impl Into<String>) -> Self {
        Self::Feedback {
            status: Status::Error,
            message: message.into(),
        }
    }
}
