//! Text frame envelope (JSON).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LinkError, Result};
use crate::protocol::events::OutboundEvent;

/// One realtime frame, either direction. Extra top-level keys the server
/// adds (timestamps, ids) are ignored on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Event name, e.g. `new-message`.
    pub event: String,
    /// Payload; absent on the wire decodes to `null`.
    #[serde(default)]
    pub data: Value,
}

/// Build the text frame for an outbound event.
pub fn encode<T: Serialize>(event: OutboundEvent, data: &T) -> Result<String> {
    let data = serde_json::to_value(data)
        .map_err(|e| LinkError::BadRequest(format!("payload encode failed: {e}")))?;
    let env = Envelope {
        event: event.as_str().to_string(),
        data,
    };
    serde_json::to_string(&env)
        .map_err(|e| LinkError::BadRequest(format!("envelope encode failed: {e}")))
}

/// Parse an inbound text frame. Only the envelope shape is checked.
pub fn decode(text: &str) -> Result<Envelope> {
    serde_json::from_str(text)
        .map_err(|e| LinkError::BadRequest(format!("invalid envelope json: {e}")))
}
