//! Inbound frame -> application event.

use lingualink_core::protocol::{envelope, InboundEvent};

use crate::events::{AppEvent, EventBus};

/// Route one inbound text frame. Frames that are not envelopes, or carry an
/// unknown event name, are logged and dropped. Returns the delivery count.
pub fn route(bus: &EventBus, text: &str) -> usize {
    let env = match envelope::decode(text) {
        Ok(env) => env,
        Err(e) => {
            tracing::warn!(error = %e, bytes_len = text.len(), "inbound frame dropped");
            return 0;
        }
    };

    let Some(kind) = InboundEvent::from_name(&env.event) else {
        tracing::debug!(event = %env.event, "unknown inbound event dropped");
        return 0;
    };

    bus.publish(&AppEvent::Inbound {
        kind,
        payload: env.data,
    })
}
