//! Wire protocol for the realtime socket.
//!
//! Every frame is a JSON text message `{"event": <name>, "data": <json>}`:
//! - `events`: closed sets of inbound and outbound event names.
//! - `envelope`: encode/decode of the text frame.
//! - `outbound`: payload shapes the client emits (camelCase on the wire).
//!
//! Inbound `data` is never interpreted here; it is forwarded unchanged.

pub mod envelope;
pub mod events;
pub mod outbound;

pub use envelope::Envelope;
pub use events::{InboundEvent, OutboundEvent};
