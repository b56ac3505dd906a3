//! Application-level events and the in-process bus that carries them.
//!
//! Every inbound server event becomes exactly one `AppEvent::Inbound` with the
//! payload untouched. Connection lifecycle changes are published on the same
//! bus as `AppEvent::Lifecycle`.

pub mod bus;
pub mod router;

use std::time::Duration;

use serde_json::Value;

use lingualink_core::protocol::InboundEvent;

pub use bus::{EventBus, ListenerId};

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Inbound { kind: InboundEvent, payload: Value },
    Lifecycle(Lifecycle),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lifecycle {
    Connected { reconnected: bool },
    Disconnected { reason: DisconnectReason },
    Reconnecting { attempt: u32, delay: Duration },
    /// Reconnect attempts exhausted; terminal until the next `connect`.
    Failed { attempts: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// `disconnect()` was called.
    Requested,
    /// The transport went away on its own.
    TransportLost,
}

/// Listener filter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Inbound(InboundEvent),
    Connected,
    Disconnected,
    Reconnecting,
    Failed,
}

impl AppEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            AppEvent::Inbound { kind, .. } => EventKind::Inbound(*kind),
            AppEvent::Lifecycle(Lifecycle::Connected { .. }) => EventKind::Connected,
            AppEvent::Lifecycle(Lifecycle::Disconnected { .. }) => EventKind::Disconnected,
            AppEvent::Lifecycle(Lifecycle::Reconnecting { .. }) => EventKind::Reconnecting,
            AppEvent::Lifecycle(Lifecycle::Failed { .. }) => EventKind::Failed,
        }
    }

    /// Stable event name, matching the wire name for inbound events.
    pub fn name(&self) -> &'static str {
        match self.kind() {
            EventKind::Inbound(e) => e.as_str(),
            EventKind::Connected => "connected",
            EventKind::Disconnected => "disconnected",
            EventKind::Reconnecting => "reconnecting",
            EventKind::Failed => "reconnect-failed",
        }
    }
}
