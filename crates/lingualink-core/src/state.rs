//! Connection state machine.
//!
//! ```text
//!                 connect                 handshake ok
//! Disconnected ──────────> Connecting ───────────────────> Connected
//!      ^  ^                    │                            │    ^
//!      │  └── handshake failed ┘              transport lost│    │ handshake ok
//!      │                                                    v    │
//!      │                  retry failed (n < max)     Reconnecting{n}
//!      │                  ──> Reconnecting{n+1}             │
//!      │                                    retry failed    │
//!      │                                    (n == max)      v
//!      └──────────────── disconnect (from any state) ─── Failed
//! ```
//!
//! `next` is pure: the client owns I/O and timers and only feeds inputs in.

use std::fmt;

use crate::backoff::ReconnectPolicy;
use crate::error::{LinkError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    /// No transport; the initial and post-`disconnect` state.
    Disconnected,
    /// Initial handshake in flight.
    Connecting,
    /// Transport open and authenticated.
    Connected,
    /// Transport lost; reconnect attempt `attempt` (1-based) pending or in flight.
    Reconnecting { attempt: u32 },
    /// Reconnect attempts exhausted. Only `connect` or `disconnect` leave it.
    Failed,
}

/// Inputs to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    ConnectRequested,
    HandshakeSucceeded,
    HandshakeFailed,
    TransportLost,
    DisconnectRequested,
}

impl ConnState {
    pub fn is_connected(self) -> bool {
        matches!(self, ConnState::Connected)
    }

    /// A connect or reconnect is underway.
    pub fn is_busy(self) -> bool {
        matches!(self, ConnState::Connecting | ConnState::Reconnecting { .. })
    }

    /// Apply `input`. Returns `InvalidState` for inputs the current state does
    /// not accept; the caller keeps its old state in that case.
    pub fn next(self, input: Transition, policy: &ReconnectPolicy) -> Result<ConnState> {
        use ConnState::*;
        use Transition::*;

        let next = match (self, input) {
            (_, DisconnectRequested) => Disconnected,

            (Disconnected | Failed, ConnectRequested) => Connecting,

            (Connecting, HandshakeSucceeded) => Connected,
            (Connecting, HandshakeFailed) => Disconnected,

            (Connected, TransportLost) => {
                if policy.max_attempts == 0 {
                    Failed
                } else {
                    Reconnecting { attempt: 1 }
                }
            }

            (Reconnecting { .. }, HandshakeSucceeded) => Connected,
            (Reconnecting { attempt }, HandshakeFailed) => {
                if policy.is_last(attempt) {
                    Failed
                } else {
                    Reconnecting {
                        attempt: attempt + 1,
                    }
                }
            }

            (state, input) => {
                return Err(LinkError::InvalidState(format!(
                    "{input:?} not accepted while {state}"
                )))
            }
        };

        tracing::trace!(from = %self, to = %next, ?input, "connection state transition");
        Ok(next)
    }
}

impl fmt::Display for ConnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnState::Disconnected => f.write_str("disconnected"),
            ConnState::Connecting => f.write_str("connecting"),
            ConnState::Connected => f.write_str("connected"),
            ConnState::Reconnecting { attempt } => write!(f, "reconnecting({attempt})"),
            ConnState::Failed => f.write_str("failed"),
        }
    }
}
