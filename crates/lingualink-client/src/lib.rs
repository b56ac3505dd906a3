//! lingualink realtime client library.
//!
//! Wires config, transport, the event bus/router, and the connection manager
//! into one client. Consumed by the binary (`main.rs`) and integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod events;
pub mod realtime;
pub mod transport;

pub use events::{AppEvent, EventBus, EventKind, Lifecycle};
pub use realtime::{Channel, RealtimeClient};
