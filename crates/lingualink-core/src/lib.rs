//! lingualink core: transport-agnostic protocol types, the connection state
//! machine, the reconnect policy, and the shared error surface.
//!
//! This crate carries no runtime or socket dependencies. The client crate
//! drives these types from its tokio tasks; tests drive them directly.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Every fallible path surfaces as `LinkError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod backoff;
pub mod error;
pub mod protocol;
pub mod state;

/// Shared result type.
pub use error::{ErrorCode, LinkError, Result};
pub use backoff::ReconnectPolicy;
pub use state::{ConnState, Transition};
