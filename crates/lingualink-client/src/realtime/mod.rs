//! Realtime runtime for the lingualink client.
//!
//! Connection manager, per-connection supervisor, and channel membership.

pub mod client;
pub mod membership;
mod supervisor;

pub use client::RealtimeClient;
pub use membership::{Channel, Membership};
