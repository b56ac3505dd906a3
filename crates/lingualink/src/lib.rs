//! Top-level facade crate for lingualink.
//!
//! Re-exports core types and the client library so users can depend on a single crate.

pub mod core {
    pub use lingualink_core::*;
}

pub mod client {
    pub use lingualink_client::*;
}
