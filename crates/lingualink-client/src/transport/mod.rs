//! Transport layer.
//!
//! A `Connector` opens one authenticated transport and hands back a `Link`:
//! a bounded queue of outbound text frames and a queue of inbound text frames.
//! The inbound queue closing is the only transport-lost signal the client
//! sees. Dropping the outbound sender tears the transport down.

pub mod codec;
pub mod ws;

use async_trait::async_trait;
use tokio::sync::mpsc;

use lingualink_core::error::Result;

pub use ws::WsConnector;

/// Queues bound to one live transport instance.
#[derive(Debug)]
pub struct Link {
    pub tx: mpsc::Sender<String>,
    pub rx: mpsc::Receiver<String>,
}

/// Opens authenticated transports. Injected into the client so tests can run
/// without a network.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Perform the handshake with `token`. Resolves once the server accepted
    /// the connection. The caller applies the handshake timeout.
    async fn open(&self, token: &str) -> Result<Link>;
}
