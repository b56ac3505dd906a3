//! Per-connection task: routes inbound frames and runs the bounded linear
//! reconnect loop when the transport drops.
//!
//! The task holds only a `Weak` to the client state and never keeps a strong
//! reference across an `.await`, so dropping every client handle lets it end.

use std::sync::Weak;

use tokio::sync::mpsc;
use tokio::time::timeout;

use lingualink_core::error::LinkError;

use crate::events::router;
use crate::realtime::client::Shared;

pub(crate) async fn supervise(shared: Weak<Shared>, epoch: u64, mut rx: mpsc::Receiver<String>) {
    loop {
        while let Some(text) = rx.recv().await {
            let Some(strong) = shared.upgrade() else { return };
            router::route(&strong.bus, &text);
        }

        let Some(strong) = shared.upgrade() else { return };
        let Some((mut attempt, mut delay)) = strong.on_transport_lost(epoch) else { return };
        drop(strong);

        rx = loop {
            tokio::time::sleep(delay).await;

            let Some(strong) = shared.upgrade() else { return };
            let Some(token) = strong.retry_token(epoch) else { return };
            let connector = strong.connector.clone();
            let handshake_timeout = strong.handshake_timeout;
            drop(strong);

            tracing::debug!(attempt, "reconnect attempt");
            let opened = timeout(handshake_timeout, connector.open(&token))
                .await
                .unwrap_or(Err(LinkError::HandshakeTimeout));

            let Some(strong) = shared.upgrade() else { return };
            match opened {
                Ok(link) => {
                    if !strong.on_reconnected(epoch, link.tx) {
                        return;
                    }
                    break link.rx;
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "reconnect attempt failed");
                    let Some(next) = strong.on_retry_failed(epoch) else { return };
                    (attempt, delay) = next;
                }
            }
        };
    }
}
