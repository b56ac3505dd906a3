//! In-process transport double shared by client tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::timeout;

use lingualink_client::config::ClientSection;
use lingualink_client::transport::{Connector, Link};
use lingualink_client::AppEvent;
use lingualink_core::error::{LinkError, Result};

pub const WAIT: Duration = Duration::from_secs(2);

/// What the next `open` call does.
#[derive(Debug, Clone, Copy)]
pub enum Script {
    Accept,
    Reject,
    Hang,
}

/// Server half of an accepted link.
pub struct ServerConn {
    pub to_client: mpsc::Sender<String>,
    pub from_client: mpsc::Receiver<String>,
}

impl ServerConn {
    pub async fn push(&self, frame: Value) {
        self.to_client.send(frame.to_string()).await.unwrap();
    }

    pub async fn next_frame(&mut self) -> Value {
        let text = timeout(WAIT, self.from_client.recv())
            .await
            .expect("timed out waiting for client frame")
            .expect("client side closed");
        serde_json::from_str(&text).unwrap()
    }
}

pub struct MockConnector {
    script: Mutex<VecDeque<Script>>,
    fallback: Script,
    opens: AtomicUsize,
    tokens: Mutex<Vec<String>>,
    accepted: mpsc::UnboundedSender<ServerConn>,
}

impl MockConnector {
    pub fn new(
        script: Vec<Script>,
        fallback: Script,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<ServerConn>) {
        let (accepted, rx) = mpsc::unbounded_channel();
        let connector = Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback,
            opens: AtomicUsize::new(0),
            tokens: Mutex::new(Vec::new()),
            accepted,
        });
        (connector, rx)
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn open(&self, token: &str) -> Result<Link> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().unwrap().push(token.to_string());

        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback);

        match step {
            Script::Accept => {
                let (out_tx, out_rx) = mpsc::channel(64);
                let (in_tx, in_rx) = mpsc::channel(64);
                let _ = self.accepted.send(ServerConn {
                    to_client: in_tx,
                    from_client: out_rx,
                });
                Ok(Link {
                    tx: out_tx,
                    rx: in_rx,
                })
            }
            Script::Reject => Err(LinkError::HandshakeRejected("server answered 401".into())),
            Script::Hang => std::future::pending().await,
        }
    }
}

pub fn section(base_delay_ms: u64, max_attempts: u32, handshake_timeout_ms: u64) -> ClientSection {
    let mut cfg = ClientSection::default();
    cfg.handshake_timeout_ms = handshake_timeout_ms;
    cfg.reconnect.base_delay_ms = base_delay_ms;
    cfg.reconnect.max_attempts = max_attempts;
    cfg
}

pub async fn accepted(rx: &mut mpsc::UnboundedReceiver<ServerConn>) -> ServerConn {
    timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for accepted link")
        .expect("connector dropped")
}

/// Next event matching `pred`; earlier non-matching events are skipped.
pub async fn wait_for<F>(rx: &mut mpsc::Receiver<AppEvent>, mut pred: F) -> AppEvent
where
    F: FnMut(&AppEvent) -> bool,
{
    timeout(WAIT, async {
        loop {
            let ev = rx.recv().await.expect("bus closed");
            if pred(&ev) {
                return ev;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}
