//! WebSocket connector (tokio-tungstenite).
//!
//! Responsibilities:
//! - Upgrade with `Authorization: Bearer <token>`; HTTP 401/403 is a rejection
//! - `wss://` goes through rustls with the webpki root set
//! - Spawn one pump task per socket bridging it to the `Link` queues
//! - Lifecycle: heartbeat ping + idle timeout; either ending closes the link

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use lingualink_core::error::{LinkError, Result};

use crate::config::ClientSection;
use crate::transport::codec::{decode, Inbound};
use crate::transport::{Connector, Link};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Idle check granularity.
const IDLE_CHECK_EVERY: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct WsConnector {
    url: String,
    ping_every: Duration,
    idle_timeout: Duration,
    queue: usize,
}

impl WsConnector {
    pub fn new(cfg: &ClientSection) -> Self {
        // rustls needs a process-wide provider; the first install wins.
        let _ = rustls::crypto::ring::default_provider().install_default();

        Self {
            url: cfg.url.clone(),
            ping_every: cfg.ping_interval(),
            idle_timeout: cfg.idle_timeout(),
            queue: cfg.outbound_queue,
        }
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn open(&self, token: &str) -> Result<Link> {
        let mut request = self
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| LinkError::BadRequest(format!("invalid url: {e}")))?;

        let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| LinkError::InvalidToken)?;
        request.headers_mut().insert(AUTHORIZATION, bearer);

        let socket = match tokio_tungstenite::connect_async(request).await {
            Ok((socket, _resp)) => socket,
            Err(tungstenite::Error::Http(resp)) => {
                let status = resp.status();
                return Err(match status.as_u16() {
                    401 | 403 => LinkError::HandshakeRejected(format!("server answered {status}")),
                    _ => LinkError::Transport(format!("upgrade failed with {status}")),
                });
            }
            Err(e) => return Err(LinkError::Transport(format!("connect failed: {e}"))),
        };

        let (out_tx, out_rx) = mpsc::channel::<String>(self.queue);
        let (in_tx, in_rx) = mpsc::channel::<String>(self.queue);

        tokio::spawn(pump(socket, out_rx, in_tx, self.ping_every, self.idle_timeout));

        tracing::debug!(url = %self.url, "websocket upgraded");
        Ok(Link { tx: out_tx, rx: in_rx })
    }
}

// --------------------
// Pump loop
// --------------------
async fn pump(
    socket: Socket,
    mut out_rx: mpsc::Receiver<String>,
    in_tx: mpsc::Sender<String>,
    ping_every: Duration,
    idle_timeout: Duration,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let mut ping_tick = tokio::time::interval(ping_every);
    ping_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // first tick fires immediately
    ping_tick.tick().await;

    let mut last_activity = Instant::now();

    loop {
        tokio::select! {
            // outbound writer; a closed queue means the client let go
            maybe_out = out_rx.recv() => {
                match maybe_out {
                    Some(text) => {
                        if let Err(e) = ws_tx.send(Message::Text(text.into())).await {
                            tracing::warn!(error = %e, "websocket write failed");
                            break;
                        }
                    }
                    None => {
                        let _ = ws_tx.send(Message::Close(None)).await;
                        tracing::debug!("outbound queue closed, websocket closed");
                        break;
                    }
                }
            }

            // inbound reader
            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break; };
                let msg = match incoming {
                    Ok(msg) => msg,
                    Err(e) => {
                        tracing::warn!(error = %e, "websocket read failed");
                        break;
                    }
                };

                last_activity = Instant::now();

                match decode(msg) {
                    Inbound::Text(text) => {
                        if in_tx.send(text).await.is_err() {
                            break;
                        }
                    }
                    Inbound::Ping(payload) => {
                        let _ = ws_tx.send(Message::Pong(payload)).await;
                    }
                    Inbound::Pong => {}
                    Inbound::Close => {
                        tracing::info!("server closed websocket");
                        break;
                    }
                    Inbound::Ignored { bytes_len } => {
                        tracing::debug!(bytes_len, "non-text frame dropped");
                    }
                }
            }

            // ping
            _ = ping_tick.tick() => {
                let _ = ws_tx.send(Message::Ping(Bytes::new())).await;
            }

            // idle timeout
            _ = tokio::time::sleep(IDLE_CHECK_EVERY) => {
                if last_activity.elapsed() >= idle_timeout {
                    tracing::warn!(?idle_timeout, "websocket idle timeout");
                    break;
                }
            }
        }
    }
    // in_tx drops here: the client observes the link closing
}
