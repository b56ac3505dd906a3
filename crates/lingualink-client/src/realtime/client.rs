//! Realtime connection manager.
//!
//! `RealtimeClient` owns at most one live transport. All state sits in
//! `Shared` behind a short-held mutex; it is never held across an `.await`
//! or while bus listeners run. Emitters are synchronous and fire-and-forget:
//! while not connected they log and return without queueing anything.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use lingualink_core::error::{LinkError, Result};
use lingualink_core::protocol::envelope;
use lingualink_core::protocol::outbound::{
    ConversationRef, LiveSessionChat, LiveSessionRef, MarkRead, SendMessage, Typing,
};
use lingualink_core::protocol::OutboundEvent;
use lingualink_core::{ConnState, ReconnectPolicy, Transition};

use crate::config::ClientSection;
use crate::events::{AppEvent, DisconnectReason, EventBus, Lifecycle};
use crate::realtime::membership::{Channel, Membership};
use crate::realtime::supervisor::supervise;
use crate::transport::{Connector, WsConnector};

struct Session {
    state: ConnState,
    /// Bumped by every `connect` and `disconnect`; tasks holding an older
    /// epoch must not touch the session.
    epoch: u64,
    token: Option<String>,
    outbound: Option<mpsc::Sender<String>>,
    supervisor: Option<JoinHandle<()>>,
}

pub(crate) struct Shared {
    pub(crate) handshake_timeout: Duration,
    pub(crate) policy: ReconnectPolicy,
    pub(crate) connector: Arc<dyn Connector>,
    pub(crate) bus: Arc<EventBus>,
    membership: Membership,
    session: Mutex<Session>,
}

/// Cloneable handle to one realtime connection.
#[derive(Clone)]
pub struct RealtimeClient {
    shared: Arc<Shared>,
}

impl RealtimeClient {
    pub fn new(cfg: &ClientSection, connector: Arc<dyn Connector>, bus: Arc<EventBus>) -> Self {
        Self {
            shared: Arc::new(Shared {
                handshake_timeout: cfg.handshake_timeout(),
                policy: cfg.reconnect_policy(),
                connector,
                bus,
                membership: Membership::new(),
                session: Mutex::new(Session {
                    state: ConnState::Disconnected,
                    epoch: 0,
                    token: None,
                    outbound: None,
                    supervisor: None,
                }),
            }),
        }
    }

    /// Client over the WebSocket transport described by `cfg`.
    pub fn with_websocket(cfg: &ClientSection, bus: Arc<EventBus>) -> Self {
        Self::new(cfg, Arc::new(WsConnector::new(cfg)), bus)
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.shared.bus
    }

    /// Open the connection authenticated with `token`.
    ///
    /// Calling this while already connected reuses the live connection and
    /// returns `Ok(())` without opening a second transport. Calling it while
    /// a connect or reconnect is in flight fails with `InvalidState`.
    pub async fn connect(&self, token: &str) -> Result<()> {
        if token.trim().is_empty() {
            return Err(LinkError::InvalidToken);
        }

        let epoch = {
            let mut s = self.shared.lock();
            if s.state.is_connected() {
                tracing::debug!("already connected, reusing connection");
                return Ok(());
            }
            s.state = s.state.next(Transition::ConnectRequested, &self.shared.policy)?;
            s.epoch += 1;
            s.token = Some(token.to_string());
            if let Some(old) = s.supervisor.take() {
                old.abort();
            }
            s.epoch
        };

        tracing::info!(epoch, "connecting");
        let opened = timeout(self.shared.handshake_timeout, self.shared.connector.open(token))
            .await
            .unwrap_or(Err(LinkError::HandshakeTimeout));

        let mut s = self.shared.lock();
        if s.epoch != epoch {
            return Err(LinkError::InvalidState(
                "disconnected while the handshake was in flight".into(),
            ));
        }

        match opened {
            Ok(link) => {
                s.state = s
                    .state
                    .next(Transition::HandshakeSucceeded, &self.shared.policy)?;
                s.outbound = Some(link.tx);
                s.supervisor = Some(tokio::spawn(supervise(
                    Arc::downgrade(&self.shared),
                    epoch,
                    link.rx,
                )));
                drop(s);

                tracing::info!(epoch, "connected");
                self.shared
                    .publish(Lifecycle::Connected { reconnected: false });
                Ok(())
            }
            Err(e) => {
                s.state = s.state.next(Transition::HandshakeFailed, &self.shared.policy)?;
                s.token = None;
                drop(s);

                tracing::warn!(epoch, error = %e, code = e.code().as_str(), "connect failed");
                Err(e)
            }
        }
    }

    /// Tear the connection down and forget all joined channels. Safe to call
    /// in any state; a no-op when already disconnected.
    pub fn disconnect(&self) {
        let was = {
            let mut s = self.shared.lock();
            if s.state == ConnState::Disconnected {
                return;
            }
            let was = s.state;
            s.state = ConnState::Disconnected;
            s.epoch += 1;
            s.token = None;
            s.outbound = None;
            if let Some(task) = s.supervisor.take() {
                task.abort();
            }
            self.shared.membership.clear();
            was
        };

        tracing::info!(from = %was, "disconnected");
        self.shared.publish(Lifecycle::Disconnected {
            reason: DisconnectReason::Requested,
        });
    }

    pub fn is_connected(&self) -> bool {
        self.shared.lock().state.is_connected()
    }

    pub fn state(&self) -> ConnState {
        self.shared.lock().state
    }

    pub fn joined_channels(&self) -> Vec<Channel> {
        self.shared.membership.snapshot()
    }

    pub fn join(&self, channel: Channel) {
        let s = self.shared.lock();
        if self.shared.emit_channel(&s, channel.join_event(), &channel) {
            tracing::debug!(%channel, "joined");
            self.shared.membership.join(channel);
        }
    }

    pub fn leave(&self, channel: &Channel) {
        let s = self.shared.lock();
        if self.shared.emit_channel(&s, channel.leave_event(), channel) {
            tracing::debug!(%channel, "left");
            self.shared.membership.leave(channel);
        }
    }

    pub fn send_message(&self, conversation_id: &str, content: &Value) {
        let s = self.shared.lock();
        self.shared.emit(
            &s,
            OutboundEvent::SendMessage,
            &SendMessage {
                conversation_id,
                content,
            },
        );
    }

    pub fn send_typing(&self, conversation_id: &str, is_typing: bool) {
        let s = self.shared.lock();
        self.shared.emit(
            &s,
            OutboundEvent::Typing,
            &Typing {
                conversation_id,
                is_typing,
            },
        );
    }

    pub fn mark_message_read(&self, conversation_id: &str, message_id: &str) {
        let s = self.shared.lock();
        self.shared.emit(
            &s,
            OutboundEvent::MarkMessageRead,
            &MarkRead {
                conversation_id,
                message_id,
            },
        );
    }

    pub fn send_live_session_chat(&self, session_id: &str, message: &Value) {
        let s = self.shared.lock();
        self.shared.emit(
            &s,
            OutboundEvent::LiveSessionChat,
            &LiveSessionChat {
                session_id,
                message,
            },
        );
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: Lifecycle) {
        self.bus.publish(&AppEvent::Lifecycle(event));
    }

    /// Apply `input` to a session the caller has already checked is current.
    fn advance(&self, s: &mut Session, input: Transition) -> Option<ConnState> {
        match s.state.next(input, &self.policy) {
            Ok(next) => {
                s.state = next;
                Some(next)
            }
            Err(e) => {
                tracing::warn!(error = %e, "transition ignored");
                None
            }
        }
    }

    fn emit<T: Serialize>(&self, s: &Session, event: OutboundEvent, data: &T) -> bool {
        let tx = match &s.outbound {
            Some(tx) if s.state.is_connected() => tx,
            _ => {
                tracing::debug!(%event, state = %s.state, "not connected, emit dropped");
                return false;
            }
        };

        let text = match envelope::encode(event, data) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(%event, error = %e, "emit dropped");
                return false;
            }
        };

        match tx.try_send(text) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(%event, "outbound queue full, emit dropped");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(%event, "transport closing, emit dropped");
                false
            }
        }
    }

    fn emit_channel(&self, s: &Session, event: OutboundEvent, channel: &Channel) -> bool {
        match channel {
            Channel::Conversation(id) => self.emit(s, event, &ConversationRef { conversation_id: id }),
            Channel::LiveSession(id) => self.emit(s, event, &LiveSessionRef { session_id: id }),
        }
    }

    // --------------------
    // Supervisor hooks; each returns None when `epoch` is stale
    // --------------------

    /// Transport dropped on its own. Returns the first retry to run.
    pub(crate) fn on_transport_lost(&self, epoch: u64) -> Option<(u32, Duration)> {
        let next = {
            let mut s = self.lock();
            if s.epoch != epoch || !s.state.is_connected() {
                return None;
            }
            s.outbound = None;
            self.membership.clear();
            self.advance(&mut s, Transition::TransportLost)?
        };

        tracing::warn!(epoch, "transport lost");
        self.publish(Lifecycle::Disconnected {
            reason: DisconnectReason::TransportLost,
        });
        self.schedule(next)
    }

    /// Token for a reconnect attempt, if the session still wants one.
    pub(crate) fn retry_token(&self, epoch: u64) -> Option<String> {
        let s = self.lock();
        match s.state {
            ConnState::Reconnecting { .. } if s.epoch == epoch => s.token.clone(),
            _ => None,
        }
    }

    pub(crate) fn on_reconnected(&self, epoch: u64, tx: mpsc::Sender<String>) -> bool {
        {
            let mut s = self.lock();
            if s.epoch != epoch || self.advance(&mut s, Transition::HandshakeSucceeded).is_none() {
                return false;
            }
            s.outbound = Some(tx);
        }

        tracing::info!(epoch, "reconnected");
        self.publish(Lifecycle::Connected { reconnected: true });
        true
    }

    /// A reconnect attempt failed. Returns the next retry, or None once the
    /// session has gone terminal.
    pub(crate) fn on_retry_failed(&self, epoch: u64) -> Option<(u32, Duration)> {
        let next = {
            let mut s = self.lock();
            if s.epoch != epoch {
                return None;
            }
            self.advance(&mut s, Transition::HandshakeFailed)?
        };
        self.schedule(next)
    }

    fn schedule(&self, state: ConnState) -> Option<(u32, Duration)> {
        match state {
            ConnState::Reconnecting { attempt } => {
                let delay = self.policy.delay(attempt)?;
                tracing::info!(attempt, ?delay, "reconnect scheduled");
                self.publish(Lifecycle::Reconnecting { attempt, delay });
                Some((attempt, delay))
            }
            ConnState::Failed => {
                let attempts = self.policy.max_attempts;
                tracing::warn!(attempts, "reconnect attempts exhausted");
                self.publish(Lifecycle::Failed { attempts });
                None
            }
            _ => None,
        }
    }
}
