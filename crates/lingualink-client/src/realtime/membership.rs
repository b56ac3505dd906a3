use std::fmt;

use dashmap::DashSet;

use lingualink_core::protocol::OutboundEvent;

/// A server-side grouping the client can join.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    Conversation(String),
    LiveSession(String),
}

impl Channel {
    pub fn conversation(id: impl Into<String>) -> Self {
        Channel::Conversation(id.into())
    }

    pub fn live_session(id: impl Into<String>) -> Self {
        Channel::LiveSession(id.into())
    }

    pub fn id(&self) -> &str {
        match self {
            Channel::Conversation(id) | Channel::LiveSession(id) => id,
        }
    }

    pub(crate) fn join_event(&self) -> OutboundEvent {
        match self {
            Channel::Conversation(_) => OutboundEvent::JoinConversation,
            Channel::LiveSession(_) => OutboundEvent::JoinLiveSession,
        }
    }

    pub(crate) fn leave_event(&self) -> OutboundEvent {
        match self {
            Channel::Conversation(_) => OutboundEvent::LeaveConversation,
            Channel::LiveSession(_) => OutboundEvent::LeaveLiveSession,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Conversation(id) => write!(f, "conversation:{id}"),
            Channel::LiveSession(id) => write!(f, "live-session:{id}"),
        }
    }
}

/// Channels joined on the current connection. Scoped to that connection:
/// cleared, never replayed, when it goes away.
#[derive(Default)]
pub struct Membership {
    channels: DashSet<Channel>,
}

impl Membership {
    pub fn new() -> Self {
        Self {
            channels: DashSet::new(),
        }
    }

    pub fn join(&self, channel: Channel) -> bool {
        self.channels.insert(channel)
    }

    pub fn leave(&self, channel: &Channel) -> bool {
        self.channels.remove(channel).is_some()
    }

    /// Sorted snapshot.
    pub fn snapshot(&self) -> Vec<Channel> {
        let mut out: Vec<Channel> = self.channels.iter().map(|c| c.key().clone()).collect();
        out.sort();
        out
    }

    pub fn clear(&self) {
        self.channels.clear();
    }
}
