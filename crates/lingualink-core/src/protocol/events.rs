//! Event names on the wire.

use std::fmt;

/// Events the server pushes to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InboundEvent {
    NewMessage,
    MessageRead,
    TypingStart,
    TypingStop,
    NewNotification,
    NotificationRead,
    UserOnline,
    UserOffline,
    OnlineUsers,
    SessionStarted,
    SessionEnded,
    ParticipantJoined,
    ParticipantLeft,
    /// Chat line posted inside a live session.
    LiveSessionChat,
}

impl InboundEvent {
    pub const ALL: [InboundEvent; 14] = [
        InboundEvent::NewMessage,
        InboundEvent::MessageRead,
        InboundEvent::TypingStart,
        InboundEvent::TypingStop,
        InboundEvent::NewNotification,
        InboundEvent::NotificationRead,
        InboundEvent::UserOnline,
        InboundEvent::UserOffline,
        InboundEvent::OnlineUsers,
        InboundEvent::SessionStarted,
        InboundEvent::SessionEnded,
        InboundEvent::ParticipantJoined,
        InboundEvent::ParticipantLeft,
        InboundEvent::LiveSessionChat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InboundEvent::NewMessage => "new-message",
            InboundEvent::MessageRead => "message-read",
            InboundEvent::TypingStart => "typing-start",
            InboundEvent::TypingStop => "typing-stop",
            InboundEvent::NewNotification => "new-notification",
            InboundEvent::NotificationRead => "notification-read",
            InboundEvent::UserOnline => "user-online",
            InboundEvent::UserOffline => "user-offline",
            InboundEvent::OnlineUsers => "online-users",
            InboundEvent::SessionStarted => "session-started",
            InboundEvent::SessionEnded => "session-ended",
            InboundEvent::ParticipantJoined => "participant-joined",
            InboundEvent::ParticipantLeft => "participant-left",
            InboundEvent::LiveSessionChat => "live-session-chat",
        }
    }

    /// Resolve a wire name. Unknown names return `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_str() == name)
    }
}

impl fmt::Display for InboundEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events the client emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutboundEvent {
    SendMessage,
    JoinConversation,
    LeaveConversation,
    Typing,
    MarkMessageRead,
    JoinLiveSession,
    LeaveLiveSession,
    LiveSessionChat,
}

impl OutboundEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            OutboundEvent::SendMessage => "send-message",
            OutboundEvent::JoinConversation => "join-conversation",
            OutboundEvent::LeaveConversation => "leave-conversation",
            OutboundEvent::Typing => "typing",
            OutboundEvent::MarkMessageRead => "mark-message-read",
            OutboundEvent::JoinLiveSession => "join-live-session",
            OutboundEvent::LeaveLiveSession => "leave-live-session",
            OutboundEvent::LiveSessionChat => "live-session-chat",
        }
    }
}

impl fmt::Display for OutboundEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
