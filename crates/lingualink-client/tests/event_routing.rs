//! Inbound routing, bus fan-out, and fire-and-forget emitters.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc::error::TryRecvError;

use lingualink_client::events::{router, EventKind};
use lingualink_client::{AppEvent, Channel, EventBus, Lifecycle, RealtimeClient};
use lingualink_core::protocol::InboundEvent;

use common::{accepted, section, MockConnector, Script, WAIT};

fn client(connector: Arc<MockConnector>) -> RealtimeClient {
    RealtimeClient::new(&section(10, 3, 300), connector, Arc::new(EventBus::new()))
}

#[tokio::test]
async fn inbound_event_reaches_listener_once_unchanged() {
    let (connector, mut conns) = MockConnector::new(vec![Script::Accept], Script::Reject);
    let c = client(connector);
    let mut messages = c.events().subscribe(EventKind::Inbound(InboundEvent::NewMessage));
    let mut ended = c.events().subscribe(EventKind::Inbound(InboundEvent::SessionEnded));

    c.connect("abc123").await.unwrap();
    let server = accepted(&mut conns).await;

    let payload = json!({
        "conversationId": "c-1",
        "message": { "id": "m-1", "text": "Guten Tag", "sender": { "role": "student" } }
    });
    server.push(json!({ "event": "new-message", "data": payload })).await;
    server.push(json!({ "event": "session-ended", "data": { "sessionId": "s-1" } })).await;

    let ev = tokio::time::timeout(WAIT, messages.recv()).await.unwrap().unwrap();
    assert_eq!(
        ev,
        AppEvent::Inbound {
            kind: InboundEvent::NewMessage,
            payload
        }
    );
    assert_eq!(ev.name(), "new-message");

    // the later frame has been routed, so any duplicate would already be here
    tokio::time::timeout(WAIT, ended.recv()).await.unwrap().unwrap();
    assert!(matches!(messages.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn junk_frames_do_not_break_the_connection() {
    let (connector, mut conns) = MockConnector::new(vec![Script::Accept], Script::Reject);
    let c = client(connector);
    let mut online = c.events().subscribe(EventKind::Inbound(InboundEvent::UserOnline));

    c.connect("abc123").await.unwrap();
    let server = accepted(&mut conns).await;

    server.to_client.send("not json".to_string()).await.unwrap();
    server.push(json!({ "event": "mystery", "data": 1 })).await;
    server.push(json!({ "event": "typing-start", "data": { "userId": "u-2" } })).await;
    server.push(json!({ "event": "user-online", "data": { "userId": "u-3" } })).await;

    let ev = tokio::time::timeout(WAIT, online.recv()).await.unwrap().unwrap();
    assert_eq!(
        ev,
        AppEvent::Inbound {
            kind: InboundEvent::UserOnline,
            payload: json!({ "userId": "u-3" })
        }
    );
    assert!(c.is_connected());
}

#[test]
fn extra_top_level_keys_still_deliver() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe(EventKind::Inbound(InboundEvent::NewMessage));

    let frame = json!({ "event": "new-message", "data": { "id": "m-1" }, "timestamp": 1 }).to_string();
    assert_eq!(router::route(&bus, &frame), 1);
    assert_eq!(
        rx.try_recv().unwrap(),
        AppEvent::Inbound {
            kind: InboundEvent::NewMessage,
            payload: json!({ "id": "m-1" })
        }
    );
}

#[test]
fn event_without_listener_is_dropped() {
    let bus = EventBus::new();
    let frame = json!({ "event": "new-notification", "data": { "id": "n-1" } }).to_string();
    assert_eq!(router::route(&bus, &frame), 0);
    assert_eq!(router::route(&bus, "garbage"), 0);
}

#[test]
fn callbacks_filter_by_kind_and_can_be_removed() {
    let bus = EventBus::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let all = Arc::new(AtomicUsize::new(0));

    let id = {
        let hits = hits.clone();
        bus.on(EventKind::Inbound(InboundEvent::TypingStop), move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    };
    {
        let all = all.clone();
        bus.on_any(move |_| {
            all.fetch_add(1, Ordering::SeqCst);
        });
    }

    let stop = json!({ "event": "typing-stop", "data": { "userId": "u-1" } }).to_string();
    let start = json!({ "event": "typing-start", "data": { "userId": "u-1" } }).to_string();

    assert_eq!(router::route(&bus, &stop), 2);
    assert_eq!(router::route(&bus, &start), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(all.load(Ordering::SeqCst), 2);

    assert!(bus.off(id));
    assert!(!bus.off(id));
    assert_eq!(router::route(&bus, &stop), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn closed_subscriptions_are_pruned() {
    let bus = EventBus::new();
    let rx = bus.subscribe_all();
    assert_eq!(bus.listener_count(), 1);
    drop(rx);

    let delivered = bus.publish(&AppEvent::Lifecycle(Lifecycle::Failed { attempts: 2 }));
    assert_eq!(delivered, 0);
    assert_eq!(bus.listener_count(), 0);
}

#[test]
fn lagging_subscriber_loses_events_without_blocking_others() {
    let bus = EventBus::with_queue(2);
    let mut slow = bus.subscribe_all();
    let hits = Arc::new(AtomicUsize::new(0));
    {
        let hits = hits.clone();
        bus.on_any(move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        });
    }

    let frame = json!({ "event": "user-offline", "data": { "userId": "u-1" } }).to_string();
    assert_eq!(router::route(&bus, &frame), 2);
    assert_eq!(router::route(&bus, &frame), 2);
    // queue full: only the callback gets the third one
    assert_eq!(router::route(&bus, &frame), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 3);

    slow.try_recv().unwrap();
    slow.try_recv().unwrap();
    assert!(matches!(slow.try_recv(), Err(TryRecvError::Empty)));

    // still registered, delivery resumes once drained
    assert_eq!(router::route(&bus, &frame), 2);
    assert_eq!(bus.listener_count(), 2);
}

#[test]
fn default_bus_numbers_listeners_like_new() {
    let a = EventBus::default();
    let b = EventBus::new();
    assert_eq!(a.on_any(|_| {}), b.on_any(|_| {}));
}

#[tokio::test]
async fn emits_while_disconnected_are_not_queued() {
    let (connector, mut conns) = MockConnector::new(vec![Script::Accept], Script::Reject);
    let c = client(connector);

    c.send_typing("room-1", true);
    c.send_message("room-1", &json!({ "text": "hi" }));
    c.join(Channel::conversation("room-1"));
    c.mark_message_read("room-1", "m-1");
    assert!(c.joined_channels().is_empty());

    c.connect("abc123").await.unwrap();
    let mut server = accepted(&mut conns).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(matches!(server.from_client.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn emitters_write_wire_frames() {
    let (connector, mut conns) = MockConnector::new(vec![Script::Accept], Script::Reject);
    let c = client(connector);
    c.connect("abc123").await.unwrap();
    let mut server = accepted(&mut conns).await;

    c.join(Channel::conversation("c-1"));
    c.join(Channel::live_session("s-1"));
    c.send_message("c-1", &json!({ "text": "bonjour" }));
    c.mark_message_read("c-1", "m-9");
    c.send_live_session_chat("s-1", &json!({ "text": "question" }));
    c.leave(&Channel::conversation("c-1"));

    let expected = [
        json!({ "event": "join-conversation", "data": { "conversationId": "c-1" } }),
        json!({ "event": "join-live-session", "data": { "sessionId": "s-1" } }),
        json!({ "event": "send-message", "data": { "conversationId": "c-1", "content": { "text": "bonjour" } } }),
        json!({ "event": "mark-message-read", "data": { "conversationId": "c-1", "messageId": "m-9" } }),
        json!({ "event": "live-session-chat", "data": { "sessionId": "s-1", "message": { "text": "question" } } }),
        json!({ "event": "leave-conversation", "data": { "conversationId": "c-1" } }),
    ];
    for want in expected {
        assert_eq!(server.next_frame().await, want);
    }

    let joined = c.joined_channels();
    assert_eq!(joined, vec![Channel::live_session("s-1")]);
    assert_eq!(joined[0].id(), "s-1");

    c.disconnect();
    assert!(c.joined_channels().is_empty());
}
