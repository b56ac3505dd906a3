//! Socket message classification for the pump.
//!
//! - Text frames are forwarded as-is; the router parses the envelope
//! - Ping/Pong/Close are surfaced for lifecycle management
//! - Binary and raw frames are not part of the protocol

use bytes::Bytes;
use tokio_tungstenite::tungstenite::Message;

#[derive(Debug)]
pub enum Inbound {
    Text(String),
    Ping(Bytes),
    Pong,
    Close,
    Ignored { bytes_len: usize },
}

pub fn decode(msg: Message) -> Inbound {
    match msg {
        Message::Text(s) => Inbound::Text(s.as_str().to_owned()),
        Message::Ping(v) => Inbound::Ping(v),
        Message::Pong(_) => Inbound::Pong,
        Message::Close(_) => Inbound::Close,
        Message::Binary(b) => Inbound::Ignored { bytes_len: b.len() },
        Message::Frame(f) => Inbound::Ignored {
            bytes_len: f.payload().len(),
        },
    }
}
