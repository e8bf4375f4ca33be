use std::fmt;
use std::sync::mpsc::Sender as ChannelSender;

use log::{debug, warn};
use ws::{
    CloseCode,
    Error,
    Handler,
    Handshake,
    Message,
    Result,
    Sender
};

use crate::client::transport::forward_open;

/// Identifies one connection attempt. Every activation gets a fresh id so
/// that callbacks from a superseded socket can be told apart.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnId(pub u64);

impl ConnId {
    pub fn next(self) -> ConnId {
        ConnId(self.0 + 1)
    }
}

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub enum SocketEvent<L> {
    Open {
        conn: ConnId,
        link: L
    },

    Message {
        conn: ConnId,
        frame: String
    },

    Error {
        conn: ConnId,
        reason: String
    },

    Close {
        conn: ConnId,
        code: u16,
        reason: String
    }
}

impl<L> SocketEvent<L> {
    pub fn conn(&self) -> ConnId {
        match *self {
            SocketEvent::Open { conn, .. } => conn,
            SocketEvent::Message { conn, .. } => conn,
            SocketEvent::Error { conn, .. } => conn,
            SocketEvent::Close { conn, .. } => conn
        }
    }
}

pub struct WebsocketHandler {
    conn: ConnId,
    sender: Sender,
    tx: ChannelSender<SocketEvent<Sender>>
}

impl WebsocketHandler {
    pub fn new(conn: ConnId, sender: Sender, tx: ChannelSender<SocketEvent<Sender>>) -> Self {
        WebsocketHandler { conn: conn, sender: sender, tx: tx }
    }

    fn forward(&self, event: SocketEvent<Sender>) {
        if self.tx.send(event).is_err() {
            debug!("connection {}: session is gone, closing the socket", self.conn);

            if let Err(err) = self.sender.close(CloseCode::Away) {
                debug!("connection {}: close failed: {}", self.conn, err);
            }
        }
    }
}

impl Handler for WebsocketHandler {
    fn on_open(&mut self, shake: Handshake) -> Result<()> {
        match shake.peer_addr {
            Some(addr) => debug!("connection {}: handshake completed with {}", self.conn, addr),
            None => debug!("connection {}: handshake completed", self.conn)
        }

        forward_open(&self.tx, self.conn, self.sender.clone());

        Ok(())
    }

    fn on_message(&mut self, message: Message) -> Result<()> {
        match message.into_text() {
            Ok(frame) => self.forward(SocketEvent::Message { conn: self.conn, frame: frame }),
            Err(err) => warn!("connection {}: dropping non-text frame: {}", self.conn, err)
        }

        Ok(())
    }

    fn on_close(&mut self, code: CloseCode, reason: &str) {
        let code: u16 = code.into();

        self.forward(SocketEvent::Close { conn: self.conn, code: code, reason: reason.to_string() });
    }

    fn on_error(&mut self, err: Error) {
        self.forward(SocketEvent::Error { conn: self.conn, reason: err.to_string() });
    }
}
