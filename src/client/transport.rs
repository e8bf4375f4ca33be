use std::io;
use std::sync::mpsc::{SendError, Sender as ChannelSender};
use std::thread;

use log::debug;
use thiserror::Error;
use ws::{connect, CloseCode, Sender};

use crate::client::connection::ConnectionState;
use crate::client::endpoint::Endpoint;
use crate::common::websocket_handler::WebsocketHandler;

pub use crate::common::websocket_handler::{ConnId, SocketEvent};

/// Close code reported when the socket loop ends without a close frame.
pub const CLOSE_ABNORMAL: u16 = 1006;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection is {0}, not open")]
    Unavailable(ConnectionState),

    #[error("handshake failed: {0}")]
    Handshake(String),

    #[error("socket error: {0}")]
    Socket(String)
}

/// Transmit side of one open connection.
pub trait Link {
    fn send(&self, frame: String) -> Result<(), TransportError>;
    fn close(&self) -> Result<(), TransportError>;
}

/// Starts connections. Everything that happens on a connection after
/// `open` returns is reported through `events`, tagged with `conn`.
pub trait Transport {
    type Link: Link;

    fn open(
        &mut self,
        endpoint: &Endpoint,
        conn: ConnId,
        events: ChannelSender<SocketEvent<Self::Link>>
    ) -> Result<(), TransportError>;
}

/// Hands a freshly opened link to the session. If the session is already
/// gone the link is closed on the spot, so the socket does not outlive it.
pub fn forward_open<L: Link>(events: &ChannelSender<SocketEvent<L>>, conn: ConnId, link: L) -> bool {
    match events.send(SocketEvent::Open { conn: conn, link: link }) {
        Ok(()) => true,

        Err(SendError(event)) => {
            debug!("connection {}: session is gone, closing the socket", conn);

            if let SocketEvent::Open { link, .. } = event {
                if let Err(err) = link.close() {
                    debug!("connection {}: close failed: {}", conn, err);
                }
            }

            false
        }
    }
}

impl Link for Sender {
    fn send(&self, frame: String) -> Result<(), TransportError> {
        Sender::send(self, frame)
            .map_err(|err| TransportError::Socket(err.to_string()))
    }

    fn close(&self) -> Result<(), TransportError> {
        Sender::close(self, CloseCode::Normal)
            .map_err(|err| TransportError::Socket(err.to_string()))
    }
}

/// `ws`-backed transport. Each connection runs its socket loop on its own
/// I/O thread; the loop only talks to the session through the channel.
#[derive(Default)]
pub struct WsTransport;

impl Transport for WsTransport {
    type Link = Sender;

    fn open(
        &mut self,
        endpoint: &Endpoint,
        conn: ConnId,
        events: ChannelSender<SocketEvent<Sender>>
    ) -> Result<(), TransportError> {
        let url = endpoint.url();

        thread::Builder::new()
            .name(format!("battlefield-socket-{}", conn.0))
            .spawn(move || {
                let tx = events.clone();
                let result = connect(url.as_str(), |sender| WebsocketHandler::new(conn, sender, tx.clone()));

                if let Err(err) = result {
                    let _ = events.send(SocketEvent::Error { conn: conn, reason: err.to_string() });
                }

                debug!("connection {}: socket loop finished", conn);
                let _ = events.send(SocketEvent::Close {
                    conn: conn,
                    code: CLOSE_ABNORMAL,
                    reason: "socket loop finished".to_string()
                });
            })
            .map(|_| ())
            .map_err(spawn_error)
    }
}

fn spawn_error(err: io::Error) -> TransportError {
    TransportError::Socket(format!("cannot start socket thread: {}", err))
}


#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;

    use super::mock::{MockHandle, MockLink};
    use super::*;

    #[test]
    fn open_without_a_session_closes_the_link() {
        let handle = MockHandle::default();
        let mut transport = handle.transport();
        let endpoint = Endpoint::from_origin("localhost:8080").unwrap();

        let (tx, rx) = channel::<SocketEvent<MockLink>>();
        transport.open(&endpoint, ConnId(4), tx).unwrap();
        drop(rx);

        assert!(!handle.accept());
        assert_eq!(handle.closed(), vec![ConnId(4)]);
    }

    #[test]
    fn thread_spawn_failure_is_a_socket_error() {
        let err = spawn_error(io::Error::new(io::ErrorKind::Other, "out of threads"));

        match err {
            TransportError::Socket(reason) => assert!(reason.contains("out of threads")),
            other => panic!("unexpected {:?}", other)
        }
    }

    #[test]
    fn open_with_a_session_hands_over_the_link() {
        let handle = MockHandle::default();
        let mut transport = handle.transport();
        let endpoint = Endpoint::from_origin("localhost:8080").unwrap();

        let (tx, rx) = channel::<SocketEvent<MockLink>>();
        transport.open(&endpoint, ConnId(1), tx).unwrap();

        assert!(handle.accept());
        assert!(matches!(rx.try_recv(), Ok(SocketEvent::Open { conn: ConnId(1), .. })));
        assert!(handle.closed().is_empty());
    }
}
