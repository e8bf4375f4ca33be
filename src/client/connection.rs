use std::fmt;
use std::sync::mpsc::Sender as ChannelSender;

use log::{debug, error, info, warn};

use crate::client::endpoint::Endpoint;
use crate::client::signal::Signal;
use crate::client::transport::{ConnId, Link, SocketEvent, Transport, TransportError};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Open,
    Closed
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closed => "closed"
        };

        f.write_str(name)
    }
}

/// What a socket event meant for the rest of the session.
#[derive(Debug, PartialEq)]
pub enum Handled {
    Ignored,
    Opened,
    Frame(String),
    Closed
}

/// Owns at most one connection at a time.
///
/// `Idle -> Connecting -> Open -> Closed`, with `Connecting -> Closed` on a
/// failed handshake. Nothing here reconnects on its own: leaving `Closed`
/// takes another `activate`.
pub struct ConnectionManager<T: Transport> {
    transport: T,
    endpoint: Endpoint,
    events: ChannelSender<SocketEvent<T::Link>>,
    state: ConnectionState,
    conn: ConnId,
    link: Option<T::Link>,
    connected: Signal<bool>
}

impl<T: Transport> ConnectionManager<T> {
    pub fn new(transport: T, endpoint: Endpoint, events: ChannelSender<SocketEvent<T::Link>>) -> Self {
        ConnectionManager {
            transport: transport,
            endpoint: endpoint,
            events: events,
            state: ConnectionState::Idle,
            conn: ConnId::default(),
            link: None,
            connected: Signal::new(false)
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn is_connected(&self) -> bool {
        *self.connected.get()
    }

    pub fn connected(&mut self) -> &mut Signal<bool> {
        &mut self.connected
    }

    pub fn activate(&mut self) {
        match self.state {
            ConnectionState::Connecting | ConnectionState::Open => {
                debug!("connection {} is already {}", self.conn, self.state);
                return;
            },

            ConnectionState::Idle | ConnectionState::Closed => { }
        }

        self.conn = self.conn.next();
        self.state = ConnectionState::Connecting;
        info!("connection {}: connecting to {}", self.conn, self.endpoint);

        if let Err(err) = self.transport.open(&self.endpoint, self.conn, self.events.clone()) {
            error!("connection {}: {}", self.conn, err);
            self.settle_closed();
        }
    }

    /// Returns whether there was anything to close.
    pub fn deactivate(&mut self) -> bool {
        match self.state {
            ConnectionState::Idle | ConnectionState::Closed => return false,
            ConnectionState::Connecting | ConnectionState::Open => { }
        }

        info!("connection {}: closing", self.conn);
        self.settle_closed();

        true
    }

    pub fn transmit(&self, frame: String) -> Result<(), TransportError> {
        match (self.state, self.link.as_ref()) {
            (ConnectionState::Open, Some(link)) => link.send(frame),
            (state, _) => Err(TransportError::Unavailable(state))
        }
    }

    pub fn handle(&mut self, event: SocketEvent<T::Link>) -> Handled {
        let conn = event.conn();
        if conn != self.conn {
            debug!("ignoring event from superseded connection {}", conn);

            if let SocketEvent::Open { link, .. } = event {
                close_link(&link, conn);
            }

            return Handled::Ignored;
        }

        match event {
            SocketEvent::Open { link, .. } => {
                if self.state != ConnectionState::Connecting {
                    debug!("connection {}: unexpected open while {}", self.conn, self.state);
                    close_link(&link, self.conn);
                    return Handled::Ignored;
                }

                self.link = Some(link);
                self.state = ConnectionState::Open;
                self.connected.replace(true);
                info!("connection {}: battlefield connection established", self.conn);

                Handled::Opened
            },

            SocketEvent::Message { frame, .. } => {
                if self.state != ConnectionState::Open {
                    debug!("connection {}: dropping frame received while {}", self.conn, self.state);
                    return Handled::Ignored;
                }

                Handled::Frame(frame)
            },

            SocketEvent::Error { reason, .. } => {
                if !self.is_live() {
                    debug!("connection {}: late socket error: {}", self.conn, reason);
                    return Handled::Ignored;
                }

                error!("connection {}: socket error: {}", self.conn, reason);
                self.mark_closed();

                Handled::Closed
            },

            SocketEvent::Close { code, reason, .. } => {
                if !self.is_live() {
                    return Handled::Ignored;
                }

                if self.state == ConnectionState::Connecting {
                    warn!("connection {}: handshake failed (code {}, {})", self.conn, code, reason);
                } else {
                    info!("connection {}: battlefield connection lost (code {}, {})", self.conn, code, reason);
                }

                self.mark_closed();

                Handled::Closed
            }
        }
    }

    fn is_live(&self) -> bool {
        self.state == ConnectionState::Connecting || self.state == ConnectionState::Open
    }

    fn settle_closed(&mut self) {
        if let Some(link) = self.link.take() {
            close_link(&link, self.conn);
        }

        self.mark_closed();
    }

    fn mark_closed(&mut self) {
        self.link = None;
        self.state = ConnectionState::Closed;
        self.connected.replace(false);
    }
}

fn close_link<L: Link>(link: &L, conn: ConnId) {
    if let Err(err) = link.close() {
        warn!("connection {}: close failed: {}", conn, err);
    }
}
