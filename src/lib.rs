//! Real-time link between a tactical display and the battlefield
//! simulation: one socket, the latest authoritative snapshot, and
//! fire-and-forget commands.

pub mod client;
pub mod common;

pub use crate::client::command::Command;
pub use crate::client::connection::{ConnectionManager, ConnectionState};
pub use crate::client::endpoint::{Endpoint, EndpointError, Scheme};
pub use crate::client::session::Session;
pub use crate::client::snapshot::Snapshot;
pub use crate::client::transport::{Link, Transport, TransportError, WsTransport};
