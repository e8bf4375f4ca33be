pub mod client;
pub mod command;
pub mod command_channel;
pub mod connection;
pub mod endpoint;
pub mod game_event;
pub mod game_ui;
pub mod group;
pub mod input_mapping;
pub mod json;
pub mod session;
pub mod signal;
pub mod snapshot;
pub mod squad;
pub mod state_store;
pub mod transport;
pub mod unit;

pub use self::client::{run, ClientConfig};
