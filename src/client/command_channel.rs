use log::{debug, warn};

use crate::client::command::Command;
use crate::client::connection::ConnectionManager;
use crate::client::json;
use crate::client::transport::Transport;

/// Fire-and-forget delivery of commands: at most once, no queueing, no
/// retries, no acknowledgement.
#[derive(Debug, Default)]
pub struct CommandChannel {
    sent: u64,
    dropped: u64
}

impl CommandChannel {
    pub fn new() -> Self {
        CommandChannel::default()
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Commands refused because no connection was open. Each refusal also
    /// logs exactly one warning.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Returns whether the frame was handed to an open connection.
    pub fn send<T: Transport>(&mut self, connection: &ConnectionManager<T>, command: &Command) -> bool {
        let frame = json::format_command(command);

        match connection.transmit(frame) {
            Ok(()) => {
                self.sent += 1;
                debug!("sent {} command", command.action());
                true
            },

            Err(err) => {
                self.dropped += 1;
                warn!("cannot send {} command: {}", command.action(), err);
                false
            }
        }
    }
}
