use std::sync::mpsc::{channel, Receiver as ChannelReceiver, RecvTimeoutError};
use std::time::Duration;

use log::debug;

use crate::client::command::Command;
use crate::client::command_channel::CommandChannel;
use crate::client::connection::{ConnectionManager, ConnectionState, Handled};
use crate::client::endpoint::Endpoint;
use crate::client::signal::Signal;
use crate::client::snapshot::Snapshot;
use crate::client::state_store::StateStore;
use crate::client::transport::{SocketEvent, Transport};

/// One live attachment to the battlefield.
///
/// Constructing a session activates the connection; dropping it
/// deactivates, whichever way the owning scope is left. Socket events are
/// only applied from `poll`/`wait`, on the owner's thread, one at a time.
pub struct Session<T: Transport> {
    connection: ConnectionManager<T>,
    store: StateStore,
    commands: CommandChannel,
    rx: ChannelReceiver<SocketEvent<T::Link>>
}

impl<T: Transport> Session<T> {
    pub fn activate(transport: T, endpoint: Endpoint) -> Self {
        let (tx, rx) = channel();

        let mut session = Session {
            connection: ConnectionManager::new(transport, endpoint, tx),
            store: StateStore::new(),
            commands: CommandChannel::new(),
            rx: rx
        };

        session.connection.activate();
        session
    }

    /// Re-triggers the connection after it was closed. No-op while
    /// connecting or open.
    pub fn reactivate(&mut self) {
        self.connection.activate();
    }

    pub fn deactivate(&mut self) {
        self.connection.deactivate();
        self.store.clear();
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    pub fn endpoint(&self) -> &Endpoint {
        self.connection.endpoint()
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.store.current()
    }

    pub fn connected_signal(&mut self) -> &mut Signal<bool> {
        self.connection.connected()
    }

    pub fn snapshot_signal(&mut self) -> &mut Signal<Option<Snapshot>> {
        self.store.snapshot()
    }

    pub fn commands(&self) -> &CommandChannel {
        &self.commands
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn send(&mut self, command: &Command) -> bool {
        self.commands.send(&self.connection, command)
    }

    /// Applies every event already waiting. Returns how many were taken.
    pub fn poll(&mut self) -> usize {
        let mut count = 0;

        while let Ok(event) = self.rx.try_recv() {
            self.dispatch(event);
            count += 1;
        }

        count
    }

    /// Blocks up to `timeout` for the next event, then drains the rest.
    pub fn wait(&mut self, timeout: Duration) -> usize {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => {
                self.dispatch(event);
                1 + self.poll()
            },

            Err(RecvTimeoutError::Timeout) => 0,

            Err(RecvTimeoutError::Disconnected) => {
                debug!("socket event channel disconnected");
                0
            }
        }
    }

    fn dispatch(&mut self, event: SocketEvent<T::Link>) {
        match self.connection.handle(event) {
            Handled::Frame(frame) => {
                let _ = self.store.apply_frame(&frame);
            },

            Handled::Closed => self.store.clear(),

            Handled::Opened | Handled::Ignored => { }
        }
    }
}

impl<T: Transport> Drop for Session<T> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rustc_serialize::json::Json;

    use super::*;
    use crate::client::json::parse_snapshot;
    use crate::client::transport::mock::{MockHandle, MockTransport};

    const EMPTY_SNAPSHOT: &str = r#"{"availableUnits":{},"groupsInTransit":{},"individualsInTransit":{},"score":0,"escapedCount":0,"breachCount":0,"lastEvents":[],"squads":{},"processingIndividualUnit":null,"processingGroup":null}"#;

    const SCORED_SNAPSHOT: &str = r#"{"availableUnits":{},"groupsInTransit":{},"individualsInTransit":{},"score":40,"escapedCount":3,"breachCount":2,"lastEvents":["ESCAPE:u9"],"squads":{"s1":{"id":"s1","composition":{"tank":2}}},"processingIndividualUnit":null,"processingGroup":null}"#;

    fn open_session() -> (MockHandle, Session<MockTransport>) {
        let handle = MockHandle::default();
        let endpoint = Endpoint::from_origin("http://localhost:8080").unwrap();
        let mut session = Session::activate(handle.transport(), endpoint);

        handle.accept();
        session.poll();
        assert_eq!(session.state(), ConnectionState::Open);

        (handle, session)
    }

    #[test]
    fn inbound_frame_becomes_the_snapshot() {
        let (handle, mut session) = open_session();

        handle.deliver(EMPTY_SNAPSHOT);
        session.poll();

        assert_eq!(session.snapshot(), Some(&Snapshot::default()));
    }

    #[test]
    fn malformed_frame_keeps_previous_snapshot_and_connection() {
        let (handle, mut session) = open_session();

        handle.deliver(SCORED_SNAPSHOT);
        handle.deliver("{\"availableUnits\": 7}");
        handle.deliver("garbage");
        session.poll();

        assert_eq!(session.snapshot(), Some(&parse_snapshot(SCORED_SNAPSHOT).unwrap()));
        assert_eq!(session.store().rejected(), 2);
        assert!(session.is_connected());
    }

    #[test]
    fn deploy_squad_while_open_sends_exactly_one_frame() {
        let (handle, mut session) = open_session();

        assert!(session.send(&Command::DeploySquad { squad_id: "s1".to_string() }));

        let sent = handle.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            Json::from_str(&sent[0]).unwrap(),
            Json::from_str(r#"{"action":"deploy-squad","payload":{"squad_id":"s1"}}"#).unwrap()
        );
    }

    #[test]
    fn send_while_not_open_is_dropped() {
        let handle = MockHandle::default();
        let endpoint = Endpoint::from_origin("localhost:8080").unwrap();
        let mut session = Session::activate(handle.transport(), endpoint);

        assert!(!session.send(&Command::CreateSquad { unit_ids: vec!["u1".to_string()] }));
        assert_eq!(session.commands().dropped(), 1);

        handle.accept();
        handle.hang_up();
        session.poll();
        assert_eq!(session.state(), ConnectionState::Closed);

        assert!(!session.send(&Command::DeploySquad { squad_id: "s1".to_string() }));
        assert_eq!(session.commands().dropped(), 2);

        assert!(handle.sent().is_empty());
        assert_eq!(session.commands().sent(), 0);
    }

    #[test]
    fn commands_keep_call_order() {
        let (handle, mut session) = open_session();

        session.send(&Command::CreateSquad { unit_ids: vec!["u1".to_string(), "u2".to_string()] });
        session.send(&Command::DeploySquad { squad_id: "s7".to_string() });
        session.send(&Command::DeployIndividuals { unit_ids: vec!["u3".to_string()] });

        let actions: Vec<String> = handle.sent()
            .iter()
            .map(|frame| Json::from_str(frame).unwrap()["action"].as_string().unwrap().to_string())
            .collect();

        assert_eq!(actions, vec!["create-squad", "deploy-squad", "deploy-individuals"]);
    }

    #[test]
    fn close_clears_snapshot_and_connected_flag() {
        let (handle, mut session) = open_session();
        handle.deliver(SCORED_SNAPSHOT);
        session.poll();

        handle.hang_up();
        session.poll();

        assert!(!session.is_connected());
        assert!(session.snapshot().is_none());
        assert_eq!(handle.opened().len(), 1);
    }

    #[test]
    fn transport_error_clears_snapshot_and_connected_flag() {
        let (handle, mut session) = open_session();
        handle.deliver(SCORED_SNAPSHOT);
        session.poll();

        handle.fail("connection reset by peer");
        session.poll();

        assert_eq!(session.state(), ConnectionState::Closed);
        assert!(!session.is_connected());
        assert!(session.snapshot().is_none());
    }

    #[test]
    fn deactivate_then_activate_reaches_open_without_leaking() {
        let (handle, mut session) = open_session();
        let first = handle.last_conn();
        handle.deliver(SCORED_SNAPSHOT);
        session.poll();

        session.deactivate();
        assert!(session.snapshot().is_none());
        assert_eq!(handle.closed(), vec![first]);

        session.reactivate();
        let second = handle.last_conn();
        assert_ne!(first, second);

        handle.accept();
        handle.deliver(EMPTY_SNAPSHOT);
        session.poll();

        assert_eq!(session.state(), ConnectionState::Open);
        assert_eq!(session.snapshot(), Some(&Snapshot::default()));

        assert!(session.send(&Command::DeploySquad { squad_id: "s1".to_string() }));
        assert_eq!(handle.sent().len(), 1);
    }

    #[test]
    fn frames_from_a_superseded_connection_are_ignored() {
        let (handle, mut session) = open_session();
        session.deactivate();
        session.reactivate();
        handle.accept();
        session.poll();

        handle.accept_conn(handle.opened()[0]);
        session.poll();
        assert_eq!(session.state(), ConnectionState::Open);

        handle.deliver(EMPTY_SNAPSHOT);
        session.poll();
        assert!(session.snapshot().is_some());
    }

    #[test]
    fn dropping_the_session_closes_the_connection() {
        let (handle, session) = open_session();
        let conn = handle.last_conn();

        drop(session);

        assert_eq!(handle.closed(), vec![conn]);
    }

    #[test]
    fn dropping_a_connecting_session_closes_the_late_socket() {
        let handle = MockHandle::default();
        let endpoint = Endpoint::from_origin("localhost:8080").unwrap();
        let session = Session::activate(handle.transport(), endpoint);
        assert_eq!(session.state(), ConnectionState::Connecting);
        let conn = handle.last_conn();

        drop(session);
        assert!(handle.closed().is_empty());

        assert!(!handle.accept());
        assert_eq!(handle.closed(), vec![conn]);
    }

    #[test]
    fn signals_report_connection_and_snapshot_changes() {
        let handle = MockHandle::default();
        let endpoint = Endpoint::from_origin("localhost:8080").unwrap();
        let mut session = Session::activate(handle.transport(), endpoint);

        let connected = Rc::new(RefCell::new(Vec::new()));
        let snapshots = Rc::new(RefCell::new(Vec::new()));

        let sink = connected.clone();
        session.connected_signal().subscribe(move |value: &bool| sink.borrow_mut().push(*value));

        let sink = snapshots.clone();
        session.snapshot_signal().subscribe(move |value: &Option<Snapshot>| {
            sink.borrow_mut().push(value.as_ref().map(|snapshot| snapshot.score))
        });

        handle.accept();
        handle.deliver(SCORED_SNAPSHOT);
        handle.hang_up();
        session.poll();

        assert_eq!(*connected.borrow(), vec![true, false]);
        assert_eq!(*snapshots.borrow(), vec![Some(40), None]);
    }
}
