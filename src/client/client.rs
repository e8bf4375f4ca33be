use std::cell::Cell;
use std::io::{self, BufRead};
use std::rc::Rc;
use std::sync::mpsc::{channel, Receiver as ChannelReceiver, TryRecvError};
use std::thread;
use std::time::Duration;

use log::{info, warn};

use crate::client::command::Command;
use crate::client::endpoint::Endpoint;
use crate::client::game_event::GameEvent;
use crate::client::game_ui::{self, View};
use crate::client::input_mapping;
use crate::client::json;
use crate::client::session::Session;
use crate::client::snapshot::Snapshot;
use crate::client::transport::{Transport, WsTransport};
use crate::common::Id;

const TICK: Duration = Duration::from_millis(100);

/// Expands to every currently available unit id.
const ALL_UNITS: &str = "*";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub endpoint: Endpoint,
    pub events_shown: usize
}

#[derive(Debug, PartialEq)]
pub enum Flow {
    Continue,
    Quit
}

pub struct Client<T: Transport> {
    session: Session<T>,
    events_shown: usize,
    dirty: Rc<Cell<bool>>
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        let mut session = Session::activate(transport, config.endpoint);
        let dirty = Rc::new(Cell::new(true));

        let flag = dirty.clone();
        session.connected_signal().subscribe(move |_: &bool| flag.set(true));

        let flag = dirty.clone();
        session.snapshot_signal().subscribe(move |_: &Option<Snapshot>| flag.set(true));

        Client {
            session: session,
            events_shown: config.events_shown,
            dirty: dirty
        }
    }

    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    pub fn run(&mut self, input: &ChannelReceiver<String>) {
        loop {
            self.session.wait(TICK);

            loop {
                match input.try_recv() {
                    Ok(line) => {
                        if self.process_input(&line) == Flow::Quit {
                            return;
                        }
                    },

                    Err(TryRecvError::Empty) => break,

                    Err(TryRecvError::Disconnected) => {
                        info!("input closed, leaving");
                        return;
                    }
                }
            }

            if self.dirty.replace(false) {
                println!("{}", self.render());
            }
        }
    }

    pub fn process_input(&mut self, line: &str) -> Flow {
        for mapping in self.get_input_mapping() {
            if let Some(game_event) = mapping(line) {
                return self.execute(game_event);
            }
        }

        Flow::Continue
    }

    pub fn render(&self) -> String {
        let endpoint = self.session.endpoint().url();

        game_ui::render(&View {
            state: self.session.state(),
            endpoint: &endpoint,
            snapshot: self.session.snapshot(),
            now: time::get_time().sec,
            events_shown: self.events_shown
        })
    }

    fn execute(&mut self, game_event: GameEvent) -> Flow {
        match game_event {
            GameEvent::CreateSquad(unit_ids) => {
                let unit_ids = self.expand_unit_ids(unit_ids);
                self.send(Command::CreateSquad { unit_ids: unit_ids });
            },

            GameEvent::DeploySquad(squad_id) => {
                self.send(Command::DeploySquad { squad_id: squad_id });
            },

            GameEvent::DeployIndividuals(unit_ids) => {
                let unit_ids = self.expand_unit_ids(unit_ids);
                self.send(Command::DeployIndividuals { unit_ids: unit_ids });
            },

            GameEvent::Raw(command) => self.send(command),

            GameEvent::Status => self.dirty.set(true),

            GameEvent::Dump => match self.session.snapshot() {
                Some(snapshot) => println!("{}", json::format_snapshot(snapshot)),
                None => println!("no snapshot held")
            },

            GameEvent::Reconnect => self.session.reactivate(),

            GameEvent::Disconnect => self.session.deactivate(),

            GameEvent::Help => println!("{}", input_mapping::HELP),

            GameEvent::Quit => return Flow::Quit,

            GameEvent::Invalid(complaint) => println!("{}", complaint)
        }

        Flow::Continue
    }

    fn send(&mut self, command: Command) {
        if !self.session.send(&command) {
            println!("not connected, {} dropped", command.action());
        }
    }

    fn expand_unit_ids(&self, unit_ids: Vec<Id>) -> Vec<Id> {
        let available = self.session.snapshot()
            .map(|snapshot| snapshot.available_unit_ids())
            .unwrap_or_default();

        let mut expanded = Vec::with_capacity(unit_ids.len());
        for unit_id in unit_ids {
            if unit_id == ALL_UNITS {
                expanded.extend(available.iter().cloned());
            } else {
                expanded.push(unit_id);
            }
        }

        expanded
    }

    fn get_input_mapping(&self) -> Vec<fn(&str) -> Option<GameEvent>> {
        vec![
            input_mapping::map_squad_input,
            input_mapping::map_unit_input,
            input_mapping::map_root_input
        ]
    }
}

pub fn run(config: ClientConfig) {
    let (tx, rx) = channel::<String>();

    thread::spawn(move || {
        let stdin = io::stdin();

        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                },

                Err(err) => {
                    warn!("cannot read input: {}", err);
                    break;
                }
            }
        }
    });

    let mut client = Client::new(WsTransport, config);
    client.run(&rx);
}

#[cfg(test)]
mod tests {
    use rustc_serialize::json::Json;

    use super::*;
    use crate::client::connection::ConnectionState;
    use crate::client::transport::mock::{MockHandle, MockTransport};

    const SNAPSHOT: &str = r#"{"availableUnits":{"a":{"id":"a","type":"soldier","ttl":10,"creationTime":0,"transitTtl":0,"maxTransitTtl":0,"hp":100,"maxHp":100},"b":{"id":"b","type":"tank","ttl":10,"creationTime":0,"transitTtl":0,"maxTransitTtl":0,"hp":300,"maxHp":300}},"groupsInTransit":{},"individualsInTransit":{},"score":0,"escapedCount":0,"breachCount":0,"lastEvents":[],"squads":{},"processingIndividualUnit":null,"processingGroup":null}"#;

    fn client() -> (MockHandle, Client<MockTransport>) {
        let handle = MockHandle::default();
        let config = ClientConfig {
            endpoint: Endpoint::from_origin("http://localhost:8080").unwrap(),
            events_shown: 3
        };

        let mut client = Client::new(handle.transport(), config);
        handle.accept();
        handle.deliver(SNAPSHOT);
        client.session.poll();

        (handle, client)
    }

    #[test]
    fn wildcard_expands_to_available_units() {
        let (handle, mut client) = client();

        assert_eq!(client.process_input("deploy-individuals *"), Flow::Continue);

        assert_eq!(
            Json::from_str(&handle.sent()[0]).unwrap(),
            Json::from_str(r#"{"action":"deploy-individuals","payload":{"unit_ids":["a","b"]}}"#).unwrap()
        );
    }

    #[test]
    fn invalid_input_sends_nothing() {
        let (handle, mut client) = client();

        client.process_input("deploy-squad");
        client.process_input("launch rockets");

        assert!(handle.sent().is_empty());
    }

    #[test]
    fn disconnect_and_reconnect_are_explicit() {
        let (handle, mut client) = client();

        client.process_input("disconnect");
        assert_eq!(client.session().state(), ConnectionState::Closed);
        assert!(client.session().snapshot().is_none());

        client.process_input("create-squad a");
        assert!(handle.sent().is_empty());

        client.process_input("reconnect");
        assert_eq!(client.session().state(), ConnectionState::Connecting);
        assert_eq!(handle.opened().len(), 2);
    }

    #[test]
    fn quit_stops_the_loop() {
        let (_handle, mut client) = client();

        assert_eq!(client.process_input("quit"), Flow::Quit);
    }

    #[test]
    fn signals_mark_the_view_dirty() {
        let (handle, mut client) = client();
        client.dirty.set(false);

        handle.hang_up();
        client.session.poll();

        assert!(client.dirty.get());
        assert!(client.render().contains("battlefield state unknown"));
    }
}
