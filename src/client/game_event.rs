use crate::client::command::Command;
use crate::common::Id;

#[derive(Debug, PartialEq)]
pub enum GameEvent {
    CreateSquad(Vec<Id>),
    DeploySquad(Id),
    DeployIndividuals(Vec<Id>),
    Raw(Command),
    Status,
    Dump,
    Reconnect,
    Disconnect,
    Help,
    Quit,
    Invalid(String)
}
