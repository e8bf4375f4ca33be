use rustc_serialize::json::Json;

use crate::common::Id;

pub const CREATE_SQUAD: &str = "create-squad";
pub const DEPLOY_SQUAD: &str = "deploy-squad";
pub const DEPLOY_INDIVIDUALS: &str = "deploy-individuals";

/// Outbound intent. The server decides whether it is legal; nothing here
/// checks that the ids exist.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    CreateSquad {
        unit_ids: Vec<Id>
    },

    DeploySquad {
        squad_id: Id
    },

    DeployIndividuals {
        unit_ids: Vec<Id>
    },

    Other {
        action: String,
        payload: Json
    }
}

impl Command {
    pub fn action(&self) -> &str {
        match *self {
            Command::CreateSquad { .. } => CREATE_SQUAD,
            Command::DeploySquad { .. } => DEPLOY_SQUAD,
            Command::DeployIndividuals { .. } => DEPLOY_INDIVIDUALS,
            Command::Other { ref action, .. } => action
        }
    }
}
