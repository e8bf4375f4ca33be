use crate::client::command;
use crate::client::game_event::GameEvent;
use crate::client::json;

pub const HELP: &str = "\
commands:
  create-squad <unit-id>...        group available units into a squad (* = all)
  deploy-squad <squad-id>          send a squad into transit
  deploy-individuals <unit-id>...  send units into transit one by one (* = all)
  send <json>                      forward a raw {\"action\":..,\"payload\":..} command
  status                           redraw the battlefield
  dump                             print the current snapshot as json
  reconnect                        open a new connection after a drop
  disconnect                       close the connection
  help                             show this text
  quit                             leave";

pub fn map_squad_input(line: &str) -> Option<GameEvent> {
    let (word, args) = split(line);

    match word {
        command::CREATE_SQUAD => Some(with_ids(args, GameEvent::CreateSquad, "create-squad needs at least one unit id")),

        command::DEPLOY_SQUAD => match args.as_slice() {
            [squad_id] => Some(GameEvent::DeploySquad(squad_id.to_string())),
            _ => Some(GameEvent::Invalid("deploy-squad needs exactly one squad id".to_string()))
        },

        _ => None
    }
}

pub fn map_unit_input(line: &str) -> Option<GameEvent> {
    let (word, args) = split(line);

    match word {
        command::DEPLOY_INDIVIDUALS => Some(with_ids(args, GameEvent::DeployIndividuals, "deploy-individuals needs at least one unit id")),

        _ => None
    }
}

pub fn map_root_input(line: &str) -> Option<GameEvent> {
    let line = line.trim();
    let (word, args) = split(line);

    match word {
        "send" => {
            let raw = line["send".len()..].trim();

            match json::parse_command(raw) {
                Ok(command) => Some(GameEvent::Raw(command)),
                Err(err) => Some(GameEvent::Invalid(format!("send: {}", err)))
            }
        },

        "status" if args.is_empty() => Some(GameEvent::Status),
        "dump" if args.is_empty() => Some(GameEvent::Dump),
        "reconnect" if args.is_empty() => Some(GameEvent::Reconnect),
        "disconnect" if args.is_empty() => Some(GameEvent::Disconnect),
        "help" | "?" => Some(GameEvent::Help),
        "quit" | "exit" => Some(GameEvent::Quit),

        "" => None,

        other => Some(GameEvent::Invalid(format!("unknown command `{}`, try `help`", other)))
    }
}

fn split(line: &str) -> (&str, Vec<&str>) {
    let mut words = line.split_whitespace();
    let word = words.next().unwrap_or("");

    (word, words.collect())
}

fn with_ids<F>(args: Vec<&str>, event: F, complaint: &str) -> GameEvent
    where F: FnOnce(Vec<String>) -> GameEvent
{
    if args.is_empty() {
        return GameEvent::Invalid(complaint.to_string());
    }

    event(args.into_iter().map(|id| id.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::command::Command;

    fn map(line: &str) -> Option<GameEvent> {
        let mappings: [fn(&str) -> Option<GameEvent>; 3] = [map_squad_input, map_unit_input, map_root_input];
        mappings.iter().filter_map(|mapping| mapping(line)).next()
    }

    #[test]
    fn maps_squad_commands() {
        assert_eq!(
            map("create-squad u1 u2"),
            Some(GameEvent::CreateSquad(vec!["u1".to_string(), "u2".to_string()]))
        );
        assert_eq!(map("  deploy-squad   s1 "), Some(GameEvent::DeploySquad("s1".to_string())));
        assert!(matches!(map("deploy-squad"), Some(GameEvent::Invalid(_))));
        assert!(matches!(map("deploy-squad s1 s2"), Some(GameEvent::Invalid(_))));
        assert!(matches!(map("create-squad"), Some(GameEvent::Invalid(_))));
    }

    #[test]
    fn maps_individual_deployment() {
        assert_eq!(map("deploy-individuals *"), Some(GameEvent::DeployIndividuals(vec!["*".to_string()])));
    }

    #[test]
    fn maps_raw_json_commands() {
        let event = map(r#"send {"action":"pause","payload":null}"#);

        match event {
            Some(GameEvent::Raw(Command::Other { action, .. })) => assert_eq!(action, "pause"),
            other => panic!("unexpected {:?}", other)
        }

        assert!(matches!(map("send {oops"), Some(GameEvent::Invalid(_))));
    }

    #[test]
    fn maps_session_controls() {
        assert_eq!(map("status"), Some(GameEvent::Status));
        assert_eq!(map("reconnect"), Some(GameEvent::Reconnect));
        assert_eq!(map("disconnect"), Some(GameEvent::Disconnect));
        assert_eq!(map("exit"), Some(GameEvent::Quit));
        assert_eq!(map("   "), None);
        assert!(matches!(map("fire"), Some(GameEvent::Invalid(_))));
    }
}
