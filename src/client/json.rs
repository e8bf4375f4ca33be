use std::collections::BTreeMap;

use rustc_serialize::json::{Json, Object};

use crate::client::command::{self, Command};
use crate::client::group::Group;
use crate::client::snapshot::Snapshot;
use crate::client::squad::Squad;
use crate::client::unit::{Unit, UnitType};
use crate::common::utils::json;
use crate::common::{Id, ParseError, ParseResult};

type Result<T> = ParseResult<T>;

/// Decodes a whole snapshot frame. Any missing or mistyped field fails the
/// entire frame; nothing is partially decoded.
pub fn parse_snapshot(string: &str) -> Result<Snapshot> {
    let json = json::parse_json(string)?;
    let params = json::parse_json_as_object(&json)?;

    let processing_individual_unit = match json::parse_option_object_from_json_object(params, "processingIndividualUnit")? {
        Some(unit_json_object) => Some(parse_unit(unit_json_object)?),
        None => None
    };

    let processing_group = match json::parse_option_object_from_json_object(params, "processingGroup")? {
        Some(group_json_object) => Some(parse_group(group_json_object)?),
        None => None
    };

    let snapshot = Snapshot {
        available_units: parse_units(params, "availableUnits")?,
        groups_in_transit: parse_groups(params, "groupsInTransit")?,
        individuals_in_transit: parse_units(params, "individualsInTransit")?,
        score: json::parse_i64_from_json_object(params, "score")?,
        escaped_count: json::parse_u64_from_json_object(params, "escapedCount")?,
        breach_count: json::parse_u64_from_json_object(params, "breachCount")?,
        last_events: json::parse_string_array_from_json_object(params, "lastEvents")?,
        squads: parse_squads(params)?,
        processing_individual_unit: processing_individual_unit,
        processing_group: processing_group
    };

    Ok(snapshot)
}

pub fn format_command(command: &Command) -> String {
    let mut frame = Object::new();
    frame.insert("action".to_string(), Json::String(command.action().to_string()));
    frame.insert("payload".to_string(), command_payload(command));

    Json::Object(frame).to_string()
}

/// Inverse of `format_command`: known actions get their typed variant,
/// anything else is kept verbatim as `Command::Other`.
pub fn parse_command(string: &str) -> Result<Command> {
    let json = json::parse_json(string)?;
    let params = json::parse_json_as_object(&json)?;

    let action = json::parse_string_from_json_object(params, "action")?;
    let payload = params.get("payload").cloned().unwrap_or(Json::Null);

    let command = match action {
        command::CREATE_SQUAD => {
            let data = json::parse_json_as_object(&payload)?;

            Command::CreateSquad {
                unit_ids: json::parse_string_array_from_json_object(data, "unit_ids")?
            }
        },

        command::DEPLOY_SQUAD => {
            let data = json::parse_json_as_object(&payload)?;

            Command::DeploySquad {
                squad_id: json::parse_string_from_json_object(data, "squad_id")?.to_string()
            }
        },

        command::DEPLOY_INDIVIDUALS => {
            let data = json::parse_json_as_object(&payload)?;

            Command::DeployIndividuals {
                unit_ids: json::parse_string_array_from_json_object(data, "unit_ids")?
            }
        },

        _ => Command::Other {
            action: action.to_string(),
            payload: payload
        }
    };

    Ok(command)
}

pub fn format_snapshot(snapshot: &Snapshot) -> String {
    snapshot_to_json(snapshot).to_string()
}

fn command_payload(command: &Command) -> Json {
    let mut data = Object::new();

    match *command {
        Command::CreateSquad { ref unit_ids } | Command::DeployIndividuals { ref unit_ids } => {
            data.insert("unit_ids".to_string(), string_array(unit_ids));
        },

        Command::DeploySquad { ref squad_id } => {
            data.insert("squad_id".to_string(), Json::String(squad_id.clone()));
        },

        Command::Other { ref payload, .. } => return payload.clone()
    }

    Json::Object(data)
}

fn parse_units(params: &Object, property: &str) -> Result<BTreeMap<Id, Unit>> {
    let units_json_object = json::parse_object_from_json_object(params, property)?;

    let mut units = BTreeMap::new();
    for (id, unit_json) in units_json_object.iter() {
        let unit = parse_unit(json::parse_json_as_object(unit_json)?)?;
        units.insert(id.clone(), unit);
    }

    Ok(units)
}

fn parse_groups(params: &Object, property: &str) -> Result<BTreeMap<Id, Group>> {
    let groups_json_object = json::parse_object_from_json_object(params, property)?;

    let mut groups = BTreeMap::new();
    for (id, group_json) in groups_json_object.iter() {
        let group = parse_group(json::parse_json_as_object(group_json)?)?;
        groups.insert(id.clone(), group);
    }

    Ok(groups)
}

fn parse_squads(params: &Object) -> Result<BTreeMap<Id, Squad>> {
    let squads_json_object = json::parse_object_from_json_object(params, "squads")?;

    let mut squads = BTreeMap::new();
    for (id, squad_json) in squads_json_object.iter() {
        let squad_json_object = json::parse_json_as_object(squad_json)?;

        let squad_id = json::parse_string_from_json_object(squad_json_object, "id")?;
        let composition_json_object = json::parse_object_from_json_object(squad_json_object, "composition")?;

        let mut composition = BTreeMap::new();
        for (name, count_json) in composition_json_object.iter() {
            let unit_type = parse_unit_type(name)?;
            let count = json::parse_u64(count_json, "composition")?;
            composition.insert(unit_type, count);
        }

        squads.insert(id.clone(), Squad::new(squad_id.to_string(), composition));
    }

    Ok(squads)
}

fn parse_unit(unit_json_object: &Object) -> Result<Unit> {
    let unit_type = parse_unit_type(json::parse_string_from_json_object(unit_json_object, "type")?)?;

    let unit = Unit {
        id: json::parse_string_from_json_object(unit_json_object, "id")?.to_string(),
        unit_type: unit_type,
        ttl: json::parse_f64_from_json_object(unit_json_object, "ttl")?,
        creation_time: json::parse_i64_from_json_object(unit_json_object, "creationTime")?,
        transit_ttl: json::parse_f64_from_json_object(unit_json_object, "transitTtl")?,
        max_transit_ttl: json::parse_f64_from_json_object(unit_json_object, "maxTransitTtl")?,
        hp: json::parse_i64_from_json_object(unit_json_object, "hp")?,
        max_hp: json::parse_i64_from_json_object(unit_json_object, "maxHp")?
    };

    Ok(unit)
}

fn parse_group(group_json_object: &Object) -> Result<Group> {
    let units_json_array = json::parse_array_from_json_object(group_json_object, "units")?;

    let mut units = Vec::with_capacity(units_json_array.len());
    for unit_json in units_json_array.iter() {
        units.push(parse_unit(json::parse_json_as_object(unit_json)?)?);
    }

    let group = Group {
        id: json::parse_string_from_json_object(group_json_object, "id")?.to_string(),
        units: units,
        transit_ttl: json::parse_f64_from_json_object(group_json_object, "transitTtl")?,
        max_transit_ttl: json::parse_f64_from_json_object(group_json_object, "maxTransitTtl")?
    };

    Ok(group)
}

fn parse_unit_type(name: &str) -> Result<UnitType> {
    UnitType::from_name(name)
        .ok_or_else(|| ParseError::UnknownUnitType(name.to_string()))
}

fn snapshot_to_json(snapshot: &Snapshot) -> Json {
    let mut params = Object::new();

    params.insert("availableUnits".to_string(), units_to_json(&snapshot.available_units));
    params.insert("groupsInTransit".to_string(), Json::Object(
        snapshot.groups_in_transit.iter().map(|(id, group)| (id.clone(), group_to_json(group))).collect()
    ));
    params.insert("individualsInTransit".to_string(), units_to_json(&snapshot.individuals_in_transit));
    params.insert("score".to_string(), Json::I64(snapshot.score));
    params.insert("escapedCount".to_string(), Json::U64(snapshot.escaped_count));
    params.insert("breachCount".to_string(), Json::U64(snapshot.breach_count));
    params.insert("lastEvents".to_string(), string_array(&snapshot.last_events));
    params.insert("squads".to_string(), Json::Object(
        snapshot.squads.iter().map(|(id, squad)| (id.clone(), squad_to_json(squad))).collect()
    ));
    params.insert(
        "processingIndividualUnit".to_string(),
        snapshot.processing_individual_unit.as_ref().map_or(Json::Null, unit_to_json)
    );
    params.insert(
        "processingGroup".to_string(),
        snapshot.processing_group.as_ref().map_or(Json::Null, group_to_json)
    );

    Json::Object(params)
}

fn units_to_json(units: &BTreeMap<Id, Unit>) -> Json {
    Json::Object(units.iter().map(|(id, unit)| (id.clone(), unit_to_json(unit))).collect())
}

fn unit_to_json(unit: &Unit) -> Json {
    let mut params = Object::new();
    params.insert("id".to_string(), Json::String(unit.id.clone()));
    params.insert("type".to_string(), Json::String(unit.unit_type.name().to_string()));
    params.insert("ttl".to_string(), Json::F64(unit.ttl));
    params.insert("creationTime".to_string(), Json::I64(unit.creation_time));
    params.insert("transitTtl".to_string(), Json::F64(unit.transit_ttl));
    params.insert("maxTransitTtl".to_string(), Json::F64(unit.max_transit_ttl));
    params.insert("hp".to_string(), Json::I64(unit.hp));
    params.insert("maxHp".to_string(), Json::I64(unit.max_hp));

    Json::Object(params)
}

fn group_to_json(group: &Group) -> Json {
    let mut params = Object::new();
    params.insert("id".to_string(), Json::String(group.id.clone()));
    params.insert("units".to_string(), Json::Array(group.units.iter().map(unit_to_json).collect()));
    params.insert("transitTtl".to_string(), Json::F64(group.transit_ttl));
    params.insert("maxTransitTtl".to_string(), Json::F64(group.max_transit_ttl));

    Json::Object(params)
}

fn squad_to_json(squad: &Squad) -> Json {
    let composition = squad.composition()
        .iter()
        .map(|(unit_type, count)| (unit_type.name().to_string(), Json::U64(*count)))
        .collect();

    let mut params = Object::new();
    params.insert("id".to_string(), Json::String(squad.id().to_string()));
    params.insert("composition".to_string(), Json::Object(composition));

    Json::Object(params)
}

fn string_array(strings: &[String]) -> Json {
    Json::Array(strings.iter().map(|string| Json::String(string.clone())).collect())
}
