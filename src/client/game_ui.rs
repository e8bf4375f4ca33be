use std::fmt::Write;

use crate::client::connection::ConnectionState;
use crate::client::group::{transit_progress, Group};
use crate::client::snapshot::Snapshot;
use crate::client::unit::{Unit, UnitType};
use crate::common::utils::join;

const PROGRESS_WIDTH: usize = 10;

pub struct View<'a> {
    pub state: ConnectionState,
    pub endpoint: &'a str,
    pub snapshot: Option<&'a Snapshot>,
    pub now: i64,
    pub events_shown: usize
}

pub fn render(view: &View) -> String {
    let mut out = String::new();

    let indicator = if view.state == ConnectionState::Open { "ONLINE" } else { "OFFLINE" };
    let _ = writeln!(out, "[{}] {} ({})", indicator, view.endpoint, view.state);

    let snapshot = match view.snapshot {
        Some(snapshot) => snapshot,
        None => {
            out.push_str("battlefield state unknown\n");
            return out;
        }
    };

    let _ = writeln!(
        out,
        "score {}  escaped {}  breached {}",
        snapshot.score, snapshot.escaped_count, snapshot.breach_count
    );

    let _ = writeln!(out, "available units ({}):", snapshot.available_units.len());
    for unit in snapshot.available_units.values() {
        let _ = writeln!(out, "  {}", render_unit(unit, view.now));
    }

    let _ = writeln!(out, "squads ({}):", snapshot.squads.len());
    for squad in snapshot.squads.values() {
        let composition: Vec<String> = UnitType::ALL.iter()
            .map(|&unit_type| (unit_type, squad.count(unit_type)))
            .filter(|&(_, count)| count > 0)
            .map(|(unit_type, count)| format!("{}x{}", count, unit_type))
            .collect();

        let _ = writeln!(out, "  {}  {} ({} units)", squad.id(), join(&composition, " "), squad.size());
    }

    let _ = writeln!(out, "in transit ({} units):", snapshot.units_in_transit());
    for group in snapshot.groups_in_transit.values() {
        let _ = writeln!(out, "  {}", render_group(group));
    }
    for unit in snapshot.individuals_in_transit.values() {
        let _ = writeln!(
            out,
            "  unit {} {} {}",
            unit.id,
            unit.unit_type,
            progress_bar(transit_progress(unit.transit_ttl, unit.max_transit_ttl))
        );
    }

    if let Some(ref unit) = snapshot.processing_individual_unit {
        let _ = writeln!(out, "processing unit: {}", render_unit(unit, view.now));
    }
    if let Some(ref group) = snapshot.processing_group {
        let _ = writeln!(out, "processing group: {}", render_group(group));
    }

    let events = snapshot.recent_events(view.events_shown);
    if !events.is_empty() {
        out.push_str("recent events:\n");
        for event in events {
            let _ = writeln!(out, "  {}", event);
        }
    }

    out
}

fn render_unit(unit: &Unit, now: i64) -> String {
    format!(
        "{} {} hp {}/{} ttl {:.1}s age {}s",
        unit.id, unit.unit_type, unit.hp, unit.max_hp, unit.ttl, unit.age(now)
    )
}

fn render_group(group: &Group) -> String {
    let ids: Vec<&str> = group.units.iter().map(|unit| unit.id.as_str()).collect();

    format!("group {} [{}] {}", group.id, join(&ids, ","), progress_bar(group.transit_progress()))
}

fn progress_bar(progress: f64) -> String {
    let filled = (progress * PROGRESS_WIDTH as f64).round() as usize;
    let filled = filled.min(PROGRESS_WIDTH);

    format!("[{}{}]", "#".repeat(filled), ".".repeat(PROGRESS_WIDTH - filled))
}
