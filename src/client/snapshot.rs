use std::collections::BTreeMap;

use crate::client::group::Group;
use crate::client::squad::Squad;
use crate::client::unit::Unit;
use crate::common::Id;

/// One complete, self-contained picture of the battlefield as pushed by the
/// server. Never merged: every inbound frame replaces the previous value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub available_units: BTreeMap<Id, Unit>,
    pub groups_in_transit: BTreeMap<Id, Group>,
    pub individuals_in_transit: BTreeMap<Id, Unit>,
    pub score: i64,
    pub escaped_count: u64,
    pub breach_count: u64,
    pub last_events: Vec<String>,
    pub squads: BTreeMap<Id, Squad>,
    pub processing_individual_unit: Option<Unit>,
    pub processing_group: Option<Group>
}

impl Snapshot {
    pub fn available_unit_ids(&self) -> Vec<Id> {
        self.available_units.keys().cloned().collect()
    }

    pub fn recent_events(&self, count: usize) -> &[String] {
        let skip = self.last_events.len().saturating_sub(count);
        &self.last_events[skip..]
    }

    pub fn units_in_transit(&self) -> usize {
        self.individuals_in_transit.len()
            + self.groups_in_transit.values().map(|group| group.units.len()).sum::<usize>()
    }
}
