use std::fmt;

use crate::common::Id;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnitType {
    Soldier,
    Tank,
    Helicopter
}

impl UnitType {
    pub const ALL: [UnitType; 3] = [UnitType::Soldier, UnitType::Tank, UnitType::Helicopter];

    pub fn from_name(name: &str) -> Option<UnitType> {
        UnitType::ALL.iter().cloned().find(|unit_type| unit_type.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match *self {
            UnitType::Soldier => "soldier",
            UnitType::Tank => "tank",
            UnitType::Helicopter => "helicopter"
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    pub id: Id,
    pub unit_type: UnitType,
    pub ttl: f64,
    pub creation_time: i64,
    pub transit_ttl: f64,
    pub max_transit_ttl: f64,
    pub hp: i64,
    pub max_hp: i64
}

impl Unit {
    /// Seconds since the server created the unit, clamped at zero for skewed clocks.
    pub fn age(&self, now: i64) -> i64 {
        now.saturating_sub(self.creation_time).max(0)
    }
}
