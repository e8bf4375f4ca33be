use crate::client::unit::Unit;
use crate::common::Id;

/// Units travelling together. The group's transit countdown is tracked
/// separately from the members' own countdowns.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    pub id: Id,
    pub units: Vec<Unit>,
    pub transit_ttl: f64,
    pub max_transit_ttl: f64
}

impl Group {
    /// Fraction of the transit already covered, in `0.0..=1.0`.
    pub fn transit_progress(&self) -> f64 {
        transit_progress(self.transit_ttl, self.max_transit_ttl)
    }
}

pub fn transit_progress(transit_ttl: f64, max_transit_ttl: f64) -> f64 {
    if max_transit_ttl <= 0.0 {
        return 0.0;
    }

    (1.0 - transit_ttl / max_transit_ttl).max(0.0).min(1.0)
}
