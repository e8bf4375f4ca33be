use std::collections::BTreeMap;

use crate::client::unit::UnitType;
use crate::common::Id;

/// Deployment template: how many units of each type, not live units.
#[derive(Clone, Debug, PartialEq)]
pub struct Squad {
    id: Id,
    composition: BTreeMap<UnitType, u64>
}

impl Squad {
    pub fn new(id: Id, composition: BTreeMap<UnitType, u64>) -> Squad {
        Squad {
            id: id,
            composition: composition
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn composition(&self) -> &BTreeMap<UnitType, u64> {
        &self.composition
    }

    pub fn count(&self, unit_type: UnitType) -> u64 {
        self.composition.get(&unit_type).cloned().unwrap_or(0)
    }

    pub fn size(&self) -> u64 {
        self.composition.values().sum()
    }
}
