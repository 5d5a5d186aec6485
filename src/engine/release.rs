use crate::constants::{
    ELEVATED_AGGRESSION_PELLETS, FLANKER_RELEASE_PELLETS, SHY_RELEASE_PELLETS,
};
use crate::types::GhostRole;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateChange {
    Released(GhostRole),
    ElevatedAggression,
}

#[derive(Clone, Debug, Default)]
pub struct ReleaseGates {
    pellets_eaten: u32,
    flanker_released: bool,
    shy_released: bool,
    elevated: bool,
}

impl ReleaseGates {
    pub fn pellets_eaten(&self) -> u32 {
        self.pellets_eaten
    }

    pub fn record_pellet(&mut self) {
        self.pellets_eaten = self.pellets_eaten.saturating_add(1);
    }

    pub fn is_released(&self, role: GhostRole) -> bool {
        match role {
            GhostRole::Chaser | GhostRole::Ambusher => true,
            GhostRole::Flanker => self.flanker_released,
            GhostRole::Shy => self.shy_released,
        }
    }

    pub fn elevated_aggression(&self) -> bool {
        self.elevated
    }

    pub fn update(&mut self) -> Vec<GateChange> {
        let mut changes = Vec::new();
        if !self.flanker_released && self.pellets_eaten >= FLANKER_RELEASE_PELLETS {
            self.flanker_released = true;
            changes.push(GateChange::Released(GhostRole::Flanker));
        }
        if !self.shy_released && self.pellets_eaten >= SHY_RELEASE_PELLETS {
            self.shy_released = true;
            changes.push(GateChange::Released(GhostRole::Shy));
        }
        if !self.elevated && self.pellets_eaten >= ELEVATED_AGGRESSION_PELLETS {
            self.elevated = true;
            changes.push(GateChange::ElevatedAggression);
        }
        changes
    }
}
