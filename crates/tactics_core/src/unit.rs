//! Unit snapshots taking part in combat.

use serde::{Deserialize, Serialize};

use crate::data::UnitType;
use crate::ids::UnitId;
use crate::math::{fixed_serde, Fixed};

/// Outcome-derived status of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    /// Has not been through combat yet.
    #[default]
    Active,
    /// Survived its last combat.
    Damaged,
    /// Gained a level in its last combat.
    LeveledUp,
    /// Health reached zero. Terminal.
    Defeated,
}

/// A combat participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique record identifier.
    pub id: UnitId,
    /// Unit class used for advantage lookups.
    pub unit_type: UnitType,
    /// Remaining health. Zero means defeated.
    pub health: u32,
    /// Attack strength.
    #[serde(with = "fixed_serde")]
    pub attack: Fixed,
    /// Defense strength.
    #[serde(with = "fixed_serde")]
    pub defense: Fixed,
    /// Current level, starting at 1.
    pub level: u32,
    /// Experience towards the next level.
    pub experience: u32,
    /// Status after the last combat.
    #[serde(default)]
    pub status: UnitStatus,
}

impl Unit {
    /// Create a fresh level-1 unit.
    #[must_use]
    pub fn new(
        id: impl Into<UnitId>,
        unit_type: UnitType,
        health: u32,
        attack: Fixed,
        defense: Fixed,
    ) -> Self {
        Self {
            id: id.into(),
            unit_type,
            health,
            attack,
            defense,
            level: 1,
            experience: 0,
            status: UnitStatus::Active,
        }
    }

    /// Builder method to set the level.
    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }

    /// Builder method to set accumulated experience.
    #[must_use]
    pub fn with_experience(mut self, experience: u32) -> Self {
        self.experience = experience;
        self
    }

    /// Check if the unit has been defeated.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.status == UnitStatus::Defeated || self.health == 0
    }

    /// Check if this unit may initiate an attack.
    #[must_use]
    pub fn can_attack(&self) -> bool {
        self.unit_type != UnitType::Building && !self.is_defeated()
    }
}
