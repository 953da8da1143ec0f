//! Tech tree data structures for data-driven technology definitions.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::economy::{Cost, Resource};
use crate::ids::TechId;
use crate::math::{fixed_map_serde, Fixed};

/// Ordered stage of technological advancement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Era {
    /// Starting era.
    #[default]
    Ancient,
    /// Classical antiquity.
    Classical,
    /// Middle ages.
    Medieval,
    /// Renaissance.
    Renaissance,
    /// Industrial revolution.
    Industrial,
    /// Modern era.
    Modern,
    /// Information age.
    Information,
    /// Final era.
    Future,
}

impl Era {
    /// Every era, ancient first.
    pub const ALL: [Self; 8] = [
        Self::Ancient,
        Self::Classical,
        Self::Medieval,
        Self::Renaissance,
        Self::Industrial,
        Self::Modern,
        Self::Information,
        Self::Future,
    ];

    /// Position of this era in the progression, starting at 0.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Snake-case name used in rule files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ancient => "ancient",
            Self::Classical => "classical",
            Self::Medieval => "medieval",
            Self::Renaissance => "renaissance",
            Self::Industrial => "industrial",
            Self::Modern => "modern",
            Self::Information => "information",
            Self::Future => "future",
        }
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Branch of the tech tree, used for UI grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechCategory {
    /// Units and combat bonuses.
    Military,
    /// Resource output.
    Economy,
    /// Buildings and logistics.
    Infrastructure,
    /// Research speed.
    Science,
    /// Culture and civics.
    Culture,
}

/// What kind of content an unlock makes available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockKind {
    /// A trainable unit type.
    Unit,
    /// A constructible building type.
    Building,
}

/// Substrings that mark an identifier as a building under [`UnlockKind::infer_from_id`].
pub const BUILDING_ID_MARKERS: [&str; 6] =
    ["factory", "plant", "building", "walls", "tower", "aqueduct"];

impl UnlockKind {
    /// Classify an unlock identifier by name alone.
    ///
    /// Legacy rule files had no explicit kind and used this substring test.
    /// It is only used to lint rule sets; resolution always trusts the
    /// explicit kind.
    #[must_use]
    pub fn infer_from_id(id: &str) -> Self {
        if BUILDING_ID_MARKERS.iter().any(|marker| id.contains(marker)) {
            Self::Building
        } else {
            Self::Unit
        }
    }
}

/// A unit or building made available by completing a technology.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unlock {
    /// Identifier of the unit or building type.
    pub id: String,
    /// Whether `id` names a unit or a building.
    pub kind: UnlockKind,
}

impl Unlock {
    /// Unlock a unit type.
    #[must_use]
    pub fn unit(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: UnlockKind::Unit,
        }
    }

    /// Unlock a building type.
    #[must_use]
    pub fn building(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: UnlockKind::Building,
        }
    }
}

/// Data-driven technology definition.
///
/// # Example RON
///
/// ```ron
/// TechData(
///     id: "bronze_working",
///     name: "Bronze Working",
///     era: ancient,
///     category: military,
///     cost: { science: 20, production: 10 },
///     research_time: 2,
///     prerequisites: ["mining"],
///     effects: { "attack_bonus": 0.05 },
///     unlocks: [(id: "spearman", kind: unit)],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechData {
    /// Unique string identifier for this technology.
    pub id: TechId,

    /// Display name.
    pub name: String,

    /// Era this technology belongs to.
    pub era: Era,

    /// Tech tree branch.
    pub category: TechCategory,

    /// Resources deducted when research starts.
    #[serde(default)]
    pub cost: Cost,

    /// Research points required to complete.
    pub research_time: u32,

    /// Technology IDs that must be researched first.
    #[serde(default)]
    pub prerequisites: Vec<TechId>,

    /// Additive bonuses granted on completion.
    #[serde(default, with = "fixed_map_serde")]
    pub effects: BTreeMap<String, Fixed>,

    /// Units and buildings made available on completion.
    #[serde(default)]
    pub unlocks: Vec<Unlock>,
}

impl TechData {
    /// Create a technology with no cost, prerequisites, effects or unlocks.
    #[must_use]
    pub fn new(
        id: impl Into<TechId>,
        name: impl Into<String>,
        era: Era,
        category: TechCategory,
        research_time: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            era,
            category,
            cost: Cost::new(),
            research_time,
            prerequisites: Vec::new(),
            effects: BTreeMap::new(),
            unlocks: Vec::new(),
        }
    }

    /// Builder method to add a cost entry.
    #[must_use]
    pub fn with_cost(mut self, resource: Resource, amount: u32) -> Self {
        self.cost.insert(resource, amount);
        self
    }

    /// Builder method to set prerequisites.
    #[must_use]
    pub fn with_prerequisites(mut self, prerequisites: &[&str]) -> Self {
        self.prerequisites = prerequisites.iter().map(|&id| TechId::from(id)).collect();
        self
    }

    /// Builder method to add an effect.
    #[must_use]
    pub fn with_effect(mut self, effect: &str, value: Fixed) -> Self {
        self.effects.insert(effect.to_string(), value);
        self
    }

    /// Builder method to add an unlock.
    #[must_use]
    pub fn with_unlock(mut self, unlock: Unlock) -> Self {
        self.unlocks.push(unlock);
        self
    }

    /// Check if this technology has a specific prerequisite.
    #[must_use]
    pub fn requires(&self, tech_id: &str) -> bool {
        self.prerequisites.iter().any(|t| t.as_str() == tech_id)
    }

    /// Check if this technology can be researched from nothing.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.prerequisites.is_empty()
    }

    /// Value of a named effect, if this technology grants it.
    #[must_use]
    pub fn effect(&self, name: &str) -> Option<Fixed> {
        self.effects.get(name).copied()
    }

    /// Unlock entries whose explicit kind disagrees with the name heuristic.
    pub fn misclassified_unlocks(&self) -> impl Iterator<Item = &Unlock> {
        self.unlocks
            .iter()
            .filter(|unlock| UnlockKind::infer_from_id(&unlock.id) != unlock.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ratio;

    fn create_test_tech() -> TechData {
        TechData::new(
            "bronze_working",
            "Bronze Working",
            Era::Ancient,
            TechCategory::Military,
            2,
        )
        .with_cost(Resource::Science, 20)
        .with_prerequisites(&["mining"])
        .with_effect("attack_bonus", ratio(0.05))
        .with_unlock(Unlock::unit("spearman"))
    }

    #[test]
    fn test_requires() {
        let tech = create_test_tech();
        assert!(tech.requires("mining"));
        assert!(!tech.requires("writing"));
        assert!(!tech.is_root());
    }

    #[test]
    fn test_effect_lookup() {
        let tech = create_test_tech();
        assert_eq!(tech.effect("attack_bonus"), Some(ratio(0.05)));
        assert_eq!(tech.effect("defense_bonus"), None);
    }

    #[test]
    fn test_era_ordering() {
        assert!(Era::Ancient < Era::Classical);
        assert!(Era::Information < Era::Future);
        assert_eq!(Era::Future.index(), 7);
        assert_eq!(Era::default(), Era::Ancient);
    }

    #[test]
    fn test_infer_kind_from_id() {
        assert_eq!(UnlockKind::infer_from_id("city_walls"), UnlockKind::Building);
        assert_eq!(UnlockKind::infer_from_id("power_plant"), UnlockKind::Building);
        assert_eq!(UnlockKind::infer_from_id("aqueduct"), UnlockKind::Building);
        assert_eq!(UnlockKind::infer_from_id("swordsman"), UnlockKind::Unit);
        // The heuristic cannot tell a granary is a building.
        assert_eq!(UnlockKind::infer_from_id("granary"), UnlockKind::Unit);
    }

    #[test]
    fn test_misclassified_unlocks() {
        let tech = create_test_tech()
            .with_unlock(Unlock::building("granary"))
            .with_unlock(Unlock::building("watch_tower"));
        let flagged: Vec<_> = tech.misclassified_unlocks().map(|u| u.id.as_str()).collect();
        assert_eq!(flagged, vec!["granary"]);
    }

    #[test]
    fn test_parse_ron_definition() {
        let text = r#"(
            id: "bronze_working",
            name: "Bronze Working",
            era: ancient,
            category: military,
            cost: { science: 20 },
            research_time: 2,
            prerequisites: ["mining"],
            effects: { "attack_bonus": 0.05 },
            unlocks: [(id: "spearman", kind: unit)],
        )"#;
        let tech: TechData = ron::from_str(text).unwrap();
        assert_eq!(tech, create_test_tech());
    }
}
