//! Rules data structure combining all static rule tables.

use serde::{Deserialize, Serialize};

use super::combat_data::{CombatConstants, CombatTables};
use super::tech_data::{Era, TechData};

/// Complete, unvalidated rule-table definition.
///
/// Loaded from a RON file or built in code, then validated into a
/// [`RuleSet`](crate::rules::RuleSet).
///
/// # Example RON
///
/// ```ron
/// RulesData(
///     constants: CombatConstants(...),
///     combat: CombatTables(...),
///     technologies: [...],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RulesData {
    /// Combat and progression constants.
    #[serde(default)]
    pub constants: CombatConstants,

    /// Advantage matrix and situational modifier tables.
    pub combat: CombatTables,

    /// Every technology in the tree.
    #[serde(default)]
    pub technologies: Vec<TechData>,
}

impl RulesData {
    /// Find a technology by its ID.
    #[must_use]
    pub fn get_technology(&self, id: &str) -> Option<&TechData> {
        self.technologies.iter().find(|t| t.id.as_str() == id)
    }

    /// Get all technologies of a specific era.
    pub fn technologies_in_era(&self, era: Era) -> impl Iterator<Item = &TechData> {
        self.technologies.iter().filter(move |t| t.era == era)
    }
}
