//! Validated rule set shared by combat and research.

use crate::data::{standard_rules, CombatConstants, CombatTables, RulesData};
use crate::error::{GameError, Result};
use crate::research::ResearchScheduler;
use crate::tech_graph::TechGraph;

/// Immutable bundle of every static rule table.
///
/// Built once from [`RulesData`] and passed by reference to combat and
/// research operations. Tests substitute their own tables by building a
/// different rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    constants: CombatConstants,
    combat: CombatTables,
    tech_graph: TechGraph,
}

impl RuleSet {
    /// Validate raw rule data.
    ///
    /// # Errors
    ///
    /// - [`GameError::InvalidRules`] for bad constants or modifiers.
    /// - Any tech graph validation error.
    pub fn from_data(data: RulesData) -> Result<Self> {
        data.constants.validate()?;
        data.combat.validate()?;
        let tech_graph = TechGraph::new(data.technologies)?;

        Ok(Self {
            constants: data.constants,
            combat: data.combat,
            tech_graph,
        })
    }

    /// The reference rule set.
    ///
    /// # Errors
    ///
    /// Fails only if the built-in tables are inconsistent.
    pub fn standard() -> Result<Self> {
        Self::from_data(standard_rules())
    }

    /// Parse and validate a RON rule file.
    ///
    /// `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DataParseError`] if the text is not valid RON
    /// for [`RulesData`], or any validation error.
    pub fn from_ron_str(text: &str, path: &str) -> Result<Self> {
        let data: RulesData = ron::from_str(text).map_err(|e| GameError::DataParseError {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_data(data)
    }

    /// Convert back into raw rule data.
    #[must_use]
    pub fn to_data(&self) -> RulesData {
        RulesData {
            constants: self.constants.clone(),
            combat: self.combat.clone(),
            technologies: self.tech_graph.iter().cloned().collect(),
        }
    }

    /// Render as pretty-printed RON.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Serialization`] if encoding fails.
    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(&self.to_data(), ron::ser::PrettyConfig::default())
            .map_err(|e| GameError::Serialization(e.to_string()))
    }

    /// Combat and progression constants.
    #[must_use]
    pub const fn constants(&self) -> &CombatConstants {
        &self.constants
    }

    /// Advantage matrix and modifier tables.
    #[must_use]
    pub const fn combat(&self) -> &CombatTables {
        &self.combat
    }

    /// Technology prerequisite graph.
    #[must_use]
    pub const fn tech_graph(&self) -> &TechGraph {
        &self.tech_graph
    }

    /// Research scheduler over this rule set's graph.
    #[must_use]
    pub const fn scheduler(&self) -> ResearchScheduler<'_> {
        ResearchScheduler::new(&self.tech_graph)
    }

    /// Non-fatal problems worth reporting to a rule author.
    ///
    /// Lists modifier keys with no table row (combat using them fails with
    /// [`GameError::InvalidModifierKey`]) and unlocks whose explicit kind
    /// disagrees with the legacy name-based classification.
    #[must_use]
    pub fn lint(&self) -> Vec<String> {
        let mut warnings: Vec<String> = self
            .combat
            .missing_rows()
            .into_iter()
            .map(|row| format!("missing {row} row"))
            .collect();

        for tech in self.tech_graph.iter() {
            for unlock in tech.misclassified_unlocks() {
                warnings.push(format!(
                    "{}: unlock '{}' is marked {:?} but its name suggests otherwise",
                    tech.id, unlock.id, unlock.kind
                ));
            }
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Era, Modifier, ModifierTable, TechCategory, TechData, Terrain, Unlock};
    use crate::math::ratio;

    #[test]
    fn test_standard_rules_are_clean() {
        let rules = RuleSet::standard().unwrap();
        assert_eq!(rules.tech_graph().len(), 24);
        assert!(rules.lint().is_empty(), "{:?}", rules.lint());
    }

    #[test]
    fn test_ron_round_trip() {
        let rules = RuleSet::standard().unwrap();
        let text = rules.to_ron_string().unwrap();
        let parsed = RuleSet::from_ron_str(&text, "standard.ron").unwrap();
        assert_eq!(parsed, rules);
    }

    #[test]
    fn test_parse_error_names_path() {
        let err = RuleSet::from_ron_str("(combat: nonsense", "broken.ron").unwrap_err();
        assert!(matches!(err, GameError::DataParseError { ref path, .. } if path == "broken.ron"));
    }

    #[test]
    fn test_cycle_rejected_on_load() {
        let mut data = standard_rules();
        data.technologies = vec![
            TechData::new("a", "A", Era::Ancient, TechCategory::Science, 1)
                .with_prerequisites(&["b"]),
            TechData::new("b", "B", Era::Ancient, TechCategory::Science, 1)
                .with_prerequisites(&["a"]),
        ];
        assert!(matches!(
            RuleSet::from_data(data),
            Err(GameError::CyclicPrerequisite { .. })
        ));
    }

    #[test]
    fn test_invalid_constants_rejected() {
        let mut data = standard_rules();
        data.constants.critical_hit_chance = ratio(1.5);
        assert!(matches!(
            RuleSet::from_data(data),
            Err(GameError::InvalidRules(_))
        ));
    }

    #[test]
    fn test_lint_reports_gaps() {
        let mut data = standard_rules();
        data.combat.terrain = ModifierTable::new().with(Terrain::Plains, Modifier::NEUTRAL);
        data.technologies[0] = data.technologies[0]
            .clone()
            .with_unlock(Unlock::unit("barracks_building"));

        let rules = RuleSet::from_data(data).unwrap();
        let warnings = rules.lint();
        assert!(warnings.iter().any(|w| w.contains("terrain 'swamp'")));
        assert!(warnings.iter().any(|w| w.contains("barracks_building")));
    }
}
