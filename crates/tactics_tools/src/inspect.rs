//! Tech tree inspection.

use serde::Serialize;
use tactics_core::data::Era;
use tactics_core::ids::TechId;
use tactics_core::rules::RuleSet;

use crate::error::Result;

/// One line of a tech listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechSummary {
    /// Technology id.
    pub id: TechId,
    /// Display name.
    pub name: String,
    /// Era of the technology.
    pub era: Era,
    /// Research points required.
    pub research_time: u32,
}

fn summarize(rules: &RuleSet, ids: &[TechId]) -> Result<Vec<TechSummary>> {
    ids.iter()
        .map(|id| {
            let tech = rules.tech_graph().require(id)?;
            Ok(TechSummary {
                id: tech.id.clone(),
                name: tech.name.clone(),
                era: tech.era,
                research_time: tech.research_time,
            })
        })
        .collect()
}

/// Technologies researchable after `researched`.
///
/// # Errors
///
/// Returns an error if `researched` names an undefined technology.
pub fn available(rules: &RuleSet, researched: &[TechId]) -> Result<Vec<TechSummary>> {
    for id in researched {
        rules.tech_graph().require(id)?;
    }
    let ids: Vec<TechId> = rules
        .tech_graph()
        .available_technologies(researched)
        .into_iter()
        .map(|t| t.id.clone())
        .collect();
    summarize(rules, &ids)
}

/// Prerequisite chain to `target`.
///
/// With `full` set, every prerequisite in research order; otherwise the
/// shortest single chain.
///
/// # Errors
///
/// Returns an error if `target` is undefined.
pub fn path(rules: &RuleSet, target: &TechId, full: bool) -> Result<Vec<TechSummary>> {
    let graph = rules.tech_graph();
    let ids = if full {
        graph.research_order(target)?
    } else {
        graph.technology_path(target)?
    };
    summarize(rules, &ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use tactics_core::error::GameError;

    fn ids(list: &[&str]) -> Vec<TechId> {
        list.iter().map(|&id| TechId::from(id)).collect()
    }

    #[test]
    fn test_available_from_scratch() {
        let rules = RuleSet::standard().unwrap();
        let listing = available(&rules, &[]).unwrap();
        let names: Vec<_> = listing.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(names, vec!["agriculture", "mining", "writing"]);
    }

    #[test]
    fn test_available_rejects_unknown_ids() {
        let rules = RuleSet::standard().unwrap();
        let err = available(&rules, &ids(&["alchemy"])).unwrap_err();
        assert!(matches!(err, ToolError::Game(GameError::UnknownTechnology(_))));
    }

    #[test]
    fn test_short_and_full_paths() {
        let rules = RuleSet::standard().unwrap();
        let target = TechId::from("currency");

        let short = path(&rules, &target, false).unwrap();
        assert_eq!(short.len(), 2);

        let full = path(&rules, &target, true).unwrap();
        let full_ids: Vec<_> = full.into_iter().map(|t| t.id).collect();
        assert_eq!(
            full_ids,
            ids(&["writing", "mining", "bronze_working", "currency"])
        );
    }
}
