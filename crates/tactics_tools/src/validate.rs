//! Rule file loading and validation.

use std::path::Path;

use serde::Serialize;
use tactics_core::ids::TechId;
use tactics_core::rules::RuleSet;

use crate::error::{Result, ToolError};

/// Summary of a validated rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Where the rules came from.
    pub source: String,
    /// Number of technologies in the tree.
    pub technologies: usize,
    /// Technologies researchable from the start.
    pub roots: Vec<TechId>,
    /// Non-fatal lint findings.
    pub warnings: Vec<String>,
}

/// Load a RON rule file, or the reference rules when `path` is `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_rules(path: Option<&Path>) -> Result<RuleSet> {
    let Some(path) = path else {
        return Ok(RuleSet::standard()?);
    };

    let text = std::fs::read_to_string(path).map_err(|e| ToolError::io(path, e))?;
    let rules = RuleSet::from_ron_str(&text, &path.display().to_string())?;
    tracing::debug!(path = %path.display(), "Loaded rule file");
    Ok(rules)
}

/// Load, validate and lint a rule set.
///
/// # Errors
///
/// Returns an error if the rules fail to load. Lint findings are reported,
/// not raised.
pub fn validate_rules(path: Option<&Path>) -> Result<ValidationReport> {
    let rules = load_rules(path)?;
    let warnings = rules.lint();
    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    Ok(ValidationReport {
        source: path.map_or_else(|| "standard".to_string(), |p| p.display().to_string()),
        technologies: rules.tech_graph().len(),
        roots: rules.tech_graph().roots().map(|t| t.id.clone()).collect(),
        warnings,
    })
}
