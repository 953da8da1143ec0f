//! Error types for the rules engine.

use thiserror::Error;

use crate::economy::Resource;
use crate::ids::TechId;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Kind of record that a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A unit snapshot.
    Unit,
    /// A player research state.
    Player,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unit => write!(f, "unit"),
            Self::Player => write!(f, "player"),
        }
    }
}

/// Top-level error type for all rules engine errors.
#[derive(Debug, Error)]
pub enum GameError {
    /// A unit or player record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What was being looked up.
        kind: RecordKind,
        /// Identifier that was requested.
        id: String,
    },

    /// Terrain, weather, formation or ability key is not in the rule tables.
    #[error("Unknown {table} key: {key}")]
    InvalidModifierKey {
        /// Name of the modifier table that was consulted.
        table: &'static str,
        /// The offending key.
        key: String,
    },

    /// Insufficient resources.
    #[error("Insufficient resources: need {required} {resource}, have {available}")]
    InsufficientResources {
        /// Resource type.
        resource: Resource,
        /// Amount required.
        required: u32,
        /// Amount available.
        available: u32,
    },

    /// One or more prerequisites of a technology have not been researched.
    #[error("Prerequisites not met for {tech}: missing {missing:?}")]
    PrerequisitesNotMet {
        /// Technology the player tried to research.
        tech: TechId,
        /// Prerequisites that are still missing.
        missing: Vec<TechId>,
    },

    /// The technology is already in the researched set.
    #[error("Technology already researched: {0}")]
    AlreadyResearched(TechId),

    /// The technology is not defined in the rule set.
    #[error("Unknown technology: {0}")]
    UnknownTechnology(TechId),

    /// The prerequisite relation contains a cycle.
    #[error("Cyclic prerequisite chain: {}", format_cycle(.cycle))]
    CyclicPrerequisite {
        /// Technologies forming the cycle, first element repeated at the end.
        cycle: Vec<TechId>,
    },

    /// Two technologies share the same identifier.
    #[error("Duplicate technology ID: {0}")]
    DuplicateTechnology(TechId),

    /// Another technology is already being researched.
    #[error("Research already in progress: {0}")]
    ResearchInProgress(TechId),

    /// The attacking unit is not allowed to attack.
    #[error("Unit {0} cannot attack")]
    InvalidAttacker(String),

    /// A defeated unit cannot take part in combat.
    #[error("Unit {0} is defeated")]
    UnitDefeated(String),

    /// Random draw outside the half-open range [0, 1).
    #[error("Random draw {0} outside [0, 1)")]
    InvalidRandomDraw(String),

    /// Rule tables failed validation.
    #[error("Invalid rules: {0}")]
    InvalidRules(String),

    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParseError {
        /// Path to the file that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Snapshot encoding or decoding failed.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

fn format_cycle(cycle: &[TechId]) -> String {
    cycle
        .iter()
        .map(TechId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_chain() {
        let err = GameError::CyclicPrerequisite {
            cycle: vec![TechId::from("a"), TechId::from("b"), TechId::from("a")],
        };
        assert_eq!(err.to_string(), "Cyclic prerequisite chain: a -> b -> a");
    }

    #[test]
    fn test_insufficient_resources_message() {
        let err = GameError::InsufficientResources {
            resource: Resource::Science,
            required: 20,
            available: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient resources: need 20 science, have 5"
        );
    }
}
