//! # Tactics Core
//!
//! Deterministic rules engine for a turn-based strategy game.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No system randomness
//! - No floating-point math in resolution (uses fixed-point)
//!
//! Every operation is a pure function over explicit snapshots and an
//! injected [`RuleSet`](rules::RuleSet). The same inputs and random draws
//! always produce the same outputs, which makes turn logs replayable.
//!
//! ## Crate Structure
//!
//! - [`data`] - Static rule tables
//! - [`combat`] - Combat resolution
//! - [`progression`] - Post-combat unit progression
//! - [`tech_graph`] - Technology prerequisite graph
//! - [`research`] - Per-player research state machine
//! - [`orchestrator`] - Store-backed sequencing of the above
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod combat;
pub mod data;
pub mod economy;
pub mod error;
pub mod ids;
pub mod math;
pub mod orchestrator;
pub mod progression;
pub mod random;
pub mod research;
pub mod rules;
pub mod store;
pub mod tech_graph;
pub mod turn_log;
pub mod unit;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::combat::{
        damage_breakdown, resolve, resolve_exchange, CombatExchange, CombatOptions, CombatResult,
    };
    pub use crate::data::{Ability, Era, Formation, Terrain, UnitType, Weather};
    pub use crate::economy::{Resource, Stockpile};
    pub use crate::error::{GameError, Result};
    pub use crate::ids::{PlayerId, TechId, UnitId};
    pub use crate::math::{ratio, Fixed};
    pub use crate::orchestrator::Orchestrator;
    pub use crate::progression::apply_combat_outcome;
    pub use crate::random::{RandomSource, SeededRandom};
    pub use crate::research::{CurrentResearch, PlayerResearchState, ResearchScheduler};
    pub use crate::rules::RuleSet;
    pub use crate::store::{MemoryStore, RecordStore};
    pub use crate::tech_graph::{TechGraph, UnlockedContent};
    pub use crate::turn_log::{MemoryTurnLog, TurnEvent, TurnLog};
    pub use crate::unit::{Unit, UnitStatus};
}
