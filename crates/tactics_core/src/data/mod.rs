//! Static rule tables.
//!
//! This module contains pure data structures that define combat constants,
//! the unit-type advantage matrix, situational modifier tables and the
//! technology tree. All structs are designed to be deserialized from RON
//! files; the reference tables are also available in code via
//! [`standard_rules`].
//!
//! **Note:** This module contains no IO - it only defines data types.

mod combat_data;
mod keys;
mod rules_data;
mod standard;
mod tech_data;

pub use combat_data::{
    Advantage, AdvantageTable, CombatConstants, CombatTables, Matchup, Modifier, ModifierTable,
    BASE_ATTACK_DAMAGE, CRITICAL_HIT_CHANCE, CRITICAL_HIT_MULTIPLIER, EXPERIENCE_FOR_LEVEL_UP,
    EXPERIENCE_PER_COMBAT, LEVEL_UP_STAT_INCREASE, MAX_LEVEL, STRONG_AGAINST_MULTIPLIER,
    WEAK_AGAINST_MULTIPLIER,
};
pub use keys::{Ability, Formation, RuleKey, Terrain, UnitType, Weather};
pub use rules_data::RulesData;
pub use standard::{standard_combat_tables, standard_rules, standard_technologies};
pub use tech_data::{Era, TechCategory, TechData, Unlock, UnlockKind, BUILDING_ID_MARKERS};
