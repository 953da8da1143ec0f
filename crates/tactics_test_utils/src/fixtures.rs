//! Test fixtures and helpers.
//!
//! Pre-built units, players and rule sets for consistent testing.

use tactics_core::data::{standard_rules, Era, TechCategory, TechData, UnitType};
use tactics_core::economy::{Resource, Stockpile};
use tactics_core::math::Fixed;
use tactics_core::orchestrator::Orchestrator;
use tactics_core::research::PlayerResearchState;
use tactics_core::rules::RuleSet;
use tactics_core::store::{MemoryStore, RecordStore};
use tactics_core::turn_log::MemoryTurnLog;
use tactics_core::unit::Unit;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> Fixed {
    Fixed::from_num(n)
}

/// A fresh level-1 unit with 100 health.
#[must_use]
pub fn unit(id: &str, unit_type: UnitType, attack: i32, defense: i32) -> Unit {
    Unit::new(id, unit_type, 100, fixed(attack), fixed(defense))
}

/// The reference archer: attack 15, defense 3.
#[must_use]
pub fn archer(id: &str) -> Unit {
    unit(id, UnitType::Archer, 15, 3)
}

/// The reference cavalry: attack 20, defense 8.
#[must_use]
pub fn cavalry(id: &str) -> Unit {
    unit(id, UnitType::Cavalry, 20, 8)
}

/// The reference rule set.
///
/// # Panics
///
/// Panics if the built-in tables fail validation.
#[must_use]
pub fn standard() -> RuleSet {
    RuleSet::standard().expect("standard rules are valid")
}

/// An idle player holding the given amount of every resource.
#[must_use]
pub fn wealthy_player(id: &str, amount: u32) -> PlayerResearchState {
    let resources: Stockpile = [
        Resource::Food,
        Resource::Production,
        Resource::Gold,
        Resource::Science,
        Resource::Culture,
    ]
    .into_iter()
    .map(|r| (r, amount))
    .collect();
    PlayerResearchState::new(id).with_resources(resources)
}

/// A linear chain `t0 <- t1 <- ... <- t{len-1}` with one era per step.
///
/// Each technology costs 1 science, takes 1 point and grants `+1` of the
/// effect `"chain"`. Eras saturate at the last era.
#[must_use]
pub fn chain_technologies(len: usize) -> Vec<TechData> {
    (0..len)
        .map(|i| {
            let era = Era::ALL[i.min(Era::ALL.len() - 1)];
            let tech = TechData::new(format!("t{i}"), format!("Tech {i}"), era, TechCategory::Science, 1)
                .with_cost(Resource::Science, 1)
                .with_effect("chain", Fixed::ONE);
            if i == 0 {
                tech
            } else {
                let prereq = format!("t{}", i - 1);
                tech.with_prerequisites(&[prereq.as_str()])
            }
        })
        .collect()
}

/// The standard combat tables with a synthetic technology chain.
///
/// # Panics
///
/// Panics if the resulting rule set fails validation.
#[must_use]
pub fn chain_rules(len: usize) -> RuleSet {
    let mut data = standard_rules();
    data.technologies = chain_technologies(len);
    RuleSet::from_data(data).expect("chain rules are valid")
}

/// An orchestrator over the standard rules, seeded with an archer, a
/// cavalry unit and one wealthy player `"p1"`.
///
/// # Panics
///
/// Panics if the in-memory store rejects a record.
#[must_use]
pub fn skirmish(seed: u64) -> Orchestrator<MemoryStore, MemoryTurnLog> {
    let mut store = MemoryStore::new();
    store.save_unit(&archer("archer")).expect("save archer");
    store.save_unit(&cavalry("cavalry")).expect("save cavalry");
    store
        .save_player_state(&wealthy_player("p1", 10_000))
        .expect("save player");
    Orchestrator::new(standard(), store, MemoryTurnLog::with_seed(seed))
}
