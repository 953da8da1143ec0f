//! Seeded duels between stock units.
//!
//! Two units trade blows through an [`Orchestrator`] backed by an
//! in-memory store until one falls or the round limit is reached. The turn
//! log records every draw, so a duel can be replayed exactly.

use serde::Serialize;
use tactics_core::combat::{CombatOptions, CombatResult};
use tactics_core::data::UnitType;
use tactics_core::error::GameError;
use tactics_core::ids::UnitId;
use tactics_core::math::Fixed;
use tactics_core::orchestrator::Orchestrator;
use tactics_core::random::SeededRandom;
use tactics_core::rules::RuleSet;
use tactics_core::store::{MemoryStore, RecordStore};
use tactics_core::turn_log::MemoryTurnLog;
use tactics_core::unit::Unit;

use crate::error::Result;

/// Duel parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuelConfig {
    /// Type of the unit that strikes first.
    pub attacker: UnitType,
    /// Type of the other unit.
    pub defender: UnitType,
    /// Situational modifiers for every attack.
    pub options: CombatOptions,
    /// Random seed.
    pub seed: u64,
    /// Maximum number of rounds.
    pub rounds: u32,
}

/// One resolved attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttackRecord {
    /// Round number, starting at 1.
    pub round: u32,
    /// Unit that attacked.
    pub attacker: UnitId,
    /// Outcome of the attack.
    pub result: CombatResult,
}

/// Outcome of a duel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuelReport {
    /// Seed the duel was played with.
    pub seed: u64,
    /// Every attack, in order.
    pub attacks: Vec<AttackRecord>,
    /// Final state of the first unit.
    pub attacker: Unit,
    /// Final state of the second unit.
    pub defender: Unit,
}

/// A stock unit of the given type.
#[must_use]
pub fn stock_unit(id: &str, unit_type: UnitType) -> Unit {
    let (health, attack, defense) = match unit_type {
        UnitType::Infantry => (100, 12, 10),
        UnitType::Archer => (80, 15, 3),
        UnitType::Cavalry => (120, 20, 8),
        UnitType::Siege => (60, 25, 2),
        UnitType::Building => (300, 0, 20),
    };
    Unit::new(
        id,
        unit_type,
        health,
        Fixed::from_num(attack),
        Fixed::from_num(defense),
    )
}

/// Play a duel.
///
/// Each round the first unit attacks, then the second one strikes back if it
/// survived and is able to attack.
///
/// # Errors
///
/// Returns an error if the first unit is a building or a rules operation fails.
pub fn run_duel(rules: RuleSet, config: &DuelConfig) -> Result<(DuelReport, MemoryTurnLog)> {
    let first = UnitId::from("attacker");
    let second = UnitId::from("defender");
    if config.attacker == UnitType::Building {
        return Err(GameError::InvalidAttacker(first.to_string()).into());
    }

    let mut store = MemoryStore::new();
    store.save_unit(&stock_unit(first.as_str(), config.attacker))?;
    store.save_unit(&stock_unit(second.as_str(), config.defender))?;

    let mut orchestrator =
        Orchestrator::new(rules, store, MemoryTurnLog::with_seed(config.seed));
    let mut random = SeededRandom::new(config.seed);
    let mut attacks = Vec::new();

    'rounds: for round in 1..=config.rounds {
        for (attacker, defender) in [(&first, &second), (&second, &first)] {
            if !orchestrator.store().load_unit(attacker)?.can_attack() {
                continue;
            }

            let exchange = orchestrator.attack(attacker, defender, config.options, &mut random)?;
            tracing::info!(
                round,
                attacker = %attacker,
                damage = exchange.result.damage,
                critical = exchange.result.is_critical,
                remaining = exchange.defender.health,
                "Attack"
            );
            attacks.push(AttackRecord {
                round,
                attacker: attacker.clone(),
                result: exchange.result,
            });

            if exchange.defender.is_defeated() {
                break 'rounds;
            }
        }
    }

    let (store, log) = orchestrator.into_parts();
    let report = DuelReport {
        seed: config.seed,
        attacks,
        attacker: store.load_unit(&first)?,
        defender: store.load_unit(&second)?,
    };
    Ok((report, log))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use tactics_core::turn_log::TurnLog;

    fn config(attacker: UnitType, defender: UnitType) -> DuelConfig {
        DuelConfig {
            attacker,
            defender,
            options: CombatOptions::default(),
            seed: 42,
            rounds: 50,
        }
    }

    #[test]
    fn test_duel_ends_with_a_casualty() {
        let (report, log) =
            run_duel(RuleSet::standard().unwrap(), &config(UnitType::Archer, UnitType::Cavalry))
                .unwrap();

        assert!(report.attacker.is_defeated() || report.defender.is_defeated());
        assert!(!(report.attacker.is_defeated() && report.defender.is_defeated()));
        assert!(!report.attacks.is_empty());
        assert_eq!(log.seed(), 42);
        assert!(log.events().len() >= report.attacks.len());
    }

    #[test]
    fn test_duel_is_reproducible() {
        let cfg = config(UnitType::Infantry, UnitType::Cavalry);
        let (a, _) = run_duel(RuleSet::standard().unwrap(), &cfg).unwrap();
        let (b, _) = run_duel(RuleSet::standard().unwrap(), &cfg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_buildings_never_strike_back() {
        let (report, _) =
            run_duel(RuleSet::standard().unwrap(), &config(UnitType::Siege, UnitType::Building))
                .unwrap();
        assert!(report
            .attacks
            .iter()
            .all(|a| a.attacker.as_str() == "attacker"));
        assert!(report.defender.is_defeated());
    }

    #[test]
    fn test_building_cannot_open_a_duel() {
        let err = run_duel(
            RuleSet::standard().unwrap(),
            &config(UnitType::Building, UnitType::Infantry),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::Game(GameError::InvalidAttacker(_))));
    }
}
