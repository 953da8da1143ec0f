//! Combat and research orchestration over a record store and turn log.
//!
//! The orchestrator sequences one operation at a time: load snapshots, run
//! the pure core, save the returned snapshots, then record events. Any
//! failure before saving leaves the store and the log untouched.

use crate::combat::{resolve_exchange, CombatExchange, CombatOptions};
use crate::data::UnitType;
use crate::error::{GameError, Result};
use crate::ids::{PlayerId, TechId, UnitId};
use crate::random::RandomSource;
use crate::research::PlayerResearchState;
use crate::rules::RuleSet;
use crate::store::RecordStore;
use crate::turn_log::{TurnEvent, TurnLog};
use crate::unit::{Unit, UnitStatus};

/// Runs rules operations against stored records.
#[derive(Debug)]
pub struct Orchestrator<S, L> {
    rules: RuleSet,
    store: S,
    log: L,
}

impl<S: RecordStore, L: TurnLog> Orchestrator<S, L> {
    /// Create an orchestrator.
    #[must_use]
    pub const fn new(rules: RuleSet, store: S, log: L) -> Self {
        Self { rules, store, log }
    }

    /// Rule set in use.
    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Backing record store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the record store, for seeding records.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Turn log being written.
    #[must_use]
    pub const fn log(&self) -> &L {
        &self.log
    }

    /// Consume the orchestrator, returning its store and log.
    pub fn into_parts(self) -> (S, L) {
        (self.store, self.log)
    }

    /// Resolve one attack between two stored units.
    ///
    /// A draw is taken from `random` only once every precondition holds.
    ///
    /// # Errors
    ///
    /// - [`GameError::NotFound`] if either unit is missing.
    /// - [`GameError::InvalidAttacker`] if the attacker is a building or
    ///   attacks itself.
    /// - [`GameError::UnitDefeated`] if either unit is already defeated.
    /// - Any combat or store error.
    pub fn attack(
        &mut self,
        attacker_id: &UnitId,
        defender_id: &UnitId,
        options: CombatOptions,
        random: &mut impl RandomSource,
    ) -> Result<CombatExchange> {
        if attacker_id == defender_id {
            return Err(GameError::InvalidAttacker(attacker_id.to_string()));
        }

        let attacker = self.store.load_unit(attacker_id)?;
        let defender = self.store.load_unit(defender_id)?;
        check_participants(&attacker, &defender)?;

        let draw = random.draw();
        let exchange = resolve_exchange(&self.rules, &attacker, &defender, &options, draw)?;

        self.store.save_unit(&exchange.attacker)?;
        self.store.save_unit(&exchange.defender)?;

        self.log.append(TurnEvent::CombatResolved {
            attacker: attacker_id.clone(),
            defender: defender_id.clone(),
            options,
            draw,
            result: exchange.result,
        })?;
        for unit in [&exchange.attacker, &exchange.defender] {
            match unit.status {
                UnitStatus::Defeated => self.log.append(TurnEvent::UnitDefeated {
                    unit: unit.id.clone(),
                })?,
                UnitStatus::LeveledUp => self.log.append(TurnEvent::UnitLeveledUp {
                    unit: unit.id.clone(),
                    level: unit.level,
                })?,
                UnitStatus::Active | UnitStatus::Damaged => {}
            }
        }

        Ok(exchange)
    }

    /// Start research for a stored player.
    ///
    /// # Errors
    ///
    /// - [`GameError::NotFound`] if the player is missing.
    /// - Any error from [`ResearchScheduler::start_research`](crate::research::ResearchScheduler::start_research).
    pub fn start_research(
        &mut self,
        player_id: &PlayerId,
        tech: &TechId,
    ) -> Result<PlayerResearchState> {
        let state = self.store.load_player_state(player_id)?;
        let next = self.rules.scheduler().start_research(&state, tech)?;

        self.store.save_player_state(&next)?;
        self.log.append(TurnEvent::ResearchStarted {
            player: player_id.clone(),
            tech: tech.clone(),
        })?;
        Ok(next)
    }

    /// Add research points for a stored player.
    ///
    /// # Errors
    ///
    /// - [`GameError::NotFound`] if the player is missing.
    /// - Any error from [`ResearchScheduler::advance_research`](crate::research::ResearchScheduler::advance_research).
    pub fn advance_research(
        &mut self,
        player_id: &PlayerId,
        points: u32,
    ) -> Result<PlayerResearchState> {
        let state = self.store.load_player_state(player_id)?;
        let next = self.rules.scheduler().advance_research(&state, points)?;

        self.store.save_player_state(&next)?;
        if let Some(tech) = next.researched.iter().find(|t| !state.researched.contains(t)) {
            self.log.append(TurnEvent::ResearchCompleted {
                player: player_id.clone(),
                tech: tech.clone(),
            })?;
        }
        if next.era_changed {
            self.log.append(TurnEvent::EraAdvanced {
                player: player_id.clone(),
                era: next.current_era,
            })?;
        }
        Ok(next)
    }
}

fn check_participants(attacker: &Unit, defender: &Unit) -> Result<()> {
    for unit in [attacker, defender] {
        if unit.is_defeated() {
            return Err(GameError::UnitDefeated(unit.id.to_string()));
        }
    }
    if attacker.unit_type == UnitType::Building {
        return Err(GameError::InvalidAttacker(attacker.id.to_string()));
    }
    Ok(())
}
