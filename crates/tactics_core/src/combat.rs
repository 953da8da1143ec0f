//! Combat resolution between two units.
//!
//! This module implements the attack formula:
//! - Attack/defense ratio scaled by a base damage constant
//! - Unit-type advantage matrix (strong/weak against)
//! - Terrain, weather, formation and ability modifiers
//! - Level scaling on both sides
//! - Critical hits from a caller-supplied random draw
//!
//! Resolution is a pure function of its inputs. The caller owns the random
//! source, so replaying the same draws always reproduces the same outcome.

use serde::{Deserialize, Serialize};

use crate::data::{Ability, Formation, Matchup, Terrain, UnitType, Weather};
use crate::error::{GameError, Result};
use crate::math::Fixed;
use crate::progression::apply_combat_outcome;
use crate::rules::RuleSet;
use crate::unit::Unit;

/// Situational modifiers for one attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CombatOptions {
    /// Terrain the defender stands on.
    #[serde(default)]
    pub terrain: Terrain,
    /// Weather during the attack.
    #[serde(default)]
    pub weather: Weather,
    /// Attacker formation.
    #[serde(default)]
    pub formation: Formation,
    /// Special ability the attacker has active, if any.
    #[serde(default)]
    pub ability: Option<Ability>,
}

impl CombatOptions {
    /// Builder method to set terrain.
    #[must_use]
    pub const fn with_terrain(mut self, terrain: Terrain) -> Self {
        self.terrain = terrain;
        self
    }

    /// Builder method to set weather.
    #[must_use]
    pub const fn with_weather(mut self, weather: Weather) -> Self {
        self.weather = weather;
        self
    }

    /// Builder method to set formation.
    #[must_use]
    pub const fn with_formation(mut self, formation: Formation) -> Self {
        self.formation = formation;
        self
    }

    /// Builder method to set the active ability.
    #[must_use]
    pub const fn with_ability(mut self, ability: Ability) -> Self {
        self.ability = Some(ability);
        self
    }
}

/// Outcome of one attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatResult {
    /// Damage dealt to the defender.
    pub damage: u32,
    /// Whether the attack was a critical hit.
    pub is_critical: bool,
    /// Experience awarded to the attacker.
    pub experience_gained: u32,
}

/// Intermediate values of the damage formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageBreakdown {
    /// Advantage relation that was applied.
    pub matchup: Matchup,
    /// Damage after every modifier except the critical multiplier, unrounded.
    pub base_damage: Fixed,
}

/// Both updated units plus the result of one attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatExchange {
    /// The numeric outcome.
    pub result: CombatResult,
    /// Attacker after gaining experience.
    pub attacker: Unit,
    /// Defender after taking damage.
    pub defender: Unit,
}

fn level_factor(rules: &RuleSet, level: u32) -> Fixed {
    Fixed::saturating_from_num(level.saturating_sub(1))
        .saturating_mul(rules.constants().level_up_stat_increase)
        .saturating_add(Fixed::ONE)
}

/// Compute non-critical, unrounded damage.
///
/// Modifiers are applied in a fixed order: attack/defense ratio, advantage,
/// terrain, weather, formation, ability, level scaling. Defense is clamped
/// to a minimum of 1.
///
/// # Errors
///
/// - [`GameError::InvalidAttacker`] if the attacker is a building.
/// - [`GameError::InvalidModifierKey`] if a situational key has no row in
///   the rule tables.
pub fn damage_breakdown(
    rules: &RuleSet,
    attacker: &Unit,
    defender: &Unit,
    options: &CombatOptions,
) -> Result<DamageBreakdown> {
    if attacker.unit_type == UnitType::Building {
        return Err(GameError::InvalidAttacker(attacker.id.to_string()));
    }

    let constants = rules.constants();
    let tables = rules.combat();

    // Step 1: attack/defense ratio
    let defense = defender.defense.max(Fixed::ONE);
    let mut damage = constants
        .base_attack_damage
        .saturating_mul(attacker.attack)
        .saturating_div(defense);

    // Step 2: unit-type advantage
    let matchup = tables
        .advantages
        .matchup(attacker.unit_type, defender.unit_type);
    damage = match matchup {
        Matchup::Strong => damage.saturating_mul(constants.strong_multiplier),
        Matchup::Weak => damage.saturating_mul(constants.weak_multiplier),
        Matchup::Neutral => damage,
    };

    // Steps 3-6: situational modifiers
    damage = tables.terrain.get(options.terrain)?.apply(damage);
    damage = tables.weather.get(options.weather)?.apply(damage);
    damage = tables.formations.get(options.formation)?.apply(damage);
    if let Some(ability) = options.ability {
        damage = tables.abilities.get(ability)?.apply(damage);
    }

    // Step 7: level scaling
    damage = damage
        .saturating_mul(level_factor(rules, attacker.level))
        .saturating_div(level_factor(rules, defender.level));

    Ok(DamageBreakdown {
        matchup,
        base_damage: damage,
    })
}

/// Resolve one attack.
///
/// `draw` is a uniform random value in [0, 1). A draw below the critical hit
/// chance multiplies damage by the critical multiplier. Damage is rounded
/// once, half away from zero. Experience is
/// `ceil(experience_per_combat * defender.level / attacker.level)`.
///
/// # Errors
///
/// - [`GameError::InvalidRandomDraw`] if `draw` is outside [0, 1).
/// - Any error from [`damage_breakdown`].
pub fn resolve(
    rules: &RuleSet,
    attacker: &Unit,
    defender: &Unit,
    options: &CombatOptions,
    draw: Fixed,
) -> Result<CombatResult> {
    if draw < Fixed::ZERO || draw >= Fixed::ONE {
        return Err(GameError::InvalidRandomDraw(draw.to_string()));
    }

    let constants = rules.constants();
    let breakdown = damage_breakdown(rules, attacker, defender, options)?;

    // Step 8: critical hit
    let is_critical = draw < constants.critical_hit_chance;
    let total = if is_critical {
        breakdown
            .base_damage
            .saturating_mul(constants.critical_hit_multiplier)
    } else {
        breakdown.base_damage
    };

    // Step 9: single rounding at the end
    let damage = total
        .saturating_round()
        .max(Fixed::ZERO)
        .saturating_to_num::<u32>();

    // Step 10: experience, independent of damage dealt
    let experience_gained = constants
        .experience_per_combat
        .saturating_mul(defender.level)
        .div_ceil(attacker.level.max(1));

    tracing::trace!(
        attacker = %attacker.id,
        defender = %defender.id,
        damage,
        is_critical,
        experience_gained,
        "Combat resolved"
    );

    Ok(CombatResult {
        damage,
        is_critical,
        experience_gained,
    })
}

/// Resolve one attack and apply its outcome to both participants.
///
/// The attacker gains the experience and takes no damage; the defender
/// takes the damage and gains no experience.
///
/// # Errors
///
/// - [`GameError::UnitDefeated`] if either unit is already defeated.
/// - Any error from [`resolve`].
pub fn resolve_exchange(
    rules: &RuleSet,
    attacker: &Unit,
    defender: &Unit,
    options: &CombatOptions,
    draw: Fixed,
) -> Result<CombatExchange> {
    for unit in [attacker, defender] {
        if unit.is_defeated() {
            return Err(GameError::UnitDefeated(unit.id.to_string()));
        }
    }

    let result = resolve(rules, attacker, defender, options, draw)?;
    let constants = rules.constants();

    Ok(CombatExchange {
        result,
        attacker: apply_combat_outcome(constants, attacker, 0, result.experience_gained),
        defender: apply_combat_outcome(constants, defender, result.damage, 0),
    })
}
