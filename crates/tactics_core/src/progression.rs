//! Post-combat unit progression: damage, defeat, experience and level-up.

use crate::data::CombatConstants;
use crate::math::Fixed;
use crate::unit::{Unit, UnitStatus};

/// Apply the outcome of one combat to a unit snapshot.
///
/// Returns a new snapshot; `unit` is not modified.
///
/// - Damage is subtracted first. A unit reduced to zero health is
///   `Defeated` and gains no experience.
/// - A survivor gains `experience_gained`. Reaching the level-up threshold
///   below the level cap grants one level, resets experience and scales
///   attack and defense by `1 + level_up_stat_increase`.
/// - At the level cap experience keeps accumulating with no effect.
#[must_use]
pub fn apply_combat_outcome(
    constants: &CombatConstants,
    unit: &Unit,
    damage: u32,
    experience_gained: u32,
) -> Unit {
    let mut next = unit.clone();

    next.health = unit.health.saturating_sub(damage);
    if next.health == 0 {
        next.status = UnitStatus::Defeated;
        tracing::debug!(unit = %next.id, damage, "Unit defeated");
        return next;
    }

    next.experience = unit.experience.saturating_add(experience_gained);

    if next.experience >= constants.experience_for_level_up && next.level < constants.max_level {
        let growth = Fixed::ONE + constants.level_up_stat_increase;
        next.level += 1;
        next.experience = 0;
        next.attack = unit.attack.saturating_mul(growth);
        next.defense = unit.defense.saturating_mul(growth);
        next.status = UnitStatus::LeveledUp;
        tracing::debug!(unit = %next.id, level = next.level, "Unit leveled up");
    } else {
        next.status = UnitStatus::Damaged;
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::UnitType;
    use crate::math::ratio;

    fn soldier() -> Unit {
        Unit::new(
            "soldier",
            UnitType::Infantry,
            100,
            Fixed::from_num(10),
            Fixed::from_num(5),
        )
    }

    #[test]
    fn test_damage_reduces_health() {
        let constants = CombatConstants::default();
        let unit = soldier();
        let next = apply_combat_outcome(&constants, &unit, 30, 0);

        assert_eq!(next.health, 70);
        assert_eq!(next.status, UnitStatus::Damaged);
        // Input snapshot is untouched
        assert_eq!(unit.health, 100);
    }

    #[test]
    fn test_lethal_damage_clamps_to_zero() {
        let constants = CombatConstants::default();
        let unit = soldier().with_experience(95);
        let next = apply_combat_outcome(&constants, &unit, 250, 50);

        assert_eq!(next.health, 0);
        assert_eq!(next.status, UnitStatus::Defeated);
        assert_eq!(next.experience, 95);
        assert_eq!(next.level, 1);
    }

    #[test]
    fn test_exact_lethal_damage_defeats() {
        let constants = CombatConstants::default();
        let next = apply_combat_outcome(&constants, &soldier(), 100, 0);
        assert_eq!(next.health, 0);
        assert_eq!(next.status, UnitStatus::Defeated);
    }

    #[test]
    fn test_experience_accumulates() {
        let constants = CombatConstants::default();
        let next = apply_combat_outcome(&constants, &soldier(), 0, 10);
        assert_eq!(next.experience, 10);
        assert_eq!(next.health, 100);
        assert_eq!(next.status, UnitStatus::Damaged);
    }

    #[test]
    fn test_level_up_scales_stats() {
        let constants = CombatConstants::default();
        let unit = soldier().with_experience(95);
        let next = apply_combat_outcome(&constants, &unit, 0, 10);

        let growth = Fixed::ONE + ratio(0.1);
        assert_eq!(next.level, 2);
        assert_eq!(next.experience, 0);
        assert_eq!(next.attack, Fixed::from_num(10) * growth);
        assert_eq!(next.defense, Fixed::from_num(5) * growth);
        assert_eq!(next.status, UnitStatus::LeveledUp);
    }

    #[test]
    fn test_level_cap_keeps_experience() {
        let constants = CombatConstants::default();
        let mut unit = soldier()
            .with_level(constants.max_level)
            .with_experience(constants.experience_for_level_up);

        for _ in 0..5 {
            unit = apply_combat_outcome(&constants, &unit, 0, 40);
            assert_eq!(unit.level, constants.max_level);
            assert_eq!(unit.status, UnitStatus::Damaged);
        }
        assert_eq!(unit.experience, constants.experience_for_level_up + 200);
        assert_eq!(unit.attack, Fixed::from_num(10));
    }
}
