//! Combat rule tables: constants, unit-type advantages and situational modifiers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::keys::{Ability, Formation, RuleKey, Terrain, UnitType, Weather};
use crate::error::{GameError, Result};
use crate::math::{fixed_serde, ratio, Fixed};

/// Base damage dealt by an attack of equal attack and defense.
pub const BASE_ATTACK_DAMAGE: i32 = 10;

/// Chance that an attack is a critical hit.
pub const CRITICAL_HIT_CHANCE: f64 = 0.1;

/// Damage multiplier applied to critical hits.
pub const CRITICAL_HIT_MULTIPLIER: f64 = 1.5;

/// Multiplier when the attacker's type is strong against the defender's.
pub const STRONG_AGAINST_MULTIPLIER: f64 = 1.5;

/// Multiplier when the attacker's type is weak against the defender's.
pub const WEAK_AGAINST_MULTIPLIER: f64 = 0.7;

/// Fractional attack/defense growth per level.
pub const LEVEL_UP_STAT_INCREASE: f64 = 0.1;

/// Experience granted per combat at equal levels.
pub const EXPERIENCE_PER_COMBAT: u32 = 10;

/// Experience needed to gain a level.
pub const EXPERIENCE_FOR_LEVEL_UP: u32 = 100;

/// Highest level a unit can reach.
pub const MAX_LEVEL: u32 = 10;

/// Scalar constants used by combat resolution and unit progression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatConstants {
    /// Base damage dealt by an attack of equal attack and defense.
    #[serde(with = "fixed_serde")]
    pub base_attack_damage: Fixed,
    /// Chance in [0, 1) that an attack is a critical hit.
    #[serde(with = "fixed_serde")]
    pub critical_hit_chance: Fixed,
    /// Damage multiplier applied to critical hits.
    #[serde(with = "fixed_serde")]
    pub critical_hit_multiplier: Fixed,
    /// Multiplier for a strong-against matchup.
    #[serde(with = "fixed_serde")]
    pub strong_multiplier: Fixed,
    /// Multiplier for a weak-against matchup.
    #[serde(with = "fixed_serde")]
    pub weak_multiplier: Fixed,
    /// Fractional attack/defense growth per level.
    #[serde(with = "fixed_serde")]
    pub level_up_stat_increase: Fixed,
    /// Experience granted per combat at equal levels.
    pub experience_per_combat: u32,
    /// Experience needed to gain a level.
    pub experience_for_level_up: u32,
    /// Highest level a unit can reach.
    pub max_level: u32,
}

impl Default for CombatConstants {
    fn default() -> Self {
        Self {
            base_attack_damage: Fixed::from_num(BASE_ATTACK_DAMAGE),
            critical_hit_chance: ratio(CRITICAL_HIT_CHANCE),
            critical_hit_multiplier: ratio(CRITICAL_HIT_MULTIPLIER),
            strong_multiplier: ratio(STRONG_AGAINST_MULTIPLIER),
            weak_multiplier: ratio(WEAK_AGAINST_MULTIPLIER),
            level_up_stat_increase: ratio(LEVEL_UP_STAT_INCREASE),
            experience_per_combat: EXPERIENCE_PER_COMBAT,
            experience_for_level_up: EXPERIENCE_FOR_LEVEL_UP,
            max_level: MAX_LEVEL,
        }
    }
}

impl CombatConstants {
    /// Check that the constants describe a usable rule set.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidRules`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.base_attack_damage < Fixed::ZERO {
            return Err(GameError::InvalidRules(
                "base_attack_damage must not be negative".to_string(),
            ));
        }
        if self.critical_hit_chance < Fixed::ZERO || self.critical_hit_chance > Fixed::ONE {
            return Err(GameError::InvalidRules(
                "critical_hit_chance must be within [0, 1]".to_string(),
            ));
        }
        if self.critical_hit_multiplier < Fixed::ZERO
            || self.strong_multiplier < Fixed::ZERO
            || self.weak_multiplier < Fixed::ZERO
        {
            return Err(GameError::InvalidRules(
                "damage multipliers must not be negative".to_string(),
            ));
        }
        if self.level_up_stat_increase < Fixed::ZERO {
            return Err(GameError::InvalidRules(
                "level_up_stat_increase must not be negative".to_string(),
            ));
        }
        if self.max_level == 0 {
            return Err(GameError::InvalidRules(
                "max_level must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Attack and defense scaling for one situational key.
///
/// Damage is multiplied by `1 + attack` and divided by `1 + defense`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifier {
    /// Fractional attack modifier (e.g. 0.25 for +25%).
    #[serde(with = "fixed_serde")]
    pub attack: Fixed,
    /// Fractional defense modifier.
    #[serde(with = "fixed_serde")]
    pub defense: Fixed,
}

impl Modifier {
    /// A modifier that leaves damage unchanged.
    pub const NEUTRAL: Self = Self {
        attack: Fixed::ZERO,
        defense: Fixed::ZERO,
    };

    /// Create a new modifier.
    #[must_use]
    pub const fn new(attack: Fixed, defense: Fixed) -> Self {
        Self { attack, defense }
    }

    /// Create a modifier from decimal table values.
    #[must_use]
    pub fn from_ratios(attack: f64, defense: f64) -> Self {
        Self::new(ratio(attack), ratio(defense))
    }

    /// Scale damage by this modifier, saturating at the fixed-point bounds.
    ///
    /// The defense divisor must be positive, which table validation ensures.
    #[must_use]
    pub fn apply(self, damage: Fixed) -> Fixed {
        damage
            .saturating_mul(Fixed::ONE.saturating_add(self.attack))
            .saturating_div(Fixed::ONE.saturating_add(self.defense))
    }

    fn validate(self, table: &str, key: impl std::fmt::Display) -> Result<()> {
        if self.attack < -Fixed::ONE {
            return Err(GameError::InvalidRules(format!(
                "{table} '{key}': attack modifier below -1"
            )));
        }
        if self.defense <= -Fixed::ONE {
            return Err(GameError::InvalidRules(format!(
                "{table} '{key}': defense modifier must be greater than -1"
            )));
        }
        Ok(())
    }
}

/// A rule table mapping situational keys to modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "K: Serialize",
    deserialize = "K: Deserialize<'de>"
))]
pub struct ModifierTable<K: RuleKey>(BTreeMap<K, Modifier>);

impl<K: RuleKey> Default for ModifierTable<K> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<K: RuleKey> ModifierTable<K> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a row.
    #[must_use]
    pub fn with(mut self, key: K, modifier: Modifier) -> Self {
        self.0.insert(key, modifier);
        self
    }

    /// Look up the modifier for a key.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidModifierKey`] if the table has no row for `key`.
    pub fn get(&self, key: K) -> Result<Modifier> {
        self.0
            .get(&key)
            .copied()
            .ok_or_else(|| GameError::InvalidModifierKey {
                table: K::TABLE,
                key: key.to_string(),
            })
    }

    /// Check if the table has a row for `key`.
    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.0.contains_key(&key)
    }

    /// Iterate over rows in key order.
    pub fn iter(&self) -> impl Iterator<Item = (K, Modifier)> + '_ {
        self.0.iter().map(|(&key, &modifier)| (key, modifier))
    }

    fn validate(&self) -> Result<()> {
        for (key, modifier) in self.iter() {
            modifier.validate(K::TABLE, key)?;
        }
        Ok(())
    }
}

/// Relationship between an attacker's and a defender's unit types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matchup {
    /// Attacker is strong against the defender.
    Strong,
    /// Attacker is weak against the defender.
    Weak,
    /// No table entry relates the two types.
    Neutral,
}

/// Strong/weak relations of one attacking unit type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Advantage {
    /// Defender types this type deals bonus damage to.
    #[serde(default)]
    pub strong_against: Vec<UnitType>,
    /// Defender types this type deals reduced damage to.
    #[serde(default)]
    pub weak_against: Vec<UnitType>,
}

/// Unit-type advantage matrix.
///
/// Asymmetric: `A` strong against `B` says nothing about `B` against `A`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdvantageTable(BTreeMap<UnitType, Advantage>);

impl AdvantageTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the relations of one attacking type.
    #[must_use]
    pub fn with(mut self, attacker: UnitType, strong: &[UnitType], weak: &[UnitType]) -> Self {
        self.0.insert(
            attacker,
            Advantage {
                strong_against: strong.to_vec(),
                weak_against: weak.to_vec(),
            },
        );
        self
    }

    /// Relations of an attacking type, if the table lists it.
    #[must_use]
    pub fn get(&self, attacker: UnitType) -> Option<&Advantage> {
        self.0.get(&attacker)
    }

    /// Classify an attacker/defender pairing. Strong takes precedence over weak.
    #[must_use]
    pub fn matchup(&self, attacker: UnitType, defender: UnitType) -> Matchup {
        match self.get(attacker) {
            Some(adv) if adv.strong_against.contains(&defender) => Matchup::Strong,
            Some(adv) if adv.weak_against.contains(&defender) => Matchup::Weak,
            _ => Matchup::Neutral,
        }
    }
}

/// All combat-related rule tables.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CombatTables {
    /// Unit-type advantage matrix.
    #[serde(default)]
    pub advantages: AdvantageTable,
    /// Terrain modifiers.
    pub terrain: ModifierTable<Terrain>,
    /// Weather modifiers.
    pub weather: ModifierTable<Weather>,
    /// Formation modifiers.
    pub formations: ModifierTable<Formation>,
    /// Special ability modifiers.
    #[serde(default)]
    pub abilities: ModifierTable<Ability>,
}

impl CombatTables {
    /// Check every modifier row.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidRules`] for a modifier that would divide
    /// by zero or produce negative damage.
    pub fn validate(&self) -> Result<()> {
        self.terrain.validate()?;
        self.weather.validate()?;
        self.formations.validate()?;
        self.abilities.validate()?;
        Ok(())
    }

    /// Keys of every closed set that have no row in their table.
    #[must_use]
    pub fn missing_rows(&self) -> Vec<String> {
        fn missing<K: RuleKey>(table: &ModifierTable<K>, all: &[K]) -> Vec<String> {
            all.iter()
                .filter(|key| !table.contains(**key))
                .map(|key| format!("{} '{}'", K::TABLE, key))
                .collect()
        }

        let mut rows = missing(&self.terrain, Terrain::ALL);
        rows.extend(missing(&self.weather, Weather::ALL));
        rows.extend(missing(&self.formations, Formation::ALL));
        rows.extend(missing(&self.abilities, Ability::ALL));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_modifier_is_identity() {
        let damage = Fixed::from_num(25);
        assert_eq!(Modifier::NEUTRAL.apply(damage), damage);
    }

    #[test]
    fn test_modifier_multiplies_then_divides() {
        // 20 * 1.5 / 1.25 = 24
        let modifier = Modifier::from_ratios(0.5, 0.25);
        assert_eq!(modifier.apply(Fixed::from_num(20)), Fixed::from_num(24));
    }

    #[test]
    fn test_modifier_saturates_near_zero_divisor() {
        let modifier = Modifier::from_ratios(0.0, -0.9999);
        assert!(modifier.validate("terrain", "plains").is_ok());
        assert_eq!(modifier.apply(Fixed::from_num(1_000_000)), Fixed::MAX);
    }

    #[test]
    fn test_missing_row_is_invalid_key() {
        let table = ModifierTable::new().with(Terrain::Plains, Modifier::NEUTRAL);
        assert!(table.get(Terrain::Plains).is_ok());

        let err = table.get(Terrain::Swamp).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidModifierKey { table: "terrain", ref key } if key == "swamp"
        ));
    }

    #[test]
    fn test_matchup_strong_takes_precedence() {
        let table = AdvantageTable::new()
            .with(UnitType::Archer, &[UnitType::Cavalry], &[UnitType::Cavalry])
            .with(UnitType::Infantry, &[], &[UnitType::Cavalry]);

        assert_eq!(
            table.matchup(UnitType::Archer, UnitType::Cavalry),
            Matchup::Strong
        );
        assert_eq!(
            table.matchup(UnitType::Infantry, UnitType::Cavalry),
            Matchup::Weak
        );
        assert_eq!(
            table.matchup(UnitType::Cavalry, UnitType::Archer),
            Matchup::Neutral
        );
    }

    #[test]
    fn test_validate_rejects_zero_divisor() {
        let tables = CombatTables {
            weather: ModifierTable::new().with(Weather::Fog, Modifier::from_ratios(0.0, -1.0)),
            ..CombatTables::default()
        };
        assert!(matches!(tables.validate(), Err(GameError::InvalidRules(_))));
    }

    #[test]
    fn test_default_constants_are_valid() {
        let constants = CombatConstants::default();
        assert!(constants.validate().is_ok());
        assert_eq!(constants.base_attack_damage, Fixed::from_num(10));
        assert_eq!(constants.max_level, MAX_LEVEL);
    }
}
