//! Reference rule tables shipped with the engine.

use super::combat_data::{AdvantageTable, CombatConstants, CombatTables, Modifier, ModifierTable};
use super::keys::{Ability, Formation, Terrain, UnitType, Weather};
use super::rules_data::RulesData;
use super::tech_data::{Era, TechCategory, TechData, Unlock};
use crate::economy::Resource;
use crate::math::ratio;

/// Build the reference rule tables.
#[must_use]
pub fn standard_rules() -> RulesData {
    RulesData {
        constants: CombatConstants::default(),
        combat: standard_combat_tables(),
        technologies: standard_technologies(),
    }
}

/// Reference advantage matrix and modifier tables.
#[must_use]
pub fn standard_combat_tables() -> CombatTables {
    use UnitType::{Archer, Building, Cavalry, Infantry, Siege};

    CombatTables {
        advantages: AdvantageTable::new()
            .with(Infantry, &[Siege], &[Cavalry])
            .with(Archer, &[Cavalry], &[Infantry])
            .with(Cavalry, &[Infantry, Siege], &[Archer])
            .with(Siege, &[Building], &[Cavalry]),
        terrain: ModifierTable::new()
            .with(Terrain::Plains, Modifier::NEUTRAL)
            .with(Terrain::Forest, Modifier::from_ratios(-0.1, 0.25))
            .with(Terrain::Hills, Modifier::from_ratios(0.15, 0.2))
            .with(Terrain::Mountains, Modifier::from_ratios(-0.2, 0.5))
            .with(Terrain::Desert, Modifier::from_ratios(0.0, -0.1))
            .with(Terrain::Swamp, Modifier::from_ratios(-0.2, -0.1)),
        weather: ModifierTable::new()
            .with(Weather::Clear, Modifier::NEUTRAL)
            .with(Weather::Rain, Modifier::from_ratios(-0.1, 0.0))
            .with(Weather::Fog, Modifier::from_ratios(-0.2, 0.1))
            .with(Weather::Snow, Modifier::from_ratios(-0.15, 0.05))
            .with(Weather::Storm, Modifier::from_ratios(-0.3, 0.0)),
        formations: ModifierTable::new()
            .with(Formation::Line, Modifier::NEUTRAL)
            .with(Formation::Wedge, Modifier::from_ratios(0.25, -0.15))
            .with(Formation::Phalanx, Modifier::from_ratios(-0.1, 0.35))
            .with(Formation::Skirmish, Modifier::from_ratios(0.1, -0.05)),
        abilities: ModifierTable::new()
            .with(Ability::Charge, Modifier::from_ratios(0.5, -0.2))
            .with(Ability::ShieldWall, Modifier::from_ratios(-0.2, 0.5))
            .with(Ability::Volley, Modifier::from_ratios(0.3, 0.0))
            .with(Ability::Bombard, Modifier::from_ratios(0.75, 0.0))
            .with(Ability::Rally, Modifier::from_ratios(0.15, 0.15)),
    }
}

/// Reference technology tree.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn standard_technologies() -> Vec<TechData> {
    use Era::{Ancient, Classical, Future, Industrial, Information, Medieval, Modern, Renaissance};
    use Resource::{Culture, Gold, Production, Science};
    use TechCategory::{Economy, Infrastructure, Military};

    vec![
        // Ancient
        TechData::new("agriculture", "Agriculture", Ancient, Economy, 1)
            .with_cost(Science, 10)
            .with_effect("food_production", ratio(0.2))
            .with_effect("population_growth", ratio(0.1))
            .with_unlock(Unlock::unit("worker")),
        TechData::new("mining", "Mining", Ancient, Economy, 1)
            .with_cost(Science, 10)
            .with_effect("production_bonus", ratio(0.1)),
        TechData::new("writing", "Writing", Ancient, TechCategory::Science, 1)
            .with_cost(Science, 10)
            .with_effect("research_speed", ratio(0.1)),
        TechData::new("bronze_working", "Bronze Working", Ancient, Military, 2)
            .with_cost(Science, 20)
            .with_cost(Production, 10)
            .with_prerequisites(&["mining"])
            .with_effect("attack_bonus", ratio(0.05))
            .with_unlock(Unlock::unit("spearman")),
        TechData::new("masonry", "Masonry", Ancient, Infrastructure, 2)
            .with_cost(Science, 20)
            .with_cost(Production, 10)
            .with_prerequisites(&["mining"])
            .with_effect("defense_bonus", ratio(0.05))
            .with_unlock(Unlock::building("city_walls")),
        TechData::new("archery", "Archery", Ancient, Military, 2)
            .with_cost(Science, 20)
            .with_prerequisites(&["agriculture"])
            .with_effect("ranged_attack", ratio(0.1))
            .with_unlock(Unlock::unit("archer")),
        TechData::new("horseback_riding", "Horseback Riding", Ancient, Military, 2)
            .with_cost(Science, 25)
            .with_prerequisites(&["agriculture"])
            .with_effect("movement_bonus", ratio(0.1))
            .with_unlock(Unlock::unit("horseman")),
        // Classical
        TechData::new("iron_working", "Iron Working", Classical, Military, 3)
            .with_cost(Science, 40)
            .with_cost(Production, 20)
            .with_prerequisites(&["bronze_working"])
            .with_effect("attack_bonus", ratio(0.1))
            .with_unlock(Unlock::unit("swordsman")),
        TechData::new("mathematics", "Mathematics", Classical, TechCategory::Science, 3)
            .with_cost(Science, 40)
            .with_prerequisites(&["writing"])
            .with_effect("research_speed", ratio(0.1))
            .with_unlock(Unlock::unit("catapult")),
        TechData::new("currency", "Currency", Classical, Economy, 3)
            .with_cost(Science, 40)
            .with_cost(Gold, 20)
            .with_prerequisites(&["writing", "bronze_working"])
            .with_effect("gold_income", ratio(0.15)),
        TechData::new("philosophy", "Philosophy", Classical, TechCategory::Culture, 3)
            .with_cost(Science, 40)
            .with_cost(Culture, 20)
            .with_prerequisites(&["writing"])
            .with_effect("culture_bonus", ratio(0.15)),
        TechData::new("construction", "Construction", Classical, Infrastructure, 4)
            .with_cost(Science, 50)
            .with_cost(Production, 30)
            .with_prerequisites(&["masonry", "mathematics"])
            .with_effect("production_bonus", ratio(0.1))
            .with_unlock(Unlock::building("aqueduct"))
            .with_unlock(Unlock::building("guard_tower")),
        // Medieval
        TechData::new("feudalism", "Feudalism", Medieval, Military, 5)
            .with_cost(Science, 80)
            .with_cost(Production, 40)
            .with_prerequisites(&["iron_working", "philosophy"])
            .with_effect("defense_bonus", ratio(0.1))
            .with_unlock(Unlock::unit("pikeman"))
            .with_unlock(Unlock::building("castle_walls")),
        TechData::new("engineering", "Engineering", Medieval, Infrastructure, 5)
            .with_cost(Science, 80)
            .with_cost(Production, 50)
            .with_prerequisites(&["construction"])
            .with_effect("production_bonus", ratio(0.15))
            .with_unlock(Unlock::unit("trebuchet"))
            .with_unlock(Unlock::building("watch_tower")),
        TechData::new("theology", "Theology", Medieval, TechCategory::Culture, 5)
            .with_cost(Science, 70)
            .with_cost(Culture, 40)
            .with_prerequisites(&["philosophy"])
            .with_effect("culture_bonus", ratio(0.2)),
        // Renaissance
        TechData::new("astronomy", "Astronomy", Renaissance, TechCategory::Science, 6)
            .with_cost(Science, 120)
            .with_prerequisites(&["mathematics", "theology"])
            .with_effect("research_speed", ratio(0.15)),
        TechData::new("gunpowder", "Gunpowder", Renaissance, Military, 6)
            .with_cost(Science, 120)
            .with_cost(Production, 60)
            .with_prerequisites(&["engineering", "feudalism"])
            .with_effect("attack_bonus", ratio(0.15))
            .with_unlock(Unlock::unit("musketeer")),
        TechData::new("banking", "Banking", Renaissance, Economy, 6)
            .with_cost(Science, 110)
            .with_cost(Gold, 60)
            .with_prerequisites(&["currency", "feudalism"])
            .with_effect("gold_income", ratio(0.2)),
        // Industrial
        TechData::new("industrialization", "Industrialization", Industrial, Economy, 8)
            .with_cost(Science, 200)
            .with_cost(Production, 100)
            .with_prerequisites(&["banking", "gunpowder"])
            .with_effect("production_bonus", ratio(0.25))
            .with_unlock(Unlock::building("factory")),
        TechData::new("steam_power", "Steam Power", Industrial, Infrastructure, 8)
            .with_cost(Science, 200)
            .with_cost(Production, 80)
            .with_prerequisites(&["industrialization"])
            .with_effect("movement_bonus", ratio(0.1))
            .with_unlock(Unlock::unit("ironclad")),
        // Modern
        TechData::new("electricity", "Electricity", Modern, TechCategory::Science, 10)
            .with_cost(Science, 300)
            .with_prerequisites(&["industrialization", "astronomy"])
            .with_effect("research_speed", ratio(0.2))
            .with_unlock(Unlock::building("power_plant")),
        TechData::new("combustion", "Combustion", Modern, Military, 10)
            .with_cost(Science, 300)
            .with_cost(Production, 150)
            .with_prerequisites(&["steam_power"])
            .with_effect("attack_bonus", ratio(0.2))
            .with_unlock(Unlock::unit("tank")),
        // Information
        TechData::new("computers", "Computers", Information, TechCategory::Science, 12)
            .with_cost(Science, 450)
            .with_prerequisites(&["electricity"])
            .with_effect("research_speed", ratio(0.25)),
        // Future
        TechData::new("fusion_power", "Fusion Power", Future, TechCategory::Science, 15)
            .with_cost(Science, 700)
            .with_cost(Production, 300)
            .with_prerequisites(&["computers", "combustion"])
            .with_effect("production_bonus", ratio(0.5))
            .with_effect("research_speed", ratio(0.3))
            .with_unlock(Unlock::building("fusion_plant")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_tables_cover_every_key() {
        let tables = standard_combat_tables();
        assert!(tables.missing_rows().is_empty(), "{:?}", tables.missing_rows());
        assert!(tables.validate().is_ok());
    }

    #[test]
    fn test_standard_unlock_kinds_agree_with_names() {
        for tech in standard_technologies() {
            assert_eq!(
                tech.misclassified_unlocks().count(),
                0,
                "{} has misclassified unlocks",
                tech.id
            );
        }
    }

    #[test]
    fn test_roots() {
        let roots: Vec<_> = standard_technologies()
            .into_iter()
            .filter(TechData::is_root)
            .map(|t| t.id.0)
            .collect();
        assert_eq!(roots, vec!["agriculture", "mining", "writing"]);
    }
}
