//! Rules benchmarks for tactics_core.
//!
//! Run with: `cargo bench -p tactics_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tactics_core::combat::{resolve, CombatOptions};
use tactics_core::data::{Ability, Formation, Terrain, UnitType, Weather};
use tactics_core::economy::{Resource, Stockpile};
use tactics_core::ids::TechId;
use tactics_core::math::{ratio, Fixed};
use tactics_core::research::PlayerResearchState;
use tactics_core::rules::RuleSet;
use tactics_core::unit::Unit;

/// Benchmarks a single attack with every modifier table consulted.
pub fn combat_benchmark(c: &mut Criterion) {
    let rules = RuleSet::standard().unwrap();
    let attacker = Unit::new(
        "a",
        UnitType::Cavalry,
        100,
        Fixed::from_num(20),
        Fixed::from_num(8),
    )
    .with_level(4);
    let defender = Unit::new(
        "d",
        UnitType::Infantry,
        100,
        Fixed::from_num(12),
        Fixed::from_num(10),
    );
    let options = CombatOptions::default()
        .with_terrain(Terrain::Hills)
        .with_weather(Weather::Fog)
        .with_formation(Formation::Wedge)
        .with_ability(Ability::Charge);

    c.bench_function("resolve_attack", |b| {
        b.iter(|| {
            resolve(
                black_box(&rules),
                black_box(&attacker),
                black_box(&defender),
                black_box(&options),
                black_box(ratio(0.42)),
            )
        })
    });
}

/// Benchmarks tech graph queries and a full research run.
pub fn research_benchmark(c: &mut Criterion) {
    let rules = RuleSet::standard().unwrap();
    let target = TechId::from("fusion_power");
    let order = rules.tech_graph().research_order(&target).unwrap();

    c.bench_function("research_order", |b| {
        b.iter(|| rules.tech_graph().research_order(black_box(&target)))
    });

    c.bench_function("research_whole_tree", |b| {
        b.iter(|| {
            let scheduler = rules.scheduler();
            let resources = Stockpile::new()
                .with(Resource::Science, u32::MAX)
                .with(Resource::Production, u32::MAX)
                .with(Resource::Gold, u32::MAX)
                .with(Resource::Culture, u32::MAX);
            let mut state = PlayerResearchState::new("bench").with_resources(resources);
            for tech in &order {
                state = scheduler.start_research(&state, tech).unwrap();
                state = scheduler.advance_research(&state, u32::MAX).unwrap();
            }
            black_box(state)
        })
    });
}

criterion_group!(benches, combat_benchmark, research_benchmark);
criterion_main!(benches);
