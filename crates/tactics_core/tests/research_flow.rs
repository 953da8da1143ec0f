//! End-to-end research progression over the standard and synthetic trees.

use std::collections::BTreeSet;

use proptest::prelude::*;
use tactics_core::data::Era;
use tactics_core::economy::{Resource, Stockpile};
use tactics_core::error::GameError;
use tactics_core::ids::TechId;
use tactics_core::research::PlayerResearchState;
use tactics_core::rules::RuleSet;
use tactics_test_utils::fixtures::{chain_rules, standard, wealthy_player};

fn research_all(
    rules: &RuleSet,
    mut state: PlayerResearchState,
    order: &[TechId],
) -> PlayerResearchState {
    let scheduler = rules.scheduler();
    for tech in order {
        if state.has_researched(tech.as_str()) {
            continue;
        }
        state = scheduler.start_research(&state, tech).unwrap();
        let remaining = state.current_research.as_ref().unwrap().remaining();
        state = scheduler.advance_research(&state, remaining).unwrap();
    }
    state
}

#[test]
fn test_research_whole_tree_reaches_future() {
    let rules = standard();
    let order = rules
        .tech_graph()
        .research_order(&TechId::from("fusion_power"))
        .unwrap();
    let state = research_all(&rules, wealthy_player("p1", 1_000_000), &order);

    assert_eq!(state.current_era, Era::Future);
    assert!(state.has_researched("fusion_power"));
    assert_eq!(state.effects, rules.tech_graph().combined_effects(&state.researched));

    let unique: BTreeSet<_> = state.researched.iter().collect();
    assert_eq!(unique.len(), state.researched.len());
}

#[test]
fn test_technology_path_may_skip_other_prerequisites() {
    let rules = standard();
    let path = rules
        .tech_graph()
        .technology_path(&TechId::from("currency"))
        .unwrap();
    // Shortest branch goes through writing; bronze_working is not on it.
    assert_eq!(path, vec![TechId::from("writing"), TechId::from("currency")]);

    let scheduler = rules.scheduler();
    let mut state = wealthy_player("p1", 1000);
    state = scheduler.start_research(&state, &path[0]).unwrap();
    state = scheduler.advance_research(&state, 10).unwrap();

    let err = scheduler.start_research(&state, &path[1]).unwrap_err();
    assert!(matches!(
        err,
        GameError::PrerequisitesNotMet { ref missing, .. } if missing == &vec![TechId::from("bronze_working")]
    ));
}

#[test]
fn test_available_grows_as_research_completes() {
    let rules = standard();
    let scheduler = rules.scheduler();
    let mut state = PlayerResearchState::new("p1")
        .with_resources(Stockpile::new().with(Resource::Science, 100));

    let before = scheduler.available_technologies(&state);
    assert_eq!(before.len(), 3);

    state = scheduler
        .start_research(&state, &TechId::from("agriculture"))
        .unwrap();
    state = scheduler.advance_research(&state, 1).unwrap();

    let after: BTreeSet<_> = scheduler
        .available_technologies(&state)
        .into_iter()
        .map(|t| t.0)
        .collect();
    assert!(after.contains("archery"));
    assert!(after.contains("horseback_riding"));
    assert!(!after.contains("agriculture"));
}

proptest! {
    /// Repeated advances complete the research exactly once.
    #[test]
    fn prop_repeated_advance_applies_once(
        len in 1usize..12,
        steps in proptest::collection::vec(0u32..3, 1..20),
    ) {
        let rules = chain_rules(len);
        let scheduler = rules.scheduler();
        let target = TechId::new(format!("t{}", len - 1));

        let order = rules.tech_graph().research_order(&target).unwrap();
        prop_assert_eq!(order.len(), len);

        let mut state = wealthy_player("p1", 100);
        for tech in &order[..len - 1] {
            state = scheduler.start_research(&state, tech).unwrap();
            state = scheduler.advance_research(&state, 1).unwrap();
        }

        state = scheduler.start_research(&state, &target).unwrap();
        for points in &steps {
            state = scheduler.advance_research(&state, *points).unwrap();
        }
        // Finish if the random steps fell short.
        state = scheduler.advance_research(&state, 1).unwrap();
        state = scheduler.advance_research(&state, 1).unwrap();

        prop_assert!(state.current_research.is_none());
        prop_assert_eq!(state.researched.len(), len);
        prop_assert_eq!(state.effects["chain"], tactics_core::math::Fixed::from_num(len));
    }
}
