//! Determinism testing utilities.
//!
//! Provides a harness for verifying that rules operations produce
//! identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! Turn logs are only replayable if every client computes bit-identical
//! outcomes. Sources of non-determinism include:
//!
//! - **Floating-point math**: Different CPUs can produce different results.
//!   We use fixed-point arithmetic via [`tactics_core::math::Fixed`] throughout.
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Rule tables and stores use `BTreeMap`.
//!
//! - **System randomness**: Combat draws come from an explicit
//!   [`RandomSource`](tactics_core::random::RandomSource).

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use serde::Serialize;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of turns played per run.
    pub turns: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for deterministic rules).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Rules are non-deterministic!\n\
                 Runs: {}\n\
                 Turns: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.turns,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a scenario multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the scenario
/// * `turns` - Number of turns to play per run
/// * `setup` - Function to create the initial state
/// * `step` - Function to play one turn; receives the turn number
/// * `hash` - Function to compute a state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    turns: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S, u64),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for turn in 0..turns {
            step(&mut state, turn);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        turns,
    }
}

/// Run the same scenario on several threads and collect final hashes.
///
/// Uses scoped threads so `setup` needs no `'static` bound.
///
/// # Panics
///
/// Panics if a worker thread panics.
pub fn run_parallel_scoped<S, Setup, Step, HashFn>(
    threads: usize,
    turns: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S + Sync,
    Step: Fn(&mut S, u64) + Sync,
    HashFn: Fn(&S) -> u64 + Sync,
{
    let hashes: Vec<u64> = thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                scope.spawn(|| {
                    let mut state = setup();
                    for turn in 0..turns {
                        step(&mut state, turn);
                    }
                    hash(&state)
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
    DeterminismResult {
        is_deterministic,
        hashes,
        turns,
    }
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Hash the `bincode` encoding of a snapshot.
///
/// Covers types that hold fixed-point values or maps without implementing
/// [`Hash`] themselves.
///
/// # Panics
///
/// Panics if the value cannot be encoded.
pub fn snapshot_hash<T: Serialize>(value: &T) -> u64 {
    let bytes = bincode::serialize(value).expect("snapshot encodes");
    compute_hash(&bytes)
}

/// Proptest strategies for rules testing.
///
/// These strategies generate random but reproducible inputs for
/// property-based testing of combat and progression.
pub mod strategies {
    use proptest::prelude::*;
    use tactics_core::combat::CombatOptions;
    use tactics_core::data::{Ability, Formation, Terrain, UnitType, Weather};
    use tactics_core::math::Fixed;
    use tactics_core::unit::Unit;

    /// Generate a uniform draw in [0, 1).
    pub fn arb_draw() -> impl Strategy<Value = Fixed> {
        any::<u32>().prop_map(|bits| Fixed::from_bits(i64::from(bits)))
    }

    /// Generate a stat value (1-50).
    pub fn arb_stat() -> impl Strategy<Value = Fixed> {
        (1i32..50i32).prop_map(Fixed::from_num)
    }

    /// Generate health values (1-1000).
    pub fn arb_health() -> impl Strategy<Value = u32> {
        1u32..1000u32
    }

    /// Generate damage values (0-200).
    pub fn arb_damage() -> impl Strategy<Value = u32> {
        0u32..200u32
    }

    /// Generate a level (1-10).
    pub fn arb_level() -> impl Strategy<Value = u32> {
        1u32..=10u32
    }

    /// Generate any unit type.
    pub fn arb_unit_type() -> impl Strategy<Value = UnitType> {
        prop::sample::select(UnitType::ALL)
    }

    /// Generate a unit type that may attack.
    pub fn arb_attacker_type() -> impl Strategy<Value = UnitType> {
        arb_unit_type().prop_filter("buildings cannot attack", |t| *t != UnitType::Building)
    }

    /// Generate situational modifiers.
    pub fn arb_options() -> impl Strategy<Value = CombatOptions> {
        (
            prop::sample::select(Terrain::ALL),
            prop::sample::select(Weather::ALL),
            prop::sample::select(Formation::ALL),
            proptest::option::of(prop::sample::select(Ability::ALL)),
        )
            .prop_map(|(terrain, weather, formation, ability)| CombatOptions {
                terrain,
                weather,
                formation,
                ability,
            })
    }

    /// Generate a living unit of the given type.
    pub fn arb_unit(id: &'static str, unit_type: UnitType) -> impl Strategy<Value = Unit> {
        (arb_health(), arb_stat(), arb_stat(), arb_level(), 0u32..100u32).prop_map(
            move |(health, attack, defense, level, experience)| {
                Unit::new(id, unit_type, health, attack, defense)
                    .with_level(level)
                    .with_experience(experience)
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_determinism_simple() {
        let result = verify_determinism(3, 100, || 0u64, |n, _| *n += 1, |n| *n);

        assert!(result.is_deterministic);
        assert_eq!(result.hashes, vec![100, 100, 100]);
    }

    #[test]
    fn test_detects_divergence() {
        let counter = std::cell::Cell::new(0u64);
        let result = verify_determinism(
            2,
            1,
            || {
                counter.set(counter.get() + 1);
                counter.get()
            },
            |_, _| {},
            |n| *n,
        );
        assert!(!result.is_deterministic);
        assert_eq!(result.unique_hashes().len(), 2);
    }

    #[test]
    fn test_parallel_runs_match() {
        let result = run_parallel_scoped(4, 50, || 1u64, |n, t| *n = n.wrapping_mul(31) ^ t, |n| *n);
        result.assert_deterministic();
    }

    #[test]
    fn test_snapshot_hash_is_stable() {
        let a = snapshot_hash(&vec![1u32, 2, 3]);
        let b = snapshot_hash(&vec![1u32, 2, 3]);
        let c = snapshot_hash(&vec![3u32, 2, 1]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
