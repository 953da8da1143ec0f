//! Random source seam.
//!
//! Combat resolution never generates randomness itself. Callers pass a
//! draw obtained from a [`RandomSource`], and replays reuse recorded draws.

use crate::math::Fixed;

/// Supplier of uniform draws in [0, 1).
pub trait RandomSource {
    /// Produce the next draw.
    fn draw(&mut self) -> Fixed;
}

/// Deterministic linear congruential generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRandom {
    seed: u64,
    state: u64,
}

impl SeededRandom {
    /// Create a generator from a seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            state: seed.wrapping_add(0x9E37_79B9_7F4A_7C15),
        }
    }

    /// Seed this generator was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(0x5851_F42D_4C95_7F2D)
            .wrapping_add(0x1405_7B7E_F767_814F);
        self.state
    }
}

impl RandomSource for SeededRandom {
    fn draw(&mut self) -> Fixed {
        // Upper 32 bits become the fractional part.
        Fixed::from_bits(i64::try_from(self.next_u64() >> 32).unwrap_or(0))
    }
}

/// Replays a fixed sequence of draws, wrapping around at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRandom {
    draws: Vec<Fixed>,
    next: usize,
}

impl SequenceRandom {
    /// Create a source that yields `draws` in order.
    ///
    /// An empty sequence always yields zero.
    #[must_use]
    pub fn new(draws: Vec<Fixed>) -> Self {
        Self { draws, next: 0 }
    }
}

impl RandomSource for SequenceRandom {
    fn draw(&mut self) -> Fixed {
        if self.draws.is_empty() {
            return Fixed::ZERO;
        }
        let value = self.draws[self.next % self.draws.len()];
        self.next = self.next.wrapping_add(1);
        value
    }
}
