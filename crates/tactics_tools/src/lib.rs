//! # Tactics Development Tools
//!
//! Command-line tools for development:
//! - Rule file validation and linting
//! - Tech tree inspection
//! - Seeded duels between stock units
//! - Turn log replay

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod duel;
pub mod error;
pub mod inspect;
pub mod replay;
pub mod validate;
