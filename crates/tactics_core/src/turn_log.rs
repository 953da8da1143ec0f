//! Append-only turn log.
//!
//! Orchestrators record every accepted state change here. Replaying a log
//! against the same rule set and initial records reproduces the same final
//! snapshots.

use serde::{Deserialize, Serialize};

use crate::combat::{CombatOptions, CombatResult};
use crate::data::Era;
use crate::error::{GameError, Result};
use crate::ids::{PlayerId, TechId, UnitId};
use crate::math::{fixed_serde, Fixed};

/// Turn log format version for compatibility.
pub const TURN_LOG_VERSION: u32 = 1;

/// One accepted state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// An attack was resolved.
    CombatResolved {
        /// Attacking unit.
        attacker: UnitId,
        /// Defending unit.
        defender: UnitId,
        /// Situational modifiers in effect.
        options: CombatOptions,
        /// Random draw used for the critical check.
        #[serde(with = "fixed_serde")]
        draw: Fixed,
        /// Outcome of the attack.
        result: CombatResult,
    },
    /// A unit's health reached zero.
    UnitDefeated {
        /// The defeated unit.
        unit: UnitId,
    },
    /// A unit gained a level.
    UnitLeveledUp {
        /// The unit.
        unit: UnitId,
        /// Its new level.
        level: u32,
    },
    /// A player started researching a technology.
    ResearchStarted {
        /// The player.
        player: PlayerId,
        /// Technology being researched.
        tech: TechId,
    },
    /// A player completed a technology.
    ResearchCompleted {
        /// The player.
        player: PlayerId,
        /// Completed technology.
        tech: TechId,
    },
    /// A player entered a new era.
    EraAdvanced {
        /// The player.
        player: PlayerId,
        /// The new era.
        era: Era,
    },
}

/// Destination for turn events.
pub trait TurnLog {
    /// Append an event to the end of the log.
    fn append(&mut self, event: TurnEvent) -> Result<()>;

    /// Every event recorded so far, oldest first.
    fn events(&self) -> &[TurnEvent];
}

/// Serialized form of a [`MemoryTurnLog`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TurnLogFile {
    version: u32,
    seed: u64,
    events: Vec<TurnEvent>,
}

/// In-memory turn log that can be encoded to bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTurnLog {
    seed: u64,
    events: Vec<TurnEvent>,
}

impl MemoryTurnLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty log recording the seed of the random source in use.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            events: Vec::new(),
        }
    }

    /// Seed recorded with this log.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if no events have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Encode the log with its format version.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Serialization`] if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let file = TurnLogFile {
            version: TURN_LOG_VERSION,
            seed: self.seed,
            events: self.events.clone(),
        };
        bincode::serialize(&file)
            .map_err(|e| GameError::Serialization(format!("Failed to serialize turn log: {e}")))
    }

    /// Decode a log produced by [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Serialization`] if the bytes are malformed or
    /// were written by a different format version.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let file: TurnLogFile = bincode::deserialize(bytes)
            .map_err(|e| GameError::Serialization(format!("Failed to deserialize turn log: {e}")))?;

        if file.version != TURN_LOG_VERSION {
            return Err(GameError::Serialization(format!(
                "Turn log version mismatch: expected {TURN_LOG_VERSION}, got {}",
                file.version
            )));
        }

        Ok(Self {
            seed: file.seed,
            events: file.events,
        })
    }
}

impl TurnLog for MemoryTurnLog {
    fn append(&mut self, event: TurnEvent) -> Result<()> {
        self.events.push(event);
        Ok(())
    }

    fn events(&self) -> &[TurnEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> MemoryTurnLog {
        let mut log = MemoryTurnLog::with_seed(42);
        log.append(TurnEvent::ResearchStarted {
            player: "p1".into(),
            tech: "mining".into(),
        })
        .unwrap();
        log.append(TurnEvent::CombatResolved {
            attacker: "a".into(),
            defender: "b".into(),
            options: CombatOptions::default(),
            draw: Fixed::from_num(0.25),
            result: CombatResult {
                damage: 12,
                is_critical: false,
                experience_gained: 10,
            },
        })
        .unwrap();
        log
    }

    #[test]
    fn test_log_is_append_only_in_order() {
        let log = sample_log();
        assert_eq!(log.len(), 2);
        assert!(matches!(log.events()[0], TurnEvent::ResearchStarted { .. }));
        assert!(matches!(log.events()[1], TurnEvent::CombatResolved { .. }));
    }

    #[test]
    fn test_bytes_round_trip() {
        let log = sample_log();
        let bytes = log.to_bytes().unwrap();
        let restored = MemoryTurnLog::from_bytes(&bytes).unwrap();
        assert_eq!(restored, log);
        assert_eq!(restored.seed(), 42);
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let file = TurnLogFile {
            version: TURN_LOG_VERSION + 1,
            seed: 0,
            events: Vec::new(),
        };
        let bytes = bincode::serialize(&file).unwrap();
        let err = MemoryTurnLog::from_bytes(&bytes).unwrap_err();
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(MemoryTurnLog::from_bytes(&[0xFF, 0x01]).is_err());
    }
}
