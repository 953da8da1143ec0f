//! Record store seam.
//!
//! Orchestrators load snapshots from a [`RecordStore`], run the pure core
//! and save the returned snapshots. Durable formats live outside this crate;
//! [`MemoryStore`] is the in-process reference implementation.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{GameError, RecordKind, Result};
use crate::ids::{PlayerId, UnitId};
use crate::research::PlayerResearchState;
use crate::unit::Unit;

/// Persistent storage for unit and player snapshots.
///
/// Each call is atomic on its own. Callers never hold references into the
/// store; every load returns an owned snapshot.
pub trait RecordStore {
    /// Load a unit snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if no unit has this id.
    fn load_unit(&self, id: &UnitId) -> Result<Unit>;

    /// Insert or replace a unit snapshot.
    fn save_unit(&mut self, unit: &Unit) -> Result<()>;

    /// Load a player's research snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if no player has this id.
    fn load_player_state(&self, id: &PlayerId) -> Result<PlayerResearchState>;

    /// Insert or replace a player's research snapshot.
    fn save_player_state(&mut self, state: &PlayerResearchState) -> Result<()>;
}

/// In-memory store holding `bincode`-encoded snapshots.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    units: BTreeMap<UnitId, Vec<u8>>,
    players: BTreeMap<PlayerId, Vec<u8>>,
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| GameError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| GameError::Serialization(e.to_string()))
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored units.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Number of stored players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Every stored unit, in id order.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Serialization`] if a snapshot cannot be decoded.
    pub fn units(&self) -> Result<Vec<Unit>> {
        self.units.values().map(|bytes| decode(bytes)).collect()
    }
}

impl RecordStore for MemoryStore {
    fn load_unit(&self, id: &UnitId) -> Result<Unit> {
        let bytes = self.units.get(id).ok_or_else(|| GameError::NotFound {
            kind: RecordKind::Unit,
            id: id.to_string(),
        })?;
        decode(bytes)
    }

    fn save_unit(&mut self, unit: &Unit) -> Result<()> {
        let bytes = encode(unit)?;
        self.units.insert(unit.id.clone(), bytes);
        Ok(())
    }

    fn load_player_state(&self, id: &PlayerId) -> Result<PlayerResearchState> {
        let bytes = self.players.get(id).ok_or_else(|| GameError::NotFound {
            kind: RecordKind::Player,
            id: id.to_string(),
        })?;
        decode(bytes)
    }

    fn save_player_state(&mut self, state: &PlayerResearchState) -> Result<()> {
        let bytes = encode(state)?;
        self.players.insert(state.player_id.clone(), bytes);
        Ok(())
    }
}
