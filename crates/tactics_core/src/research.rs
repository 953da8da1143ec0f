//! Per-player research state machine.
//!
//! A player is either idle or researching exactly one technology:
//!
//! ```text
//! Idle --start_research--> Researching --advance_research (complete)--> Idle
//! ```
//!
//! Every operation takes the current snapshot by reference and returns the
//! next one. A failed operation returns an error and no snapshot, so the
//! caller's state is never partially updated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::Era;
use crate::economy::Stockpile;
use crate::error::{GameError, Result};
use crate::ids::{PlayerId, TechId};
use crate::math::{fixed_map_serde, Fixed};
use crate::tech_graph::{add_effects, TechGraph, UnlockedContent};

/// The technology currently being researched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentResearch {
    /// Technology being researched.
    pub tech: TechId,
    /// Research points accumulated so far.
    pub progress: u32,
    /// Research points needed to complete.
    pub total: u32,
}

impl CurrentResearch {
    /// Check if enough points have been accumulated.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.progress >= self.total
    }

    /// Points still needed to complete.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.progress)
    }
}

/// One player's research snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResearchState {
    /// Owning player.
    pub player_id: PlayerId,
    /// Spendable resources.
    pub resources: Stockpile,
    /// Completed technologies, in completion order.
    pub researched: Vec<TechId>,
    /// Research in progress, if any.
    pub current_research: Option<CurrentResearch>,
    /// Accumulated effects of every researched technology.
    #[serde(with = "fixed_map_serde")]
    pub effects: BTreeMap<String, Fixed>,
    /// Highest era among researched technologies.
    pub current_era: Era,
    /// Whether the last update moved the player into a new era.
    pub era_changed: bool,
}

impl PlayerResearchState {
    /// Create an idle player with nothing researched.
    #[must_use]
    pub fn new(player_id: impl Into<PlayerId>) -> Self {
        Self {
            player_id: player_id.into(),
            resources: Stockpile::new(),
            researched: Vec::new(),
            current_research: None,
            effects: BTreeMap::new(),
            current_era: Era::Ancient,
            era_changed: false,
        }
    }

    /// Builder method to set resources.
    #[must_use]
    pub fn with_resources(mut self, resources: Stockpile) -> Self {
        self.resources = resources;
        self
    }

    /// Check if a technology has been researched.
    #[must_use]
    pub fn has_researched(&self, tech: &str) -> bool {
        self.researched.iter().any(|t| t.as_str() == tech)
    }
}

/// Applies research rules from a [`TechGraph`] to player snapshots.
#[derive(Debug, Clone, Copy)]
pub struct ResearchScheduler<'a> {
    graph: &'a TechGraph,
}

impl<'a> ResearchScheduler<'a> {
    /// Create a scheduler over a validated graph.
    #[must_use]
    pub const fn new(graph: &'a TechGraph) -> Self {
        Self { graph }
    }

    /// Begin researching `tech`, paying its full cost up front.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`GameError::UnknownTechnology`] if `tech` is undefined.
    /// - [`GameError::AlreadyResearched`] if `tech` is already researched.
    /// - [`GameError::ResearchInProgress`] if another technology is underway.
    /// - [`GameError::PrerequisitesNotMet`] listing every missing prerequisite.
    /// - [`GameError::InsufficientResources`] if any cost is not covered.
    pub fn start_research(
        &self,
        state: &PlayerResearchState,
        tech: &TechId,
    ) -> Result<PlayerResearchState> {
        let data = self.graph.require(tech)?;

        if state.has_researched(tech.as_str()) {
            return Err(GameError::AlreadyResearched(tech.clone()));
        }
        if let Some(current) = &state.current_research {
            return Err(GameError::ResearchInProgress(current.tech.clone()));
        }

        let missing: Vec<TechId> = data
            .prerequisites
            .iter()
            .filter(|p| !state.has_researched(p.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(GameError::PrerequisitesNotMet {
                tech: tech.clone(),
                missing,
            });
        }

        let mut next = state.clone();
        next.resources.spend(&data.cost)?;
        next.current_research = Some(CurrentResearch {
            tech: tech.clone(),
            progress: 0,
            total: data.research_time,
        });
        next.era_changed = false;

        tracing::debug!(player = %state.player_id, %tech, total = data.research_time, "Research started");
        Ok(next)
    }

    /// Add research points to the current research.
    ///
    /// Completing a technology appends it to the researched list, folds its
    /// effects in once, clears the current research and re-derives the era.
    /// Points beyond the requirement are discarded. Idle players are
    /// returned unchanged apart from `era_changed` being cleared.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownTechnology`] if the snapshot refers to a
    /// technology this graph does not define.
    pub fn advance_research(
        &self,
        state: &PlayerResearchState,
        points: u32,
    ) -> Result<PlayerResearchState> {
        let mut next = state.clone();
        next.era_changed = false;

        let Some(current) = next.current_research.as_mut() else {
            return Ok(next);
        };
        current.progress = current.progress.saturating_add(points);
        if !current.is_complete() {
            return Ok(next);
        }

        let tech = current.tech.clone();
        let data = self.graph.require(&tech)?;

        next.current_research = None;
        if !next.has_researched(tech.as_str()) {
            next.researched.push(tech.clone());
            add_effects(&mut next.effects, data);
        }

        let era = self.graph.derive_era(&next.researched);
        next.era_changed = era != state.current_era;
        next.current_era = era;

        tracing::debug!(
            player = %state.player_id,
            %tech,
            era = %era,
            era_changed = next.era_changed,
            "Research completed"
        );
        Ok(next)
    }

    /// Sum of the effects of every technology the player has researched.
    #[must_use]
    pub fn combined_effects(&self, state: &PlayerResearchState) -> BTreeMap<String, Fixed> {
        self.graph.combined_effects(&state.researched)
    }

    /// Units and buildings the player has unlocked.
    #[must_use]
    pub fn unlocked_content(&self, state: &PlayerResearchState) -> UnlockedContent {
        self.graph.unlocked_content(&state.researched)
    }

    /// Technologies the player may start researching now.
    #[must_use]
    pub fn available_technologies(&self, state: &PlayerResearchState) -> Vec<TechId> {
        self.graph
            .available_technologies(&state.researched)
            .into_iter()
            .map(|t| t.id.clone())
            .collect()
    }
}
