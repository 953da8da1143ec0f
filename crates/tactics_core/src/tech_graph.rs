//! Technology prerequisite graph.
//!
//! The graph is validated once on construction: identifiers are unique,
//! every prerequisite names a defined technology and the prerequisite
//! relation is acyclic. Every query afterwards can assume a DAG.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::data::{Era, TechData, UnlockKind};
use crate::error::{GameError, Result};
use crate::ids::TechId;
use crate::math::Fixed;

/// Units and buildings made available by a researched set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnlockedContent {
    /// Unit type identifiers, in research order, without duplicates.
    pub units: Vec<String>,
    /// Building type identifiers, in research order, without duplicates.
    pub buildings: Vec<String>,
}

/// Validated, immutable technology tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechGraph {
    technologies: Vec<TechData>,
    index: BTreeMap<TechId, usize>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    InProgress,
    Done,
}

impl TechGraph {
    /// Build and validate a graph.
    ///
    /// # Errors
    ///
    /// - [`GameError::DuplicateTechnology`] if two entries share an id.
    /// - [`GameError::UnknownTechnology`] if a prerequisite is undefined.
    /// - [`GameError::CyclicPrerequisite`] if the prerequisites form a cycle.
    pub fn new(technologies: Vec<TechData>) -> Result<Self> {
        let mut index = BTreeMap::new();
        for (i, tech) in technologies.iter().enumerate() {
            if index.insert(tech.id.clone(), i).is_some() {
                return Err(GameError::DuplicateTechnology(tech.id.clone()));
            }
        }

        for tech in &technologies {
            if let Some(missing) = tech.prerequisites.iter().find(|p| !index.contains_key(*p)) {
                return Err(GameError::UnknownTechnology(missing.clone()));
            }
        }

        let graph = Self {
            technologies,
            index,
        };
        graph.check_acyclic()?;

        tracing::debug!(technologies = graph.len(), "Tech graph validated");
        Ok(graph)
    }

    fn check_acyclic(&self) -> Result<()> {
        let mut state = vec![Visit::Unvisited; self.technologies.len()];
        let mut path = Vec::new();
        for start in 0..self.technologies.len() {
            if state[start] == Visit::Unvisited {
                self.visit(start, &mut state, &mut path)?;
            }
        }
        Ok(())
    }

    fn visit(&self, node: usize, state: &mut [Visit], path: &mut Vec<usize>) -> Result<()> {
        state[node] = Visit::InProgress;
        path.push(node);

        for prereq in &self.technologies[node].prerequisites {
            let Some(&next) = self.index.get(prereq) else {
                continue;
            };
            match state[next] {
                Visit::Done => {}
                Visit::Unvisited => self.visit(next, state, path)?,
                Visit::InProgress => {
                    let start = path.iter().position(|&n| n == next).unwrap_or(0);
                    let cycle = path[start..]
                        .iter()
                        .chain(std::iter::once(&next))
                        .map(|&n| self.technologies[n].id.clone())
                        .collect();
                    return Err(GameError::CyclicPrerequisite { cycle });
                }
            }
        }

        path.pop();
        state[node] = Visit::Done;
        Ok(())
    }

    /// Number of technologies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.technologies.len()
    }

    /// Check if the graph has no technologies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.technologies.is_empty()
    }

    /// Look up a technology by id.
    #[must_use]
    pub fn technology(&self, id: &str) -> Option<&TechData> {
        self.index.get(id).map(|&i| &self.technologies[i])
    }

    /// Look up a technology by id, failing if it is undefined.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownTechnology`] if `id` is not in the graph.
    pub fn require(&self, id: &TechId) -> Result<&TechData> {
        self.technology(id.as_str())
            .ok_or_else(|| GameError::UnknownTechnology(id.clone()))
    }

    /// Iterate over technologies in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &TechData> {
        self.technologies.iter()
    }

    /// Technologies with no prerequisites.
    pub fn roots(&self) -> impl Iterator<Item = &TechData> {
        self.technologies.iter().filter(|t| t.is_root())
    }

    /// Every unresearched technology whose prerequisites are all in `researched`.
    #[must_use]
    pub fn available_technologies(&self, researched: &[TechId]) -> Vec<&TechData> {
        let done: BTreeSet<&TechId> = researched.iter().collect();
        self.technologies
            .iter()
            .filter(|tech| !done.contains(&tech.id))
            .filter(|tech| tech.prerequisites.iter().all(|p| done.contains(p)))
            .collect()
    }

    /// Shortest single prerequisite chain ending at `target`.
    ///
    /// At each step the prerequisite with the shortest chain is followed;
    /// ties go to the prerequisite listed first. Other prerequisites of
    /// technologies along the chain are not included, see
    /// [`research_order`](Self::research_order) for the full closure.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownTechnology`] if `target` is undefined.
    pub fn technology_path(&self, target: &TechId) -> Result<Vec<TechId>> {
        self.require(target)?;
        let mut memo = BTreeMap::new();
        Ok(self.shortest_chain(target, &mut memo))
    }

    fn shortest_chain(&self, id: &TechId, memo: &mut BTreeMap<TechId, Vec<TechId>>) -> Vec<TechId> {
        if let Some(chain) = memo.get(id) {
            return chain.clone();
        }

        let mut best: Option<Vec<TechId>> = None;
        if let Some(tech) = self.technology(id.as_str()) {
            for prereq in &tech.prerequisites {
                let chain = self.shortest_chain(prereq, memo);
                if best.as_ref().map_or(true, |b| chain.len() < b.len()) {
                    best = Some(chain);
                }
            }
        }

        let mut chain = best.unwrap_or_default();
        chain.push(id.clone());
        memo.insert(id.clone(), chain.clone());
        chain
    }

    /// Every technology needed to research `target`, in an order where each
    /// one follows all of its prerequisites. Ends with `target`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownTechnology`] if `target` is undefined.
    pub fn research_order(&self, target: &TechId) -> Result<Vec<TechId>> {
        self.require(target)?;
        let mut seen = BTreeSet::new();
        let mut order = Vec::new();
        self.post_order(target, &mut seen, &mut order);
        Ok(order)
    }

    fn post_order(&self, id: &TechId, seen: &mut BTreeSet<TechId>, order: &mut Vec<TechId>) {
        if !seen.insert(id.clone()) {
            return;
        }
        if let Some(tech) = self.technology(id.as_str()) {
            for prereq in &tech.prerequisites {
                self.post_order(prereq, seen, order);
            }
        }
        order.push(id.clone());
    }

    /// Sum of the effects of every researched technology.
    ///
    /// Identifiers not in the graph contribute nothing.
    #[must_use]
    pub fn combined_effects(&self, researched: &[TechId]) -> BTreeMap<String, Fixed> {
        let mut effects = BTreeMap::new();
        for tech in researched.iter().filter_map(|id| self.technology(id.as_str())) {
            add_effects(&mut effects, tech);
        }
        effects
    }

    /// Units and buildings unlocked by the researched set.
    #[must_use]
    pub fn unlocked_content(&self, researched: &[TechId]) -> UnlockedContent {
        let mut content = UnlockedContent::default();
        for tech in researched.iter().filter_map(|id| self.technology(id.as_str())) {
            for unlock in &tech.unlocks {
                let bucket = match unlock.kind {
                    UnlockKind::Unit => &mut content.units,
                    UnlockKind::Building => &mut content.buildings,
                };
                if !bucket.contains(&unlock.id) {
                    bucket.push(unlock.id.clone());
                }
            }
        }
        content
    }

    /// Highest era among the researched set, or [`Era::Ancient`] if empty.
    #[must_use]
    pub fn derive_era(&self, researched: &[TechId]) -> Era {
        researched
            .iter()
            .filter_map(|id| self.technology(id.as_str()))
            .map(|tech| tech.era)
            .max()
            .unwrap_or_default()
    }
}

/// Fold a technology's effects into an accumulated effect map.
pub(crate) fn add_effects(effects: &mut BTreeMap<String, Fixed>, tech: &TechData) {
    for (name, &value) in &tech.effects {
        let total = effects.entry(name.clone()).or_insert(Fixed::ZERO);
        *total = total.saturating_add(value);
    }
}
