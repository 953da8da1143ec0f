//! Player resources and research costs.
//!
//! All calculations use integer math for deterministic evaluation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Resources drawn from a player's economy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Food surplus.
    Food,
    /// Industrial output.
    Production,
    /// Treasury.
    Gold,
    /// Research output.
    Science,
    /// Cultural output.
    Culture,
}

impl Resource {
    /// Snake-case name used in rule files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Production => "production",
            Self::Gold => "gold",
            Self::Science => "science",
            Self::Culture => "culture",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amount of each resource required by a technology.
pub type Cost = BTreeMap<Resource, u32>;

/// A player's resource stockpile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stockpile(BTreeMap<Resource, u32>);

impl Stockpile {
    /// Create an empty stockpile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the amount of one resource.
    #[must_use]
    pub fn with(mut self, resource: Resource, amount: u32) -> Self {
        self.0.insert(resource, amount);
        self
    }

    /// Amount currently held of a resource.
    #[must_use]
    pub fn amount(&self, resource: Resource) -> u32 {
        self.0.get(&resource).copied().unwrap_or(0)
    }

    /// Add resources to the stockpile.
    pub fn deposit(&mut self, resource: Resource, amount: u32) {
        let entry = self.0.entry(resource).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Check if every resource in `cost` is covered.
    #[must_use]
    pub fn can_afford(&self, cost: &Cost) -> bool {
        self.check_affordable(cost).is_ok()
    }

    /// Find the first resource in `cost` that is not covered.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InsufficientResources`] naming the short resource.
    pub fn check_affordable(&self, cost: &Cost) -> Result<()> {
        for (&resource, &required) in cost {
            let available = self.amount(resource);
            if available < required {
                return Err(GameError::InsufficientResources {
                    resource,
                    required,
                    available,
                });
            }
        }
        Ok(())
    }

    /// Spend every resource in `cost`.
    ///
    /// All resources are checked before any is deducted; on failure the
    /// stockpile is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InsufficientResources`] if any resource is short.
    pub fn spend(&mut self, cost: &Cost) -> Result<()> {
        self.check_affordable(cost)?;
        for (&resource, &required) in cost {
            if let Some(held) = self.0.get_mut(&resource) {
                *held -= required;
            }
        }
        Ok(())
    }
}

impl FromIterator<(Resource, u32)> for Stockpile {
    fn from_iter<I: IntoIterator<Item = (Resource, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cost(entries: &[(Resource, u32)]) -> Cost {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_spend_deducts_all() {
        let mut stock = Stockpile::new()
            .with(Resource::Science, 30)
            .with(Resource::Production, 15);
        stock
            .spend(&cost(&[(Resource::Science, 20), (Resource::Production, 10)]))
            .unwrap();
        assert_eq!(stock.amount(Resource::Science), 10);
        assert_eq!(stock.amount(Resource::Production), 5);
    }

    #[test]
    fn test_spend_is_all_or_nothing() {
        let mut stock = Stockpile::new()
            .with(Resource::Science, 30)
            .with(Resource::Production, 5);
        let before = stock.clone();

        let err = stock
            .spend(&cost(&[(Resource::Science, 20), (Resource::Production, 10)]))
            .unwrap_err();

        assert!(matches!(
            err,
            GameError::InsufficientResources {
                resource: Resource::Production,
                required: 10,
                available: 5,
            }
        ));
        assert_eq!(stock, before);
    }

    #[test]
    fn test_missing_resource_counts_as_zero() {
        let stock = Stockpile::new();
        assert_eq!(stock.amount(Resource::Gold), 0);
        assert!(!stock.can_afford(&cost(&[(Resource::Gold, 1)])));
        assert!(stock.can_afford(&Cost::new()));
    }

    #[test]
    fn test_deposit_saturates() {
        let mut stock = Stockpile::new().with(Resource::Food, u32::MAX - 1);
        stock.deposit(Resource::Food, 10);
        assert_eq!(stock.amount(Resource::Food), u32::MAX);
    }
}
