//! Per-unit reward weights for produced resources.

use clipworks_core::fixed::fixed64_to_f64;
use clipworks_core::resource::{ResourceKind, ResourceMap};
use serde::{Deserialize, Serialize};

/// Reward paid per unit of each kind produced in a step. Kinds without a
/// weight pay nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardWeights {
    pub paperclip: f64,
    pub steel: f64,
    pub coal_ore: f64,
    pub iron_ore: f64,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            paperclip: 2.0,
            steel: 0.5,
            coal_ore: 0.1,
            iron_ore: 0.1,
        }
    }
}

impl RewardWeights {
    pub fn weight(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Paperclip => self.paperclip,
            ResourceKind::Steel => self.steel,
            ResourceKind::CoalOre => self.coal_ore,
            ResourceKind::IronOre => self.iron_ore,
            ResourceKind::CoalDeposit | ResourceKind::IronDeposit => 0.0,
        }
    }

    /// Weighted sum over a production map.
    pub fn score(&self, produced: &ResourceMap) -> f64 {
        produced
            .iter()
            .map(|(kind, q)| fixed64_to_f64(q) * self.weight(kind))
            .sum()
    }
}
