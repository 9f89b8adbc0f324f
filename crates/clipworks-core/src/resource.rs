//! Resource kinds and the dense per-kind quantity map.

use crate::fixed::Quantity;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

// ---------------------------------------------------------------------------
// ResourceKind
// ---------------------------------------------------------------------------

/// Every kind of resource that can exist on the map.
///
/// Deposits are raw terrain stock: belts never move them, only extractors
/// draw from them. The remaining four kinds are transferable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    CoalDeposit,
    IronDeposit,
    CoalOre,
    IronOre,
    Steel,
    Paperclip,
}

impl ResourceKind {
    /// Number of resource kinds.
    pub const COUNT: usize = 6;

    /// All kinds, in index order.
    pub const ALL: [ResourceKind; Self::COUNT] = [
        ResourceKind::CoalDeposit,
        ResourceKind::IronDeposit,
        ResourceKind::CoalOre,
        ResourceKind::IronOre,
        ResourceKind::Steel,
        ResourceKind::Paperclip,
    ];

    /// Kinds a belt is allowed to carry.
    pub const TRANSFERABLE: [ResourceKind; 4] = [
        ResourceKind::CoalOre,
        ResourceKind::IronOre,
        ResourceKind::Steel,
        ResourceKind::Paperclip,
    ];

    /// Dense index for array-backed storage.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_deposit(self) -> bool {
        matches!(self, ResourceKind::CoalDeposit | ResourceKind::IronDeposit)
    }

    pub const fn is_transferable(self) -> bool {
        !self.is_deposit()
    }

    /// The ore an extractor yields from this deposit, if this is a deposit.
    pub const fn extracted_ore(self) -> Option<ResourceKind> {
        match self {
            ResourceKind::CoalDeposit => Some(ResourceKind::CoalOre),
            ResourceKind::IronDeposit => Some(ResourceKind::IronOre),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ResourceMap
// ---------------------------------------------------------------------------

/// A quantity for every [`ResourceKind`], stored densely.
///
/// Used for ledger cells, global totals, and per-tick production reports.
/// Absent kinds read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceMap {
    quantities: [Quantity; ResourceKind::COUNT],
}

impl ResourceMap {
    pub const fn new() -> Self {
        Self {
            quantities: [Quantity::ZERO; ResourceKind::COUNT],
        }
    }

    #[inline]
    pub fn get(&self, kind: ResourceKind) -> Quantity {
        self.quantities[kind.index()]
    }

    #[inline]
    pub fn set(&mut self, kind: ResourceKind, quantity: Quantity) {
        self.quantities[kind.index()] = quantity;
    }

    /// Add `amount` to `kind` (amount may be negative). Saturates at the
    /// bounds of [`Quantity`].
    #[inline]
    pub fn add(&mut self, kind: ResourceKind, amount: Quantity) {
        let slot = &mut self.quantities[kind.index()];
        *slot = slot.saturating_add(amount);
    }

    /// How much more of `kind` fits before the quantity saturates.
    #[inline]
    pub fn headroom(&self, kind: ResourceKind) -> Quantity {
        Quantity::MAX.saturating_sub(self.get(kind))
    }

    /// Iterate over `(kind, quantity)` for every kind, including zeros.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, Quantity)> + '_ {
        ResourceKind::ALL.iter().map(|&k| (k, self.get(k)))
    }

    /// Iterate over kinds whose quantity is non-zero.
    pub fn non_zero(&self) -> impl Iterator<Item = (ResourceKind, Quantity)> + '_ {
        self.iter().filter(|(_, q)| *q != Quantity::ZERO)
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.iter().all(|q| *q == Quantity::ZERO)
    }

    /// Sum over the transferable (non-deposit) kinds.
    pub fn transferable_total(&self) -> Quantity {
        ResourceKind::TRANSFERABLE
            .iter()
            .map(|&k| self.get(k))
            .fold(Quantity::ZERO, |acc, q| acc.saturating_add(q))
    }

    /// Element-wise accumulate another map into this one.
    pub fn accumulate(&mut self, other: &ResourceMap) {
        for (a, b) in self.quantities.iter_mut().zip(other.quantities.iter()) {
            *a = a.saturating_add(*b);
        }
    }
}

impl Index<ResourceKind> for ResourceMap {
    type Output = Quantity;

    fn index(&self, kind: ResourceKind) -> &Quantity {
        &self.quantities[kind.index()]
    }
}

impl IndexMut<ResourceKind> for ResourceMap {
    fn index_mut(&mut self, kind: ResourceKind) -> &mut Quantity {
        &mut self.quantities[kind.index()]
    }
}

impl FromIterator<(ResourceKind, Quantity)> for ResourceMap {
    fn from_iter<I: IntoIterator<Item = (ResourceKind, Quantity)>>(iter: I) -> Self {
        let mut map = ResourceMap::new();
        for (kind, q) in iter {
            map.add(kind, q);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(v: f64) -> Quantity {
        Quantity::from_num(v)
    }

    #[test]
    fn add_saturates_instead_of_wrapping() {
        let mut map = ResourceMap::new();
        map.set(ResourceKind::Steel, Quantity::MAX - q(1.0));
        assert_eq!(map.headroom(ResourceKind::Steel), q(1.0));
        map.add(ResourceKind::Steel, q(4.0));
        assert_eq!(map[ResourceKind::Steel], Quantity::MAX);
        assert_eq!(map.headroom(ResourceKind::Steel), Quantity::ZERO);
    }

    #[test]
    fn indices_are_dense_and_ordered() {
        for (i, kind) in ResourceKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn deposits_are_not_transferable() {
        assert!(ResourceKind::CoalDeposit.is_deposit());
        assert!(ResourceKind::IronDeposit.is_deposit());
        for kind in ResourceKind::TRANSFERABLE {
            assert!(kind.is_transferable());
        }
    }

    #[test]
    fn deposits_map_to_matching_ore() {
        assert_eq!(
            ResourceKind::CoalDeposit.extracted_ore(),
            Some(ResourceKind::CoalOre)
        );
        assert_eq!(
            ResourceKind::IronDeposit.extracted_ore(),
            Some(ResourceKind::IronOre)
        );
        assert_eq!(ResourceKind::Steel.extracted_ore(), None);
    }

    #[test]
    fn map_defaults_to_zero() {
        let map = ResourceMap::new();
        assert!(map.is_empty());
        assert_eq!(map.get(ResourceKind::Steel), Quantity::ZERO);
        assert_eq!(map.non_zero().count(), 0);
    }

    #[test]
    fn map_add_and_index() {
        let mut map = ResourceMap::new();
        map.add(ResourceKind::CoalOre, q(2.5));
        map[ResourceKind::CoalOre] += q(0.5);
        map.set(ResourceKind::CoalDeposit, q(100.0));
        assert_eq!(map[ResourceKind::CoalOre], q(3.0));
        assert_eq!(map.transferable_total(), q(3.0));
        assert_eq!(map.non_zero().count(), 2);
    }

    #[test]
    fn map_collects_and_accumulates() {
        let mut a: ResourceMap = [(ResourceKind::Steel, q(1.0)), (ResourceKind::Steel, q(2.0))]
            .into_iter()
            .collect();
        let b: ResourceMap = [(ResourceKind::Paperclip, q(4.0))].into_iter().collect();
        a.accumulate(&b);
        assert_eq!(a[ResourceKind::Steel], q(3.0));
        assert_eq!(a[ResourceKind::Paperclip], q(4.0));
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&ResourceKind::CoalOre).unwrap();
        assert_eq!(json, "\"coal_ore\"");
    }
}
