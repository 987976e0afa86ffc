//! Heuristic estimates of the remaining cost to a goal.
//!
//! Callers are responsible for supplying an admissible heuristic (one that
//! never overestimates the true remaining cost), and a consistent one where
//! a search documents that requirement. Neither property is checked; only
//! negative estimates are rejected, by [`Heuristic::checked_estimate`].

use std::fmt::Debug;
use std::hash::Hash;

use indexmap::IndexMap;

use crate::error::SearchError;
use crate::graph::Cost;

/// Estimated cost from a node to the goal.
pub trait Heuristic<N> {
    /// Estimate for `node`, or `None` if the heuristic has no entry for it.
    fn estimate(&self, node: &N) -> Option<Cost>;

    /// Estimate for `node`, failing on missing entries and negative values.
    fn checked_estimate(&self, node: &N) -> Result<Cost, SearchError>
    where
        N: Debug,
    {
        match self.estimate(node) {
            None => Err(SearchError::unknown(node)),
            Some(v) if v < 0 => Err(SearchError::invalid_heuristic(node, v)),
            Some(v) => Ok(v),
        }
    }
}

impl<N, F> Heuristic<N> for F
where
    F: Fn(&N) -> Cost,
{
    fn estimate(&self, node: &N) -> Option<Cost> {
        Some(self(node))
    }
}

/// The heuristic that is identically zero. Always admissible and
/// consistent; turns cost-optimal search into uniform-cost search.
#[derive(Debug, Clone, Copy, Default)]
pub struct Zero;

impl<N> Heuristic<N> for Zero {
    fn estimate(&self, _node: &N) -> Option<Cost> {
        Some(0)
    }
}

// ---------------------------------------------------------------------------
// HeuristicTable
// ---------------------------------------------------------------------------

/// Explicit per-node estimates, kept in insertion order.
///
/// AND-OR search refines a table in place, so unlike a closure it is also
/// writable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicTable<N: Eq + Hash> {
    values: IndexMap<N, Cost>,
}

impl<N: Eq + Hash> HeuristicTable<N> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            values: IndexMap::new(),
        }
    }

    /// Estimate for `node`, if present.
    pub fn get(&self, node: &N) -> Option<Cost> {
        self.values.get(node).copied()
    }

    /// Set the estimate for `node`, returning the previous one.
    pub fn set(&mut self, node: N, value: Cost) -> Option<Cost> {
        self.values.insert(node, value)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&N, Cost)> {
        self.values.iter().map(|(n, v)| (n, *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<N: Eq + Hash> Default for HeuristicTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Eq + Hash> FromIterator<(N, Cost)> for HeuristicTable<N> {
    fn from_iter<I: IntoIterator<Item = (N, Cost)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<N: Eq + Hash> Heuristic<N> for HeuristicTable<N> {
    fn estimate(&self, node: &N) -> Option<Cost> {
        self.get(node)
    }
}

#[cfg(feature = "serde")]
impl<N: serde::Serialize + Eq + Hash> serde::Serialize for HeuristicTable<N> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, N> serde::Deserialize<'de> for HeuristicTable<N>
where
    N: serde::Deserialize<'de> + Eq + Hash,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = IndexMap::<N, Cost>::deserialize(deserializer)?;
        Ok(Self { values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lookup_and_update() {
        let mut h: HeuristicTable<&str> = [("A", 40), ("G", 0)].into_iter().collect();
        assert_eq!(h.estimate(&"A"), Some(40));
        assert_eq!(h.estimate(&"Q"), None);
        assert_eq!(h.set("A", 33), Some(40));
        assert_eq!(h.get(&"A"), Some(33));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn checked_estimate_rejects_missing_and_negative() {
        let h: HeuristicTable<char> = [('a', 3), ('b', -1)].into_iter().collect();
        assert_eq!(h.checked_estimate(&'a'), Ok(3));
        assert_eq!(
            h.checked_estimate(&'b'),
            Err(SearchError::invalid_heuristic(&'b', -1))
        );
        assert_eq!(h.checked_estimate(&'c'), Err(SearchError::unknown(&'c')));
    }

    #[test]
    fn closures_and_zero_are_heuristics() {
        let double = |n: &i32| n * 2;
        assert_eq!(double.estimate(&4), Some(8));
        assert_eq!(Heuristic::<u8>::estimate(&Zero, &9), Some(0));
    }
}
