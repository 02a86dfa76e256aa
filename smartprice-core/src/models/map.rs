use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::{
    hash::Hash,
    ops::{Deref, DerefMut},
};

type Inner<K, V> = IndexMap<K, V, FxBuildHasher>;

/// An insertion-ordered map with a fast, deterministic hasher.
///
/// Segment summaries and joined tables must come out identically on every
/// run, which rules out the randomized std HashMap. The backing map stays
/// private so it can be swapped without breaking callers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Map<K: Eq + Hash, V>(Inner<K, V>);

impl<K: Eq + Hash, V> Map<K, V> {
    /// Consume the map, returning it with its entries in ascending key order
    pub fn sorted(mut self) -> Self
    where
        K: Ord,
    {
        self.0.sort_unstable_keys();
        self
    }
}

impl<K: Eq + Hash, V> Default for Map<K, V> {
    fn default() -> Self {
        Self(Inner::default())
    }
}

impl<K: Eq + Hash, V> Deref for Map<K, V> {
    type Target = Inner<K, V>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<K: Eq + Hash, V> DerefMut for Map<K, V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for Map<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<K: Eq + Hash, V> IntoIterator for Map<K, V> {
    type Item = (K, V);
    type IntoIter = indexmap::map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, K: Eq + Hash, V> IntoIterator for &'a Map<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = indexmap::map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order_until_sorted() {
        let map = [("b", 2), ("c", 3), ("a", 1)].into_iter().collect::<Map<_, _>>();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["b", "c", "a"]);

        let map = map.sorted();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["a", "b", "c"]);
    }
}
