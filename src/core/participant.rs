//! Participant identification and per-participant data storage.
//!
//! ## ParticipantId
//!
//! Identifier handed out by the transport when a participant joins a match.
//! Stable for the participant's lifetime, not necessarily contiguous.
//!
//! ## ParticipantMap
//!
//! Per-participant storage kept sorted by `ParticipantId`. Iteration order is
//! ascending id, which gives resolution a stable, deterministic order that every
//! replica agrees on.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::{Index, IndexMut};

/// Participant identifier, unique within a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub u32);

impl ParticipantId {
    /// Create a new participant ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Participant {}", self.0)
    }
}

/// Per-participant data storage ordered by participant ID.
///
/// Backed by a sorted `Vec<(ParticipantId, T)>`. Matches hold at most a
/// handful of participants, so lookups are a binary search.
///
/// ## Example
///
/// ```
/// use duel_ccg::core::{ParticipantId, ParticipantMap};
///
/// let mut scores: ParticipantMap<i32> = ParticipantMap::new();
/// scores.insert(ParticipantId::new(7), 3);
/// scores.insert(ParticipantId::new(2), 5);
///
/// // Iteration is by ascending id
/// let ids: Vec<_> = scores.ids().collect();
/// assert_eq!(ids, vec![ParticipantId::new(2), ParticipantId::new(7)]);
///
/// scores[ParticipantId::new(7)] += 1;
/// assert_eq!(scores[ParticipantId::new(7)], 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParticipantMap<T> {
    entries: Vec<(ParticipantId, T)>,
}

impl<T> Default for ParticipantMap<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> ParticipantMap<T> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map with one entry per id, values from a factory function.
    ///
    /// Duplicate ids keep the last produced value.
    pub fn from_ids(
        ids: impl IntoIterator<Item = ParticipantId>,
        factory: impl Fn(ParticipantId) -> T,
    ) -> Self {
        let mut map = Self::new();
        for id in ids {
            map.insert(id, factory(id));
        }
        map
    }

    fn position(&self, id: ParticipantId) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&id, |(k, _)| *k)
    }

    /// Insert or overwrite a participant's value.
    ///
    /// Returns the previous value if one existed.
    pub fn insert(&mut self, id: ParticipantId, value: T) -> Option<T> {
        match self.position(id) {
            Ok(pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            Err(pos) => {
                self.entries.insert(pos, (id, value));
                None
            }
        }
    }

    /// Remove a participant's value.
    pub fn remove(&mut self, id: ParticipantId) -> Option<T> {
        self.position(id).ok().map(|pos| self.entries.remove(pos).1)
    }

    /// Get a reference to a participant's value.
    #[must_use]
    pub fn get(&self, id: ParticipantId) -> Option<&T> {
        self.position(id).ok().map(|pos| &self.entries[pos].1)
    }

    /// Get a mutable reference to a participant's value.
    pub fn get_mut(&mut self, id: ParticipantId) -> Option<&mut T> {
        match self.position(id) {
            Ok(pos) => Some(&mut self.entries[pos].1),
            Err(_) => None,
        }
    }

    /// Check whether a participant has an entry.
    #[must_use]
    pub fn contains(&self, id: ParticipantId) -> bool {
        self.position(id).is_ok()
    }

    /// Number of participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (ParticipantId, &T) pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (ParticipantId, &T)> {
        self.entries.iter().map(|(id, v)| (*id, v))
    }

    /// Iterate over (ParticipantId, &mut T) pairs in ascending id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ParticipantId, &mut T)> {
        self.entries.iter_mut().map(|(id, v)| (*id, v))
    }

    /// Iterate over all participant IDs in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    /// Build a new map by transforming every value.
    pub fn map<U>(&self, mut f: impl FnMut(ParticipantId, &T) -> U) -> ParticipantMap<U> {
        ParticipantMap {
            entries: self.entries.iter().map(|(id, v)| (*id, f(*id, v))).collect(),
        }
    }
}

impl<T> FromIterator<(ParticipantId, T)> for ParticipantMap<T> {
    fn from_iter<I: IntoIterator<Item = (ParticipantId, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (id, value) in iter {
            map.insert(id, value);
        }
        map
    }
}

// Serialized as a plain sequence of pairs. Deserializing re-sorts, so a peer
// that sends entries out of order cannot break lookups.
impl<T: Serialize> Serialize for ParticipantMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ParticipantMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<(ParticipantId, T)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

impl<T> Index<ParticipantId> for ParticipantMap<T> {
    type Output = T;

    fn index(&self, id: ParticipantId) -> &Self::Output {
        self.get(id)
            .unwrap_or_else(|| panic!("{id} not present in ParticipantMap"))
    }
}

impl<T> IndexMut<ParticipantId> for ParticipantMap<T> {
    fn index_mut(&mut self, id: ParticipantId) -> &mut Self::Output {
        self.get_mut(id)
            .unwrap_or_else(|| panic!("{id} not present in ParticipantMap"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_id_basics() {
        let p = ParticipantId::new(3);
        assert_eq!(p.raw(), 3);
        assert_eq!(format!("{}", p), "Participant 3");
    }

    #[test]
    fn test_map_keeps_ascending_order() {
        let mut map = ParticipantMap::new();
        map.insert(ParticipantId::new(9), "c");
        map.insert(ParticipantId::new(1), "a");
        map.insert(ParticipantId::new(4), "b");

        let values: Vec<_> = map.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_insert_overwrites() {
        let mut map = ParticipantMap::new();
        assert_eq!(map.insert(ParticipantId::new(1), 10), None);
        assert_eq!(map.insert(ParticipantId::new(1), 20), Some(10));
        assert_eq!(map.len(), 1);
        assert_eq!(map[ParticipantId::new(1)], 20);
    }

    #[test]
    fn test_from_ids_and_map() {
        let map = ParticipantMap::from_ids([ParticipantId::new(2), ParticipantId::new(1)], |p| {
            p.raw() * 10
        });
        let doubled = map.map(|_, v| v * 2);

        assert_eq!(doubled[ParticipantId::new(1)], 20);
        assert_eq!(doubled[ParticipantId::new(2)], 40);
    }

    #[test]
    fn test_remove_and_contains() {
        let mut map: ParticipantMap<i32> = [(ParticipantId::new(1), 1), (ParticipantId::new(2), 2)]
            .into_iter()
            .collect();

        assert!(map.contains(ParticipantId::new(2)));
        assert_eq!(map.remove(ParticipantId::new(2)), Some(2));
        assert!(!map.contains(ParticipantId::new(2)));
        assert_eq!(map.remove(ParticipantId::new(2)), None);
    }

    #[test]
    fn test_map_serialization() {
        let map: ParticipantMap<i32> = [(ParticipantId::new(5), -1), (ParticipantId::new(3), 4)]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: ParticipantMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }

    #[test]
    fn test_map_deserialization_resorts() {
        let map: ParticipantMap<i32> = serde_json::from_str("[[9,1],[2,2]]").unwrap();
        let ids: Vec<_> = map.ids().collect();
        assert_eq!(ids, vec![ParticipantId::new(2), ParticipantId::new(9)]);
        assert_eq!(map[ParticipantId::new(9)], 1);
    }

    #[test]
    #[should_panic(expected = "not present")]
    fn test_index_missing_panics() {
        let map: ParticipantMap<i32> = ParticipantMap::new();
        let _ = map[ParticipantId::new(1)];
    }
}
