//! The user's chosen filters.
//!
//! Types and abilities are sliding windows: once full, picking another
//! entry drops the oldest one. Moves are unbounded. Every list rejects an
//! entry it already holds.

use std::rc::Rc;

use crate::config::{MAX_ABILITIES, MAX_TYPES};
use crate::ApiData;

/// Ordered, duplicate-free list of picks with an optional capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct Picks {
    items: Vec<Rc<ApiData>>,
    capacity: Option<usize>,
}

impl Picks {
    pub fn bounded(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    pub fn unbounded() -> Self {
        Self {
            items: Vec::new(),
            capacity: None,
        }
    }

    /// Append `item` unless it is already present, evicting the oldest
    /// entries first when at capacity. Returns whether the list changed.
    pub fn add(&mut self, item: Rc<ApiData>) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return false;
            }
            if self.items.len() >= capacity {
                let overflow = self.items.len() + 1 - capacity;
                self.items.drain(..overflow);
            }
        }
        self.items.push(item);
        true
    }

    pub fn remove(&mut self, item: &ApiData) -> bool {
        let before = self.items.len();
        self.items.retain(|i| **i != *item);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[Rc<ApiData>] {
        &self.items
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    types: Picks,
    abilities: Picks,
    moves: Picks,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    pub fn new() -> Self {
        Self {
            types: Picks::bounded(MAX_TYPES),
            abilities: Picks::bounded(MAX_ABILITIES),
            moves: Picks::unbounded(),
        }
    }

    pub fn add_type(&mut self, item: Rc<ApiData>) -> bool {
        self.types.add(item)
    }

    pub fn add_ability(&mut self, item: Rc<ApiData>) -> bool {
        self.abilities.add(item)
    }

    pub fn add_move(&mut self, item: Rc<ApiData>) -> bool {
        self.moves.add(item)
    }

    pub fn remove_type(&mut self, item: &ApiData) -> bool {
        self.types.remove(item)
    }

    pub fn remove_ability(&mut self, item: &ApiData) -> bool {
        self.abilities.remove(item)
    }

    pub fn remove_move(&mut self, item: &ApiData) -> bool {
        self.moves.remove(item)
    }

    pub fn types(&self) -> &[Rc<ApiData>] {
        self.types.items()
    }

    pub fn abilities(&self) -> &[Rc<ApiData>] {
        self.abilities.items()
    }

    pub fn moves(&self) -> &[Rc<ApiData>] {
        self.moves.items()
    }

    pub fn clear(&mut self) {
        self.types.clear();
        self.abilities.clear();
        self.moves.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.abilities.is_empty() && self.moves.is_empty()
    }

    /// Endpoints to query: types, then abilities, then moves.
    pub fn endpoints(&self) -> Vec<String> {
        self.types()
            .iter()
            .chain(self.abilities())
            .chain(self.moves())
            .map(|item| item.url.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> Rc<ApiData> {
        Rc::new(ApiData::new(name, format!("https://example.test/{}/", name)))
    }

    fn names(items: &[Rc<ApiData>]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn types_keep_the_last_two() {
        let mut selection = Selection::new();
        selection.add_type(item("fire"));
        selection.add_type(item("water"));
        selection.add_type(item("grass"));
        assert_eq!(names(selection.types()), ["water", "grass"]);
    }

    #[test]
    fn abilities_keep_the_last_three() {
        let mut selection = Selection::new();
        for name in ["blaze", "torrent", "overgrow", "swarm", "levitate"] {
            selection.add_ability(item(name));
        }
        assert_eq!(names(selection.abilities()), ["overgrow", "swarm", "levitate"]);
    }

    #[test]
    fn duplicates_do_not_evict() {
        let mut selection = Selection::new();
        assert!(selection.add_type(item("fire")));
        assert!(selection.add_type(item("water")));
        assert!(!selection.add_type(item("fire")));
        assert_eq!(names(selection.types()), ["fire", "water"]);
    }

    #[test]
    fn bounded_lists_stay_within_capacity_for_any_sequence() {
        let pool: Vec<_> = ["a", "b", "c", "d", "e"].into_iter().map(item).collect();
        let sequence = [0, 1, 1, 2, 0, 3, 3, 4, 1, 0, 2, 2, 4];

        let mut picks = Picks::bounded(3);
        let mut expected: Vec<Rc<ApiData>> = Vec::new();
        for &i in &sequence {
            let next = pool[i].clone();
            picks.add(next.clone());
            if !expected.contains(&next) {
                expected.push(next);
                if expected.len() > 3 {
                    expected.remove(0);
                }
            }
            assert!(picks.len() <= 3);
            assert_eq!(picks.items(), expected.as_slice());
        }
    }

    #[test]
    fn moves_are_unbounded_and_unique() {
        let mut selection = Selection::new();
        for n in 0..20 {
            selection.add_move(item(&format!("move-{}", n)));
        }
        selection.add_move(item("move-3"));
        assert_eq!(selection.moves().len(), 20);

        let mut seen = std::collections::HashSet::new();
        assert!(selection.moves().iter().all(|m| seen.insert(m.clone())));
    }

    #[test]
    fn remove_and_clear() {
        let mut selection = Selection::new();
        selection.add_type(item("fire"));
        selection.add_move(item("ember"));
        assert!(selection.remove_type(&ApiData::new("fire", "https://example.test/fire/")));
        assert!(!selection.remove_type(&ApiData::new("fire", "https://example.test/fire/")));
        assert!(!selection.is_empty());
        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn endpoints_follow_category_order() {
        let mut selection = Selection::new();
        selection.add_move(item("ember"));
        selection.add_ability(item("blaze"));
        selection.add_type(item("fire"));
        assert_eq!(
            selection.endpoints(),
            [
                "https://example.test/fire/",
                "https://example.test/blaze/",
                "https://example.test/ember/",
            ]
        );
    }

    #[test]
    fn selections_share_reference_handles() {
        let fire = item("fire");
        let mut selection = Selection::new();
        selection.add_type(fire.clone());
        assert!(Rc::ptr_eq(&selection.types()[0], &fire));
    }
}
