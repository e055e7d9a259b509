//! Card inventory for definition lookup.
//!
//! The `Inventory` stores every card the editor knows about. It is passed
//! explicitly to whatever needs to resolve card ids (deck loading, text
//! import, category editing) instead of living in a global.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::definition::{normalize_name, Card, CardId};
use crate::error::{Error, Result};

/// Inventory of card definitions.
///
/// ## Example
///
/// ```
/// use deck_editor::cards::{Card, CardFace, CardId, Inventory};
///
/// let mut inventory = Inventory::new();
/// inventory.register(Card::new("1", CardFace::new("Lightning Bolt"))).unwrap();
///
/// let found = inventory.get(&CardId::new("1")).unwrap();
/// assert_eq!(found.name(), "Lightning Bolt");
/// assert!(inventory.find_by_name("lightning bolt").is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    cards: FxHashMap<CardId, Arc<Card>>,
    /// Registration order, for stable iteration.
    order: Vec<CardId>,
    /// Normalized full and face names -> first printing registered.
    by_name: FxHashMap<String, CardId>,
}

impl Inventory {
    /// Create a new empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Fails if a card with the same ID already exists.
    pub fn register(&mut self, card: Card) -> Result<Arc<Card>> {
        if self.cards.contains_key(card.id()) {
            return Err(Error::DuplicateCard {
                id: card.id().clone(),
            });
        }

        let card = Arc::new(card);
        let id = card.id().clone();
        self.by_name
            .entry(card.normalized_name().to_string())
            .or_insert_with(|| id.clone());
        if card.faces().len() > 1 {
            for face in card.faces() {
                self.by_name
                    .entry(normalize_name(&face.name))
                    .or_insert_with(|| id.clone());
            }
        }
        self.order.push(id.clone());
        self.cards.insert(id, Arc::clone(&card));
        Ok(card)
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&Arc<Card>> {
        self.cards.get(id)
    }

    /// Find a card by name, ignoring case and accents. Face names of
    /// multi-faced cards also match.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Arc<Card>> {
        self.by_name
            .get(&normalize_name(name.trim()))
            .and_then(|id| self.cards.get(id))
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains_key(id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the inventory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all cards in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Card>> {
        self.order.iter().filter_map(move |id| self.cards.get(id))
    }

    /// Find cards matching a predicate, in registration order.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &Arc<Card>>
    where
        F: Fn(&Card) -> bool,
    {
        self.iter().filter(move |c| predicate(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardFace, Layout};

    #[test]
    fn test_register_and_get() {
        let mut inventory = Inventory::new();
        inventory
            .register(Card::new("1", CardFace::new("Test Card")))
            .unwrap();

        let found = inventory.get(&CardId::new("1"));
        assert_eq!(found.unwrap().name(), "Test Card");
        assert!(inventory.get(&CardId::new("99")).is_none());
        assert!(inventory.contains(&"1".into()));
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut inventory = Inventory::new();
        inventory.register(Card::new("1", CardFace::new("Card A"))).unwrap();

        let err = inventory
            .register(Card::new("1", CardFace::new("Card B")))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateCard { id } if id.as_str() == "1"));
        assert_eq!(inventory.get(&"1".into()).unwrap().name(), "Card A");
    }

    #[test]
    fn test_find_by_name_first_printing_wins() {
        let mut inventory = Inventory::new();
        inventory.register(Card::new("a", CardFace::new("Opt"))).unwrap();
        inventory.register(Card::new("b", CardFace::new("Opt"))).unwrap();

        assert_eq!(inventory.find_by_name("  OPT ").unwrap().id().as_str(), "a");
        assert!(inventory.find_by_name("Ponder").is_none());
    }

    #[test]
    fn test_find_by_face_name() {
        let mut inventory = Inventory::new();
        inventory
            .register(
                Card::new("f", CardFace::new("Fire"))
                    .with_face(CardFace::new("Ice"))
                    .with_layout(Layout::Split),
            )
            .unwrap();

        assert_eq!(inventory.find_by_name("Fire // Ice").unwrap().id().as_str(), "f");
        assert_eq!(inventory.find_by_name("ice").unwrap().id().as_str(), "f");
    }

    #[test]
    fn test_find_with_predicate_in_order() {
        let mut inventory = Inventory::new();
        for (id, name) in [("1", "Alpha"), ("2", "Beta"), ("3", "Gamma")] {
            inventory.register(Card::new(id, CardFace::new(name))).unwrap();
        }

        let names: Vec<_> = inventory
            .find(|c| c.name() > "Alpha")
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, vec!["Beta", "Gamma"]);
    }
}
