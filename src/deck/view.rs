//! Live category views.

use super::entry::CardEntry;
use super::model::Deck;
use crate::cards::CardId;
use crate::category::CategorySpec;

/// The entries of a deck that belong to one category.
///
/// The view borrows the deck, so it always reflects the deck as it is now;
/// take a new view after editing.
#[derive(Clone, Copy, Debug)]
pub struct CategoryView<'a> {
    deck: &'a Deck,
    spec: &'a CategorySpec,
}

impl<'a> CategoryView<'a> {
    pub(crate) fn new(deck: &'a Deck, spec: &'a CategorySpec) -> Self {
        Self { deck, spec }
    }

    #[must_use]
    pub fn spec(&self) -> &'a CategorySpec {
        self.spec
    }

    #[must_use]
    pub fn name(&self) -> &'a str {
        self.spec.name()
    }

    /// Member entries, in deck order.
    pub fn iter(&self) -> impl Iterator<Item = &'a CardEntry> + 'a {
        let spec = self.spec;
        self.deck
            .entries()
            .iter()
            .filter(move |entry| spec.includes(&entry.card))
    }

    /// Whether the deck holds the card and the category includes it.
    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.deck
            .get(id)
            .is_some_and(|entry| self.spec.includes(&entry.card))
    }

    /// Number of distinct member cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Number of member cards, counting copies.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.iter().map(|entry| entry.count).sum()
    }
}

impl<'a> IntoIterator for CategoryView<'a> {
    type Item = &'a CardEntry;
    type IntoIter = Box<dyn Iterator<Item = &'a CardEntry> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
