//! Deck entries.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::cards::{Card, CardId};

/// One card in a deck list, with how many copies and when it was first added.
///
/// Entries always have `count > 0`; the deck drops an entry when its count
/// reaches zero.
#[derive(Clone, Debug, PartialEq)]
pub struct CardEntry {
    pub card: Arc<Card>,
    pub count: u32,
    pub added: NaiveDate,
}

impl CardEntry {
    #[must_use]
    pub fn new(card: Arc<Card>, count: u32, added: NaiveDate) -> Self {
        Self { card, count, added }
    }

    #[must_use]
    pub fn id(&self) -> &CardId {
        self.card.id()
    }
}
