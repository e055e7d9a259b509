//! Sample opening hands.

use std::sync::Arc;

use super::rng::HandRng;
use crate::cards::Card;
use crate::deck::Deck;

/// A shuffled copy of a deck with the top cards drawn.
///
/// The library holds one element per copy. Hands are always a prefix of
/// the shuffled library, so drawing only moves the boundary.
#[derive(Clone, Debug)]
pub struct SampleHand {
    library: Vec<Arc<Card>>,
    drawn: usize,
    hand_size: usize,
    mulligans: usize,
    rng: HandRng,
}

impl SampleHand {
    /// Build a library from the deck's counts. No hand is drawn yet.
    #[must_use]
    pub fn new(deck: &Deck, hand_size: usize, rng: HandRng) -> Self {
        let library = deck
            .entries()
            .iter()
            .flat_map(|entry| std::iter::repeat(&entry.card).take(entry.count as usize))
            .cloned()
            .collect();
        Self {
            library,
            drawn: 0,
            hand_size,
            mulligans: 0,
            rng,
        }
    }

    fn deal(&mut self, size: usize) {
        self.rng.shuffle(&mut self.library);
        self.drawn = size.min(self.library.len());
    }

    /// Shuffle and draw a full opening hand.
    pub fn new_hand(&mut self) -> &[Arc<Card>] {
        self.mulligans = 0;
        self.deal(self.hand_size);
        self.hand()
    }

    /// Shuffle and draw one card fewer than the previous opening hand.
    pub fn mulligan(&mut self) -> &[Arc<Card>] {
        self.mulligans = (self.mulligans + 1).min(self.hand_size);
        self.deal(self.hand_size - self.mulligans);
        self.hand()
    }

    /// Draw the next card, if any are left.
    pub fn draw(&mut self) -> Option<&Arc<Card>> {
        if self.drawn >= self.library.len() {
            return None;
        }
        self.drawn += 1;
        self.library.get(self.drawn - 1)
    }

    /// Cards in hand, in draw order.
    #[must_use]
    pub fn hand(&self) -> &[Arc<Card>] {
        &self.library[..self.drawn]
    }

    /// Cards not yet drawn.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.library.len() - self.drawn
    }

    #[must_use]
    pub fn mulligans(&self) -> usize {
        self.mulligans
    }

    /// How many cards in hand each of the deck's categories includes, in
    /// rank order.
    #[must_use]
    pub fn category_counts<'d>(&self, deck: &'d Deck) -> Vec<(&'d str, usize)> {
        deck.categories()
            .map(|spec| {
                let count = self.hand().iter().filter(|card| spec.includes(card)).count();
                (spec.name(), count)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::cards::CardFace;
    use crate::category::{CategorySpec, Rgb};
    use crate::filter::Filter;

    fn deck() -> Deck {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let forest = Arc::new(Card::new(
            "forest",
            CardFace::new("Forest").with_types(&["Basic"], &["Land"], &[]),
        ));
        let bear = Arc::new(Card::new(
            "bear",
            CardFace::new("Grizzly Bears").with_types(&[], &["Creature"], &[]),
        ));
        let mut deck = Deck::new();
        deck.add(&forest, 24, date);
        deck.add(&bear, 36, date);
        deck.add_category(
            CategorySpec::new("Lands", Rgb::default(), Filter::has_type("Land")).unwrap(),
            None,
        )
        .unwrap();
        deck
    }

    #[test]
    fn test_new_hand_size() {
        let deck = deck();
        let mut sample = SampleHand::new(&deck, 7, HandRng::new(1));
        assert!(sample.hand().is_empty());
        assert_eq!(sample.new_hand().len(), 7);
        assert_eq!(sample.remaining(), 53);
    }

    #[test]
    fn test_mulligan_shrinks_to_zero() {
        let deck = deck();
        let mut sample = SampleHand::new(&deck, 2, HandRng::new(1));
        sample.new_hand();
        assert_eq!(sample.mulligan().len(), 1);
        assert_eq!(sample.mulligan().len(), 0);
        assert_eq!(sample.mulligan().len(), 0);
        assert_eq!(sample.new_hand().len(), 2);
        assert_eq!(sample.mulligans(), 0);
    }

    #[test]
    fn test_draw_until_empty() {
        let deck = deck();
        let mut sample = SampleHand::new(&deck, 7, HandRng::new(3));
        sample.new_hand();
        let mut drawn = 0;
        while sample.draw().is_some() {
            drawn += 1;
        }
        assert_eq!(drawn, 53);
        assert_eq!(sample.hand().len(), 60);
        assert!(sample.draw().is_none());
    }

    #[test]
    fn test_category_counts() {
        let deck = deck();
        let mut sample = SampleHand::new(&deck, 7, HandRng::new(9));
        sample.new_hand();
        let lands = sample.hand().iter().filter(|c| c.is_land()).count();
        assert_eq!(sample.category_counts(&deck), vec![("Lands", lands)]);
    }

    #[test]
    fn test_same_seed_same_hand() {
        let deck = deck();
        let mut a = SampleHand::new(&deck, 7, HandRng::new(5));
        let mut b = SampleHand::new(&deck, 7, HandRng::new(5));
        let ids = |hand: &[Arc<Card>]| hand.iter().map(|c| c.id().clone()).collect::<Vec<_>>();
        assert_eq!(ids(a.new_hand()), ids(b.new_hand()));
    }
}
