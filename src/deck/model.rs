//! The deck: an ordered card multiset plus ranked categories.
//!
//! ## Entries
//!
//! Entries keep insertion order. Each card appears at most once; adding
//! more copies raises its count. Removing down to zero drops the entry.
//!
//! ## Categories
//!
//! Categories are kept by name, and `ranks[i]` is the name of the category
//! at rank `i`, so ranks are always the dense permutation `0..n`.

use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, warn};
use rustc_hash::FxHashMap;

use super::entry::CardEntry;
use super::view::CategoryView;
use crate::cards::{Card, CardId};
use crate::category::CategorySpec;
use crate::error::{Error, Result};

/// A deck list with categories.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use chrono::NaiveDate;
/// use deck_editor::cards::{Card, CardFace};
/// use deck_editor::deck::Deck;
///
/// let bolt = Arc::new(Card::new("bolt", CardFace::new("Lightning Bolt")));
/// let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
///
/// let mut deck = Deck::new();
/// assert!(deck.add(&bolt, 4, today));
/// assert_eq!(deck.remove(bolt.id(), 10), 4);
/// assert!(deck.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Deck {
    entries: Vec<CardEntry>,
    /// card id -> position in `entries`
    index: FxHashMap<CardId, usize>,
    total: u32,
    land: u32,
    categories: FxHashMap<String, CategorySpec>,
    ranks: Vec<String>,
}

impl Deck {
    /// Create an empty deck.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Entries ===

    /// Add `count` copies of `card`. A new entry records `added`; an
    /// existing entry keeps its original date.
    ///
    /// Returns whether the total changed: false when `count` is zero or the
    /// deck total would overflow.
    pub fn add(&mut self, card: &Arc<Card>, count: u32, added: NaiveDate) -> bool {
        if !self.has_room_for(card, count) {
            return false;
        }

        match self.index.get(card.id()) {
            Some(&i) => self.entries[i].count += count,
            None => {
                self.index.insert(card.id().clone(), self.entries.len());
                self.entries
                    .push(CardEntry::new(Arc::clone(card), count, added));
            }
        }
        self.add_to_totals(card, count);
        true
    }

    fn has_room_for(&self, card: &Card, count: u32) -> bool {
        if count == 0 {
            return false;
        }
        if self.total.checked_add(count).is_none() {
            warn!("{count} more copies of {} would overflow the deck total", card.name());
            return false;
        }
        true
    }

    /// Remove up to `count` copies of a card. Returns how many were removed.
    pub fn remove(&mut self, id: &CardId, count: u32) -> u32 {
        let Some(&i) = self.index.get(id) else {
            return 0;
        };

        let removed = count.min(self.entries[i].count);
        if removed == 0 {
            return 0;
        }
        let card = Arc::clone(&self.entries[i].card);
        self.entries[i].count -= removed;
        if self.entries[i].count == 0 {
            self.entries.remove(i);
            self.index.remove(id);
            for entry in &self.entries[i..] {
                if let Some(pos) = self.index.get_mut(entry.card.id()) {
                    *pos -= 1;
                }
            }
        }
        self.subtract_from_totals(&card, removed);
        removed
    }

    /// Set the number of copies exactly; zero removes the entry.
    ///
    /// Returns whether the count changed.
    pub fn set_count(&mut self, card: &Arc<Card>, count: u32, added: NaiveDate) -> bool {
        let current = self.count(card.id());
        match count.cmp(&current) {
            std::cmp::Ordering::Greater => self.add(card, count - current, added),
            std::cmp::Ordering::Less => self.remove(card.id(), current - count) > 0,
            std::cmp::Ordering::Equal => false,
        }
    }

    /// Add copies at a given position. A card already present only gains
    /// copies and keeps its place; `index` is clamped to the end.
    pub fn insert_at(&mut self, index: usize, card: &Arc<Card>, count: u32, added: NaiveDate) -> bool {
        if !self.has_room_for(card, count) {
            return false;
        }
        if self.contains(card.id()) {
            return self.add(card, count, added);
        }

        let index = index.min(self.entries.len());
        self.entries
            .insert(index, CardEntry::new(Arc::clone(card), count, added));
        for (pos, entry) in self.entries.iter().enumerate().skip(index) {
            self.index.insert(entry.card.id().clone(), pos);
        }
        self.add_to_totals(card, count);
        true
    }

    // `has_room_for` bounds `total`; entry counts and `land` never exceed it.
    fn add_to_totals(&mut self, card: &Card, count: u32) {
        self.total += count;
        if card.is_land() {
            self.land += count;
        }
    }

    fn subtract_from_totals(&mut self, card: &Card, count: u32) {
        self.total -= count;
        if card.is_land() {
            self.land -= count;
        }
    }

    /// The entry for a card, if present.
    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&CardEntry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    /// Copies of a card in the deck (0 if absent).
    #[must_use]
    pub fn count(&self, id: &CardId) -> u32 {
        self.get(id).map_or(0, |e| e.count)
    }

    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.index.contains_key(id)
    }

    /// Position of a card's entry in deck order.
    #[must_use]
    pub fn position(&self, id: &CardId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Entries in deck order.
    #[must_use]
    pub fn entries(&self) -> &[CardEntry] {
        &self.entries
    }

    /// Number of distinct cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of cards, counting copies.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Number of land cards, counting copies.
    #[must_use]
    pub fn land(&self) -> u32 {
        self.land
    }

    /// Number of nonland cards, counting copies.
    #[must_use]
    pub fn nonland(&self) -> u32 {
        self.total - self.land
    }

    /// Average mana value of the nonland cards, counting copies.
    #[must_use]
    pub fn average_mana_value(&self) -> f64 {
        let nonland = self.nonland();
        if nonland == 0 {
            return 0.0;
        }
        let sum: f64 = self
            .entries
            .iter()
            .filter(|e| !e.card.is_land())
            .map(|e| e.card.mana_value() * f64::from(e.count))
            .sum();
        sum / f64::from(nonland)
    }

    // === Categories ===

    /// Number of categories.
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.ranks.len()
    }

    #[must_use]
    pub fn has_category(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }

    /// Look up a category by name.
    pub fn category(&self, name: &str) -> Result<&CategorySpec> {
        self.categories
            .get(name)
            .ok_or_else(|| Error::category_not_found(name))
    }

    /// Categories in rank order.
    pub fn categories(&self) -> impl Iterator<Item = &CategorySpec> {
        self.ranks.iter().filter_map(move |name| self.categories.get(name))
    }

    /// Rank of a category.
    pub fn rank_of(&self, name: &str) -> Result<usize> {
        self.ranks
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| Error::category_not_found(name))
    }

    /// Add a category at `rank` (or last), shifting later ranks down.
    pub fn add_category(&mut self, spec: CategorySpec, rank: Option<usize>) -> Result<()> {
        if self.categories.contains_key(spec.name()) {
            return Err(Error::DuplicateCategory {
                name: spec.name().to_string(),
            });
        }
        let count = self.ranks.len();
        let rank = rank.unwrap_or(count);
        if rank > count {
            return Err(Error::RankOutOfRange {
                rank,
                count: count + 1,
            });
        }

        debug!("adding category {:?} at rank {}", spec.name(), rank);
        self.ranks.insert(rank, spec.name().to_string());
        self.categories.insert(spec.name().to_string(), spec);
        Ok(())
    }

    /// Remove a category. Returns it with the rank it had.
    pub fn remove_category(&mut self, name: &str) -> Result<(CategorySpec, usize)> {
        let rank = self.rank_of(name)?;
        let spec = self
            .categories
            .remove(name)
            .ok_or_else(|| Error::category_not_found(name))?;
        self.ranks.remove(rank);
        debug!("removed category {:?} from rank {}", name, rank);
        Ok((spec, rank))
    }

    /// Replace a category in place, keeping its rank. The replacement may
    /// carry a new name as long as no other category uses it.
    ///
    /// Returns the previous spec.
    pub fn replace_category(&mut self, name: &str, spec: CategorySpec) -> Result<CategorySpec> {
        let rank = self.rank_of(name)?;
        if spec.name() != name && self.categories.contains_key(spec.name()) {
            return Err(Error::DuplicateCategory {
                name: spec.name().to_string(),
            });
        }

        let old = self
            .categories
            .remove(name)
            .ok_or_else(|| Error::category_not_found(name))?;
        self.ranks[rank] = spec.name().to_string();
        self.categories.insert(spec.name().to_string(), spec);
        Ok(old)
    }

    /// Move a category to `target`, shifting the categories in between by
    /// one. Returns the category's previous rank.
    pub fn swap_category_ranks(&mut self, name: &str, target: usize) -> Result<usize> {
        let rank = self.rank_of(name)?;
        if target >= self.ranks.len() {
            return Err(Error::RankOutOfRange {
                rank: target,
                count: self.ranks.len(),
            });
        }
        let moved = self.ranks.remove(rank);
        self.ranks.insert(target, moved);
        Ok(rank)
    }

    /// Force a card into a category. Returns whether membership changed.
    pub fn include_in(&mut self, name: &str, card: &Card) -> Result<bool> {
        self.categories
            .get_mut(name)
            .map(|spec| spec.include(card))
            .ok_or_else(|| Error::category_not_found(name))
    }

    /// Force a card out of a category. Returns whether membership changed.
    pub fn exclude_from(&mut self, name: &str, card: &Card) -> Result<bool> {
        self.categories
            .get_mut(name)
            .map(|spec| spec.exclude(card))
            .ok_or_else(|| Error::category_not_found(name))
    }

    /// Live view of the entries in a category.
    pub fn category_list(&self, name: &str) -> Result<CategoryView<'_>> {
        self.category(name).map(|spec| CategoryView::new(self, spec))
    }

    /// Names of the categories that include `card`, in rank order.
    #[must_use]
    pub fn categories_of(&self, card: &Card) -> Vec<&str> {
        self.categories()
            .filter(|spec| spec.includes(card))
            .map(CategorySpec::name)
            .collect()
    }
}
