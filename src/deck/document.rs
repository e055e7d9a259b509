//! A deck document: the main deck, named side lists, changelog and notes.

use serde::{Deserialize, Serialize};

use super::model::Deck;
use crate::error::{Error, Result};

/// Addresses one card list of a document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListRef {
    Main,
    Side(String),
}

impl ListRef {
    #[must_use]
    pub fn side(name: impl Into<String>) -> Self {
        ListRef::Side(name.into())
    }
}

impl std::fmt::Display for ListRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListRef::Main => write!(f, "main deck"),
            ListRef::Side(name) => write!(f, "{name}"),
        }
    }
}

/// Everything an editor session edits and saves.
///
/// Only the main deck's categories are meaningful; side lists are plain
/// card lists.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeckDocument {
    pub main: Deck,
    sides: Vec<(String, Deck)>,
    pub changelog: String,
    pub notes: String,
}

impl DeckDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Side lists in order.
    pub fn sides(&self) -> impl Iterator<Item = (&str, &Deck)> {
        self.sides.iter().map(|(name, deck)| (name.as_str(), deck))
    }

    #[must_use]
    pub fn side_count(&self) -> usize {
        self.sides.len()
    }

    #[must_use]
    pub fn has_side(&self, name: &str) -> bool {
        self.side_position(name).is_some()
    }

    fn side_position(&self, name: &str) -> Option<usize> {
        self.sides.iter().position(|(n, _)| n == name)
    }

    fn list_not_found(name: &str) -> Error {
        Error::ListNotFound {
            name: name.to_string(),
        }
    }

    /// The list `list` refers to.
    pub fn list(&self, list: &ListRef) -> Result<&Deck> {
        match list {
            ListRef::Main => Ok(&self.main),
            ListRef::Side(name) => self
                .side_position(name)
                .map(|i| &self.sides[i].1)
                .ok_or_else(|| Self::list_not_found(name)),
        }
    }

    pub fn list_mut(&mut self, list: &ListRef) -> Result<&mut Deck> {
        match list {
            ListRef::Main => Ok(&mut self.main),
            ListRef::Side(name) => match self.side_position(name) {
                Some(i) => Ok(&mut self.sides[i].1),
                None => Err(Self::list_not_found(name)),
            },
        }
    }

    /// Check that `name` could be added as a new side list.
    pub fn validate_side_name(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::EmptyListName);
        }
        if self.has_side(name) {
            return Err(Error::DuplicateList {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Insert a side list at `index` (clamped to the end).
    pub fn insert_side(&mut self, index: usize, name: impl Into<String>, deck: Deck) -> Result<()> {
        let name = name.into();
        self.validate_side_name(&name)?;
        let index = index.min(self.sides.len());
        self.sides.insert(index, (name, deck));
        Ok(())
    }

    /// Append an empty side list.
    pub fn add_side(&mut self, name: impl Into<String>) -> Result<()> {
        self.insert_side(self.sides.len(), name, Deck::new())
    }

    /// Remove a side list. Returns its position and contents.
    pub fn remove_side(&mut self, name: &str) -> Result<(usize, Deck)> {
        let index = self
            .side_position(name)
            .ok_or_else(|| Self::list_not_found(name))?;
        let (_, deck) = self.sides.remove(index);
        Ok((index, deck))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::cards::{Card, CardFace};

    #[test]
    fn test_side_lists() {
        let mut doc = DeckDocument::new();
        doc.add_side("Sideboard").unwrap();
        doc.add_side("Maybe").unwrap();

        assert!(matches!(doc.add_side("Sideboard"), Err(Error::DuplicateList { .. })));
        assert!(matches!(doc.add_side(" "), Err(Error::EmptyListName)));
        let names: Vec<_> = doc.sides().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Sideboard", "Maybe"]);

        let (index, _) = doc.remove_side("Sideboard").unwrap();
        assert_eq!(index, 0);
        assert!(matches!(doc.remove_side("Sideboard"), Err(Error::ListNotFound { .. })));
        assert_eq!(doc.side_count(), 1);
    }

    #[test]
    fn test_list_lookup() {
        let mut doc = DeckDocument::new();
        doc.add_side("Sideboard").unwrap();
        let card = Arc::new(Card::new("x", CardFace::new("X")));
        let date = NaiveDate::from_ymd_opt(2020, 2, 2).unwrap();

        doc.list_mut(&ListRef::side("Sideboard"))
            .unwrap()
            .add(&card, 3, date);
        assert_eq!(doc.list(&ListRef::side("Sideboard")).unwrap().total(), 3);
        assert_eq!(doc.list(&ListRef::Main).unwrap().total(), 0);
        assert!(doc.list(&ListRef::side("Nope")).is_err());
        assert_eq!(ListRef::side("Sideboard").to_string(), "Sideboard");
    }

    #[test]
    fn test_insert_side_restores_position() {
        let mut doc = DeckDocument::new();
        for name in ["A", "B", "C"] {
            doc.add_side(name).unwrap();
        }
        let (index, deck) = doc.remove_side("B").unwrap();
        doc.insert_side(index, "B", deck).unwrap();
        let names: Vec<_> = doc.sides().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}
