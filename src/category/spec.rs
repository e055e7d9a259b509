//! Category specifications.
//!
//! A `CategorySpec` decides membership with its filter, overridden per card
//! by a whitelist (always in) and a blacklist (always out):
//!
//! ```text
//! includes(c) = (whitelist ∋ c || filter(c)) && blacklist ∌ c
//! ```
//!
//! A card is never in both lists. Cloning a spec copies the lists (in O(1),
//! they are persistent sets) and shares the filter.

use std::sync::Arc;

use im::HashSet as ImHashSet;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId};
use crate::error::{Error, Result};
use crate::filter::Filter;

/// Character that separates category names wherever several are written
/// on one line, so it may not appear inside a name.
pub const CATEGORY_DELIMITER: char = ',';

/// Display color of a category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the `#` is optional).
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Check a category name: non-empty and free of the delimiter.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::EmptyCategoryName);
    }
    if name.contains(CATEGORY_DELIMITER) {
        return Err(Error::ReservedCategoryCharacter {
            name: name.to_string(),
            delimiter: CATEGORY_DELIMITER,
        });
    }
    Ok(())
}

/// A named, colored card-membership rule.
///
/// ## Example
///
/// ```
/// use deck_editor::cards::{Card, CardFace};
/// use deck_editor::category::{CategorySpec, Rgb};
/// use deck_editor::filter::Filter;
///
/// let mut lands = CategorySpec::new("Lands", Rgb::new(0, 128, 0), Filter::has_type("Land")).unwrap();
/// let elf = Card::new("elf", CardFace::new("Llanowar Elves").with_types(&[], &["Creature"], &[]));
///
/// assert!(!lands.includes(&elf));
/// assert!(lands.include(&elf));
/// assert!(lands.includes(&elf));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CategorySpec {
    name: String,
    color: Rgb,
    filter: Arc<Filter>,
    whitelist: ImHashSet<CardId>,
    blacklist: ImHashSet<CardId>,
}

impl CategorySpec {
    /// Create a spec with empty override lists.
    pub fn new(name: impl Into<String>, color: Rgb, filter: impl Into<Arc<Filter>>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            color,
            filter: filter.into(),
            whitelist: ImHashSet::new(),
            blacklist: ImHashSet::new(),
        })
    }

    /// Replace the override lists (builder pattern). Ids in both lists are
    /// kept only in the blacklist.
    #[must_use]
    pub fn with_overrides(
        mut self,
        whitelist: impl IntoIterator<Item = CardId>,
        blacklist: impl IntoIterator<Item = CardId>,
    ) -> Self {
        self.blacklist = blacklist.into_iter().collect();
        self.whitelist = whitelist
            .into_iter()
            .filter(|id| !self.blacklist.contains(id))
            .collect();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn color(&self) -> Rgb {
        self.color
    }

    #[must_use]
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Cards forced into the category.
    #[must_use]
    pub fn whitelist(&self) -> &ImHashSet<CardId> {
        &self.whitelist
    }

    /// Cards forced out of the category.
    #[must_use]
    pub fn blacklist(&self) -> &ImHashSet<CardId> {
        &self.blacklist
    }

    /// Whether `card` belongs to this category.
    #[must_use]
    pub fn includes(&self, card: &Card) -> bool {
        let id = card.id();
        (self.whitelist.contains(id) || self.filter.test(card)) && !self.blacklist.contains(id)
    }

    /// Force `card` into the category. Returns whether membership changed.
    pub fn include(&mut self, card: &Card) -> bool {
        let id = card.id();
        let passes = self.filter.test(card);
        if passes && !self.blacklist.contains(id) {
            return false;
        }

        let was_included = self.includes(card);
        self.blacklist.remove(id);
        if !passes {
            self.whitelist.insert(id.clone());
        }
        !was_included
    }

    /// Force `card` out of the category. Returns whether membership changed.
    pub fn exclude(&mut self, card: &Card) -> bool {
        let id = card.id();
        let passes = self.filter.test(card);
        if !passes && !self.whitelist.contains(id) {
            return false;
        }

        let was_included = self.includes(card);
        self.whitelist.remove(id);
        if passes {
            self.blacklist.insert(id.clone());
        }
        was_included
    }

    /// Rename. The owning deck checks uniqueness.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    pub fn set_filter(&mut self, filter: impl Into<Arc<Filter>>) {
        self.filter = filter.into();
    }
}
