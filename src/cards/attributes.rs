//! Printed card attributes that filters query.
//!
//! ## Attribute Types
//!
//! - `Color`: One of the five colors of Magic
//! - `ColorSet`: A set of colors (card colors, color identity)
//! - `Rarity`: Printed rarity
//! - `Layout`: How the faces of a card are arranged

use serde::{Deserialize, Serialize};

/// One of the five colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    /// All colors in WUBRG order.
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    /// The single-letter abbreviation used in mana costs.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    /// Parse a color from its abbreviation (case-insensitive).
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Color::White => "White",
            Color::Blue => "Blue",
            Color::Black => "Black",
            Color::Red => "Red",
            Color::Green => "Green",
        };
        f.write_str(name)
    }
}

/// A set of colors, stored as a bitmask.
///
/// The empty set means colorless.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorSet(u8);

impl ColorSet {
    /// The colorless set.
    pub const COLORLESS: ColorSet = ColorSet(0);

    /// Create a set from an iterator of colors.
    pub fn of(colors: impl IntoIterator<Item = Color>) -> Self {
        colors
            .into_iter()
            .fold(Self::COLORLESS, |set, c| set.with(c))
    }

    /// Parse letters such as `"WU"`; `"C"` or `""` is colorless.
    #[must_use]
    pub fn from_letters(letters: &str) -> Option<Self> {
        if letters.eq_ignore_ascii_case("c") {
            return Some(Self::COLORLESS);
        }
        letters
            .chars()
            .map(Color::from_letter)
            .collect::<Option<Vec<_>>>()
            .map(Self::of)
    }

    /// Letters in WUBRG order, or `"C"` for colorless.
    #[must_use]
    pub fn letters(self) -> String {
        if self.is_empty() {
            return "C".to_string();
        }
        self.iter().map(Color::letter).collect()
    }

    /// This set with `color` added.
    #[must_use]
    pub const fn with(self, color: Color) -> Self {
        Self(self.0 | color.bit())
    }

    #[must_use]
    pub const fn contains(self, color: Color) -> bool {
        self.0 & color.bit() != 0
    }

    #[must_use]
    pub const fn union(self, other: ColorSet) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn intersects(self, other: ColorSet) -> bool {
        self.0 & other.0 != 0
    }

    #[must_use]
    pub const fn is_subset(self, other: ColorSet) -> bool {
        self.0 & !other.0 == 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate colors in WUBRG order.
    pub fn iter(self) -> impl Iterator<Item = Color> {
        Color::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Color> for ColorSet {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        Self::of(iter)
    }
}

/// Printed rarity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    BasicLand,
    #[default]
    Common,
    Uncommon,
    Rare,
    Mythic,
    Special,
}

impl Rarity {
    /// Lower-case code used in filter strings.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Rarity::BasicLand => "basic",
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Mythic => "mythic",
            Rarity::Special => "special",
        }
    }

    /// Parse a rarity from its code or its single-letter abbreviation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "basic" | "l" => Some(Rarity::BasicLand),
            "common" | "c" => Some(Rarity::Common),
            "uncommon" | "u" => Some(Rarity::Uncommon),
            "rare" | "r" => Some(Rarity::Rare),
            "mythic" | "mythic rare" | "m" => Some(Rarity::Mythic),
            "special" | "s" => Some(Rarity::Special),
            _ => None,
        }
    }
}

/// How a card's faces are arranged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layout {
    #[default]
    Normal,
    Split,
    Flip,
    Transform,
    ModalDfc,
    Meld,
    Adventure,
}

impl Layout {
    /// Whether the mana value of the card is the sum over its faces.
    #[must_use]
    pub const fn combines_mana_value(self) -> bool {
        matches!(self, Layout::Split)
    }
}
