//! Mana costs in printed `{..}` notation.
//!
//! ```
//! use deck_editor::cards::ManaCost;
//!
//! let cost = ManaCost::parse("{2}{W/U}{W/U}").unwrap();
//! assert_eq!(cost.mana_value(), 4.0);
//! assert_eq!(cost.to_string(), "{2}{W/U}{W/U}");
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::attributes::{Color, ColorSet};
use crate::error::{Error, Result};

/// A single mana symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManaSymbol {
    /// `{3}`
    Generic(u32),
    /// `{X}`, `{Y}` or `{Z}`.
    Variable(char),
    /// `{W}`
    Colored(Color),
    /// `{C}`
    Colorless,
    /// `{S}`
    Snow,
    /// `{HW}`
    Half(Color),
    /// `{W/U}`
    Hybrid(Color, Color),
    /// `{2/W}`
    TwoGeneric(Color),
    /// `{W/P}`
    Phyrexian(Color),
    /// `{W/U/P}`
    PhyrexianHybrid(Color, Color),
}

impl ManaSymbol {
    /// Contribution of this symbol to mana value.
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            ManaSymbol::Generic(n) => f64::from(n),
            ManaSymbol::Variable(_) => 0.0,
            ManaSymbol::Half(_) => 0.5,
            ManaSymbol::TwoGeneric(_) => 2.0,
            ManaSymbol::Colored(_)
            | ManaSymbol::Colorless
            | ManaSymbol::Snow
            | ManaSymbol::Hybrid(..)
            | ManaSymbol::Phyrexian(_)
            | ManaSymbol::PhyrexianHybrid(..) => 1.0,
        }
    }

    /// Colors this symbol contributes to a card.
    #[must_use]
    pub fn colors(self) -> ColorSet {
        match self {
            ManaSymbol::Colored(c)
            | ManaSymbol::Half(c)
            | ManaSymbol::TwoGeneric(c)
            | ManaSymbol::Phyrexian(c) => ColorSet::of([c]),
            ManaSymbol::Hybrid(a, b) | ManaSymbol::PhyrexianHybrid(a, b) => ColorSet::of([a, b]),
            ManaSymbol::Generic(_)
            | ManaSymbol::Variable(_)
            | ManaSymbol::Colorless
            | ManaSymbol::Snow => ColorSet::COLORLESS,
        }
    }

    /// Parse the text between braces.
    fn parse(inner: &str) -> Option<Self> {
        let upper = inner.to_ascii_uppercase();
        let parts: Vec<&str> = upper.split('/').collect();
        let single_color = |s: &str| {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Color::from_letter(c),
                _ => None,
            }
        };

        match parts.as_slice() {
            [one] => {
                if let Ok(n) = one.parse::<u32>() {
                    return Some(ManaSymbol::Generic(n));
                }
                match *one {
                    "X" | "Y" | "Z" => one.chars().next().map(ManaSymbol::Variable),
                    "C" => Some(ManaSymbol::Colorless),
                    "S" => Some(ManaSymbol::Snow),
                    _ => {
                        if let Some(rest) = one.strip_prefix('H') {
                            single_color(rest).map(ManaSymbol::Half)
                        } else {
                            single_color(one).map(ManaSymbol::Colored)
                        }
                    }
                }
            }
            ["2", c] => single_color(c).map(ManaSymbol::TwoGeneric),
            [c, "P"] => single_color(c).map(ManaSymbol::Phyrexian),
            [a, b] => Some(ManaSymbol::Hybrid(single_color(a)?, single_color(b)?)),
            [a, b, "P"] => Some(ManaSymbol::PhyrexianHybrid(single_color(a)?, single_color(b)?)),
            _ => None,
        }
    }
}

impl std::fmt::Display for ManaSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManaSymbol::Generic(n) => write!(f, "{{{n}}}"),
            ManaSymbol::Variable(v) => write!(f, "{{{v}}}"),
            ManaSymbol::Colored(c) => write!(f, "{{{}}}", c.letter()),
            ManaSymbol::Colorless => f.write_str("{C}"),
            ManaSymbol::Snow => f.write_str("{S}"),
            ManaSymbol::Half(c) => write!(f, "{{H{}}}", c.letter()),
            ManaSymbol::Hybrid(a, b) => write!(f, "{{{}/{}}}", a.letter(), b.letter()),
            ManaSymbol::TwoGeneric(c) => write!(f, "{{2/{}}}", c.letter()),
            ManaSymbol::Phyrexian(c) => write!(f, "{{{}/P}}", c.letter()),
            ManaSymbol::PhyrexianHybrid(a, b) => {
                write!(f, "{{{}/{}/P}}", a.letter(), b.letter())
            }
        }
    }
}

/// A printed mana cost. Empty for cards without one (lands, most backs).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManaCost(SmallVec<[ManaSymbol; 6]>);

impl ManaCost {
    /// The empty cost.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a cost like `{1}{G}{G}`.
    pub fn parse(cost: &str) -> Result<Self> {
        let invalid = |symbol: &str| Error::InvalidManaCost {
            cost: cost.to_string(),
            symbol: symbol.to_string(),
        };

        let mut symbols = SmallVec::new();
        let mut rest = cost.trim();
        while !rest.is_empty() {
            let Some(body) = rest.strip_prefix('{') else {
                return Err(invalid(rest));
            };
            let Some(end) = body.find('}') else {
                return Err(invalid(rest));
            };
            let inner = &body[..end];
            symbols.push(ManaSymbol::parse(inner).ok_or_else(|| invalid(inner))?);
            rest = &body[end + 1..];
        }
        Ok(Self(symbols))
    }

    /// Symbols in printed order.
    #[must_use]
    pub fn symbols(&self) -> &[ManaSymbol] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Mana value (converted mana cost).
    #[must_use]
    pub fn mana_value(&self) -> f64 {
        self.0.iter().map(|s| s.value()).sum()
    }

    /// Union of the colors of every symbol.
    #[must_use]
    pub fn colors(&self) -> ColorSet {
        self.0
            .iter()
            .fold(ColorSet::COLORLESS, |set, s| set.union(s.colors()))
    }
}

impl std::fmt::Display for ManaCost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for symbol in &self.0 {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for ManaCost {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
