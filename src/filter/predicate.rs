//! Filter predicates over card attributes.
//!
//! A `Filter` is a tree: leaves test one attribute, groups combine children
//! with AND or OR. Filters are immutable values once built; categories share
//! them behind an `Arc`.
//!
//! ## Multi-Faced Cards
//!
//! Text and stat leaves match when any face matches (`excludes` requires
//! that no face contains the text). Type leaves test the union of all
//! faces' types. Mana value, colors, rarity and expansion belong to the
//! card as a whole.

use serde::{Deserialize, Serialize};

use crate::cards::{normalize_name, stat_value, Card, CardFace, ColorSet, Rarity};

/// Text attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextAttr {
    Name,
    RulesText,
    Flavor,
    Artist,
}

/// How a text leaf compares. All comparisons ignore case and accents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextOp {
    Contains,
    Excludes,
    Equals,
    StartsWith,
}

/// Numeric attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumberAttr {
    ManaValue,
    Power,
    Toughness,
    Loyalty,
}

/// Numeric comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    /// Compare `lhs` against `rhs`.
    #[must_use]
    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        const EPSILON: f64 = 1e-9;
        let equal = (lhs - rhs).abs() < EPSILON;
        match self {
            Comparison::Eq => equal,
            Comparison::Ne => !equal,
            Comparison::Lt => lhs < rhs && !equal,
            Comparison::Le => lhs < rhs || equal,
            Comparison::Gt => lhs > rhs && !equal,
            Comparison::Ge => lhs > rhs || equal,
        }
    }
}

/// Color attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorAttr {
    Colors,
    Identity,
}

/// Type-line attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeAttr {
    CardType,
    Supertype,
    Subtype,
}

/// Set comparison between a card's values and the filter's values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetOp {
    /// The card has at least one of the values.
    AnyOf,
    /// The card has every value.
    AllOf,
    /// The card has none of the values.
    NoneOf,
    /// The card has exactly these values.
    Exactly,
}

/// How a group combines its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupMode {
    And,
    Or,
}

/// A card predicate.
///
/// ```
/// use deck_editor::filter::{Filter, NumberAttr, Comparison};
///
/// let cheap_creatures = Filter::has_type("Creature")
///     .and(Filter::number(NumberAttr::ManaValue, Comparison::Le, 2.0));
///
/// let text = cheap_creatures.to_string();
/// assert_eq!(text, r#"<and <type any "Creature"> <cmc le 2>>"#);
/// assert_eq!(Filter::parse(&text).unwrap(), cheap_creatures);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Filter {
    /// Matches every card.
    MatchAll,
    /// Matches no card.
    MatchNone,
    Text {
        attr: TextAttr,
        op: TextOp,
        value: String,
    },
    Number {
        attr: NumberAttr,
        op: Comparison,
        value: f64,
    },
    Colors {
        attr: ColorAttr,
        op: SetOp,
        colors: ColorSet,
    },
    Types {
        attr: TypeAttr,
        op: SetOp,
        values: Vec<String>,
    },
    /// Rarity is one of these.
    Rarity(Vec<Rarity>),
    /// Expansion code is one of these (case-insensitive).
    Expansion(Vec<String>),
    Group {
        mode: GroupMode,
        children: Vec<Filter>,
    },
}

impl Default for Filter {
    fn default() -> Self {
        Filter::MatchAll
    }
}

impl Filter {
    /// Create a text leaf.
    pub fn text(attr: TextAttr, op: TextOp, value: impl Into<String>) -> Self {
        Self::Text {
            attr,
            op,
            value: value.into(),
        }
    }

    /// Create a numeric leaf.
    pub fn number(attr: NumberAttr, op: Comparison, value: f64) -> Self {
        Self::Number { attr, op, value }
    }

    /// Create a color leaf.
    pub fn colors(attr: ColorAttr, op: SetOp, colors: ColorSet) -> Self {
        Self::Colors { attr, op, colors }
    }

    /// Create a type-line leaf.
    pub fn types<S: Into<String>>(
        attr: TypeAttr,
        op: SetOp,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::Types {
            attr,
            op,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Cards with `card_type` among their types.
    pub fn has_type(card_type: impl Into<String>) -> Self {
        Self::types(TypeAttr::CardType, SetOp::AnyOf, [card_type.into()])
    }

    /// Cards whose name contains `text`.
    pub fn name_contains(text: impl Into<String>) -> Self {
        Self::text(TextAttr::Name, TextOp::Contains, text)
    }

    /// Create an AND group.
    pub fn all(children: impl IntoIterator<Item = Filter>) -> Self {
        Self::Group {
            mode: GroupMode::And,
            children: children.into_iter().collect(),
        }
    }

    /// Create an OR group.
    pub fn any(children: impl IntoIterator<Item = Filter>) -> Self {
        Self::Group {
            mode: GroupMode::Or,
            children: children.into_iter().collect(),
        }
    }

    /// Add another filter with AND.
    pub fn and(self, other: Filter) -> Self {
        match self {
            Self::Group {
                mode: GroupMode::And,
                mut children,
            } => {
                children.push(other);
                Self::all(children)
            }
            _ => Self::all([self, other]),
        }
    }

    /// Add another filter with OR.
    pub fn or(self, other: Filter) -> Self {
        match self {
            Self::Group {
                mode: GroupMode::Or,
                mut children,
            } => {
                children.push(other);
                Self::any(children)
            }
            _ => Self::any([self, other]),
        }
    }

    /// Evaluate this filter against a card.
    #[must_use]
    pub fn test(&self, card: &Card) -> bool {
        match self {
            Filter::MatchAll => true,
            Filter::MatchNone => false,
            Filter::Text { attr, op, value } => test_text(card, *attr, *op, value),
            Filter::Number { attr, op, value } => match attr {
                NumberAttr::ManaValue => op.apply(card.mana_value(), *value),
                _ => card.faces().iter().any(|face| {
                    face_stat(face, *attr)
                        .and_then(stat_value)
                        .is_some_and(|v| op.apply(v, *value))
                }),
            },
            Filter::Colors { attr, op, colors } => {
                let card_colors = match attr {
                    ColorAttr::Colors => card.colors(),
                    ColorAttr::Identity => card.color_identity(),
                };
                test_colors(card_colors, *op, *colors)
            }
            Filter::Types { attr, op, values } => test_types(card, *attr, *op, values),
            Filter::Rarity(rarities) => rarities.contains(&card.rarity()),
            Filter::Expansion(codes) => codes
                .iter()
                .any(|code| code.eq_ignore_ascii_case(card.expansion())),
            Filter::Group { mode, children } => match mode {
                GroupMode::And => children.iter().all(|f| f.test(card)),
                GroupMode::Or => children.iter().any(|f| f.test(card)),
            },
        }
    }
}

fn face_stat(face: &CardFace, attr: NumberAttr) -> Option<&str> {
    match attr {
        NumberAttr::Power => face.power.as_deref(),
        NumberAttr::Toughness => face.toughness.as_deref(),
        NumberAttr::Loyalty => face.loyalty.as_deref(),
        NumberAttr::ManaValue => None,
    }
}

fn test_text(card: &Card, attr: TextAttr, op: TextOp, value: &str) -> bool {
    let needle = normalize_name(value);
    let matches = |haystack: &str| {
        let haystack = normalize_name(haystack);
        match op {
            TextOp::Contains | TextOp::Excludes => haystack.contains(&needle),
            TextOp::Equals => haystack == needle,
            TextOp::StartsWith => haystack.starts_with(&needle),
        }
    };

    let any = match attr {
        TextAttr::Name => {
            matches(card.name()) || card.faces().iter().any(|f| matches(&f.name))
        }
        TextAttr::RulesText => card.faces().iter().any(|f| matches(&f.text)),
        TextAttr::Flavor => card.faces().iter().any(|f| matches(&f.flavor)),
        TextAttr::Artist => matches(card.artist()),
    };
    match op {
        TextOp::Excludes => !any,
        _ => any,
    }
}

fn test_colors(card: ColorSet, op: SetOp, filter: ColorSet) -> bool {
    match op {
        SetOp::AnyOf if filter.is_empty() => card.is_empty(),
        SetOp::AnyOf => card.intersects(filter),
        SetOp::AllOf => filter.is_subset(card),
        SetOp::NoneOf => !card.intersects(filter),
        SetOp::Exactly => card == filter,
    }
}

fn test_types(card: &Card, attr: TypeAttr, op: SetOp, values: &[String]) -> bool {
    let card_values: Vec<&str> = card
        .faces()
        .iter()
        .flat_map(|face| match attr {
            TypeAttr::CardType => face.types.iter(),
            TypeAttr::Supertype => face.supertypes.iter(),
            TypeAttr::Subtype => face.subtypes.iter(),
        })
        .map(String::as_str)
        .collect();
    let has = |value: &str| card_values.iter().any(|v| v.eq_ignore_ascii_case(value));

    match op {
        SetOp::AnyOf => values.iter().any(|v| has(v)),
        SetOp::AllOf => values.iter().all(|v| has(v)),
        SetOp::NoneOf => !values.iter().any(|v| has(v)),
        SetOp::Exactly => {
            values.iter().all(|v| has(v))
                && card_values
                    .iter()
                    .all(|c| values.iter().any(|v| v.eq_ignore_ascii_case(c)))
        }
    }
}
