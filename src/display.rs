//! Displayable table cells.
//!
//! A card table shows one [`CellValue`] per column; formatting is the
//! `Display` impl, so any front end can render it as text.

use chrono::NaiveDate;

use crate::cards::{ColorSet, ManaCost};
use crate::category::CATEGORY_DELIMITER;
use crate::deck::{CardEntry, Deck};

/// Columns of a card table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    Count,
    ManaCost,
    ManaValue,
    Colors,
    ColorIdentity,
    TypeLine,
    Expansion,
    Rarity,
    Artist,
    Categories,
    DateAdded,
}

/// The value of one cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Text(String),
    /// One cost per face.
    ManaCost(Vec<ManaCost>),
    ColorList(ColorSet),
    /// Names of the including categories, in rank order.
    CategoryMembership(Vec<String>),
    Date(NaiveDate),
}

impl CellValue {
    /// The cell for `column` of a deck entry.
    #[must_use]
    pub fn of(column: Column, entry: &CardEntry, deck: &Deck) -> Self {
        let card = &entry.card;
        match column {
            Column::Name => CellValue::Text(card.name().to_string()),
            Column::Count => CellValue::Text(entry.count.to_string()),
            Column::ManaCost => {
                CellValue::ManaCost(card.faces().iter().map(|f| f.mana_cost.clone()).collect())
            }
            Column::ManaValue => CellValue::Text(card.mana_value().to_string()),
            Column::Colors => CellValue::ColorList(card.colors()),
            Column::ColorIdentity => CellValue::ColorList(card.color_identity()),
            Column::TypeLine => CellValue::Text(card.type_line().to_string()),
            Column::Expansion => CellValue::Text(card.expansion().to_string()),
            Column::Rarity => CellValue::Text(card.rarity().code().to_string()),
            Column::Artist => CellValue::Text(card.artist().to_string()),
            Column::Categories => CellValue::CategoryMembership(
                deck.categories_of(card)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            ),
            Column::DateAdded => CellValue::Date(entry.added),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Text(text) => f.write_str(text),
            CellValue::ManaCost(costs) => {
                for (i, cost) in costs.iter().filter(|c| !c.is_empty()).enumerate() {
                    if i > 0 {
                        f.write_str(" // ")?;
                    }
                    write!(f, "{cost}")?;
                }
                Ok(())
            }
            CellValue::ColorList(colors) => f.write_str(&colors.letters()),
            CellValue::CategoryMembership(names) => {
                let separator = format!("{CATEGORY_DELIMITER} ");
                f.write_str(&names.join(&separator))
            }
            CellValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cards::{Card, CardFace, Color, Layout};
    use crate::category::{CategorySpec, Rgb};
    use crate::filter::Filter;

    fn entry(card: Card) -> CardEntry {
        CardEntry::new(Arc::new(card), 2, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
    }

    #[test]
    fn test_mana_cost_cells() {
        let split = Card::new(
            "fire-ice",
            CardFace::new("Fire").with_cost(ManaCost::parse("{1}{R}").unwrap()),
        )
        .with_face(CardFace::new("Ice").with_cost(ManaCost::parse("{1}{U}").unwrap()))
        .with_layout(Layout::Split);
        let value = CellValue::of(Column::ManaCost, &entry(split), &Deck::new());
        assert_eq!(value.to_string(), "{1}{R} // {1}{U}");

        let land = Card::new("forest", CardFace::new("Forest"));
        assert_eq!(CellValue::of(Column::ManaCost, &entry(land), &Deck::new()).to_string(), "");
    }

    #[test]
    fn test_color_and_date_cells() {
        let card = Card::new(
            "charm",
            CardFace::new("Charm").with_cost(ManaCost::parse("{W}{U}").unwrap()),
        );
        let entry = entry(card);
        assert_eq!(
            CellValue::of(Column::Colors, &entry, &Deck::new()),
            CellValue::ColorList(ColorSet::of([Color::White, Color::Blue]))
        );
        assert_eq!(CellValue::of(Column::Colors, &entry, &Deck::new()).to_string(), "WU");
        assert_eq!(
            CellValue::of(Column::DateAdded, &entry, &Deck::new()).to_string(),
            "2024-02-29"
        );
        assert_eq!(CellValue::of(Column::Count, &entry, &Deck::new()).to_string(), "2");
    }

    #[test]
    fn test_category_cell() {
        let mut deck = Deck::new();
        for name in ["Ramp", "Creatures"] {
            deck.add_category(
                CategorySpec::new(name, Rgb::default(), Filter::MatchAll).unwrap(),
                None,
            )
            .unwrap();
        }
        let entry = entry(Card::new("elf", CardFace::new("Elf")));
        let value = CellValue::of(Column::Categories, &entry, &deck);
        assert_eq!(value.to_string(), "Ramp, Creatures");

        assert_eq!(CellValue::CategoryMembership(Vec::new()).to_string(), "");
    }
}
