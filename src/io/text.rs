//! Plain-text card lists, one `count name` line per card.

use std::sync::Arc;

use log::warn;

use crate::cards::{Card, Inventory};
use crate::deck::Deck;

/// Write `"{count} {name}"` for every entry, in deck order.
#[must_use]
pub fn export(deck: &Deck) -> String {
    deck.entries()
        .iter()
        .map(|entry| format!("{} {}\n", entry.count, entry.card.name()))
        .collect()
}

/// A line that could not be imported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportWarning {
    /// 1-based line number.
    pub line: usize,
    pub text: String,
}

impl std::fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: no card named {:?}", self.line, self.text)
    }
}

/// Cards read from a text list.
#[derive(Clone, Debug, Default)]
pub struct TextImport {
    pub cards: Vec<(Arc<Card>, u32)>,
    pub warnings: Vec<ImportWarning>,
}

/// Split `4 Name` / `4x Name` into count and name. A line without a count
/// means one copy.
fn split_count(line: &str) -> (u32, &str) {
    if let Some((head, rest)) = line.split_once(char::is_whitespace) {
        let digits = head.strip_suffix(['x', 'X']).unwrap_or(head);
        if let Ok(count) = digits.parse::<u32>() {
            return (count, rest.trim());
        }
    }
    (1, line)
}

/// Read a text list, resolving names against `inventory`.
///
/// Blank lines and lines starting with `//` or `#` are ignored.
#[must_use]
pub fn import(text: &str, inventory: &Inventory) -> TextImport {
    let mut result = TextImport::default();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") || line.starts_with('#') {
            continue;
        }

        let (count, name) = split_count(line);
        match inventory.find_by_name(name) {
            Some(card) if count > 0 => result.cards.push((Arc::clone(card), count)),
            Some(_) => {}
            None => {
                warn!("no card named {:?} on line {}", name, i + 1);
                result.warnings.push(ImportWarning {
                    line: i + 1,
                    text: name.to_string(),
                });
            }
        }
    }
    result
}
