//! Error handling.
//!
//! Validation and lookup failures are reported through [`Error`] before any
//! state is touched. A history whose undo step fails after a successful redo
//! is a programming error and panics instead (see `editor::history`).

use thiserror::Error;

use crate::cards::CardId;

/// Our error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Category names must contain something besides whitespace.
    #[error("category name must not be empty")]
    EmptyCategoryName,

    /// Category names may not contain the membership delimiter.
    #[error("category name {name:?} contains the reserved character {delimiter:?}")]
    ReservedCategoryCharacter { name: String, delimiter: char },

    /// Another category in the deck already uses this name.
    #[error("a category named {name:?} already exists")]
    DuplicateCategory { name: String },

    /// No category with this name exists in the deck.
    #[error("no category named {name:?}")]
    CategoryNotFound { name: String },

    /// A category rank outside `0..count`.
    #[error("rank {rank} is out of range for {count} categories")]
    RankOutOfRange { rank: usize, count: usize },

    /// Side list names must contain something besides whitespace.
    #[error("list name must not be empty")]
    EmptyListName,

    /// Another side list already uses this name.
    #[error("a list named {name:?} already exists")]
    DuplicateList { name: String },

    /// No side list with this name exists.
    #[error("no list named {name:?}")]
    ListNotFound { name: String },

    /// Adding copies would push a list's card total past `u32::MAX`.
    #[error("adding {count} cards to {list} would overflow its card count")]
    CountOverflow { list: String, count: u64 },

    /// The inventory already holds a card with this id.
    #[error("card {id} is already in the inventory")]
    DuplicateCard { id: CardId },

    /// A card record listed no faces.
    #[error("card {id} has no faces")]
    CardWithoutFaces { id: CardId },

    /// A mana cost string could not be parsed.
    #[error("invalid mana symbol {symbol:?} in {cost:?}")]
    InvalidManaCost { cost: String, symbol: String },

    /// A filter string could not be parsed.
    #[error("could not parse filter at byte {position}: {message}")]
    FilterParse { position: usize, message: String },

    /// A deck file or configuration document was malformed.
    #[error("could not parse {what}")]
    Format {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing failed.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// `save` was called on a document that has never been saved or opened.
    #[error("the deck has no file path yet")]
    NoFilePath,

    /// A long-running load or save was cancelled by the caller.
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// A filter parse failure at `position`.
    pub(crate) fn filter_parse(position: usize, message: impl Into<String>) -> Self {
        Error::FilterParse {
            position,
            message: message.into(),
        }
    }

    /// A malformed JSON document.
    pub(crate) fn format(what: &'static str, source: serde_json::Error) -> Self {
        Error::Format { what, source }
    }

    /// Lookup failure for a category name.
    pub(crate) fn category_not_found(name: impl Into<String>) -> Self {
        Error::CategoryNotFound { name: name.into() }
    }
}

/// Our result type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
