//! Deck lists.
//!
//! - `CardEntry`: a card with its count and date added
//! - `Deck`: ordered entries plus ranked categories
//! - `CategoryView`: live view of the entries in one category
//! - `DeckDocument`: main deck, side lists, changelog and notes

pub mod document;
pub mod entry;
pub mod model;
pub mod view;

pub use document::{DeckDocument, ListRef};
pub use entry::CardEntry;
pub use model::Deck;
pub use view::CategoryView;
