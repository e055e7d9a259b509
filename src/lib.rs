//! # deck-editor
//!
//! The model behind a Magic: the Gathering deck editor: decks, categories
//! driven by card filters, and undoable editing.
//!
//! ## Design Principles
//!
//! 1. **Cards are immutable**: a `Card` is built once, derived attributes
//!    included, and shared as `Arc<Card>` by the inventory and every deck.
//!
//! 2. **Validate, then mutate**: every edit checks its arguments and fails
//!    with an [`Error`] before touching anything.
//!
//! 3. **Every edit is undoable**: editor operations are recorded as paired
//!    redo/undo steps, and composite edits are one action.
//!
//! 4. **No globals**: the card inventory is passed to whatever needs it.
//!
//! ## Modules
//!
//! - `cards`: card ids, faces, mana costs, colors, the inventory
//! - `filter`: card predicates and their string form
//! - `category`: named filters with whitelist/blacklist overrides
//! - `deck`: deck lists, ranked categories, live category views, documents
//! - `editor`: undo/redo history and the editing session
//! - `hand`: sample hands and draw probabilities
//! - `io`: JSON deck files and text lists
//! - `display`: table cell values
//! - `config`: editor settings

pub mod cards;
pub mod category;
pub mod config;
pub mod deck;
pub mod display;
pub mod editor;
pub mod error;
pub mod filter;
pub mod hand;
pub mod io;

// Re-export commonly used types
pub use crate::error::{Error, Result};

pub use crate::cards::{Card, CardFace, CardId, Color, ColorSet, Inventory, ManaCost};

pub use crate::filter::Filter;

pub use crate::category::{CategorySpec, Rgb, CATEGORY_DELIMITER};

pub use crate::deck::{CardEntry, CategoryView, Deck, DeckDocument, ListRef};

pub use crate::editor::{ActionId, Editor, EditorObserver, History, UndoableAction};

pub use crate::hand::{HandRng, SampleHand};

pub use crate::io::{LoadProgress, LoadWarning, LoadedDeck};

pub use crate::display::{CellValue, Column};

pub use crate::config::EditorConfig;
