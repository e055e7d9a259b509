//! Card system: printed attributes, mana costs, definitions and inventory.
//!
//! ## Key Types
//!
//! - `CardId`: Stable external card identifier
//! - `Card`: Immutable card definition with one or more `CardFace`s
//! - `ManaCost`: Parsed `{..}` mana cost
//! - `ColorSet`, `Rarity`, `Layout`: Attributes queried by filters
//! - `Inventory`: Card lookup collaborator
//!
//! Cards never change after construction; decks and categories refer to
//! them through `Arc<Card>` or `CardId`.

pub mod attributes;
pub mod definition;
pub mod mana;
pub mod registry;

pub use attributes::{Color, ColorSet, Layout, Rarity};
pub use definition::{normalize_name, stat_value, Card, CardFace, CardId};
pub use mana::{ManaCost, ManaSymbol};
pub use registry::Inventory;
