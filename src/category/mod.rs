//! Categories: named, colored membership rules over cards.
//!
//! See `spec` for the membership rule. Decks own their categories and keep
//! names unique; a spec on its own only validates its name's shape.

pub mod spec;

pub use spec::{validate_name, CategorySpec, Rgb, CATEGORY_DELIMITER};
