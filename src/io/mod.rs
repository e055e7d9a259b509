//! Reading and writing decks.
//!
//! - `deck_file`: the JSON deck format, with progress and cancellation
//! - `text`: plain `count name` lists for import and export

pub mod deck_file;
pub mod text;

pub use deck_file::{load, load_file, save, save_file, LoadProgress, LoadWarning, LoadedDeck};
pub use text::{export, import, ImportWarning, TextImport};
