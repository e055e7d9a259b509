//! Undoable editing.
//!
//! - `History`: undo/redo stacks of [`UndoableAction`]s over any state
//! - `Editor`: one open deck document with validated high-level edits
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use deck_editor::cards::{Card, CardFace};
//! use deck_editor::config::EditorConfig;
//! use deck_editor::deck::ListRef;
//! use deck_editor::editor::Editor;
//! use deck_editor::filter::Filter;
//!
//! let mut editor = Editor::new(EditorConfig::default());
//! let forest = Arc::new(Card::new(
//!     "forest",
//!     CardFace::new("Forest").with_types(&["Basic"], &["Land"], &["Forest"]),
//! ));
//!
//! editor.add_cards(&ListRef::Main, &[(forest.clone(), 17)]).unwrap();
//! editor.create_category("Lands", Filter::has_type("Land")).unwrap();
//! assert_eq!(editor.deck().category_list("Lands").unwrap().total(), 17);
//!
//! editor.undo();
//! editor.undo();
//! assert!(editor.deck().is_empty());
//! assert!(editor.redo());
//! ```

pub mod history;
pub mod session;

pub use history::{ActionId, History, Step, UndoableAction};
pub use session::{Editor, EditorObserver};
