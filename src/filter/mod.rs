//! Card filter predicates.
//!
//! - `Filter`: predicate tree (leaves on one attribute, AND/OR groups)
//! - `lex`/`parse`: the filter string format, lossless in both directions
//!
//! ## Example
//!
//! ```
//! use deck_editor::filter::Filter;
//!
//! let filter: Filter = r#"<or <type any "Land"> <text contains "add {g}">>"#.parse().unwrap();
//! assert_eq!(filter.to_string().parse::<Filter>().unwrap(), filter);
//! ```

pub mod lex;
pub mod parse;
pub mod predicate;

pub use predicate::{
    ColorAttr, Comparison, Filter, GroupMode, NumberAttr, SetOp, TextAttr, TextOp, TypeAttr,
};
