//! Data binding for node trees.
//!
//! ```
//! use trellis::{Document, Map, Value};
//!
//! let doc = Document::parse(
//!     r#"<ul id="todo" tv-foreach="items"><li tv-value-class="{{ done ? 'done' }}">{{ text }}</li></ul>"#,
//! )
//! .unwrap();
//!
//! let mut view = trellis::bind(doc, "#todo").unwrap();
//! let items = vec![
//!     Map::from_iter([("text", Value::from("write")), ("done", Value::from(true))]),
//!     Map::from_iter([("text", Value::from("test")), ("done", Value::from(false))]),
//! ];
//! view.set_data(Map::from_iter([("items", items)])).unwrap();
//!
//! assert_eq!(
//!     view.markup(),
//!     r#"<ul id="todo"><li class="done">write</li><li class="">test</li></ul>"#
//! );
//! ```
pub use trellis_core::*;
