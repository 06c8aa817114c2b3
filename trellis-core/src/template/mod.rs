//! Scanning a tree for bindings.
//!
//! A scan walks an element and its descendants once, parses every text node
//! and directive attribute, and records what has to be updated when a
//! variable changes.
pub use self::config::{Config, Directive};
pub use self::index::{Binding, BindingKind, Bindings, EntryId, Repeat, VariableIndex};
pub use self::path::BindingPath;
pub use self::scanner::scan;

mod config;
mod index;
mod path;
mod scanner;
