//! Bind data to a node tree through text expressions and directive attributes.
//!
//! A [`View`] is created by scanning an element of a tree (anything that
//! implements [`TreeAdapter`]) for `{{ variable }}` expressions and
//! `tv-` directive attributes. Setting data on the view then updates the
//! nodes that read it.
pub use crate::error::{Error, Result};
pub use crate::template::Config;
pub use crate::tree::{Display, Document, NodeKind, NodeRef, RowEvent, TreeAdapter};
pub use crate::values::{List, Map, Number, Value};
pub use crate::view::{bind, bind_with, ListMut, Record, Root, SharedView, View};

pub mod error;
pub mod expressions;
pub mod template;
pub mod tree;
mod update;
pub mod values;
pub mod view;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
