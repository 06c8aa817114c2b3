//! The tree the engine binds to.
//!
//! The engine never touches nodes directly: every read and write goes
//! through a [`TreeAdapter`]. [`Document`] is an in-memory implementation.
use std::fmt::Debug;

pub use self::document::{Document, NodeRef};
use crate::values::Value;

mod document;
mod markup;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    Other,
}

/// Whether an element is displayed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Show,
    /// Hidden, but still taking up its place.
    Hide,
    /// Removed from the layout altogether.
    Exclude,
}

/// Fired on a repeat mount element every time a row is created.
#[derive(Debug, Clone, PartialEq)]
pub struct RowEvent<N> {
    /// The top level nodes of the row, without whitespace-only text nodes.
    pub nodes: Vec<N>,
    /// The data the row was rendered from.
    pub data: Value,
}

pub trait TreeAdapter {
    type Node: Clone + PartialEq + Debug;

    /// Find a node by an opaque selector.
    fn resolve(&self, selector: &str) -> Option<Self::Node>;

    fn kind(&self, node: &Self::Node) -> NodeKind;

    /// All child nodes, in order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// The content of a text node.
    fn text(&self, node: &Self::Node) -> Option<String>;

    fn set_text(&mut self, node: &Self::Node, text: &str);

    /// All attributes of an element, in order.
    fn attributes(&self, node: &Self::Node) -> Vec<(String, String)>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    fn remove_attribute(&mut self, node: &Self::Node, name: &str);

    fn display(&self, node: &Self::Node) -> Display;

    fn set_display(&mut self, node: &Self::Node, display: Display);

    /// Deep clone a node. The clone has no parent.
    fn clone_node(&mut self, node: &Self::Node) -> Self::Node;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);

    /// Put `new` in the place of `old` under `parent`, removing `old`.
    fn replace_child(&mut self, parent: &Self::Node, new: &Self::Node, old: &Self::Node);

    /// Unlink a node from its parent. The node stays usable.
    fn detach(&mut self, node: &Self::Node);

    /// Unlink a node from its parent. The node will not be used again.
    fn remove(&mut self, node: &Self::Node) {
        self.detach(node)
    }

    /// Notify observers of `node` that a row was created under it.
    fn dispatch(&mut self, node: &Self::Node, event: RowEvent<Self::Node>);

    /// The element children of a node, in order.
    fn elements(&self, node: &Self::Node) -> Vec<Self::Node> {
        self.children(node)
            .into_iter()
            .filter(|child| self.kind(child) == NodeKind::Element)
            .collect()
    }
}

impl<A: TreeAdapter + ?Sized> TreeAdapter for &mut A {
    type Node = A::Node;

    fn resolve(&self, selector: &str) -> Option<Self::Node> {
        (**self).resolve(selector)
    }

    fn kind(&self, node: &Self::Node) -> NodeKind {
        (**self).kind(node)
    }

    fn children(&self, node: &Self::Node) -> Vec<Self::Node> {
        (**self).children(node)
    }

    fn text(&self, node: &Self::Node) -> Option<String> {
        (**self).text(node)
    }

    fn set_text(&mut self, node: &Self::Node, text: &str) {
        (**self).set_text(node, text)
    }

    fn attributes(&self, node: &Self::Node) -> Vec<(String, String)> {
        (**self).attributes(node)
    }

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String> {
        (**self).attribute(node, name)
    }

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str) {
        (**self).set_attribute(node, name, value)
    }

    fn remove_attribute(&mut self, node: &Self::Node, name: &str) {
        (**self).remove_attribute(node, name)
    }

    fn display(&self, node: &Self::Node) -> Display {
        (**self).display(node)
    }

    fn set_display(&mut self, node: &Self::Node, display: Display) {
        (**self).set_display(node, display)
    }

    fn clone_node(&mut self, node: &Self::Node) -> Self::Node {
        (**self).clone_node(node)
    }

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) {
        (**self).append_child(parent, child)
    }

    fn replace_child(&mut self, parent: &Self::Node, new: &Self::Node, old: &Self::Node) {
        (**self).replace_child(parent, new, old)
    }

    fn detach(&mut self, node: &Self::Node) {
        (**self).detach(node)
    }

    fn remove(&mut self, node: &Self::Node) {
        (**self).remove(node)
    }

    fn dispatch(&mut self, node: &Self::Node, event: RowEvent<Self::Node>) {
        (**self).dispatch(node, event)
    }

    fn elements(&self, node: &Self::Node) -> Vec<Self::Node> {
        (**self).elements(node)
    }
}
