use std::fmt;

use crate::tree::{NodeKind, TreeAdapter};

/// The position of an element relative to where its scan started, as a
/// list of element ordinals (text and other nodes are not counted).
///
/// Cloning preserves the shape of a tree, so a path recorded once over a
/// template resolves to the matching element in every clone of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BindingPath(Vec<usize>);

impl BindingPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, ordinal: usize) -> Self {
        let mut inner = Vec::with_capacity(self.0.len() + 1);
        inner.extend(&self.0);
        inner.push(ordinal);
        Self(inner)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn steps(&self) -> &[usize] {
        &self.0
    }

    /// Resolve against the element the scan started from.
    pub fn resolve<A: TreeAdapter>(&self, tree: &A, root: &A::Node) -> Option<A::Node> {
        walk(tree, root.clone(), &self.0)
    }

    /// Resolve against the top level nodes of a row.
    /// The first step picks among the elements of `nodes`, so the root path
    /// resolves to nothing: a row has no single root element.
    pub fn resolve_in_row<A: TreeAdapter>(&self, tree: &A, nodes: &[A::Node]) -> Option<A::Node> {
        let (first, rest) = self.0.split_first()?;
        let start = nodes
            .iter()
            .filter(|node| tree.kind(node) == NodeKind::Element)
            .nth(*first)?;
        walk(tree, start.clone(), rest)
    }
}

fn walk<A: TreeAdapter>(tree: &A, mut node: A::Node, steps: &[usize]) -> Option<A::Node> {
    for step in steps {
        node = tree.elements(&node).into_iter().nth(*step)?;
    }
    Some(node)
}

impl fmt::Display for BindingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        self.0.iter().try_for_each(|step| write!(f, "/{step}"))
    }
}
