use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::template::{Binding, BindingKind, EntryId};
use crate::tree::TreeAdapter;

// -----------------------------------------------------------------------------
//   - Scope state -
// -----------------------------------------------------------------------------
/// Runtime state of one scope: the bound root, or one rendered row.
#[derive(Debug)]
pub(crate) struct ScopeState<N> {
    /// The top level nodes of a row. `None` for the root scope, where
    /// bindings carry their own nodes.
    pub(crate) row: Option<Vec<N>>,
    /// Rendered rows per repeat binding, created on first render.
    pub(crate) repeats: BTreeMap<EntryId, RepeatState<N>>,
}

impl<N> ScopeState<N> {
    pub(crate) fn root() -> Self {
        Self {
            row: None,
            repeats: BTreeMap::new(),
        }
    }

    pub(crate) fn row(nodes: Vec<N>) -> Self {
        Self {
            row: Some(nodes),
            repeats: BTreeMap::new(),
        }
    }

    pub(crate) fn nodes(&self) -> &[N] {
        self.row.as_deref().unwrap_or_default()
    }
}

#[derive(Debug)]
pub(crate) struct RepeatState<N> {
    pub(crate) rows: Vec<ScopeState<N>>,
}

impl<N> Default for RepeatState<N> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

/// Find the node a binding writes to.
pub(crate) fn locate<A: TreeAdapter>(
    tree: &A,
    row: Option<&[A::Node]>,
    binding: &Binding<A::Node>,
) -> Result<A::Node> {
    let Some(nodes) = row else {
        return Ok(binding.node.clone());
    };

    let node = match &binding.kind {
        BindingKind::Text { index, .. } if binding.path.is_root() => nodes.get(*index).cloned(),
        BindingKind::Text { index, .. } => binding
            .path
            .resolve_in_row(tree, nodes)
            .and_then(|parent| tree.children(&parent).into_iter().nth(*index)),
        _ => binding.path.resolve_in_row(tree, nodes),
    };

    node.ok_or_else(|| Error::UnresolvedPath {
        path: binding.path.clone(),
    })
}
