//! A bound template and the data it renders.
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

pub use self::record::{ListMut, Record};
use self::record::Scope;
use crate::error::{Error, Result};
use crate::template::{scan, Bindings, Config};
use crate::tree::{Document, NodeKind, NodeRef, TreeAdapter};
use crate::update::{apply_all, ScopeState};
use crate::values::Map;

mod record;

/// Where to bind: a selector for [`TreeAdapter::resolve`], or a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Root<N> {
    Selector(String),
    Node(N),
}

impl<N> From<&str> for Root<N> {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl<N> From<String> for Root<N> {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl From<NodeRef> for Root<NodeRef> {
    fn from(node: NodeRef) -> Self {
        Self::Node(node)
    }
}

/// Scan the element at `root` with the default configuration.
///
/// ```
/// use trellis_core::tree::Document;
/// use trellis_core::values::Map;
///
/// let doc = Document::parse(r#"<p id="greeting">Hello {{ name }}</p>"#).unwrap();
/// let mut view = trellis_core::bind(doc, "#greeting").unwrap();
/// view.set_data(Map::from_iter([("name", "World")])).unwrap();
/// assert_eq!(view.markup(), r#"<p id="greeting">Hello World</p>"#);
/// ```
pub fn bind<A: TreeAdapter>(tree: A, root: impl Into<Root<A::Node>>) -> Result<View<A>> {
    bind_with(tree, root, &Config::default())
}

pub fn bind_with<A: TreeAdapter>(
    mut tree: A,
    root: impl Into<Root<A::Node>>,
    config: &Config,
) -> Result<View<A>> {
    config.validate()?;

    let root = match root.into() {
        Root::Selector(selector) => match tree.resolve(&selector) {
            Some(node) => node,
            None => return Err(Error::RootNotFound(selector)),
        },
        Root::Node(node) => node,
    };

    if tree.kind(&root) != NodeKind::Element {
        return Err(Error::RootNotFound(format!("{root:?}")));
    }

    let bindings = scan(&mut tree, &root, config)?;

    #[cfg(feature = "logging")]
    {
        log::debug!(
            "bound {root:?}: {} bindings over {} variables",
            bindings.len(),
            bindings.index().len()
        );
    }

    Ok(View {
        tree,
        root,
        bindings,
        state: ScopeState::root(),
        data: Map::empty(),
    })
}

// -----------------------------------------------------------------------------
//   - View -
// -----------------------------------------------------------------------------
/// A scanned template bound to a data record.
///
/// The data starts out empty and nothing is rendered until the first call
/// to [`View::set_data`] or a write through [`View::data_mut`].
pub struct View<A: TreeAdapter> {
    tree: A,
    root: A::Node,
    bindings: Bindings<A::Node>,
    state: ScopeState<A::Node>,
    data: Map,
}

impl<A: TreeAdapter> View<A> {
    /// Replace the whole record and render everything.
    pub fn set_data(&mut self, data: Map) -> Result<()> {
        self.data = data;
        apply_all(&mut self.tree, &self.bindings, &mut self.state, &self.data)
    }

    pub fn data(&self) -> &Map {
        &self.data
    }

    /// Live access to the record: every write updates the tree.
    pub fn data_mut(&mut self) -> Record<'_, A> {
        let scope = Scope {
            bindings: &self.bindings,
            state: &mut self.state,
        };
        Record::new(&mut self.tree, &mut self.data, vec![scope])
    }

    pub fn root(&self) -> &A::Node {
        &self.root
    }

    pub fn bindings(&self) -> &Bindings<A::Node> {
        &self.bindings
    }

    pub fn tree(&self) -> &A {
        &self.tree
    }

    /// Writes to the tree that touch bound nodes are overwritten on the
    /// next update.
    pub fn tree_mut(&mut self) -> &mut A {
        &mut self.tree
    }

    /// The number of rendered rows of the first repeat bound to `variable`.
    pub fn row_count(&self, variable: &str) -> Option<usize> {
        let (id, _) = self.bindings.for_variable(variable).find(|(_, binding)| {
            matches!(binding.kind, crate::template::BindingKind::Repeat(_))
        })?;
        Some(self.state.repeats.get(&id).map_or(0, |repeat| repeat.rows.len()))
    }

    pub fn into_tree(self) -> A {
        self.tree
    }

    pub fn into_shared(self) -> SharedView<A> {
        SharedView(Arc::new(Mutex::new(self)))
    }
}

impl View<Document> {
    /// The markup of the bound element.
    pub fn markup(&self) -> String {
        self.tree.markup(&self.root)
    }
}

// -----------------------------------------------------------------------------
//   - Shared view -
// -----------------------------------------------------------------------------
/// A view behind a lock, for updating from more than one thread.
pub struct SharedView<A: TreeAdapter>(Arc<Mutex<View<A>>>);

impl<A: TreeAdapter> Clone for SharedView<A> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<A: TreeAdapter> SharedView<A> {
    pub fn lock(&self) -> MutexGuard<'_, View<A>> {
        self.0.lock()
    }
}
