use indexmap::IndexMap;

use super::BindingPath;
use crate::expressions::Expression;
use crate::tree::Display;

/// Position of a binding inside its [`Bindings`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(usize);

impl EntryId {
    pub fn index(self) -> usize {
        self.0
    }
}

// -----------------------------------------------------------------------------
//   - Binding -
// -----------------------------------------------------------------------------
#[derive(Debug)]
pub struct Binding<N> {
    /// The node in the scanned tree. Only meaningful for the root scope:
    /// bindings of a repeat point into the detached template.
    pub node: N,
    /// Element path from the start of the scan.
    pub path: BindingPath,
    pub kind: BindingKind<N>,
}

#[derive(Debug)]
pub enum BindingKind<N> {
    /// The text node at `index` among the children of the element at the path.
    Text { expression: Expression, index: usize },
    Attribute { name: String, expression: Expression },
    Visibility {
        source: String,
        /// Display of the element when the scan saw it.
        display: Display,
        invert: bool,
    },
    Toggle { source: String, attribute: String },
    Repeat(Repeat<N>),
}

impl<N> BindingKind<N> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Attribute { .. } => "attribute",
            Self::Visibility { invert: false, .. } => "visibility",
            Self::Visibility { invert: true, .. } => "inverse visibility",
            Self::Toggle { .. } => "toggle",
            Self::Repeat(_) => "repeat",
        }
    }
}

/// A repeated template: the children of the mount element, removed from the
/// tree at scan time, and their own bindings.
#[derive(Debug)]
pub struct Repeat<N> {
    pub source: String,
    pub fragment: Vec<N>,
    pub bindings: Bindings<N>,
}

// -----------------------------------------------------------------------------
//   - Variable index -
// -----------------------------------------------------------------------------
/// Variable name to the bindings that read it, in scan order.
#[derive(Debug, Default)]
pub struct VariableIndex {
    inner: IndexMap<String, Vec<EntryId>>,
}

impl VariableIndex {
    pub fn get(&self, variable: &str) -> &[EntryId] {
        self.inner.get(variable).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.inner.contains_key(variable)
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[EntryId])> {
        self.inner
            .iter()
            .map(|(key, ids)| (key.as_str(), ids.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn insert(&mut self, variable: &str, id: EntryId) {
        let ids = self.inner.entry(variable.to_string()).or_default();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
}

// -----------------------------------------------------------------------------
//   - Bindings -
// -----------------------------------------------------------------------------
/// Everything found by one scan: the bindings and the index over them.
/// A binding that reads several variables is stored once and listed under
/// each of them.
#[derive(Debug)]
pub struct Bindings<N> {
    entries: Vec<Binding<N>>,
    index: VariableIndex,
}

impl<N> Default for Bindings<N> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: VariableIndex::default(),
        }
    }
}

impl<N> Bindings<N> {
    pub(crate) fn insert<'v>(
        &mut self,
        variables: impl IntoIterator<Item = &'v str>,
        binding: Binding<N>,
    ) -> EntryId {
        let id = EntryId(self.entries.len());
        self.entries.push(binding);
        for variable in variables {
            self.index.insert(variable, id);
        }
        id
    }

    pub fn get(&self, id: EntryId) -> Option<&Binding<N>> {
        self.entries.get(id.0)
    }

    pub fn index(&self) -> &VariableIndex {
        &self.index
    }

    /// The bindings that read `variable`.
    pub fn for_variable<'a>(
        &'a self,
        variable: &str,
    ) -> impl Iterator<Item = (EntryId, &'a Binding<N>)> + 'a {
        self.index
            .get(variable)
            .iter()
            .filter_map(|id| Some((*id, self.get(*id)?)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &Binding<N>)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, binding)| (EntryId(i), binding))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::expressions::parse;

    fn text(src: &str, index: usize) -> Binding<()> {
        Binding {
            node: (),
            path: BindingPath::root(),
            kind: BindingKind::Text {
                expression: parse(src).unwrap(),
                index,
            },
        }
    }

    #[test]
    fn shared_binding_is_stored_once() {
        let mut bindings = Bindings::default();
        let expr = parse("{{ a }} and {{ b }}").unwrap();
        let id = bindings.insert(expr.variables(), text("{{ a }} and {{ b }}", 0));
        let other = bindings.insert(["b"], text("{{ b }}", 1));

        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings.index().get("a"), &[id]);
        assert_eq!(bindings.index().get("b"), &[id, other]);
        assert!(bindings.index().get("c").is_empty());
        assert_eq!(bindings.index().variables().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn repeated_variable_listed_once() {
        let mut bindings = Bindings::default();
        let id = bindings.insert(["a", "a"], text("{{ a }}{{ a }}", 0));
        assert_eq!(bindings.index().get("a"), &[id]);
        assert_eq!(bindings.for_variable("a").count(), 1);
    }
}
