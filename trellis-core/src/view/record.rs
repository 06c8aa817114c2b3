use crate::error::{Error, Result};
use crate::template::{BindingKind, Bindings, Repeat};
use crate::tree::TreeAdapter;
use crate::update::{apply_change, apply_field, locate, RepeatState, ScopeState};
use crate::values::{Change, List, Map, Value};

/// A set of bindings and the state they render into.
pub(crate) struct Scope<'a, N> {
    pub(crate) bindings: &'a Bindings<N>,
    pub(crate) state: &'a mut ScopeState<N>,
}

// -----------------------------------------------------------------------------
//   - Record -
// -----------------------------------------------------------------------------
/// Live access to a data record.
///
/// Every write goes through to the tree before the call returns. A record
/// is either the root data of a view or one item of a list, in which case
/// the writes update the rows the item renders.
pub struct Record<'a, A: TreeAdapter> {
    tree: &'a mut A,
    data: &'a mut Map,
    scopes: Vec<Scope<'a, A::Node>>,
}

impl<'a, A: TreeAdapter> Record<'a, A> {
    pub(crate) fn new(tree: &'a mut A, data: &'a mut Map, scopes: Vec<Scope<'a, A::Node>>) -> Self {
        Self { tree, data, scopes }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn get_ref<T: 'static>(&self, key: &str) -> Option<&T>
    where
        for<'b> &'b Value: TryInto<&'b T>,
    {
        self.data.get(key)?.try_into().ok()
    }

    pub fn as_map(&self) -> &Map {
        self.data
    }

    /// Set a field and update everything that reads it.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        self.data.insert(key.clone(), value);
        self.dispatch(&key)
    }

    /// Modify a field in place. A missing field starts out as `Null`.
    pub fn update<F>(&mut self, key: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut Value),
    {
        if self.data.get(key).is_none() {
            self.data.insert(key, Value::Null);
        }
        if let Some(value) = self.data.get_value_mut(key) {
            f(value);
        }
        self.dispatch(key)
    }

    /// Remove a field. Bindings that read it render it as missing.
    pub fn remove(&mut self, key: &str) -> Result<Option<Value>> {
        let value = self.data.remove(key);
        self.dispatch(key)?;
        Ok(value)
    }

    /// Incremental access to a list field.
    /// Returns `None` if the field is missing or not a list, and an error
    /// if a repeat reading the field can no longer be found in the tree.
    pub fn list(&mut self, key: &str) -> Result<Option<ListMut<'_, A>>> {
        let Record { tree, data, scopes } = self;

        let list = match data.get_value_mut(key) {
            Some(Value::List(list)) => list,
            _ => return Ok(None),
        };

        let mut mounts = vec![];
        for scope in scopes.iter_mut() {
            let bindings: &Bindings<A::Node> = scope.bindings;
            let ScopeState { row, repeats } = &mut *scope.state;

            let mut found = vec![];
            for (id, binding) in bindings.for_variable(key) {
                let BindingKind::Repeat(repeat) = &binding.kind else {
                    continue;
                };
                let node = locate(&**tree, row.as_deref(), binding)?;
                found.push((id, repeat, node));
                repeats.entry(id).or_default();
            }

            for (id, state) in repeats.iter_mut() {
                if let Some((_, repeat, node)) = found.iter().find(|(entry, ..)| entry == id) {
                    mounts.push(Mount {
                        repeat: *repeat,
                        node: node.clone(),
                        state,
                    });
                }
            }
        }

        Ok(Some(ListMut {
            tree: &mut **tree,
            list,
            mounts,
        }))
    }

    fn dispatch(&mut self, key: &str) -> Result<()> {
        for scope in &mut self.scopes {
            apply_field(self.tree, scope.bindings, scope.state, self.data, key)?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
//   - List -
// -----------------------------------------------------------------------------
struct Mount<'a, N> {
    repeat: &'a Repeat<N>,
    node: N,
    state: &'a mut RepeatState<N>,
}

/// Live access to a list field.
///
/// Each operation updates the list, then only the rows it touches, in every
/// repeat that reads the field.
pub struct ListMut<'a, A: TreeAdapter> {
    tree: &'a mut A,
    list: &'a mut List,
    mounts: Vec<Mount<'a, A::Node>>,
}

impl<'a, A: TreeAdapter> ListMut<'a, A> {
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.list.get(index)
    }

    pub fn push(&mut self, value: impl Into<Value>) -> Result<()> {
        self.list.push(value);
        self.notify(Change::Push)
    }

    pub fn pop(&mut self) -> Result<Option<Value>> {
        let value = self.list.pop();
        if value.is_some() {
            self.notify(Change::Truncate(self.list.len()))?;
        }
        Ok(value)
    }

    /// Replace the item at `index`. Setting the item one past the end
    /// appends it.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<()> {
        let len = self.list.len();
        if index == len {
            return self.push(value);
        }
        if index > len {
            return Err(Error::IndexOutOfBounds { index, len });
        }

        self.list.set(index, value);
        self.notify(Change::Set(index))
    }

    /// Shorten the list, removing rows from the end. Does nothing if the
    /// list is already `len` or shorter.
    pub fn truncate(&mut self, len: usize) -> Result<()> {
        if len >= self.list.len() {
            return Ok(());
        }
        self.list.truncate(len);
        self.notify(Change::Truncate(len))
    }

    /// Remove the item at `index`. Every row after it is rendered again.
    pub fn remove(&mut self, index: usize) -> Result<Value> {
        let len = self.list.len();
        if index >= len {
            return Err(Error::IndexOutOfBounds { index, len });
        }

        let value = self.list.remove(index);
        for i in index..self.list.len() {
            self.notify(Change::Set(i))?;
        }
        self.notify(Change::Truncate(self.list.len()))?;
        Ok(value)
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        let len = self.list.len();
        for index in [a, b] {
            if index >= len {
                return Err(Error::IndexOutOfBounds { index, len });
            }
        }
        if a == b {
            return Ok(());
        }

        self.list.swap(a, b);
        self.notify(Change::Set(a))?;
        self.notify(Change::Set(b))
    }

    /// Live access to the record at `index`.
    /// Writes update that row only.
    pub fn row(&mut self, index: usize) -> Option<Record<'_, A>> {
        let ListMut {
            tree,
            list,
            mounts,
        } = self;

        let data = match list.get_value_mut(index)? {
            Value::Map(map) => map,
            _ => return None,
        };

        let scopes = mounts
            .iter_mut()
            .filter_map(|mount| {
                let state = mount.state.rows.get_mut(index)?;
                Some(Scope {
                    bindings: &mount.repeat.bindings,
                    state,
                })
            })
            .collect();

        Some(Record::new(&mut **tree, data, scopes))
    }

    fn notify(&mut self, change: Change) -> Result<()> {
        for mount in &mut self.mounts {
            apply_change(
                self.tree,
                mount.repeat,
                &mount.node,
                mount.state,
                change,
                self.list,
            )?;
        }
        Ok(())
    }
}
