use std::borrow::Borrow;
use std::hash::Hash;

use indexmap::IndexMap;

use super::Value;

// -----------------------------------------------------------------------------
//   - List -
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq)]
pub struct List {
    values: Vec<Value>,
}

impl List {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn get_ref<T: 'static>(&self, index: usize) -> Option<&T>
    where
        for<'a> &'a Value: TryInto<&'a T>,
    {
        self.values.get(index)?.try_into().ok()
    }

    pub fn get_mut<T: 'static>(&mut self, index: usize) -> Option<&mut T>
    where
        for<'a> &'a mut Value: TryInto<&'a mut T>,
    {
        self.values.get_mut(index)?.try_into().ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> + '_ {
        self.values.iter()
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.values.push(value.into())
    }

    pub fn pop(&mut self) -> Option<Value> {
        self.values.pop()
    }

    pub fn truncate(&mut self, len: usize) {
        self.values.truncate(len)
    }

    /// Replace the value at `index`, returning the previous value.
    /// Returns `None` and leaves the list untouched if `index` is out of bounds.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Option<Value> {
        let slot = self.values.get_mut(index)?;
        Some(std::mem::replace(slot, value.into()))
    }

    pub fn remove(&mut self, index: usize) -> Value {
        self.values.remove(index)
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        self.values.swap(a, b)
    }

    pub(crate) fn get_value_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.values.get_mut(index)
    }
}

impl<V: Into<Value>> FromIterator<V> for List {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

// -----------------------------------------------------------------------------
//   - Map -
// -----------------------------------------------------------------------------
/// A data record. Keys keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map {
    values: IndexMap<String, Value>,
}

impl Map {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<Value>
    where
        String: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.values.shift_remove(key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&Value>
    where
        String: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.values.get(key)
    }

    pub fn get_ref<T: 'static, Q>(&self, key: &Q) -> Option<&T>
    where
        for<'a> &'a Value: TryInto<&'a T>,
        String: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.values.get(key)?.try_into().ok()
    }

    pub fn get_mut<T: 'static, Q>(&mut self, key: &Q) -> Option<&mut T>
    where
        for<'a> &'a mut Value: TryInto<&'a mut T>,
        String: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.values.get_mut(key)?.try_into().ok()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn get_value_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.values.get_mut(key)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
