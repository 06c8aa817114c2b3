//! Fixtures for tests that run against a [`Document`].
use crate::tree::Document;
use crate::values::{Map, Value};
use crate::view::{bind, View};

/// Parse `src` and bind the element with the id `root`.
pub fn view(src: &str) -> View<Document> {
    let doc = Document::parse(src).unwrap();
    bind(doc, "#root").unwrap()
}

/// A list of records, each with a single field.
pub fn records(field: &str, values: &[&str]) -> Value {
    values
        .iter()
        .map(|value| Map::from_iter([(field, *value)]))
        .collect::<Vec<_>>()
        .into()
}

/// A list of records with a `label` field.
pub fn labels(values: &[&str]) -> Value {
    records("label", values)
}
