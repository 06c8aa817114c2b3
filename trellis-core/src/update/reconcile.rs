//! Keeping the rows under a repeat mount in step with a list.
//!
//! Rows are rendered by cloning the template, applying the repeat's own
//! bindings to the clone with the item as data, and appending the clone to
//! the mount. Nothing ties a row to the identity of its item: a row is its
//! position.
use std::cmp::Ordering;

use super::dispatch::apply_all;
use super::scope::{RepeatState, ScopeState};
use crate::error::{Error, Result};
use crate::template::Repeat;
use crate::tree::{NodeKind, RowEvent, TreeAdapter};
use crate::values::{Change, List, Map, Value};

/// Throw away every row and render the list from scratch.
pub(crate) fn render_all<A: TreeAdapter>(
    tree: &mut A,
    repeat: &Repeat<A::Node>,
    mount: &A::Node,
    state: &mut RepeatState<A::Node>,
    value: Option<&Value>,
) -> Result<()> {
    for child in tree.children(mount) {
        tree.remove(&child);
    }
    state.rows.clear();

    let list = match value {
        Some(Value::List(list)) => list,
        Some(_other) => {
            #[cfg(feature = "logging")]
            {
                log::warn!("`{}` is not a list: {_other}", repeat.source);
            }
            return Ok(());
        }
        None => return Ok(()),
    };

    for item in list.iter() {
        push(tree, repeat, mount, state, item)?;
    }

    Ok(())
}

/// Bring the rows in line with a single change to `list`.
pub(crate) fn apply_change<A: TreeAdapter>(
    tree: &mut A,
    repeat: &Repeat<A::Node>,
    mount: &A::Node,
    state: &mut RepeatState<A::Node>,
    change: Change,
    list: &List,
) -> Result<()> {
    match change {
        Change::Push => {
            let from = state.rows.len();
            for item in list.iter().skip(from) {
                push(tree, repeat, mount, state, item)?;
            }
            Ok(())
        }
        Change::Set(index) => match list.get(index) {
            Some(item) => set(tree, repeat, mount, state, index, item),
            None => Err(Error::IndexOutOfBounds {
                index,
                len: list.len(),
            }),
        },
        Change::Truncate(len) => {
            truncate(tree, state, len);
            Ok(())
        }
    }
}

fn push<A: TreeAdapter>(
    tree: &mut A,
    repeat: &Repeat<A::Node>,
    mount: &A::Node,
    state: &mut RepeatState<A::Node>,
    item: &Value,
) -> Result<()> {
    let row = materialize(tree, repeat, item)?;
    for node in row.nodes() {
        tree.append_child(mount, node);
    }

    #[cfg(feature = "logging")]
    {
        log::trace!("appended row {} of `{}`", state.rows.len(), repeat.source);
    }

    notify(tree, mount, row.nodes(), item);
    state.rows.push(row);
    Ok(())
}

/// Replace the row at `index` in place. `index == rows` appends.
fn set<A: TreeAdapter>(
    tree: &mut A,
    repeat: &Repeat<A::Node>,
    mount: &A::Node,
    state: &mut RepeatState<A::Node>,
    index: usize,
    item: &Value,
) -> Result<()> {
    match index.cmp(&state.rows.len()) {
        Ordering::Less => {
            let row = materialize(tree, repeat, item)?;
            let old = std::mem::replace(&mut state.rows[index], row);
            let new = state.rows[index].nodes();
            for (new, old) in new.iter().zip(old.nodes()) {
                tree.replace_child(mount, new, old);
            }
            notify(tree, mount, new, item);
            Ok(())
        }
        Ordering::Equal => push(tree, repeat, mount, state, item),
        Ordering::Greater => Err(Error::IndexOutOfBounds {
            index,
            len: state.rows.len(),
        }),
    }
}

/// Remove rows from the end until `len` are left. Dropping a row drops the
/// state of every repeat nested in it.
fn truncate<A: TreeAdapter>(tree: &mut A, state: &mut RepeatState<A::Node>, len: usize) {
    while state.rows.len() > len {
        let Some(row) = state.rows.pop() else { break };
        for node in row.nodes().iter().rev() {
            tree.remove(node);
        }

        #[cfg(feature = "logging")]
        {
            log::trace!("removed row {}", state.rows.len());
        }
    }
}

fn materialize<A: TreeAdapter>(
    tree: &mut A,
    repeat: &Repeat<A::Node>,
    item: &Value,
) -> Result<ScopeState<A::Node>> {
    let nodes = repeat
        .fragment
        .iter()
        .map(|node| tree.clone_node(node))
        .collect();
    let mut row = ScopeState::row(nodes);

    // Items that are not records render against an empty one
    let empty = Map::empty();
    let data = item.as_map().unwrap_or(&empty);
    apply_all(tree, &repeat.bindings, &mut row, data)?;

    Ok(row)
}

fn notify<A: TreeAdapter>(tree: &mut A, mount: &A::Node, nodes: &[A::Node], item: &Value) {
    let nodes = nodes
        .iter()
        .filter(|node| !is_blank(&*tree, node))
        .cloned()
        .collect();

    let event = RowEvent {
        nodes,
        data: item.clone(),
    };
    tree.dispatch(mount, event);
}

fn is_blank<A: TreeAdapter>(tree: &A, node: &A::Node) -> bool {
    tree.kind(node) == NodeKind::Text
        && tree
            .text(node)
            .map(|text| text.trim().is_empty())
            .unwrap_or(false)
}
