use super::reconcile;
use super::scope::{locate, ScopeState};
use crate::error::Result;
use crate::expressions::render;
use crate::template::{BindingKind, Bindings, EntryId};
use crate::tree::{Display, TreeAdapter};
use crate::values::Map;

/// Apply every binding of a scope once, in index order.
pub(crate) fn apply_all<A: TreeAdapter>(
    tree: &mut A,
    bindings: &Bindings<A::Node>,
    state: &mut ScopeState<A::Node>,
    data: &Map,
) -> Result<()> {
    let mut seen = vec![false; bindings.len()];

    for (_, ids) in bindings.index().iter() {
        for id in ids {
            if std::mem::replace(&mut seen[id.index()], true) {
                continue;
            }
            apply(tree, bindings, *id, state, data)?;
        }
    }

    Ok(())
}

/// Apply the bindings that read `field`.
pub(crate) fn apply_field<A: TreeAdapter>(
    tree: &mut A,
    bindings: &Bindings<A::Node>,
    state: &mut ScopeState<A::Node>,
    data: &Map,
    field: &str,
) -> Result<()> {
    for id in bindings.index().get(field) {
        apply(tree, bindings, *id, state, data)?;
    }
    Ok(())
}

fn apply<A: TreeAdapter>(
    tree: &mut A,
    bindings: &Bindings<A::Node>,
    id: EntryId,
    state: &mut ScopeState<A::Node>,
    data: &Map,
) -> Result<()> {
    let Some(binding) = bindings.get(id) else {
        return Ok(());
    };
    let node = locate(&*tree, state.row.as_deref(), binding)?;
    let truthy = |source: &str| data.get(source).map(|v| v.is_truthy()).unwrap_or(false);

    match &binding.kind {
        BindingKind::Text { expression, .. } => {
            tree.set_text(&node, &render(expression.segments(), data));
        }
        BindingKind::Attribute { name, expression } => {
            tree.set_attribute(&node, name, &render(expression.segments(), data));
        }
        BindingKind::Visibility {
            source,
            display,
            invert,
        } => {
            let display = match truthy(source) != *invert {
                true => *display,
                false => Display::Exclude,
            };
            tree.set_display(&node, display);
        }
        BindingKind::Toggle { source, attribute } => match truthy(source) {
            true => tree.set_attribute(&node, attribute, ""),
            false => tree.remove_attribute(&node, attribute),
        },
        BindingKind::Repeat(repeat) => {
            let rows = state.repeats.entry(id).or_default();
            reconcile::render_all(tree, repeat, &node, rows, data.get(&repeat.source))?;
        }
    }

    Ok(())
}
