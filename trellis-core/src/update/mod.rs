//! Applying data to scanned bindings.
pub(crate) use self::dispatch::{apply_all, apply_field};
pub(crate) use self::reconcile::apply_change;
pub(crate) use self::scope::{locate, RepeatState, ScopeState};

mod dispatch;
mod reconcile;
mod scope;
