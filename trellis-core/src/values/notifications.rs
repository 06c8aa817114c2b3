/// A structural change to a list bound to a repeat directive.
///
/// The live list handle turns every mutation into one of these and the
/// reconciler maps it onto the rendered rows.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Change {
    /// The value at the index was replaced, or written one past the end.
    Set(usize),
    /// A value was appended.
    Push,
    /// The list was shortened to the given length.
    Truncate(usize),
}
