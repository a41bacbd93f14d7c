/// Domain interface for the uniform choices made during generation.
///
/// Injected so tests can substitute a scripted source and assert exact
/// selections.
pub trait RandomSource: Send {
    /// Returns an index uniformly distributed in `0..len`. `len` is never 0.
    fn next_index(&mut self, len: usize) -> usize;
}

/// Picks one element uniformly, or `None` for an empty slice.
pub fn choose<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.next_index(items.len()))
}

/// Removes and returns one element chosen uniformly, or `None` when empty.
pub fn take<T>(rng: &mut dyn RandomSource, items: &mut Vec<T>) -> Option<T> {
    if items.is_empty() {
        return None;
    }
    let idx = rng.next_index(items.len());
    Some(items.remove(idx))
}
