/// Moves the element at `from` to index `to`, shifting the elements in
/// between. Returns `false` and leaves the slice untouched when either index
/// is out of bounds.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    true
}
