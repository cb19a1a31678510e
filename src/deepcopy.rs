//! Deep copy of arrays with an optional memo, so that arrays shared within one
//! container are copied once and stay shared in the copy.

use std::any::Any;
use std::collections::HashMap;

use tracing::trace;

use crate::array::{mloc, Array, ArrayElement};

type MemoKey = (usize, Vec<usize>);

struct MemoEntry<T> {
    // Held so the source buffer's address cannot be reused while memoized.
    _source: Array<T>,
    copy: Array<T>,
}

/// Record of arrays already deep-copied during one copy operation.
///
/// Keyed by source buffer identity and shape, so two views over one buffer are
/// memoized separately.
#[derive(Default)]
pub struct DeepCopyMemo {
    copies: HashMap<MemoKey, Box<dyn Any + Send + Sync>>,
}

impl DeepCopyMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.copies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.copies.is_empty()
    }

    /// Returns `true` if `array` has already been copied through this memo.
    pub fn contains<T: ArrayElement>(&self, array: &Array<T>) -> bool {
        self.get(array).is_some()
    }

    fn get<T: ArrayElement>(&self, array: &Array<T>) -> Option<Array<T>> {
        self.copies
            .get(&key(array))
            .and_then(|entry| entry.downcast_ref::<MemoEntry<T>>())
            .map(|entry| entry.copy.clone())
    }

    fn insert<T: ArrayElement>(&mut self, source: &Array<T>, copy: &Array<T>) {
        let entry = MemoEntry {
            _source: source.clone(),
            copy: copy.clone(),
        };
        self.copies.insert(key(source), Box::new(entry));
    }
}

fn key<T>(array: &Array<T>) -> MemoKey {
    (mloc(array), array.dims().to_vec())
}

/// Deep-copy `array` into a fresh, immutable buffer.
///
/// The copy is made even if `array` is already immutable, so the result holds no
/// reference to the source. With a memo, an array copied earlier through the same memo
/// returns that earlier copy instead.
pub fn array_deepcopy<T: ArrayElement>(
    array: &Array<T>,
    memo: Option<&mut DeepCopyMemo>,
) -> Array<T> {
    match memo {
        Some(memo) => {
            if let Some(found) = memo.get(array) {
                trace!(mloc = mloc(array), "deepcopy memo hit");
                return found;
            }
            let copy = fresh_copy(array);
            memo.insert(array, &copy);
            copy
        }
        None => fresh_copy(array),
    }
}

fn fresh_copy<T: ArrayElement>(array: &Array<T>) -> Array<T> {
    let mut copy = array.to_owned_buffer();
    copy.make_immutable();
    copy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::column_2d_filter;
    use crate::element::Element;

    #[test]
    fn test_deepcopy_without_memo() {
        let mut a = Array::from_vec(vec![1i64, 2, 3]);
        a.make_immutable();
        let b = array_deepcopy(&a, None);
        assert_ne!(mloc(&a), mloc(&b));
        assert!(!b.is_writeable());
        assert_eq!(b.as_slice(), a.as_slice());
        assert_eq!(b.dtype(), a.dtype());
    }

    #[test]
    fn test_deepcopy_memo_hit() {
        let a = Array::from_vec(vec![1.5f64, 2.5]);
        let mut memo = DeepCopyMemo::new();
        let b = array_deepcopy(&a, Some(&mut memo));
        let c = array_deepcopy(&a, Some(&mut memo));
        assert_eq!(mloc(&b), mloc(&c));
        assert_ne!(mloc(&a), mloc(&b));
        assert!(memo.contains(&a));
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn test_deepcopy_memo_distinguishes_views() {
        let a = Array::from_vec(vec![1i64, 2]);
        let col = column_2d_filter(&a).unwrap();
        let mut memo = DeepCopyMemo::new();
        let b = array_deepcopy(&a, Some(&mut memo));
        let c = array_deepcopy(&col, Some(&mut memo));
        assert_eq!(b.dims(), &[2]);
        assert_eq!(c.dims(), &[2, 1]);
        assert_eq!(memo.len(), 2);
    }

    #[test]
    fn test_deepcopy_object_array() {
        let a = Array::from_vec(vec![
            Element::List(vec![Element::Int(1)]),
            Element::from("x"),
        ]);
        let b = array_deepcopy(&a, None);
        assert_eq!(b.as_slice(), a.as_slice());
        assert_ne!(mloc(&a), mloc(&b));
    }
}
