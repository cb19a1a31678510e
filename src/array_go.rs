//! Grow-only object array used by hierarchical index levels.

use tracing::trace;

use crate::array::{immutable_filter, Array};
use crate::element::Element;
use crate::{ArrayKitError, Result};

/// A grow-only, one-dimensional object array.
///
/// Appended values are buffered in a list and folded into an immutable array the
/// next time the values are read, so a run of appends costs one concatenation.
///
/// Cloning shares the immutable array and copies the pending list, so values appended
/// to a clone are not visible in the original.
#[derive(Debug, Clone)]
pub struct ArrayGO {
    array: Option<Array<Element>>,
    list: Vec<Element>,
}

impl ArrayGO {
    /// Create from any sequence of values.
    pub fn new<I: IntoIterator<Item = Element>>(iterable: I) -> Self {
        Self {
            array: None,
            list: iterable.into_iter().collect(),
        }
    }

    /// Create from an existing object array.
    ///
    /// With `own_array`, the array is taken over and marked immutable without a copy.
    /// Otherwise it passes through [`immutable_filter`], which copies a writeable array.
    ///
    /// Fails with [`ArrayKitError::UnsupportedRank`] unless `array` is 1D.
    pub fn from_array(array: Array<Element>, own_array: bool) -> Result<Self> {
        if array.ndim() != 1 {
            return Err(ArrayKitError::UnsupportedRank(array.ndim()));
        }
        let array = if own_array {
            let mut array = array;
            array.make_immutable();
            array
        } else {
            immutable_filter(&array)
        };
        Ok(Self {
            array: Some(array),
            list: Vec::new(),
        })
    }

    pub fn append(&mut self, value: Element) {
        self.list.push(value);
    }

    pub fn extend<I: IntoIterator<Item = Element>>(&mut self, values: I) {
        self.list.extend(values);
    }

    pub fn len(&self) -> usize {
        self.array.as_ref().map_or(0, Array::len) + self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The immutable array of all values.
    pub fn values(&mut self) -> Array<Element> {
        self.update_array_cache().clone()
    }

    pub fn get(&mut self, index: usize) -> Option<&Element> {
        self.update_array_cache().get(index)
    }

    pub fn iter(&mut self) -> std::slice::Iter<'_, Element> {
        self.update_array_cache().iter()
    }

    fn update_array_cache(&mut self) -> &Array<Element> {
        if self.array.is_none() || !self.list.is_empty() {
            let pending = std::mem::take(&mut self.list);
            trace!(pending = pending.len(), "flushing ArrayGO list");
            let values = match self.array.take() {
                Some(array) => {
                    let mut values = Vec::with_capacity(array.len() + pending.len());
                    values.extend_from_slice(array.as_slice());
                    values.extend(pending);
                    values
                }
                None => pending,
            };
            let mut array = Array::from_vec(values);
            array.make_immutable();
            self.array = Some(array);
        }
        self.array.get_or_insert_with(|| Array::from_vec(Vec::new()))
    }
}
