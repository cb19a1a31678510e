//! Owned, shareable arrays with an immutability flag, and 1D/2D shape filters.
//!
//! [`Array`] stores its elements contiguously in row-major order behind an `Arc`, so
//! cloning an array or reshaping it shares the buffer. Mutation goes through
//! [`Array::as_mut_slice`], which refuses immutable arrays and copies a shared buffer
//! before writing to it.

use std::sync::Arc;

use num_complex::{Complex32, Complex64};
use smallvec::SmallVec;

use crate::dtype::DType;
use crate::element::Element;
use crate::{ArrayKitError, Result};

type Dims = SmallVec<[usize; 4]>;

/// Types that can be stored in an [`Array`].
pub trait ArrayElement: Clone + Send + Sync + 'static {
    /// DType of an array holding `values`.
    fn dtype_of(values: &[Self]) -> DType;
}

macro_rules! impl_array_element {
    ($($t:ty => $dtype:expr),* $(,)?) => {
        $(
            impl ArrayElement for $t {
                #[inline]
                fn dtype_of(_: &[Self]) -> DType {
                    $dtype
                }
            }
        )*
    };
}

impl_array_element!(
    bool => DType::Bool,
    i8 => DType::Int8,
    i16 => DType::Int16,
    i32 => DType::Int32,
    i64 => DType::Int64,
    u8 => DType::UInt8,
    u16 => DType::UInt16,
    u32 => DType::UInt32,
    u64 => DType::UInt64,
    f32 => DType::Float32,
    f64 => DType::Float64,
    Complex32 => DType::Complex64,
    Complex64 => DType::Complex128,
    Element => DType::Object,
);

// Flexible dtypes are never narrower than one character or byte.
impl ArrayElement for String {
    fn dtype_of(values: &[Self]) -> DType {
        let width = values.iter().map(|s| s.chars().count()).max().unwrap_or(0);
        DType::Unicode(width.max(1))
    }
}

impl ArrayElement for Vec<u8> {
    fn dtype_of(values: &[Self]) -> DType {
        let width = values.iter().map(Vec::len).max().unwrap_or(0);
        DType::Bytes(width.max(1))
    }
}

/// Owned row-major array of up to any rank, sharing its buffer on clone.
pub struct Array<T> {
    data: Arc<[T]>,
    dims: Dims,
    dtype: DType,
    writeable: bool,
}

impl<T> Clone for Array<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            dims: self.dims.clone(),
            dtype: self.dtype,
            writeable: self.writeable,
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Array")
            .field("dims", &self.dims)
            .field("dtype", &self.dtype)
            .field("writeable", &self.writeable)
            .field("data", &self.data)
            .finish()
    }
}

impl<T: ArrayElement> Array<T> {
    /// Create a writeable 1D array.
    pub fn from_vec(values: Vec<T>) -> Self {
        let dtype = T::dtype_of(&values);
        let len = values.len();
        Self {
            data: Arc::from(values),
            dims: SmallVec::from_slice(&[len]),
            dtype,
            writeable: true,
        }
    }

    /// Create a writeable array of the given dims from row-major values.
    pub fn from_shape_vec(dims: &[usize], values: Vec<T>) -> Result<Self> {
        let total: usize = dims.iter().product();
        if total != values.len() {
            return Err(ArrayKitError::ShapeMismatch {
                dims: dims.to_vec(),
                len: values.len(),
            });
        }
        let dtype = T::dtype_of(&values);
        Ok(Self {
            data: Arc::from(values),
            dims: SmallVec::from_slice(dims),
            dtype,
            writeable: true,
        })
    }

    /// Gather elements by flat index into a new writeable 1D array.
    pub fn take(&self, indices: &[i64]) -> Result<Self> {
        let len = self.data.len();
        let mut values = Vec::with_capacity(indices.len());
        for &index in indices {
            if index < 0 || index as usize >= len {
                return Err(ArrayKitError::IndexOutOfBounds { index, len });
            }
            values.push(self.data[index as usize].clone());
        }
        Ok(Self {
            data: Arc::from(values),
            dims: SmallVec::from_slice(&[indices.len()]),
            dtype: self.dtype,
            writeable: true,
        })
    }

    /// Mutable access to the elements.
    ///
    /// Fails with [`ArrayKitError::ReadOnly`] if the array is immutable. A buffer shared
    /// with other arrays is copied first, so writes never leak into them.
    pub fn as_mut_slice(&mut self) -> Result<&mut [T]> {
        if !self.writeable {
            return Err(ArrayKitError::ReadOnly);
        }
        if Arc::get_mut(&mut self.data).is_none() {
            self.data = Arc::from(self.data.to_vec());
        }
        Arc::get_mut(&mut self.data).ok_or(ArrayKitError::ReadOnly)
    }

    /// Copy the elements into a fresh, unshared buffer with the same dims and dtype.
    pub(crate) fn to_owned_buffer(&self) -> Self {
        Self {
            data: Arc::from(self.data.to_vec()),
            dims: self.dims.clone(),
            dtype: self.dtype,
            writeable: true,
        }
    }
}

impl<T> Array<T> {
    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    #[inline]
    pub fn is_writeable(&self) -> bool {
        self.writeable
    }

    /// Clear the writeable flag. There is no way back.
    pub fn make_immutable(&mut self) {
        self.writeable = false;
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterate over all elements in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Element at a flat (row-major) index.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Return a view of the same buffer with new dims.
    pub fn reshape(&self, dims: &[usize]) -> Result<Self> {
        let total: usize = dims.iter().product();
        if total != self.data.len() {
            return Err(ArrayKitError::ReshapeMismatch {
                from: self.dims.to_vec(),
                to: dims.to_vec(),
            });
        }
        Ok(Self {
            data: self.data.clone(),
            dims: SmallVec::from_slice(dims),
            dtype: self.dtype,
            writeable: self.writeable,
        })
    }
}

impl<T: ArrayElement> FromIterator<T> for Array<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

// ============================================================================
// Free functions
// ============================================================================

/// Address of the array's data buffer; equal for arrays sharing a buffer.
pub fn mloc<T>(array: &Array<T>) -> usize {
    array.data.as_ptr() as usize
}

/// Return an immutable array with the contents of `array`.
///
/// An immutable input is returned as-is (sharing its buffer); a writeable input is
/// copied first, so later writes to the input cannot be observed through the result.
pub fn immutable_filter<T: ArrayElement>(array: &Array<T>) -> Array<T> {
    if array.writeable {
        let mut copy = array.to_owned_buffer();
        copy.make_immutable();
        return copy;
    }
    array.clone()
}

fn check_1d_2d<T>(array: &Array<T>) -> Result<()> {
    match array.ndim() {
        1 | 2 => Ok(()),
        ndim => Err(ArrayKitError::UnsupportedRank(ndim)),
    }
}

/// Represent a 1D or 2D array's shape as `(rows, columns)`; a 1D array is one column.
pub fn shape_filter<T>(array: &Array<T>) -> Result<(usize, usize)> {
    check_1d_2d(array)?;
    let dims = array.dims();
    let cols = if dims.len() == 1 { 1 } else { dims[1] };
    Ok((dims[0], cols))
}

/// Reshape a 1D array into a single-column 2D array; 2D arrays pass through.
pub fn column_2d_filter<T>(array: &Array<T>) -> Result<Array<T>> {
    check_1d_2d(array)?;
    if array.ndim() == 1 {
        return array.reshape(&[array.dims[0], 1]);
    }
    Ok(array.clone())
}

/// Reshape a single-column 2D array into 1D; 1D arrays pass through.
pub fn column_1d_filter<T>(array: &Array<T>) -> Result<Array<T>> {
    check_1d_2d(array)?;
    if array.ndim() == 2 {
        return array.reshape(&[array.dims[0]]);
    }
    Ok(array.clone())
}

/// Reshape a single-row 2D array into 1D; 1D arrays pass through.
pub fn row_1d_filter<T>(array: &Array<T>) -> Result<Array<T>> {
    check_1d_2d(array)?;
    if array.ndim() == 2 {
        return array.reshape(&[array.dims[1]]);
    }
    Ok(array.clone())
}
