//! Array utilities for columnar label containers.
//!
//! This crate provides the small, allocation-conscious primitives a dataframe
//! library needs when it builds and rebuilds its label indices.
//!
//! # Core Types
//!
//! - [`Array`]: Owned, shareable array buffer with an immutability flag
//! - [`DType`]: Element type descriptor with promotion rules
//! - [`Element`]: Owned scalar (or container) value for object arrays
//! - [`ArrayGO`]: Grow-only object array for hierarchical index levels
//!
//! # Indexer Operations
//!
//! - [`unique_positions`]: First-occurrence position of each distinct value
//! - [`new_indexers_from_indexer_subset`]: Reuse or compact a `(positions, indexer)` pair
//!
//! # Utilities
//!
//! - [`immutable_filter`], [`mloc`]: Immutability enforcement and buffer identity
//! - [`shape_filter`], [`column_2d_filter`], [`column_1d_filter`], [`row_1d_filter`]:
//!   1D/2D shape normalization
//! - [`array_deepcopy`]: Deep copy with an optional [`DeepCopyMemo`]
//! - [`resolve_dtype`], [`resolve_dtype_iter`]: DType resolution
//! - [`isna_element`], [`dtype_from_element`], [`name_filter`]: Element inspection
//!
//! # Example
//!
//! ```rust
//! use arraykit::{new_indexers_from_indexer_subset, Compaction};
//!
//! // Indexer references only old unique slots 0 and 2
//! let positions = [5, 9, 7];
//! let indexer = [2, 0, 2, 0];
//!
//! match new_indexers_from_indexer_subset(&indexer, &positions).unwrap() {
//!     Compaction::Compacted { positions, indexers } => {
//!         assert_eq!(positions, vec![7, 5]);
//!         assert_eq!(indexers, vec![0, 1, 0, 1]);
//!     }
//!     Compaction::Unchanged => unreachable!(),
//! }
//! ```

mod array;
mod array_go;
mod deepcopy;
pub mod dtype;
mod element;
mod indexer;
mod promote;

pub use array::{
    column_1d_filter, column_2d_filter, immutable_filter, mloc, row_1d_filter, shape_filter,
    Array, ArrayElement,
};
pub use array_go::ArrayGO;
pub use deepcopy::{array_deepcopy, DeepCopyMemo};
pub use dtype::{DType, DateUnit};
pub use element::{dtype_from_element, isna_element, name_filter, Element, NAT};
pub use indexer::{new_indexers_from_indexer_subset, unique_positions, Compaction};
pub use promote::{resolve_dtype, resolve_dtype_iter};

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur in array utility operations.
#[derive(Debug, thiserror::Error)]
pub enum ArrayKitError {
    /// Operation only supports 1D or 2D arrays.
    #[error("expected 1D or 2D array (got {0})")]
    UnsupportedRank(usize),

    /// Buffer length does not match the product of the requested dims.
    #[error("shape {dims:?} does not match buffer length {len}")]
    ShapeMismatch { dims: Vec<usize>, len: usize },

    /// Array cannot be reshaped into the requested dims.
    #[error("cannot reshape array of shape {from:?} into shape {to:?}")]
    ReshapeMismatch { from: Vec<usize>, to: Vec<usize> },

    /// Attempted to mutate an immutable array.
    #[error("assignment destination is read-only")]
    ReadOnly,

    /// Name cannot be used as a label because it is not hashable.
    #[error("unhashable name (type '{0}')")]
    UnhashableName(&'static str),

    /// DType resolution was given nothing to resolve.
    #[error("iterable passed to resolve dtypes is empty")]
    EmptyDTypeIter,

    /// Index value is negative or past the end of the table it indexes.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    /// Unique position table contains a negative entry.
    #[error("negative position {0}")]
    NegativePosition(i64),

    /// Unique position table contains the same entry twice.
    #[error("duplicate position {0}")]
    DuplicatePosition(i64),
}

/// Result type for array utility operations.
pub type Result<T> = std::result::Result<T, ArrayKitError>;
