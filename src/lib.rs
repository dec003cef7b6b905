//! Strided multidimensional shapes, views and owning arrays.
//!
//! A [`Shape`] is an ordered list of [`Dim`]s, each describing one axis by its
//! minimum index, extent and memory stride. The shape maps a multi-index to a
//! flat element offset:
//!
//! ```text
//! offset(i) = sum_k (i_k - min_k) * stride_k
//! ```
//!
//! Strides may be left unknown and filled in by [`Shape::resolve`], which packs
//! the unknown dimensions around the ones that are already fixed. Strides may
//! be negative, or zero for broadcast axes.
//!
//! # Core Types
//!
//! - [`Dim`] / [`Interval`]: One axis, and the index range it covers
//! - [`Shape`]: Address mapping, stride resolution, compactness and injectivity
//! - [`ShapeSpec`] / [`Layout`]: Runtime shape constraints used for checked conversions
//! - [`View`] / [`ViewMut`]: Non-owning strided views with slicing, cropping and reinterpretation
//! - [`Array`]: Owning container backed by a pluggable [`Allocator`]
//!
//! # Algorithms
//!
//! - [`for_each_index`], [`for_all_indices`]: Visit every index of a shape
//! - [`copy`], [`move_into`], [`fill`], [`generate`], [`equal`]: Element-wise bulk operations
//! - [`make_dense_copy`], [`make_compact_copy`]: Materialize a view into a packed array
//!
//! # Example
//!
//! ```rust
//! use strided_array::{Array, Dim, Shape};
//!
//! // A 10x5 array; the second stride is resolved to 10.
//! let mut a: Array<i32> = Array::new(Shape::dense(&[10, 5])).unwrap();
//! assert_eq!(a.shape().dim(1).stride(), Some(10));
//!
//! a[[3, 2]] = 7;
//! let row = a.view().slice(1, 2).unwrap();
//! assert_eq!(row[[3]], 7);
//!
//! // Unknown strides are packed around the fixed ones.
//! let mut s = Shape::new([Dim::with_extent(5), Dim::new(0, 4, 20), Dim::new(0, 3, 1)]);
//! s.resolve();
//! assert_eq!(s.strides(), vec![3, 20, 1]);
//! ```

mod algorithm;
mod alloc;
mod array;
mod dim;
mod fuse;
mod index;
mod kernel;
mod layout;
mod order;
mod shape;
mod view;

// ============================================================================
// Dimensions and shapes
// ============================================================================
pub use dim::{clamp, Dim, Interval, Split};
pub use shape::Shape;
pub use layout::{Dense, DimSpec, Layout, ShapeSpec, Strided};

// ============================================================================
// Index iteration
// ============================================================================
pub use index::{
    for_all_indices, for_all_indices_in_order, for_each_index, for_each_index_in_memory_order,
    for_each_index_in_order,
};

// ============================================================================
// Views and arrays
// ============================================================================
pub use alloc::{Allocator, Global};
pub use array::Array;
pub use view::{View, ViewMut};

// ============================================================================
// Algorithms
// ============================================================================
pub use algorithm::{copy, equal, fill, generate, make_compact_copy, make_dense_copy, move_into};

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during shape and array operations.
#[derive(Debug, thiserror::Error)]
pub enum StridedError {
    /// An index lies outside the valid interval of an axis.
    #[error("index {index} out of range [{min}, {min} + {extent}) on axis {axis}")]
    OutOfRange {
        axis: usize,
        index: isize,
        min: isize,
        extent: isize,
    },

    /// A requested interval is not contained in the valid interval of an axis.
    #[error("interval {requested:?} out of range of {available:?} on axis {axis}")]
    IntervalOutOfRange {
        axis: usize,
        requested: Interval,
        available: Interval,
    },

    /// A shape would address memory outside the buffer it is bound to.
    #[error("flat offsets [{min}, {max}] outside of buffer of length {len}")]
    OffsetOutOfBounds { min: isize, max: isize, len: usize },

    /// Shapes are incompatible: `(min, extent)` per axis of each side.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<(isize, isize)>, Vec<(isize, isize)>),

    /// Ranks do not match.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// Invalid axis index for the given rank.
    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    /// An owning array cannot use a shape that maps two indices to one element.
    #[error("shape is not one-to-one")]
    NotOneToOne,

    /// The allocator could not provide the requested capacity.
    #[error("allocation of {capacity} elements failed")]
    AllocationFailed { capacity: usize },

    /// Reinterpreting the element type is not possible for this buffer.
    #[error("pod cast failed: {0}")]
    PodCast(&'static str),
}

/// Result type for shape and array operations.
pub type Result<T> = std::result::Result<T, StridedError>;
