//! Runtime shape constraints.
//!
//! A [`ShapeSpec`] fixes some of the mins, extents or strides of a shape of a
//! given rank. [`Layout`] markers attach a spec to view types, so converting
//! between views of different layouts is a checked operation.

use std::fmt;

use smallvec::SmallVec;

use crate::dim::Dim;
use crate::shape::Shape;
use crate::{Result, StridedError};

/// Constraint on one dimension. `None` fields are unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DimSpec {
    pub min: Option<isize>,
    pub extent: Option<isize>,
    pub stride: Option<isize>,
}

impl DimSpec {
    /// Unconstrained dimension.
    pub const fn any() -> Self {
        Self {
            min: None,
            extent: None,
            stride: None,
        }
    }

    /// Dimension constrained to stride 1.
    pub const fn dense() -> Self {
        Self::any().with_stride(1)
    }

    pub const fn with_min(mut self, min: isize) -> Self {
        self.min = Some(min);
        self
    }

    pub const fn with_extent(mut self, extent: isize) -> Self {
        self.extent = Some(extent);
        self
    }

    pub const fn with_stride(mut self, stride: isize) -> Self {
        self.stride = Some(stride);
        self
    }

    /// A known stride satisfies a fixed one only if they are equal. An unknown
    /// stride is compatible since conversion fills it in.
    fn accepts(&self, dim: &Dim) -> bool {
        self.min.map_or(true, |m| m == dim.min())
            && self.extent.map_or(true, |e| e == dim.extent())
            && match (self.stride, dim.stride()) {
                (Some(fixed), Some(s)) => fixed == s,
                _ => true,
            }
    }

    /// The dimension used when a lower rank shape is widened.
    fn default_dim(&self) -> Dim {
        Dim::with_stride(
            self.min.unwrap_or(0),
            self.extent.unwrap_or(1),
            self.stride,
        )
    }
}

/// Constraints for a shape of fixed rank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeSpec {
    dims: SmallVec<[DimSpec; 4]>,
}

impl ShapeSpec {
    pub fn new(dims: impl IntoIterator<Item = DimSpec>) -> Self {
        Self {
            dims: dims.into_iter().collect(),
        }
    }

    /// Unconstrained spec of the given rank.
    pub fn any(rank: usize) -> Self {
        Self::new((0..rank).map(|_| DimSpec::any()))
    }

    /// Spec of the given rank whose first dimension has stride 1.
    pub fn dense(rank: usize) -> Self {
        Self::new((0..rank).map(|d| if d == 0 { DimSpec::dense() } else { DimSpec::any() }))
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn dims(&self) -> &[DimSpec] {
        &self.dims
    }

    /// Returns true if `shape` has this rank and satisfies every fixed field.
    pub fn is_compatible(&self, shape: &Shape) -> bool {
        shape.rank() == self.rank()
            && self
                .dims
                .iter()
                .zip(shape.dims())
                .all(|(spec, dim)| spec.accepts(dim))
    }

    /// Convert `shape` to a resolved shape satisfying this spec.
    ///
    /// Unknown strides take the fixed stride of the spec where there is one.
    /// A lower rank shape is widened with extent 1 dimensions at the end.
    /// Fails if the shape has a higher rank, or a known field disagrees with a
    /// fixed one.
    ///
    /// ```rust
    /// use strided_array::{Shape, ShapeSpec};
    ///
    /// let s = ShapeSpec::dense(3).convert(&Shape::from_extents(&[4, 5])).unwrap();
    /// assert_eq!(s.extents(), vec![4, 5, 1]);
    /// assert_eq!(s.strides()[0], 1);
    /// ```
    pub fn convert(&self, shape: &Shape) -> Result<Shape> {
        if shape.rank() > self.rank() {
            return Err(self.mismatch(shape));
        }
        let mut out = Shape::scalar();
        for (spec, dim) in self.dims.iter().zip(shape.dims()) {
            if !spec.accepts(dim) {
                return Err(self.mismatch(shape));
            }
            let stride = dim.stride().or(spec.stride);
            out.push(Dim::with_stride(dim.min(), dim.extent(), stride));
        }
        for spec in &self.dims[shape.rank()..] {
            out.push(spec.default_dim());
        }
        out.resolve();
        Ok(out)
    }

    /// Same intervals as `shape`, with strides fixed by this spec kept and all
    /// others repacked.
    ///
    /// ```rust
    /// use strided_array::{Dim, DimSpec, Shape, ShapeSpec};
    ///
    /// let s = Shape::new([Dim::new(3, 5, 8), Dim::new(1, 4, 1)]);
    /// let spec = ShapeSpec::new([DimSpec::any(), DimSpec::dense()]);
    /// assert_eq!(
    ///     spec.make_compact(&s),
    ///     Shape::new([Dim::new(3, 5, 4), Dim::new(1, 4, 1)])
    /// );
    /// ```
    pub fn make_compact(&self, shape: &Shape) -> Shape {
        let mut out: Shape = shape
            .dims()
            .iter()
            .enumerate()
            .map(|(axis, dim)| {
                let stride = self.dims.get(axis).and_then(|spec| spec.stride);
                Dim::with_stride(dim.min(), dim.extent(), stride)
            })
            .collect();
        out.resolve();
        out
    }

    fn bounds(&self, shape: &Shape) -> Vec<(isize, isize)> {
        self.dims
            .iter()
            .enumerate()
            .map(|(axis, spec)| {
                let dim = shape.dims().get(axis).copied().unwrap_or_default();
                (
                    spec.min.unwrap_or(dim.min()),
                    spec.extent.unwrap_or(dim.extent()),
                )
            })
            .collect()
    }

    fn mismatch(&self, shape: &Shape) -> StridedError {
        StridedError::ShapeMismatch(shape.bounds(), self.bounds(shape))
    }
}

// ============================================================================
// Layout markers
// ============================================================================

/// Compile-time marker choosing the [`ShapeSpec`] a view type enforces.
pub trait Layout: Copy + Default + fmt::Debug + 'static {
    /// The constraints for a shape of `rank`.
    fn spec(rank: usize) -> ShapeSpec;

    fn is_compatible(shape: &Shape) -> bool {
        Self::spec(shape.rank()).is_compatible(shape)
    }
}

/// Any strides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Strided;

/// The first dimension has stride 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dense;

impl Layout for Strided {
    fn spec(rank: usize) -> ShapeSpec {
        ShapeSpec::any(rank)
    }
}

impl Layout for Dense {
    fn spec(rank: usize) -> ShapeSpec {
        ShapeSpec::dense(rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_compatibility() {
        let dense = Shape::dense(&[10, 5]);
        assert!(Dense::is_compatible(&dense));
        assert!(Strided::is_compatible(&dense));

        let sparse = Shape::new([Dim::new(0, 10, 2), Dim::new(1, 5, 20)]);
        assert!(!Dense::is_compatible(&sparse));
        assert!(Strided::is_compatible(&sparse));
        assert!(Dense::spec(2).convert(&sparse).is_err());
    }

    #[test]
    fn test_convert_widens_rank() {
        let s = Shape::new([Dim::new(1, 10, 1), Dim::new(2, 5, 10)]);
        let wide = ShapeSpec::any(3).convert(&s).unwrap();
        assert_eq!(wide.rank(), 3);
        assert_eq!(wide.dim(0), s.dim(0));
        assert_eq!(wide.dim(1), s.dim(1));
        assert_eq!(wide.dim(2).min(), 0);
        assert_eq!(wide.dim(2).extent(), 1);
        assert!(wide.is_resolved());
        for x in 1..11 {
            for y in 2..7 {
                assert_eq!(wide.offset(&[x, y, 0]), s.offset(&[x, y]));
            }
        }
    }

    #[test]
    fn test_convert_rejects_narrowing() {
        let s = Shape::dense(&[2, 3, 4]);
        assert!(matches!(
            ShapeSpec::any(2).convert(&s),
            Err(StridedError::ShapeMismatch(..))
        ));
    }

    #[test]
    fn test_convert_fixed_fields() {
        let spec = ShapeSpec::new([DimSpec::dense().with_extent(3), DimSpec::any().with_min(2)]);
        let ok = Shape::new([Dim::with_extent(3), Dim::unresolved(2, 4)]);
        let converted = spec.convert(&ok).unwrap();
        assert_eq!(converted.strides(), vec![1, 3]);
        assert!(spec.is_compatible(&converted));

        let bad_extent = Shape::new([Dim::with_extent(4), Dim::unresolved(2, 4)]);
        assert!(spec.convert(&bad_extent).is_err());
        let bad_min = Shape::new([Dim::with_extent(3), Dim::unresolved(0, 4)]);
        assert!(spec.convert(&bad_min).is_err());
    }

    #[test]
    fn test_unknown_stride_is_compatible() {
        let s = Shape::from_extents(&[4, 4]);
        assert!(Dense::is_compatible(&s));
        let converted = Dense::spec(2).convert(&s).unwrap();
        assert_eq!(converted, Shape::dense(&[4, 4]));
    }

    #[test]
    fn test_spec_make_compact() {
        let s = Shape::new([Dim::new(3, 5, 2)]);
        assert_eq!(
            ShapeSpec::any(1).make_compact(&s),
            Shape::new([Dim::new(3, 5, 1)])
        );
        let s = Shape::new([Dim::new(3, 5, 8), Dim::new(1, 4, 1)]);
        assert_eq!(
            ShapeSpec::any(2).make_compact(&s),
            Shape::new([Dim::new(3, 5, 1), Dim::new(1, 4, 5)])
        );
    }
}
