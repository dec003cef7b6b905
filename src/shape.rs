//! Multidimensional shapes: address mapping, stride resolution and layout predicates.
//!
//! A [`Shape`] maps a multi-index `i` to the flat offset
//! `sum_k (i_k - min_k) * stride_k`. Offsets are relative to the element at
//! the minimum index, so they may be negative when strides are negative.

use std::collections::HashSet;
use std::ops::Index;

use smallvec::SmallVec;

use crate::dim::{Dim, Interval};
use crate::{Result, StridedError};

pub(crate) type DimVec = SmallVec<[Dim; 4]>;
pub(crate) type IndexVec = SmallVec<[isize; 4]>;
pub(crate) type AxisVec = SmallVec<[usize; 4]>;

/// An ordered list of dimensions and the address mapping they define.
///
/// The default shape has rank 0: it has exactly one (empty) index, which maps
/// to offset 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shape {
    dims: DimVec,
}

impl Shape {
    /// Create a shape from explicit dimensions.
    ///
    /// Strides that are `None` stay unknown until [`Shape::resolve`] is called.
    pub fn new(dims: impl IntoIterator<Item = Dim>) -> Self {
        Self {
            dims: dims.into_iter().collect(),
        }
    }

    /// The rank-0 shape.
    pub fn scalar() -> Self {
        Self::default()
    }

    /// Shape `[0, e_0) x [0, e_1) x ...` with all strides unknown.
    pub fn from_extents(extents: &[isize]) -> Self {
        Self::new(extents.iter().map(|&e| Dim::with_extent(e)))
    }

    /// Dense shape: the first dimension has stride 1, the rest are resolved
    /// to pack around it.
    ///
    /// ```rust
    /// use strided_array::Shape;
    ///
    /// let s = Shape::dense(&[10, 5, 20]);
    /// assert_eq!(s.strides(), vec![1, 10, 50]);
    /// assert_eq!(s.flat_extent(), 1000);
    /// ```
    pub fn dense(extents: &[isize]) -> Self {
        let mut shape = Self::from_extents(extents);
        if let Some(first) = shape.dims.first_mut() {
            first.set_stride(1);
        }
        shape.resolve();
        shape
    }

    /// A shape of the given rank with every extent 0.
    pub(crate) fn empty(rank: usize) -> Self {
        let mut shape = Self::new((0..rank).map(|_| Dim::with_extent(0)));
        shape.resolve();
        shape
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn dims(&self) -> &[Dim] {
        &self.dims
    }

    /// Returns dimension `axis`.
    ///
    /// # Panics
    /// Panics if `axis >= rank`.
    #[inline]
    pub fn dim(&self, axis: usize) -> &Dim {
        &self.dims[axis]
    }

    #[inline]
    pub fn dim_mut(&mut self, axis: usize) -> &mut Dim {
        &mut self.dims[axis]
    }

    pub fn min(&self) -> Vec<isize> {
        self.dims.iter().map(Dim::min).collect()
    }

    pub fn max(&self) -> Vec<isize> {
        self.dims.iter().map(Dim::max).collect()
    }

    pub fn extents(&self) -> Vec<isize> {
        self.dims.iter().map(Dim::extent).collect()
    }

    /// Strides of every dimension; unknown strides are reported as 0.
    pub fn strides(&self) -> Vec<isize> {
        self.dims.iter().map(Dim::stride_or_zero).collect()
    }

    pub fn intervals(&self) -> Vec<Interval> {
        self.dims.iter().map(Dim::interval).collect()
    }

    /// `(min, extent)` of every dimension, used in error reports.
    pub(crate) fn bounds(&self) -> Vec<(isize, isize)> {
        self.dims.iter().map(|d| (d.min(), d.extent())).collect()
    }

    /// Number of indices in the domain, saturating at `usize::MAX`.
    pub fn size(&self) -> usize {
        self.dims
            .iter()
            .fold(1usize, |n, d| n.saturating_mul(d.extent() as usize))
    }

    /// Returns true if the domain has no indices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|d| d.extent() == 0)
    }

    /// Smallest offset reachable by an index in the domain, saturating at
    /// `isize::MIN`.
    pub fn flat_min(&self) -> isize {
        self.dims
            .iter()
            .filter(|d| d.extent() > 0)
            .map(|d| (d.extent() - 1).saturating_mul(d.stride_or_zero()).min(0))
            .fold(0, isize::saturating_add)
    }

    /// Largest offset reachable by an index in the domain, saturating at
    /// `isize::MAX`.
    pub fn flat_max(&self) -> isize {
        self.dims
            .iter()
            .filter(|d| d.extent() > 0)
            .map(|d| (d.extent() - 1).saturating_mul(d.stride_or_zero()).max(0))
            .fold(0, isize::saturating_add)
    }

    /// `(flat_min, flat_max)`, or `None` if either does not fit in `isize`.
    pub(crate) fn checked_flat_range(&self) -> Option<(isize, isize)> {
        let mut lo = 0isize;
        let mut hi = 0isize;
        for d in self.dims.iter().filter(|d| d.extent() > 0) {
            let reach = (d.extent() - 1).checked_mul(d.stride_or_zero())?;
            if reach < 0 {
                lo = lo.checked_add(reach)?;
            } else {
                hi = hi.checked_add(reach)?;
            }
        }
        Some((lo, hi))
    }

    /// Number of elements between the smallest and largest reachable offset,
    /// inclusive; 0 for an empty domain. Saturates at `usize::MAX`.
    pub fn flat_extent(&self) -> usize {
        self.checked_flat_extent().unwrap_or(usize::MAX)
    }

    /// Like [`Shape::flat_extent`], but `None` if the offsets of the domain do
    /// not fit in `isize`.
    pub fn checked_flat_extent(&self) -> Option<usize> {
        if self.is_empty() {
            return Some(0);
        }
        let (lo, hi) = self.checked_flat_range()?;
        let extent = hi.checked_sub(lo)?.checked_add(1)?;
        usize::try_from(extent).ok()
    }

    /// Flat offset of `index`.
    ///
    /// Unknown strides contribute nothing, so resolve the shape first.
    #[inline]
    pub fn offset(&self, index: &[isize]) -> isize {
        debug_assert_eq!(index.len(), self.rank(), "wrong number of indices");
        self.dims
            .iter()
            .zip(index)
            .map(|(d, &i)| d.flat_offset(i))
            .sum()
    }

    pub fn is_in_range(&self, index: &[isize]) -> bool {
        index.len() == self.rank() && self.dims.iter().zip(index).all(|(d, &i)| d.is_in_range(i))
    }

    pub fn is_interval_in_range(&self, intervals: &[Interval]) -> bool {
        intervals.len() == self.rank()
            && self
                .dims
                .iter()
                .zip(intervals)
                .all(|(d, i)| d.is_interval_in_range(i))
    }

    /// Check `index` against the domain, reporting the first axis out of range.
    pub fn check_in_range(&self, index: &[isize]) -> Result<()> {
        if index.len() != self.rank() {
            return Err(StridedError::RankMismatch(index.len(), self.rank()));
        }
        for (axis, (d, &i)) in self.dims.iter().zip(index).enumerate() {
            if !d.is_in_range(i) {
                return Err(StridedError::OutOfRange {
                    axis,
                    index: i,
                    min: d.min(),
                    extent: d.extent(),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn push(&mut self, dim: Dim) {
        self.dims.push(dim);
    }

    pub(crate) fn remove(&mut self, axis: usize) -> Dim {
        self.dims.remove(axis)
    }

    pub(crate) fn check_axis(&self, axis: usize) -> Result<()> {
        if axis >= self.rank() {
            return Err(StridedError::InvalidAxis {
                axis,
                rank: self.rank(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Stride resolution
// ============================================================================

/// A candidate stride is acceptable for a new dimension of `extent` if the
/// resolved dimension `dim` either fits inside one step of it, or lies beyond
/// the whole new dimension.
fn is_stride_ok(stride: isize, extent: isize, dim: &Dim) -> bool {
    let Some(dim_stride) = dim.stride() else {
        return true;
    };
    let dim_stride = dim_stride.saturating_abs();
    if dim.extent().saturating_mul(dim_stride) <= stride {
        return true;
    }
    dim_stride >= extent.saturating_mul(stride)
}

/// The smallest stride another dimension could use without overlapping `dim`.
fn candidate_stride(dim: &Dim) -> Option<isize> {
    dim.stride()
        .map(|s| s.saturating_abs().saturating_mul(dim.extent()).max(1))
}

/// Find the smallest acceptable stride for a dimension of `extent`.
fn find_stride(extent: isize, dims: &[Dim]) -> isize {
    let candidates = std::iter::once(1).chain(dims.iter().filter_map(candidate_stride));
    // The largest candidate is past every resolved dimension, so it is always ok.
    let fallback = candidates.clone().max().unwrap_or(1);
    candidates
        .filter(|&c| dims.iter().all(|d| is_stride_ok(c, extent, d)))
        .fold(fallback, isize::min)
}

impl Shape {
    /// Returns true if every stride is known.
    pub fn is_resolved(&self) -> bool {
        self.dims.iter().all(Dim::is_resolved)
    }

    /// Assign a stride to every dimension whose stride is unknown.
    ///
    /// Dimensions are resolved in order. Each receives the smallest stride,
    /// out of 1 and the extents of the already resolved dimensions, that does
    /// not overlap any resolved dimension. Known strides are never changed,
    /// so resolving twice is a no-op.
    ///
    /// ```rust
    /// use strided_array::{Dim, Shape};
    ///
    /// let mut s = Shape::new([Dim::with_extent(5), Dim::new(0, 4, 14), Dim::new(0, 3, 1)]);
    /// s.resolve();
    /// // Stride 3 would collide with the row stride 14, so 56 is used.
    /// assert_eq!(s.strides(), vec![56, 14, 1]);
    /// ```
    pub fn resolve(&mut self) {
        if self.is_resolved() {
            return;
        }
        for axis in 0..self.dims.len() {
            if self.dims[axis].stride().is_none() {
                let stride = find_stride(self.dims[axis].extent(), &self.dims);
                self.dims[axis].set_stride(stride);
            }
        }
        log::trace!(
            "resolve: extents={:?} strides={:?}",
            self.extents(),
            self.strides()
        );
    }

    /// Consuming variant of [`Shape::resolve`].
    pub fn resolved(mut self) -> Self {
        self.resolve();
        self
    }
}

// ============================================================================
// Compactness and injectivity
// ============================================================================

/// `(extent, |stride|)` of the dimensions that contribute to the offset set,
/// sorted by stride.
fn sorted_extent_strides(dims: &[Dim]) -> SmallVec<[(isize, isize); 4]> {
    let mut pairs: SmallVec<[(isize, isize); 4]> = dims
        .iter()
        .filter(|d| d.extent() > 1)
        .map(|d| (d.extent(), d.stride_or_zero().saturating_abs()))
        .collect();
    pairs.sort_by_key(|&(_, s)| s);
    pairs
}

/// Offset differences are tracked densely while they span at most this many
/// elements, or a small multiple of the index count.
const DENSE_SPAN_LIMIT: u128 = 1 << 16;

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Returns true if no nonzero combination `sum t_k * s_k` with
/// `|t_k| < e_k` is zero, i.e. the offsets of distinct indices never collide.
///
/// Tracks the set of differences reachable by the dimensions seen so far,
/// which always lies in `[-span, span]`.
fn differences_are_unique_dense(pairs: &[(usize, usize)], span: usize) -> bool {
    let width = 2 * span + 1;
    let center = span;
    let mut reachable = vec![false; width];
    reachable[center] = true;
    for &(extent, stride) in pairs {
        for t in 1..extent {
            if reachable[center + t * stride] {
                return false;
            }
        }
        reachable = dilate(&reachable, stride, extent - 1);
    }
    true
}

/// Same as [`differences_are_unique_dense`], holding only the reachable
/// differences. Memory grows with the number of distinct differences, at most
/// `prod_k (2 e_k - 1)`, independent of the stride magnitudes.
fn differences_are_unique_sparse(pairs: &[(i128, i128)]) -> bool {
    let mut reachable: HashSet<i128> = HashSet::from([0]);
    for &(extent, stride) in pairs {
        if (1..extent).any(|t| reachable.contains(&(t * stride))) {
            return false;
        }
        let mut next = HashSet::with_capacity(reachable.len());
        for &d in &reachable {
            for t in (1 - extent)..extent {
                next.insert(d + t * stride);
            }
        }
        reachable = next;
    }
    true
}

/// `out[x]` is set if `set[x + t * step]` is set for some `|t| <= radius`.
fn dilate(set: &[bool], step: usize, radius: usize) -> Vec<bool> {
    let n = set.len();
    let mut out = vec![false; n];
    let mut prefix: Vec<usize> = Vec::with_capacity(n / step + 2);
    for residue in 0..step.min(n) {
        prefix.clear();
        prefix.push(0);
        let mut total = 0;
        for p in (residue..n).step_by(step) {
            total += usize::from(set[p]);
            prefix.push(total);
        }
        let len = prefix.len() - 1;
        for j in 0..len {
            let lo = j.saturating_sub(radius);
            let hi = (j + radius + 1).min(len);
            out[residue + j * step] = prefix[hi] > prefix[lo];
        }
    }
    out
}

impl Shape {
    /// Returns true if every offset in `[flat_min, flat_max]` is reached by
    /// some index of the domain.
    ///
    /// The sorted strides are walked while keeping the interval `[0, reach]`
    /// of offsets covered so far; a stride beyond `reach + 1` leaves a gap that
    /// no larger stride can fill.
    pub fn is_compact(&self) -> bool {
        if self.is_empty() {
            return true;
        }
        let mut reach = 0isize;
        for (extent, stride) in sorted_extent_strides(&self.dims) {
            if stride == 0 {
                continue;
            }
            if stride > reach.saturating_add(1) {
                return false;
            }
            // A saturated reach already covers every representable stride.
            reach = reach.saturating_add((extent - 1).saturating_mul(stride));
        }
        true
    }

    /// Returns true if distinct indices of the domain always map to distinct
    /// offsets.
    ///
    /// Nested strides (each larger than the span of the smaller ones) are
    /// accepted directly. Otherwise the strides are divided by their common
    /// divisor, shapes with more indices than offsets are rejected, and the
    /// reachable offset differences are tracked exactly: in a bitset when the
    /// reduced span is small, in a hash set otherwise.
    ///
    /// Shapes whose offset differences do not fit in 128 bits are reported as
    /// not one-to-one.
    pub fn is_one_to_one(&self) -> bool {
        if self.is_empty() {
            return true;
        }
        let pairs = sorted_extent_strides(&self.dims);
        if pairs.iter().any(|&(_, s)| s == 0) {
            return false;
        }
        let mut reach = 0isize;
        let mut nested = true;
        for &(extent, stride) in &pairs {
            if stride <= reach {
                nested = false;
            }
            reach = reach.saturating_add((extent - 1).saturating_mul(stride));
        }
        if nested {
            return true;
        }

        let divisor = pairs.iter().fold(0u128, |g, &(_, s)| gcd(g, s as u128)) as i128;
        let reduced: SmallVec<[(i128, i128); 4]> = pairs
            .iter()
            .map(|&(e, s)| (e as i128, s as i128 / divisor))
            .collect();
        let span = reduced
            .iter()
            .try_fold(0i128, |acc, &(e, s)| acc.checked_add((e - 1) * s));
        let Some(span) = span else {
            return false;
        };
        let span = span as u128;
        let size = reduced
            .iter()
            .try_fold(1u128, |acc, &(e, _)| acc.checked_mul(e as u128));
        let Some(size) = size.filter(|&n| n <= span + 1) else {
            return false;
        };
        log::trace!(
            "is_one_to_one: divisor={} span={} size={}",
            divisor,
            span,
            size
        );
        let dense_limit = DENSE_SPAN_LIMIT.max(size.saturating_mul(4));
        if span <= dense_limit && span < (usize::MAX / 4) as u128 {
            let pairs: SmallVec<[(usize, usize); 4]> = reduced
                .iter()
                .map(|&(e, s)| (e as usize, s as usize))
                .collect();
            differences_are_unique_dense(&pairs, span as usize)
        } else {
            differences_are_unique_sparse(&reduced)
        }
    }
}

// ============================================================================
// Transformations
// ============================================================================

/// Validate that `perm` is a permutation of `0..rank`.
pub(crate) fn check_permutation(perm: &[usize], rank: usize) -> Result<()> {
    if perm.len() != rank {
        return Err(StridedError::RankMismatch(perm.len(), rank));
    }
    check_distinct_axes(perm, rank)
}

pub(crate) fn check_distinct_axes(axes: &[usize], rank: usize) -> Result<()> {
    let mut seen: SmallVec<[bool; 8]> = SmallVec::from_elem(false, rank);
    for &axis in axes {
        if axis >= rank || seen[axis] {
            return Err(StridedError::InvalidAxis { axis, rank });
        }
        seen[axis] = true;
    }
    Ok(())
}

impl Shape {
    /// Permute the dimensions: dimension `k` of the result is `self.dim(perm[k])`.
    pub fn transpose(&self, perm: &[usize]) -> Result<Shape> {
        check_permutation(perm, self.rank())?;
        Ok(Shape::new(perm.iter().map(|&p| self.dims[p])))
    }

    /// Select distinct dimensions in a new order, dropping the others.
    ///
    /// ```rust
    /// use strided_array::Shape;
    ///
    /// let s = Shape::dense(&[3, 5, 8]);
    /// let r = s.reorder(&[2, 0]).unwrap();
    /// assert_eq!(r.extents(), vec![8, 3]);
    /// ```
    pub fn reorder(&self, axes: &[usize]) -> Result<Shape> {
        check_distinct_axes(axes, self.rank())?;
        Ok(Shape::new(axes.iter().map(|&a| self.dims[a])))
    }

    /// Same intervals, with every stride repacked in dimension order.
    pub fn make_compact(&self) -> Shape {
        let mut shape = self.clone();
        shape.dims.iter_mut().for_each(Dim::clear_stride);
        shape.resolve();
        shape
    }

    /// Sort dimensions by stride and fuse dimensions that are contiguous.
    ///
    /// The result has the same rank, padded with extent 1 dimensions, and the
    /// same set of flat offsets. Dimensions of extent 1 are dropped before
    /// fusing since they do not contribute to any offset.
    pub fn optimize(&self) -> Shape {
        if self.is_empty() {
            return self.clone();
        }
        let rank = self.rank();
        let mut sorted: DimVec = self.dims.iter().filter(|d| d.extent() > 1).copied().collect();
        sorted.sort_by_key(|d| d.stride_or_zero().saturating_abs());

        let mut fused = DimVec::new();
        for dim in sorted {
            if let Some(last) = fused.last_mut() {
                let (inner, outer) = (last.stride_or_zero(), dim.stride_or_zero());
                if inner != 0 && outer == last.extent() * inner {
                    let min = last.min() + dim.min() * (outer / inner);
                    *last = Dim::new(min, last.extent() * dim.extent(), inner);
                    continue;
                }
            }
            fused.push(dim);
        }

        let pad_stride = fused
            .last()
            .map(|d| d.extent() * d.stride_or_zero())
            .unwrap_or(1);
        while fused.len() < rank {
            fused.push(Dim::new(0, 1, pad_stride));
        }
        Shape { dims: fused }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl Index<usize> for Shape {
    type Output = Dim;

    fn index(&self, axis: usize) -> &Dim {
        &self.dims[axis]
    }
}

impl<const N: usize> From<[Dim; N]> for Shape {
    fn from(dims: [Dim; N]) -> Self {
        Shape::new(dims)
    }
}

impl From<Vec<Dim>> for Shape {
    fn from(dims: Vec<Dim>) -> Self {
        Shape::new(dims)
    }
}

impl FromIterator<Dim> for Shape {
    fn from_iter<I: IntoIterator<Item = Dim>>(iter: I) -> Self {
        Shape::new(iter)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved_strides(dims: Vec<Dim>) -> Vec<isize> {
        Shape::new(dims).resolved().strides()
    }

    #[test]
    fn test_shape_scalar() {
        let s = Shape::scalar();
        assert_eq!(s.flat_extent(), 1);
        assert_eq!(s.size(), 1);
        assert_eq!(s.offset(&[]), 0);
        assert!(s.is_compact());
        assert!(s.is_one_to_one());
    }

    #[test]
    fn test_shape_1d() {
        for stride in [1, 2, 10] {
            let s = Shape::new([Dim::new(0, 10, stride)]);
            for i in 0..10 {
                assert_eq!(s.offset(&[i]), i * stride);
            }
        }
    }

    #[test]
    fn test_shape_2d_negative_stride() {
        let s = Shape::new([Dim::dense(0, 10), Dim::new(0, 5, -10)]);
        let mut lo = isize::MAX;
        let mut hi = isize::MIN;
        for i in 0..5 {
            for j in 0..10 {
                let off = s.offset(&[j, i]);
                assert_eq!(off, -10 * i + j);
                lo = lo.min(off);
                hi = hi.max(off);
            }
        }
        assert_eq!(s.size(), 50);
        assert_eq!(s.flat_extent(), 50);
        assert_eq!(s.flat_min(), lo);
        assert_eq!(s.flat_max(), hi);
    }

    #[test]
    fn test_resolve_around_negative_stride() {
        let strides = resolved_strides(vec![
            Dim::with_extent(10),
            Dim::with_extent(5),
            Dim::new(0, 3, -1),
        ]);
        assert_eq!(strides, vec![3, 30, -1]);
    }

    #[test]
    fn test_dense_shapes() {
        let s = Shape::dense(&[10, 5]);
        assert_eq!(s.dim(0), &Dim::dense(0, 10));
        assert_eq!(s.dim(1), &Dim::new(0, 5, 10));
        assert_eq!(s.flat_extent(), 50);

        let s = Shape::dense(&[10, 5, 20]);
        assert_eq!(s.strides(), vec![1, 10, 50]);
    }

    #[test]
    fn test_auto_strides_fixed_rows() {
        assert_eq!(resolved_strides(vec![Dim::unresolved(3, 5)]), vec![1]);
        assert_eq!(
            resolved_strides(vec![Dim::with_extent(5), Dim::with_extent(10)]),
            vec![1, 5]
        );
        // Interleaved with a row stride.
        assert_eq!(
            resolved_strides(vec![
                Dim::with_extent(5),
                Dim::new(0, 4, 20),
                Dim::new(0, 3, 1)
            ]),
            vec![3, 20, 1]
        );
        // Row stride exactly dense.
        assert_eq!(
            resolved_strides(vec![
                Dim::with_extent(5),
                Dim::new(0, 4, 15),
                Dim::new(0, 3, 1)
            ]),
            vec![3, 15, 1]
        );
        // Row stride too small for the interleaved packing.
        assert_eq!(
            resolved_strides(vec![
                Dim::with_extent(5),
                Dim::new(0, 4, 14),
                Dim::new(0, 3, 1)
            ]),
            vec![56, 14, 1]
        );
    }

    #[test]
    fn test_auto_strides_all_unknown() {
        for rank in 1..=10 {
            let dims: Vec<Dim> = (0..rank).map(|d| Dim::with_extent(d as isize)).collect();
            let mut expected = Vec::new();
            let mut stride = 1;
            for d in 0..rank as isize {
                expected.push(stride);
                stride *= d.max(1);
            }
            assert_eq!(resolved_strides(dims), expected, "rank {rank}");
        }
    }

    #[test]
    fn test_auto_strides_one_dense() {
        for rank in 1..=10usize {
            for known in 0..rank {
                let dims: Vec<Dim> = (0..rank)
                    .map(|d| {
                        let mut dim = Dim::with_extent(d as isize + 1);
                        if d == known {
                            dim.set_stride(1);
                        }
                        dim
                    })
                    .collect();
                let s = Shape::new(dims).resolved();
                let factorial: usize = (1..=rank).product();
                assert_eq!(s.size(), factorial);
                assert_eq!(s.dim(known).stride(), Some(1));
                assert!(s.is_compact(), "rank {rank} known {known}");
                assert!(s.is_one_to_one(), "rank {rank} known {known}");
            }
        }
    }

    #[test]
    fn test_resolve_idempotent() {
        let mut s = Shape::new([Dim::with_extent(4), Dim::new(0, 3, 7), Dim::with_extent(2)]);
        s.resolve();
        let once = s.clone();
        s.resolve();
        assert_eq!(s, once);
    }

    #[test]
    fn test_broadcast_dim() {
        let s = Shape::new([Dim::new(0, 10, 1), Dim::broadcast(0, 10)]);
        for i in 0..10 {
            for j in 0..10 {
                assert_eq!(s.offset(&[j, i]), j);
            }
        }
        assert!(s.is_compact());
        assert!(!s.is_one_to_one());
    }

    #[test]
    fn test_shape_is_in_range_2d() {
        let s = Shape::new([Dim::unresolved(2, 5), Dim::unresolved(-3, 6)]);
        for i in -3..3 {
            for j in 2..7 {
                assert!(s.is_in_range(&[j, i]));
            }
        }
        assert!(!s.is_in_range(&[1, 0]));
        assert!(!s.is_in_range(&[2, -4]));
        assert!(!s.is_in_range(&[8, 0]));
        assert!(!s.is_in_range(&[2, 4]));
        assert!(!s.is_in_range(&[2]));

        assert!(s.is_interval_in_range(&[Interval::new(2, 5), Interval::new(-3, 6)]));
        assert!(!s.is_interval_in_range(&[Interval::new(1, 1), Interval::new(-3, 6)]));
        assert!(!s.is_interval_in_range(&[Interval::new(2, 5), Interval::new(-4, 1)]));
    }

    #[test]
    fn test_check_in_range_reports_axis() {
        let s = Shape::dense(&[4, 3]);
        assert!(s.check_in_range(&[3, 2]).is_ok());
        match s.check_in_range(&[1, 3]) {
            Err(StridedError::OutOfRange { axis, index, .. }) => {
                assert_eq!(axis, 1);
                assert_eq!(index, 3);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            s.check_in_range(&[1]),
            Err(StridedError::RankMismatch(1, 2))
        ));
    }

    #[test]
    fn test_shape_transpose() {
        let s = Shape::dense(&[3, 5, 8]);
        let t = s.transpose(&[1, 2, 0]).unwrap();
        assert_eq!(t.extents(), vec![5, 8, 3]);
        assert_eq!(t.strides(), vec![3, 15, 1]);

        let r = t.reorder(&[2, 0]).unwrap();
        assert_eq!(r.extents(), vec![3, 5]);
        assert_eq!(r.strides(), vec![1, 3]);

        assert!(s.transpose(&[0, 1]).is_err());
        assert!(s.transpose(&[0, 1, 1]).is_err());
        assert!(s.reorder(&[3]).is_err());
    }

    #[test]
    fn test_shape_make_compact() {
        let s1 = Shape::new([Dim::new(3, 5, 2)]);
        assert_eq!(s1.make_compact(), Shape::new([Dim::new(3, 5, 1)]));

        let s2 = Shape::new([Dim::new(3, 5, 8), Dim::new(1, 4, 1)]);
        assert_eq!(
            s2.make_compact(),
            Shape::new([Dim::new(3, 5, 1), Dim::new(1, 4, 5)])
        );
    }

    #[test]
    fn test_shape_optimize() {
        let a = Shape::new([Dim::new(0, 5, 21), Dim::new(0, 7, 3), Dim::new(5, 3, 1)]);
        let a_opt = Shape::new([Dim::new(5, 105, 1), Dim::new(0, 1, 105), Dim::new(0, 1, 105)]);
        assert_eq!(a.optimize(), a_opt);

        let b = Shape::new([Dim::new(0, 5, 42), Dim::new(3, 7, 6), Dim::new(0, 3, 2)]);
        let b_opt = Shape::new([Dim::new(9, 105, 2), Dim::new(0, 1, 210), Dim::new(0, 1, 210)]);
        assert_eq!(b.optimize(), b_opt);

        let c = Shape::new([Dim::new(0, 5, 40), Dim::new(0, 7, 3), Dim::new(0, 2, 1)]);
        let c_opt = Shape::new([Dim::new(0, 2, 1), Dim::new(0, 7, 3), Dim::new(0, 5, 40)]);
        assert_eq!(c.optimize(), c_opt);

        let d = Shape::new([Dim::new(0, 5, 28), Dim::new(0, 7, 4), Dim::new(0, 3, 1)]);
        let d_opt = Shape::new([Dim::new(0, 3, 1), Dim::new(0, 35, 4), Dim::new(0, 1, 140)]);
        assert_eq!(d.optimize(), d_opt);

        let e = Shape::from_extents(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]).resolved();
        let e2 = e.transpose(&[9, 5, 3, 7, 2, 8, 4, 6, 0, 1]).unwrap();
        let mut e_opt = vec![Dim::new(0, 3628800, 1)];
        e_opt.extend(std::iter::repeat(Dim::new(0, 1, 3628800)).take(9));
        assert_eq!(e.optimize(), Shape::from(e_opt.clone()));
        assert_eq!(e2.optimize(), Shape::from(e_opt));

        let f = Shape::from_extents(&[0, 2]).resolved();
        assert!(f.optimize().is_empty());

        let g = Shape::new([Dim::unresolved(1, 2), Dim::unresolved(1, 2)]).resolved();
        assert_eq!(
            g.optimize(),
            Shape::new([Dim::new(3, 4, 1), Dim::new(0, 1, 4)])
        );
    }

    #[test]
    fn test_compact_interleaved() {
        // Stride 1 extent 2 interleaved with stride 2: compact without a dense dim order.
        let s = Shape::new([Dim::new(0, 3, 2), Dim::new(0, 2, 1)]);
        assert!(s.is_compact());
        assert!(s.is_one_to_one());
    }

    #[test]
    fn test_equal_strides_not_one_to_one() {
        let s = Shape::new([Dim::new(0, 4, 4), Dim::new(0, 4, 4)]);
        assert!(!s.is_one_to_one());
        assert!(!s.is_compact());
    }

    #[test]
    fn test_one_to_one_non_nested() {
        // Offsets {0, 2, 4} + {0, 3}: injective although 3 < 2 * 2.
        let s = Shape::new([Dim::new(0, 3, 2), Dim::new(0, 2, 3)]);
        assert!(s.is_one_to_one());
        assert!(!s.is_compact());
        // {0, 2, 4} + {0, 4} collides.
        let s = Shape::new([Dim::new(0, 3, 2), Dim::new(0, 2, 4)]);
        assert!(!s.is_one_to_one());
    }

    #[test]
    fn test_one_to_one_large_strides() {
        let t = 1isize << 40;

        // Offset 2^41 is reached by both (2, 0) and (0, 1).
        let s = Shape::new([Dim::new(0, 3, t), Dim::new(0, 2, 2 * t)]);
        assert!(!s.is_one_to_one());
        assert!(!s.is_compact());

        // Common factor 2^40 reduces these to strides 2 and 3.
        let s = Shape::new([Dim::new(0, 3, 2 * t), Dim::new(0, 2, 3 * t)]);
        assert!(s.is_one_to_one());
        assert!(!s.is_compact());

        // No common factor and a span far larger than the index count.
        let s = Shape::new([Dim::new(0, 3, t), Dim::new(0, 2, 3 * (t / 2) + 1)]);
        assert!(s.is_one_to_one());
        assert!(!s.is_compact());

        let s = Shape::new([Dim::new(0, 2, 1), Dim::new(0, 3, t), Dim::new(0, 2, 2 * t)]);
        assert!(!s.is_one_to_one());
    }

    #[test]
    fn test_flat_range_overflow() {
        let s = Shape::dense(&[1 << 32, 1 << 32]);
        assert_eq!(s.strides(), vec![1, 1 << 32]);
        assert!(s.is_one_to_one());
        assert!(s.is_compact());
        assert_eq!(s.checked_flat_extent(), None);
        assert_eq!(s.flat_extent(), usize::MAX);
        assert_eq!(s.flat_max(), isize::MAX);
        assert_eq!(s.flat_min(), 0);
        assert_eq!(s.size(), usize::MAX);

        let s = Shape::new([Dim::new(0, 1 << 32, -(1 << 32)), Dim::new(0, 4, 1)]);
        assert_eq!(s.checked_flat_extent(), Some((((1 << 32) - 1) << 32) + 4));
        assert_eq!(s.flat_min(), -(((1 << 32) - 1) << 32));
    }

    #[test]
    fn test_empty_domain_is_compact_and_one_to_one() {
        let s = Shape::new([Dim::new(0, 0, 4), Dim::new(0, 4, 4)]);
        assert!(s.is_compact());
        assert!(s.is_one_to_one());
        assert_eq!(s.flat_extent(), 0);
        assert_eq!(s.size(), 0);
    }

    #[test]
    fn test_dilate() {
        let set = [false, false, true, false, false, false, false];
        assert_eq!(
            dilate(&set, 2, 1),
            vec![true, false, true, false, true, false, false]
        );
    }
}
