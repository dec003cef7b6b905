//! Visiting every multi-index of a shape.
//!
//! Loop orders are given innermost first: `order[0]` is the axis that varies
//! fastest. The natural order is `[0, 1, ..., rank - 1]`.

use smallvec::SmallVec;

use crate::dim::Interval;
use crate::shape::{check_permutation, AxisVec, IndexVec, Shape};
use crate::{Result, StridedError};

// ============================================================================
// Odometer
// ============================================================================

/// A multi-index stepping through a box of intervals in a fixed loop order,
/// keeping flat offsets for any number of stride sets up to date.
#[derive(Debug, Clone)]
pub(crate) struct Odometer {
    intervals: SmallVec<[Interval; 4]>,
    order: AxisVec,
    index: IndexVec,
    strides: SmallVec<[IndexVec; 2]>,
    offsets: SmallVec<[isize; 2]>,
}

impl Odometer {
    /// Start at the first index of `intervals`, or `None` if the box is empty.
    ///
    /// `strides[k]` and `offsets[k]` are the strides (natural axis order) and
    /// the starting offset of operand `k`.
    pub(crate) fn new(
        intervals: &[Interval],
        order: &[usize],
        strides: &[&[isize]],
        offsets: &[isize],
    ) -> Option<Self> {
        debug_assert_eq!(intervals.len(), order.len());
        debug_assert_eq!(strides.len(), offsets.len());
        if intervals.iter().any(Interval::is_empty) {
            return None;
        }
        Some(Self {
            intervals: intervals.iter().copied().collect(),
            order: order.iter().copied().collect(),
            index: intervals.iter().map(Interval::min).collect(),
            strides: strides.iter().map(|s| s.iter().copied().collect()).collect(),
            offsets: offsets.iter().copied().collect(),
        })
    }

    /// Start at the last index of `intervals` instead of the first.
    #[cfg(test)]
    pub(crate) fn new_at_last(
        intervals: &[Interval],
        order: &[usize],
        strides: &[&[isize]],
        offsets: &[isize],
    ) -> Option<Self> {
        let mut odometer = Self::new(intervals, order, strides, offsets)?;
        for axis in 0..odometer.index.len() {
            let steps = odometer.intervals[axis].extent() - 1;
            odometer.index[axis] = odometer.intervals[axis].max();
            for (offset, strides) in odometer.offsets.iter_mut().zip(&odometer.strides) {
                *offset += steps * strides[axis];
            }
        }
        Some(odometer)
    }

    #[inline]
    pub(crate) fn index(&self) -> &[isize] {
        &self.index
    }

    #[inline]
    pub(crate) fn offsets(&self) -> &[isize] {
        &self.offsets
    }

    /// Step to the next index. Returns false, back at the first index, after
    /// the last one.
    pub(crate) fn advance(&mut self) -> bool {
        for &axis in &self.order {
            let interval = self.intervals[axis];
            if self.index[axis] < interval.max() {
                self.index[axis] += 1;
                for (offset, strides) in self.offsets.iter_mut().zip(&self.strides) {
                    *offset += strides[axis];
                }
                return true;
            }
            let steps = self.index[axis] - interval.min();
            self.index[axis] = interval.min();
            for (offset, strides) in self.offsets.iter_mut().zip(&self.strides) {
                *offset -= steps * strides[axis];
            }
        }
        false
    }

    /// Step to the previous index. Returns false, back at the last index,
    /// before the first one.
    pub(crate) fn retreat(&mut self) -> bool {
        for &axis in &self.order {
            let interval = self.intervals[axis];
            if self.index[axis] > interval.min() {
                self.index[axis] -= 1;
                for (offset, strides) in self.offsets.iter_mut().zip(&self.strides) {
                    *offset -= strides[axis];
                }
                return true;
            }
            let steps = interval.max() - self.index[axis];
            self.index[axis] = interval.max();
            for (offset, strides) in self.offsets.iter_mut().zip(&self.strides) {
                *offset += steps * strides[axis];
            }
        }
        false
    }
}

// ============================================================================
// Public iteration
// ============================================================================

fn natural_order(rank: usize) -> AxisVec {
    (0..rank).collect()
}

/// Axes sorted by increasing absolute stride; ties keep axis order.
pub(crate) fn memory_order(shape: &Shape) -> AxisVec {
    let mut order = natural_order(shape.rank());
    order.sort_by_key(|&axis| shape.dim(axis).stride().unwrap_or(0).saturating_abs());
    order
}

fn visit<F: FnMut(&[isize])>(shape: &Shape, order: &[usize], mut f: F) {
    let intervals = shape.intervals();
    let Some(mut odometer) = Odometer::new(&intervals, order, &[], &[]) else {
        return;
    };
    loop {
        f(odometer.index());
        if !odometer.advance() {
            break;
        }
    }
}

/// Call `f` with every index of `shape`, dimension 0 varying fastest.
///
/// A rank-0 shape visits the empty index once; an empty domain visits nothing.
///
/// ```rust
/// use strided_array::{for_each_index, Shape};
///
/// let mut seen = Vec::new();
/// for_each_index(&Shape::from_extents(&[2, 2]), |i| seen.push(i.to_vec()));
/// assert_eq!(seen, vec![vec![0, 0], vec![1, 0], vec![0, 1], vec![1, 1]]);
/// ```
pub fn for_each_index<F: FnMut(&[isize])>(shape: &Shape, f: F) {
    visit(shape, &natural_order(shape.rank()), f)
}

/// Call `f` with every index of `shape`, with `order[0]` varying fastest.
///
/// `order` must be a permutation of the axes.
pub fn for_each_index_in_order<F: FnMut(&[isize])>(
    shape: &Shape,
    order: &[usize],
    f: F,
) -> Result<()> {
    check_permutation(order, shape.rank())?;
    visit(shape, order, f);
    Ok(())
}

/// Call `f` with every index of `shape`, the axis with the smallest stride
/// varying fastest.
pub fn for_each_index_in_memory_order<F: FnMut(&[isize])>(shape: &Shape, f: F) {
    visit(shape, &memory_order(shape), f)
}

fn to_array<const N: usize>(index: &[isize]) -> [isize; N] {
    let mut out = [0; N];
    out.copy_from_slice(index);
    out
}

/// Like [`for_each_index`], passing the index as a fixed-size array.
///
/// Fails with [`StridedError::RankMismatch`] if `N` is not the rank of `shape`.
pub fn for_all_indices<const N: usize, F: FnMut([isize; N])>(shape: &Shape, mut f: F) -> Result<()> {
    if shape.rank() != N {
        return Err(StridedError::RankMismatch(N, shape.rank()));
    }
    for_each_index(shape, |i| f(to_array(i)));
    Ok(())
}

/// Like [`for_each_index_in_order`], passing the index as a fixed-size array.
pub fn for_all_indices_in_order<const N: usize, F: FnMut([isize; N])>(
    shape: &Shape,
    order: [usize; N],
    mut f: F,
) -> Result<()> {
    if shape.rank() != N {
        return Err(StridedError::RankMismatch(N, shape.rank()));
    }
    for_each_index_in_order(shape, &order, |i| f(to_array(i)))
}
