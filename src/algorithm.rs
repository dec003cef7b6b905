//! Element-wise bulk operations over views.
//!
//! Operands are traversed jointly: axes are ordered by stride with the
//! destination weighted double, and contiguous axes are fused. When both
//! operands have the same compact, one-to-one layout the operation runs over
//! plain slices instead.

use std::mem;

use crate::array::Array;
use crate::kernel::build_plan;
use crate::shape::Shape;
use crate::layout::{Layout, ShapeSpec};
use crate::view::{View, ViewMut};
use crate::{Result, StridedError};

// ============================================================================
// Shape checks
// ============================================================================

fn check_rank(a: &Shape, b: &Shape) -> Result<()> {
    if a.rank() != b.rank() {
        return Err(StridedError::ShapeMismatch(a.bounds(), b.bounds()));
    }
    Ok(())
}

/// The destination domain must lie inside the source domain.
fn check_contains(src: &Shape, dst: &Shape) -> Result<()> {
    check_rank(src, dst)?;
    if dst.is_empty() {
        return Ok(());
    }
    for (axis, (s, d)) in src.dims().iter().zip(dst.dims()).enumerate() {
        if !s.is_interval_in_range(&d.interval()) {
            let index = if s.is_in_range(d.min()) { d.max() } else { d.min() };
            return Err(StridedError::OutOfRange {
                axis,
                index,
                min: s.min(),
                extent: s.extent(),
            });
        }
    }
    Ok(())
}

/// A null source has no elements to read, even where its shape has indices.
fn check_source(is_null: bool, dst: &Shape) -> Result<()> {
    if is_null {
        return Err(StridedError::OutOfRange {
            axis: 0,
            index: dst.min().first().copied().unwrap_or(0),
            min: 0,
            extent: 0,
        });
    }
    Ok(())
}

/// Both shapes walk the same offsets in the same order, covering a
/// contiguous range without repeats.
fn is_same_compact_layout(a: &Shape, b: &Shape) -> bool {
    a.extents() == b.extents() && a.strides() == b.strides() && a.is_compact() && a.is_one_to_one()
}

// ============================================================================
// Copy / move
// ============================================================================

/// Copy `src` into `dst`, index by index.
///
/// Axes match by absolute index, so `dst`'s domain must lie inside `src`'s.
///
/// ```rust
/// use strided_array::{copy, Array, Shape};
///
/// let src = Array::from_fn(Shape::dense(&[3, 4]), |i| i[0] + 10 * i[1]).unwrap();
/// let mut dst: Array<isize> = Array::new(Shape::dense(&[4, 3]).transpose(&[1, 0]).unwrap()).unwrap();
/// copy(&src.view(), &mut dst.view_mut()).unwrap();
/// assert_eq!(dst[[2, 3]], 32);
/// ```
pub fn copy<T: Clone, LS: Layout, LD: Layout>(
    src: &View<'_, T, LS>,
    dst: &mut ViewMut<'_, T, LD>,
) -> Result<()> {
    check_contains(src.shape(), dst.shape())?;
    if dst.is_empty() {
        return Ok(());
    }
    check_source(src.is_null(), dst.shape())?;
    let dst_shape = dst.shape().clone();
    let src_base = src
        .as_ptr()
        .wrapping_offset(src.shape().offset(&dst_shape.min()));
    let dst_base = dst.as_mut_ptr();

    if is_same_compact_layout(src.shape(), &dst_shape) {
        let (lo, len) = (dst_shape.flat_min(), dst_shape.flat_extent());
        log::trace!("copy: contiguous fast path, {len} elements");
        unsafe {
            let src_slice = std::slice::from_raw_parts(src_base.offset(lo), len);
            let dst_slice = std::slice::from_raw_parts_mut(dst_base.offset(lo), len);
            dst_slice.clone_from_slice(src_slice);
        }
        return Ok(());
    }

    let extents = dst_shape.extents();
    let (dst_strides, src_strides) = (dst_shape.strides(), src.shape().strides());
    let plan = build_plan(&extents, &[dst_strides.as_slice(), src_strides.as_slice()], Some(0));
    log::trace!("copy: strided path over {:?}", extents);
    plan.for_each_inner_block(&[0, 0], |offsets, len, inner| {
        for i in 0..len as isize {
            unsafe {
                let d = &mut *dst_base.offset(offsets[0] + i * inner[0]);
                d.clone_from(&*src_base.offset(offsets[1] + i * inner[1]));
            }
        }
        true
    });
    Ok(())
}

/// Move the elements of `src` into `dst`, leaving `T::default()` behind.
pub fn move_into<T: Default, LS: Layout, LD: Layout>(
    src: &mut ViewMut<'_, T, LS>,
    dst: &mut ViewMut<'_, T, LD>,
) -> Result<()> {
    check_contains(src.shape(), dst.shape())?;
    if dst.is_empty() {
        return Ok(());
    }
    check_source(src.is_null(), dst.shape())?;
    let dst_shape = dst.shape().clone();
    let src_base = src
        .as_mut_ptr()
        .wrapping_offset(src.shape().offset(&dst_shape.min()));
    let dst_base = dst.as_mut_ptr();

    let extents = dst_shape.extents();
    let (dst_strides, src_strides) = (dst_shape.strides(), src.shape().strides());
    let plan = build_plan(&extents, &[dst_strides.as_slice(), src_strides.as_slice()], Some(0));
    plan.for_each_inner_block(&[0, 0], |offsets, len, inner| {
        for i in 0..len as isize {
            unsafe {
                let s = &mut *src_base.offset(offsets[1] + i * inner[1]);
                *dst_base.offset(offsets[0] + i * inner[0]) = mem::take(s);
            }
        }
        true
    });
    Ok(())
}

// ============================================================================
// Fill / generate
// ============================================================================

/// Set every element of `dst` to a clone of `value`.
pub fn fill<T: Clone, L: Layout>(dst: &mut ViewMut<'_, T, L>, value: &T) {
    if dst.is_empty() {
        return;
    }
    let shape = dst.shape().clone();
    let base = dst.as_mut_ptr();
    if shape.is_compact() && shape.is_one_to_one() {
        let len = shape.flat_extent();
        unsafe { std::slice::from_raw_parts_mut(base.offset(shape.flat_min()), len) }
            .fill(value.clone());
        return;
    }
    let strides = shape.strides();
    let plan = build_plan(&shape.extents(), &[strides.as_slice()], Some(0));
    plan.for_each_inner_block(&[0], |offsets, len, inner| {
        for i in 0..len as isize {
            unsafe { (*base.offset(offsets[0] + i * inner[0])).clone_from(value) };
        }
        true
    });
}

/// Set every element of `dst` to the next value of `f`, in memory order.
pub fn generate<T, L: Layout, F: FnMut() -> T>(dst: &mut ViewMut<'_, T, L>, mut f: F) {
    if dst.is_empty() {
        return;
    }
    let shape = dst.shape().clone();
    let base = dst.as_mut_ptr();
    let strides = shape.strides();
    let plan = build_plan(&shape.extents(), &[strides.as_slice()], Some(0));
    plan.for_each_inner_block(&[0], |offsets, len, inner| {
        for i in 0..len as isize {
            unsafe { *base.offset(offsets[0] + i * inner[0]) = f() };
        }
        true
    });
}

// ============================================================================
// Comparison
// ============================================================================

/// Compare two views element by element.
///
/// Fails with `ShapeMismatch` unless both have the same `(min, extent)` on
/// every axis. Stops at the first difference.
pub fn equal<T: PartialEq, LA: Layout, LB: Layout>(
    a: &View<'_, T, LA>,
    b: &View<'_, T, LB>,
) -> Result<bool> {
    if a.shape().bounds() != b.shape().bounds() {
        return Err(StridedError::ShapeMismatch(
            a.shape().bounds(),
            b.shape().bounds(),
        ));
    }
    if a.is_empty() || b.is_empty() {
        return Ok(a.is_empty() == b.is_empty());
    }
    let (pa, pb) = (a.as_ptr(), b.as_ptr());
    if is_same_compact_layout(a.shape(), b.shape()) {
        let (lo, len) = (a.shape().flat_min(), a.shape().flat_extent());
        let (sa, sb) = unsafe {
            (
                std::slice::from_raw_parts(pa.offset(lo), len),
                std::slice::from_raw_parts(pb.offset(lo), len),
            )
        };
        return Ok(sa == sb);
    }
    let (sa, sb) = (a.shape().strides(), b.shape().strides());
    let plan = build_plan(&a.shape().extents(), &[sa.as_slice(), sb.as_slice()], None);
    let all_equal = plan.for_each_inner_block(&[0, 0], |offsets, len, inner| {
        (0..len as isize).all(|i| unsafe {
            *pa.offset(offsets[0] + i * inner[0]) == *pb.offset(offsets[1] + i * inner[1])
        })
    });
    Ok(all_equal)
}

// ============================================================================
// Copies into new arrays
// ============================================================================

/// Copy `view` into a new array with the same domain, packed densely.
pub fn make_dense_copy<T: Clone, L: Layout>(view: &View<'_, T, L>) -> Result<Array<T>> {
    make_compact_copy(view, &ShapeSpec::dense(view.rank()))
}

/// Copy `view` into a new array with the same domain, keeping the strides
/// `spec` fixes and packing the rest.
pub fn make_compact_copy<T: Clone, L: Layout>(
    view: &View<'_, T, L>,
    spec: &ShapeSpec,
) -> Result<Array<T>> {
    if spec.rank() != view.rank() {
        return Err(StridedError::RankMismatch(spec.rank(), view.rank()));
    }
    let shape = spec.make_compact(view.shape());
    if view.is_null() && !shape.is_empty() {
        return Ok(Array::default());
    }
    Array::from_fn(shape, |i| unsafe { view.get_unchecked(i).clone() })
}
