//! Non-owning strided views.
//!
//! A view is a base pointer to the element at the minimum index plus a
//! [`Shape`]. Element `i` lives at `base + shape.offset(i)`. The layout
//! parameter `L` records, at the type level, which [`ShapeSpec`](crate::ShapeSpec) the shape is
//! guaranteed to satisfy.
//!
//! Views built from a slice also remember the range of offsets the slice
//! covers, so [`View::set_shape`] can check a new shape against it.

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Index, IndexMut};
use std::ptr;

use bytemuck::Pod;

use crate::dim::Interval;
use crate::shape::Shape;
use crate::layout::{Dense, Layout, Strided};
use crate::{Result, StridedError};

// ============================================================================
// Span
// ============================================================================

/// Inclusive range of offsets, relative to the base, that point into
/// initialized memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) min: isize,
    pub(crate) max: isize,
}

impl Span {
    fn covers(&self, shape: &Shape) -> bool {
        shape.is_empty() || (self.min <= shape.flat_min() && shape.flat_max() <= self.max)
    }

    fn shifted(self, delta: isize) -> Span {
        Span {
            min: self.min - delta,
            max: self.max - delta,
        }
    }

    fn len(&self) -> usize {
        (self.max - self.min + 1).max(0) as usize
    }

    /// The span of whole `U` elements inside this span of `T` elements.
    fn rescale(self, from: usize, to: usize) -> Option<Span> {
        let (from, to) = (from as isize, to as isize);
        let min = -(-self.min * from).div_euclid(to);
        let max = ((self.max + 1) * from).div_euclid(to) - 1;
        (min <= max).then_some(Span { min, max })
    }
}

fn slice_data(len: usize, shape: &Shape, offset: isize) -> Result<Option<Span>> {
    if !shape.is_empty() {
        let (min, max) = (offset + shape.flat_min(), offset + shape.flat_max());
        if min < 0 || max >= len as isize {
            return Err(StridedError::OffsetOutOfBounds { min, max, len });
        }
    }
    Ok((len > 0).then(|| Span {
        min: -offset,
        max: len as isize - 1 - offset,
    }))
}

// ============================================================================
// Shape manipulation shared by View and ViewMut
// ============================================================================

/// Shape of a null view: every extent is 0.
fn null_shape<L: Layout>(shape: &Shape) -> Shape {
    let mut shape = L::spec(shape.rank()).make_compact(shape);
    for axis in 0..shape.rank() {
        let min = shape.dim(axis).min();
        shape.dim_mut(axis).set_min_extent(min, 0);
    }
    shape
}

/// Remove `axis` at `index`; returns the new shape and the base offset delta.
fn slice_shape(shape: &Shape, axis: usize, index: isize) -> Result<(Shape, isize)> {
    shape.check_axis(axis)?;
    let dim = *shape.dim(axis);
    if !dim.is_in_range(index) {
        return Err(StridedError::OutOfRange {
            axis,
            index,
            min: dim.min(),
            extent: dim.extent(),
        });
    }
    let mut out = shape.clone();
    out.remove(axis);
    Ok((out, dim.flat_offset(index)))
}

fn crop_shape(shape: &Shape, axis: usize, interval: Interval) -> Result<(Shape, isize)> {
    shape.check_axis(axis)?;
    let dim = *shape.dim(axis);
    if !dim.is_interval_in_range(&interval) {
        return Err(StridedError::IntervalOutOfRange {
            axis,
            requested: interval,
            available: dim.interval(),
        });
    }
    let delta = if interval.is_empty() {
        0
    } else {
        dim.flat_offset(interval.min())
    };
    let mut out = shape.clone();
    out.dim_mut(axis).set_interval(interval);
    Ok((out, delta))
}

fn crop_all_shape(shape: &Shape, intervals: &[Interval]) -> Result<(Shape, isize)> {
    if intervals.len() != shape.rank() {
        return Err(StridedError::RankMismatch(intervals.len(), shape.rank()));
    }
    let mut out = shape.clone();
    let mut delta = 0;
    for (axis, &interval) in intervals.iter().enumerate() {
        let (cropped, d) = crop_shape(&out, axis, interval)?;
        out = cropped;
        delta += d;
    }
    Ok((out, delta))
}

fn rebase_shape(shape: &Shape) -> Shape {
    let mut out = shape.clone();
    for axis in 0..out.rank() {
        let extent = out.dim(axis).extent();
        out.dim_mut(axis).set_min_extent(0, extent);
    }
    out
}

/// Validate `shape` for rebinding a view with the given span.
fn bind_shape<L: Layout>(shape: &Shape, span: Option<Span>, is_null: bool) -> Result<Shape> {
    let shape = L::spec(shape.rank()).convert(shape)?;
    if is_null {
        return Ok(null_shape::<L>(&shape));
    }
    if !span.map_or(shape.is_empty(), |s| s.covers(&shape)) {
        return Err(StridedError::OffsetOutOfBounds {
            min: shape.flat_min(),
            max: shape.flat_max(),
            len: span.map_or(0, |s| s.len()),
        });
    }
    Ok(shape)
}

/// Rescale a dense shape from elements of `from` bytes to elements of `to` bytes.
fn reinterpret_shape(shape: &Shape, from: usize, to: usize) -> Result<Shape> {
    let mismatch = || StridedError::ShapeMismatch(shape.bounds(), Vec::new());
    let rescale = |x: isize| {
        let bytes = x * from as isize;
        if bytes % to as isize == 0 {
            Ok(bytes / to as isize)
        } else {
            Err(mismatch())
        }
    };
    if shape.rank() == 0 {
        return if from == to { Ok(shape.clone()) } else { Err(mismatch()) };
    }
    let mut out = shape.clone();
    let first = *shape.dim(0);
    out.dim_mut(0)
        .set_min_extent(rescale(first.min())?, rescale(first.extent())?);
    for axis in 1..shape.rank() {
        let stride = shape.dim(axis).stride().unwrap_or(0);
        out.dim_mut(axis).set_stride(rescale(stride)?);
    }
    Ok(out)
}

/// Range check that also rejects every index of a null view.
fn check_index(shape: &Shape, is_null: bool, index: &[isize]) -> Result<()> {
    shape.check_in_range(index)?;
    if is_null {
        return Err(StridedError::OutOfRange {
            axis: 0,
            index: index.first().copied().unwrap_or(0),
            min: 0,
            extent: 0,
        });
    }
    Ok(())
}

fn check_pod_cast<T, U>(base: *const T) -> Result<()> {
    if mem::size_of::<T>() == 0 || mem::size_of::<U>() == 0 {
        return Err(StridedError::PodCast("zero-sized element type"));
    }
    if (base as usize) % mem::align_of::<U>() != 0 {
        return Err(StridedError::PodCast("base pointer is not aligned for the target type"));
    }
    Ok(())
}

// ============================================================================
// View
// ============================================================================

/// An immutable strided view.
pub struct View<'a, T, L: Layout = Strided> {
    base: *const T,
    shape: Shape,
    span: Option<Span>,
    _marker: PhantomData<(&'a [T], L)>,
}

unsafe impl<T: Sync, L: Layout> Send for View<'_, T, L> {}
unsafe impl<T: Sync, L: Layout> Sync for View<'_, T, L> {}

impl<T, L: Layout> Clone for View<'_, T, L> {
    fn clone(&self) -> Self {
        Self {
            base: self.base,
            shape: self.shape.clone(),
            span: self.span,
            _marker: PhantomData,
        }
    }
}

impl<T, L: Layout> fmt::Debug for View<'_, T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("base", &self.base)
            .field("shape", &self.shape)
            .field("layout", &L::default())
            .finish()
    }
}

impl<'a, T, L: Layout> View<'a, T, L> {
    /// View `data` through `shape`, placing the smallest offset at `data[0]`.
    ///
    /// The shape is resolved and converted to the layout `L`.
    ///
    /// ```rust
    /// use strided_array::{Dim, Shape, View};
    ///
    /// let data: Vec<i32> = (0..6).collect();
    /// // Rows read backwards.
    /// let v: View<'_, i32> =
    ///     View::new(&data, Shape::new([Dim::new(0, 3, -1), Dim::new(0, 2, 3)])).unwrap();
    /// assert_eq!(v[[0, 0]], 2);
    /// assert_eq!(v[[2, 1]], 3);
    /// ```
    pub fn new(data: &'a [T], shape: Shape) -> Result<Self> {
        let shape = L::spec(shape.rank()).convert(&shape)?;
        let offset = if shape.is_empty() { 0 } else { -shape.flat_min() };
        Self::with_offset(data, shape, offset)
    }

    /// View `data` through `shape`, with the minimum index at `data[offset]`.
    pub fn with_offset(data: &'a [T], shape: Shape, offset: isize) -> Result<Self> {
        let shape = L::spec(shape.rank()).convert(&shape)?;
        let span = slice_data(data.len(), &shape, offset)?;
        Ok(Self {
            base: data.as_ptr().wrapping_offset(offset),
            shape,
            span,
            _marker: PhantomData,
        })
    }

    /// Create a view from a raw base pointer.
    ///
    /// # Safety
    /// For the lifetime `'a`, every offset the shape (after resolution)
    /// reaches from `base` must point to an initialized `T` that is not
    /// mutated.
    pub unsafe fn from_raw_parts(base: *const T, shape: Shape) -> Result<Self> {
        let shape = L::spec(shape.rank()).convert(&shape)?;
        Ok(Self::from_parts(base, shape, None))
    }

    /// A view of no elements. It keeps the rank and mins of `shape`.
    pub fn null(shape: Shape) -> Self {
        Self::from_parts(ptr::null(), null_shape::<L>(&shape), None)
    }

    pub(crate) fn from_parts(base: *const T, shape: Shape, span: Option<Span>) -> Self {
        Self {
            base,
            shape,
            span,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Number of elements; 0 for a null view.
    #[inline]
    pub fn size(&self) -> usize {
        if self.base.is_null() {
            0
        } else {
            self.shape.size()
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.base.is_null() || self.shape.is_empty()
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.base.is_null()
    }

    /// Pointer to the element at the minimum index.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.base
    }

    /// Returns the element at `index`, or `OutOfRange`.
    pub fn at(&self, index: &[isize]) -> Result<&'a T> {
        check_index(&self.shape, self.is_null(), index)?;
        Ok(unsafe { self.get_unchecked(index) })
    }

    /// # Safety
    /// `index` must be in range of the shape.
    #[inline]
    pub unsafe fn get_unchecked(&self, index: &[isize]) -> &'a T {
        &*self.base.offset(self.shape.offset(index))
    }

    /// Fix `axis` at `index`, dropping it from the shape.
    pub fn slice(&self, axis: usize, index: isize) -> Result<View<'a, T, Strided>> {
        let (shape, delta) = slice_shape(&self.shape, axis, index)?;
        Ok(View::from_parts(
            self.base.wrapping_offset(delta),
            shape,
            self.span.map(|s| s.shifted(delta)),
        ))
    }

    /// Restrict `axis` to `interval`, keeping absolute indices.
    ///
    /// ```rust
    /// use strided_array::{Interval, Shape, View};
    ///
    /// let data: Vec<i32> = (0..10).collect();
    /// let v: View<'_, i32> = View::new(&data, Shape::dense(&[10])).unwrap();
    /// let c = v.crop(0, Interval::new(4, 3)).unwrap();
    /// assert_eq!(c.shape().dim(0).min(), 4);
    /// assert_eq!(c[[4]], 4);
    /// assert_eq!(c.rebase()[[0]], 4);
    /// ```
    pub fn crop(&self, axis: usize, interval: impl Into<Interval>) -> Result<Self> {
        let (shape, delta) = crop_shape(&self.shape, axis, interval.into())?;
        Ok(self.moved(shape, delta))
    }

    /// Restrict every axis.
    pub fn crop_all(&self, intervals: &[Interval]) -> Result<Self> {
        let (shape, delta) = crop_all_shape(&self.shape, intervals)?;
        Ok(self.moved(shape, delta))
    }

    /// The same elements, indexed from 0 on every axis.
    pub fn rebase(&self) -> Self {
        Self::from_parts(self.base, rebase_shape(&self.shape), self.span)
    }

    pub fn transpose(&self, perm: &[usize]) -> Result<View<'a, T, Strided>> {
        Ok(View::from_parts(
            self.base,
            self.shape.transpose(perm)?,
            self.span,
        ))
    }

    /// Rebind the view to `shape`, which must stay inside the memory the view
    /// was created from.
    pub fn set_shape(&mut self, shape: Shape) -> Result<()> {
        self.shape = bind_shape::<L>(&shape, self.span, self.is_null())?;
        Ok(())
    }

    /// # Safety
    /// Every offset `shape` reaches must point to an initialized `T`, and
    /// `shape` must satisfy the layout `L`.
    pub unsafe fn set_shape_unchecked(&mut self, shape: Shape) {
        self.shape = shape.resolved();
    }

    /// Convert to another layout, checking the shape against it.
    pub fn into_layout<M: Layout>(self) -> Result<View<'a, T, M>> {
        if !M::is_compatible(&self.shape) {
            return Err(StridedError::ShapeMismatch(
                self.shape.bounds(),
                self.shape.bounds(),
            ));
        }
        Ok(View::from_parts(self.base, self.shape, self.span))
    }

    fn moved(&self, shape: Shape, delta: isize) -> Self {
        Self::from_parts(
            self.base.wrapping_offset(delta),
            shape,
            self.span.map(|s| s.shifted(delta)),
        )
    }
}

impl<'a, T: Pod> View<'a, T, Dense> {
    /// Reinterpret the elements as another plain-old-data type.
    ///
    /// The innermost dimension is rescaled by `size_of::<T>() / size_of::<U>()`,
    /// and the other strides with it.
    ///
    /// ```rust
    /// use strided_array::{Dense, Shape, View};
    ///
    /// let data = [1u32, 2, 3, 4];
    /// let v: View<'_, u32, Dense> = View::new(&data, Shape::dense(&[4])).unwrap();
    /// let pairs = v.reinterpret::<[u32; 2]>().unwrap();
    /// assert_eq!(pairs[[1]], [3, 4]);
    /// ```
    pub fn reinterpret<U: Pod>(&self) -> Result<View<'a, U, Dense>> {
        check_pod_cast::<T, U>(self.base)?;
        let (from, to) = (mem::size_of::<T>(), mem::size_of::<U>());
        let shape = reinterpret_shape(&self.shape, from, to)?;
        Ok(View::from_parts(
            self.base.cast::<U>(),
            shape,
            self.span.and_then(|s| s.rescale(from, to)),
        ))
    }
}

impl<'i, T, L: Layout> Index<&'i [isize]> for View<'_, T, L> {
    type Output = T;

    fn index(&self, index: &'i [isize]) -> &T {
        self.at(index).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl<T, L: Layout, const N: usize> Index<[isize; N]> for View<'_, T, L> {
    type Output = T;

    fn index(&self, index: [isize; N]) -> &T {
        self.at(&index).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl<'a, T> From<View<'a, T, Dense>> for View<'a, T, Strided> {
    fn from(view: View<'a, T, Dense>) -> Self {
        View::from_parts(view.base, view.shape, view.span)
    }
}

impl<'a, T> TryFrom<View<'a, T, Strided>> for View<'a, T, Dense> {
    type Error = StridedError;

    fn try_from(view: View<'a, T, Strided>) -> Result<Self> {
        view.into_layout()
    }
}

impl<'a, T, L: Layout> From<ViewMut<'a, T, L>> for View<'a, T, L> {
    fn from(view: ViewMut<'a, T, L>) -> Self {
        View::from_parts(view.base, view.shape, view.span)
    }
}

// ============================================================================
// ViewMut
// ============================================================================

/// A mutable strided view.
///
/// Shape transformations consume the view; reborrow with
/// [`ViewMut::view_mut`] to keep the original.
pub struct ViewMut<'a, T, L: Layout = Strided> {
    base: *mut T,
    shape: Shape,
    span: Option<Span>,
    _marker: PhantomData<(&'a mut [T], L)>,
}

unsafe impl<T: Send, L: Layout> Send for ViewMut<'_, T, L> {}
unsafe impl<T: Sync, L: Layout> Sync for ViewMut<'_, T, L> {}

impl<T, L: Layout> fmt::Debug for ViewMut<'_, T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewMut")
            .field("base", &self.base)
            .field("shape", &self.shape)
            .field("layout", &L::default())
            .finish()
    }
}

impl<'a, T, L: Layout> ViewMut<'a, T, L> {
    /// Mutable counterpart of [`View::new`].
    pub fn new(data: &'a mut [T], shape: Shape) -> Result<Self> {
        let shape = L::spec(shape.rank()).convert(&shape)?;
        let offset = if shape.is_empty() { 0 } else { -shape.flat_min() };
        Self::with_offset(data, shape, offset)
    }

    /// Mutable counterpart of [`View::with_offset`].
    pub fn with_offset(data: &'a mut [T], shape: Shape, offset: isize) -> Result<Self> {
        let shape = L::spec(shape.rank()).convert(&shape)?;
        let span = slice_data(data.len(), &shape, offset)?;
        Ok(Self {
            base: data.as_mut_ptr().wrapping_offset(offset),
            shape,
            span,
            _marker: PhantomData,
        })
    }

    /// Create a mutable view from a raw base pointer.
    ///
    /// # Safety
    /// For the lifetime `'a`, every offset the shape (after resolution)
    /// reaches from `base` must point to an initialized `T` that nothing else
    /// accesses.
    pub unsafe fn from_raw_parts(base: *mut T, shape: Shape) -> Result<Self> {
        let shape = L::spec(shape.rank()).convert(&shape)?;
        Ok(Self::from_parts(base, shape, None))
    }

    pub fn null(shape: Shape) -> Self {
        Self::from_parts(ptr::null_mut(), null_shape::<L>(&shape), None)
    }

    pub(crate) fn from_parts(base: *mut T, shape: Shape, span: Option<Span>) -> Self {
        Self {
            base,
            shape,
            span,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Number of elements; 0 for a null view.
    #[inline]
    pub fn size(&self) -> usize {
        if self.base.is_null() {
            0
        } else {
            self.shape.size()
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.base.is_null() || self.shape.is_empty()
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.base.is_null()
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.base
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.base
    }

    /// Reborrow as an immutable view.
    pub fn view(&self) -> View<'_, T, L> {
        View::from_parts(self.base, self.shape.clone(), self.span)
    }

    /// Reborrow as a shorter-lived mutable view.
    pub fn view_mut(&mut self) -> ViewMut<'_, T, L> {
        ViewMut::from_parts(self.base, self.shape.clone(), self.span)
    }

    pub fn at(&self, index: &[isize]) -> Result<&T> {
        check_index(&self.shape, self.is_null(), index)?;
        Ok(unsafe { self.get_unchecked(index) })
    }

    pub fn at_mut(&mut self, index: &[isize]) -> Result<&mut T> {
        check_index(&self.shape, self.is_null(), index)?;
        Ok(unsafe { self.get_unchecked_mut(index) })
    }

    /// # Safety
    /// `index` must be in range of the shape.
    #[inline]
    pub unsafe fn get_unchecked(&self, index: &[isize]) -> &T {
        &*self.base.offset(self.shape.offset(index))
    }

    /// # Safety
    /// `index` must be in range of the shape.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, index: &[isize]) -> &mut T {
        &mut *self.base.offset(self.shape.offset(index))
    }

    pub fn slice(self, axis: usize, index: isize) -> Result<ViewMut<'a, T, Strided>> {
        let (shape, delta) = slice_shape(&self.shape, axis, index)?;
        Ok(ViewMut::from_parts(
            self.base.wrapping_offset(delta),
            shape,
            self.span.map(|s| s.shifted(delta)),
        ))
    }

    pub fn crop(self, axis: usize, interval: impl Into<Interval>) -> Result<Self> {
        let (shape, delta) = crop_shape(&self.shape, axis, interval.into())?;
        Ok(self.moved(shape, delta))
    }

    pub fn crop_all(self, intervals: &[Interval]) -> Result<Self> {
        let (shape, delta) = crop_all_shape(&self.shape, intervals)?;
        Ok(self.moved(shape, delta))
    }

    pub fn rebase(self) -> Self {
        let shape = rebase_shape(&self.shape);
        Self::from_parts(self.base, shape, self.span)
    }

    pub fn transpose(self, perm: &[usize]) -> Result<ViewMut<'a, T, Strided>> {
        Ok(ViewMut::from_parts(
            self.base,
            self.shape.transpose(perm)?,
            self.span,
        ))
    }

    pub fn set_shape(&mut self, shape: Shape) -> Result<()> {
        self.shape = bind_shape::<L>(&shape, self.span, self.is_null())?;
        Ok(())
    }

    /// # Safety
    /// See [`View::set_shape_unchecked`]; the elements must also not be
    /// reachable through any other live reference.
    pub unsafe fn set_shape_unchecked(&mut self, shape: Shape) {
        self.shape = shape.resolved();
    }

    pub fn into_layout<M: Layout>(self) -> Result<ViewMut<'a, T, M>> {
        if !M::is_compatible(&self.shape) {
            return Err(StridedError::ShapeMismatch(
                self.shape.bounds(),
                self.shape.bounds(),
            ));
        }
        Ok(ViewMut::from_parts(self.base, self.shape, self.span))
    }

    fn moved(self, shape: Shape, delta: isize) -> Self {
        Self::from_parts(
            self.base.wrapping_offset(delta),
            shape,
            self.span.map(|s| s.shifted(delta)),
        )
    }
}

impl<'a, T: Pod> ViewMut<'a, T, Dense> {
    /// Mutable counterpart of [`View::reinterpret`].
    pub fn reinterpret<U: Pod>(self) -> Result<ViewMut<'a, U, Dense>> {
        check_pod_cast::<T, U>(self.base)?;
        let (from, to) = (mem::size_of::<T>(), mem::size_of::<U>());
        let shape = reinterpret_shape(&self.shape, from, to)?;
        Ok(ViewMut::from_parts(
            self.base.cast::<U>(),
            shape,
            self.span.and_then(|s| s.rescale(from, to)),
        ))
    }
}

impl<'i, T, L: Layout> Index<&'i [isize]> for ViewMut<'_, T, L> {
    type Output = T;

    fn index(&self, index: &'i [isize]) -> &T {
        self.at(index).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl<'i, T, L: Layout> IndexMut<&'i [isize]> for ViewMut<'_, T, L> {
    fn index_mut(&mut self, index: &'i [isize]) -> &mut T {
        self.at_mut(index).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl<T, L: Layout, const N: usize> Index<[isize; N]> for ViewMut<'_, T, L> {
    type Output = T;

    fn index(&self, index: [isize; N]) -> &T {
        self.at(&index).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl<T, L: Layout, const N: usize> IndexMut<[isize; N]> for ViewMut<'_, T, L> {
    fn index_mut(&mut self, index: [isize; N]) -> &mut T {
        self.at_mut(&index).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl<'a, T> From<ViewMut<'a, T, Dense>> for ViewMut<'a, T, Strided> {
    fn from(view: ViewMut<'a, T, Dense>) -> Self {
        ViewMut::from_parts(view.base, view.shape, view.span)
    }
}

impl<'a, T> TryFrom<ViewMut<'a, T, Strided>> for ViewMut<'a, T, Dense> {
    type Error = StridedError;

    fn try_from(view: ViewMut<'a, T, Strided>) -> Result<Self> {
        view.into_layout()
    }
}
