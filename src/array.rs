//! Owning strided arrays.

use std::fmt;
use std::mem::{self, MaybeUninit};
use std::ops::{Index, IndexMut};

use crate::alloc::{Allocator, Global};
use crate::index::Odometer;
use crate::shape::{AxisVec, Shape};
use crate::layout::Strided;
use crate::view::{Span, View, ViewMut};
use crate::{Result, StridedError};

// ============================================================================
// Element lifetime helpers
// ============================================================================

/// Walks the slots of `shape` in `buffer`, where offset 0 is `buffer[base]`.
fn slots(shape: &Shape, base: isize) -> Option<Odometer> {
    let strides = shape.strides();
    let order: AxisVec = (0..shape.rank()).collect();
    Odometer::new(&shape.intervals(), &order, &[strides.as_slice()], &[base])
}

/// Drops the elements built so far, newest first, if construction unwinds.
struct InitGuard<'b, T> {
    buffer: &'b mut [MaybeUninit<T>],
    slots: Odometer,
    count: usize,
}

impl<T> Drop for InitGuard<'_, T> {
    fn drop(&mut self) {
        for _ in 0..self.count {
            self.slots.retreat();
            let slot = self.slots.offsets()[0] as usize;
            unsafe { self.buffer[slot].assume_init_drop() };
        }
    }
}

/// Construct every element of `shape` in index order.
fn init_elements<T, F>(buffer: &mut [MaybeUninit<T>], shape: &Shape, base: isize, mut f: F)
where
    F: FnMut(&[isize]) -> T,
{
    let Some(slots) = slots(shape, base) else {
        return;
    };
    let mut guard = InitGuard {
        buffer,
        slots,
        count: 0,
    };
    loop {
        let slot = guard.slots.offsets()[0] as usize;
        let value = f(guard.slots.index());
        guard.buffer[slot].write(value);
        guard.count += 1;
        if !guard.slots.advance() {
            break;
        }
    }
    guard.count = 0;
}

/// Drop every element of `shape`.
///
/// # Safety
/// Every slot of `shape` must hold a live element, and none may be used again.
unsafe fn drop_elements<T>(buffer: &mut [MaybeUninit<T>], shape: &Shape, base: isize) {
    if !mem::needs_drop::<T>() {
        return;
    }
    let Some(mut slots) = slots(shape, base) else {
        return;
    };
    loop {
        let slot = slots.offsets()[0] as usize;
        buffer[slot].assume_init_drop();
        if !slots.advance() {
            break;
        }
    }
}

fn empty_buffer<T>() -> Box<[MaybeUninit<T>]> {
    Vec::new().into_boxed_slice()
}

/// Resolve `shape` and check that an array can own it.
fn prepare_shape(shape: Shape) -> Result<(Shape, usize, isize)> {
    let shape = shape.resolved();
    let Some(capacity) = shape.checked_flat_extent() else {
        log::debug!("flat extent of {:?} overflows", shape.extents());
        return Err(StridedError::AllocationFailed {
            capacity: usize::MAX,
        });
    };
    if !shape.is_one_to_one() {
        return Err(StridedError::NotOneToOne);
    }
    let base = if shape.is_empty() { 0 } else { -shape.flat_min() };
    Ok((shape, capacity, base))
}

// ============================================================================
// Array
// ============================================================================

/// An owning multidimensional array.
///
/// Elements live in a buffer of `shape.flat_extent()` slots; only the slots
/// reached by an index of the shape hold elements. The shape must be
/// one-to-one.
///
/// An array without a buffer holds no elements, whatever its shape says; this
/// is the state of [`Array::default`] and of a cleared array.
pub struct Array<T, A: Allocator = Global> {
    shape: Shape,
    buffer: Box<[MaybeUninit<T>]>,
    base: isize,
    alloc: A,
}

impl<T: Default> Array<T> {
    /// Array of `shape` filled with `T::default()`.
    pub fn new(shape: Shape) -> Result<Self> {
        Self::new_in(shape, Global)
    }
}

impl<T: Clone> Array<T> {
    /// Array of `shape` filled with clones of `value`.
    pub fn from_elem(shape: Shape, value: T) -> Result<Self> {
        Self::from_elem_in(shape, value, Global)
    }
}

impl<T> Array<T> {
    /// Array of `shape` with element `i` set to `f(i)`, built in index order.
    ///
    /// ```rust
    /// use strided_array::{Array, Shape};
    ///
    /// let a = Array::from_fn(Shape::dense(&[3, 2]), |i| i[0] * 10 + i[1]).unwrap();
    /// assert_eq!(a[[2, 1]], 21);
    /// ```
    pub fn from_fn<F: FnMut(&[isize]) -> T>(shape: Shape, f: F) -> Result<Self> {
        Self::from_fn_in(shape, Global, f)
    }
}

impl<T, A: Allocator> Array<T, A> {
    pub fn new_in(shape: Shape, alloc: A) -> Result<Self>
    where
        T: Default,
    {
        Self::from_fn_in(shape, alloc, |_| T::default())
    }

    pub fn from_elem_in(shape: Shape, value: T, alloc: A) -> Result<Self>
    where
        T: Clone,
    {
        Self::from_fn_in(shape, alloc, |_| value.clone())
    }

    /// Build with an explicit allocator.
    ///
    /// If `f` panics, the elements already built are dropped in reverse order
    /// and the buffer is released before the panic continues.
    pub fn from_fn_in<F: FnMut(&[isize]) -> T>(shape: Shape, alloc: A, f: F) -> Result<Self> {
        let (shape, capacity, base) = prepare_shape(shape)?;
        let mut buffer = alloc.allocate::<T>(capacity)?;
        init_elements(&mut buffer, &shape, base, f);
        Ok(Self {
            shape,
            buffer,
            base,
            alloc,
        })
    }

    /// An array without elements or storage.
    pub fn empty_in(alloc: A) -> Self {
        Self {
            shape: Shape::scalar(),
            buffer: empty_buffer(),
            base: 0,
            alloc,
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

    /// Number of live elements.
    #[inline]
    pub fn size(&self) -> usize {
        if self.buffer.is_empty() {
            0
        } else {
            self.shape.size()
        }
    }

    /// Number of slots in the buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Pointer to the element at the minimum index, or null without storage.
    pub fn as_ptr(&self) -> *const T {
        if self.buffer.is_empty() {
            return std::ptr::null();
        }
        self.buffer.as_ptr().wrapping_offset(self.base).cast::<T>()
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        if self.buffer.is_empty() {
            return std::ptr::null_mut();
        }
        self.buffer.as_mut_ptr().wrapping_offset(self.base).cast::<T>()
    }

    /// Offsets the views of this array may be rebound to.
    fn span(&self) -> Option<Span> {
        (!self.buffer.is_empty() && self.shape.is_compact()).then(|| Span {
            min: self.shape.flat_min(),
            max: self.shape.flat_max(),
        })
    }

    pub fn view(&self) -> View<'_, T, Strided> {
        if self.buffer.is_empty() {
            return View::null(self.shape.clone());
        }
        View::from_parts(self.as_ptr(), self.shape.clone(), self.span())
    }

    pub fn view_mut(&mut self) -> ViewMut<'_, T, Strided> {
        if self.buffer.is_empty() {
            return ViewMut::null(self.shape.clone());
        }
        let span = self.span();
        ViewMut::from_parts(self.as_mut_ptr(), self.shape.clone(), span)
    }

    fn slot(&self, index: &[isize]) -> Result<usize> {
        self.shape.check_in_range(index)?;
        if self.buffer.is_empty() {
            return Err(StridedError::OutOfRange {
                axis: 0,
                index: index.first().copied().unwrap_or(0),
                min: 0,
                extent: 0,
            });
        }
        Ok((self.base + self.shape.offset(index)) as usize)
    }

    pub fn at(&self, index: &[isize]) -> Result<&T> {
        let slot = self.slot(index)?;
        Ok(unsafe { self.buffer[slot].assume_init_ref() })
    }

    pub fn at_mut(&mut self, index: &[isize]) -> Result<&mut T> {
        let slot = self.slot(index)?;
        Ok(unsafe { self.buffer[slot].assume_init_mut() })
    }

    /// Drop every element and release the buffer. The rank is kept, with
    /// every extent 0.
    pub fn clear(&mut self) {
        drop(self.take_storage(self.rank()));
    }

    /// Replace the contents with clones of `value` in `shape`.
    ///
    /// The buffer is reused when it is large enough; if a clone panics then,
    /// the array is left empty. Otherwise a new buffer is filled first, so the
    /// array is unchanged if allocation or a clone fails.
    pub fn assign(&mut self, shape: Shape, value: T) -> Result<()>
    where
        T: Clone,
    {
        let (shape, capacity, base) = prepare_shape(shape)?;
        if capacity <= self.buffer.len() {
            let mut buffer = self.take_storage(shape.rank());
            if capacity > 0 {
                init_elements(&mut buffer, &shape, base, |_| value.clone());
                self.buffer = buffer;
                self.base = base;
            }
            self.shape = shape;
            return Ok(());
        }
        log::debug!(
            "assign: reallocating from {} to {} slots",
            self.buffer.len(),
            capacity
        );
        let mut buffer = self.alloc.allocate::<T>(capacity)?;
        init_elements(&mut buffer, &shape, base, |_| value.clone());
        let mut old_buffer = mem::replace(&mut self.buffer, buffer);
        let old_shape = mem::replace(&mut self.shape, shape);
        let old_base = mem::replace(&mut self.base, base);
        if !old_buffer.is_empty() {
            unsafe { drop_elements(&mut old_buffer, &old_shape, old_base) };
        }
        Ok(())
    }

    /// Drop the elements and leave the array empty with rank `rank`,
    /// returning the old buffer.
    fn take_storage(&mut self, rank: usize) -> Box<[MaybeUninit<T>]> {
        let mut buffer = mem::replace(&mut self.buffer, empty_buffer());
        let shape = mem::replace(&mut self.shape, Shape::empty(rank));
        let base = mem::replace(&mut self.base, 0);
        if !buffer.is_empty() {
            unsafe { drop_elements(&mut buffer, &shape, base) };
        }
        buffer
    }
}

impl<T, A: Allocator + Clone> Array<T, A> {
    /// Deep copy of the live elements, reporting allocation failure.
    pub fn try_clone(&self) -> Result<Self>
    where
        T: Clone,
    {
        if self.buffer.is_empty() {
            let mut empty = Self::empty_in(self.alloc.clone());
            empty.shape = self.shape.clone();
            return Ok(empty);
        }
        let src = self.view();
        Self::from_fn_in(self.shape.clone(), self.alloc.clone(), |i| unsafe {
            src.get_unchecked(i).clone()
        })
    }
}

impl<T, A: Allocator> Drop for Array<T, A> {
    fn drop(&mut self) {
        if !self.buffer.is_empty() {
            unsafe { drop_elements(&mut self.buffer, &self.shape, self.base) };
        }
    }
}

impl<T, A: Allocator + Default> Default for Array<T, A> {
    fn default() -> Self {
        Self::empty_in(A::default())
    }
}

impl<T: Clone, A: Allocator + Clone> Clone for Array<T, A> {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|err| panic!("{err}"))
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for Array<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array")
            .field("shape", &self.shape)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<T: PartialEq, A: Allocator, B: Allocator> PartialEq<Array<T, B>> for Array<T, A> {
    /// Arrays are equal if they have the same domain and equal elements.
    fn eq(&self, other: &Array<T, B>) -> bool {
        if self.is_empty() || other.is_empty() {
            return self.is_empty() && other.is_empty() && self.rank() == other.rank();
        }
        crate::algorithm::equal(&self.view(), &other.view()).unwrap_or(false)
    }
}

impl<'i, T, A: Allocator> Index<&'i [isize]> for Array<T, A> {
    type Output = T;

    fn index(&self, index: &'i [isize]) -> &T {
        self.at(index).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl<'i, T, A: Allocator> IndexMut<&'i [isize]> for Array<T, A> {
    fn index_mut(&mut self, index: &'i [isize]) -> &mut T {
        self.at_mut(index).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl<T, A: Allocator, const N: usize> Index<[isize; N]> for Array<T, A> {
    type Output = T;

    fn index(&self, index: [isize; N]) -> &T {
        self.at(&index).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl<T, A: Allocator, const N: usize> IndexMut<[isize; N]> for Array<T, A> {
    fn index_mut(&mut self, index: [isize; N]) -> &mut T {
        self.at_mut(&index).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl<'a, T, A: Allocator> From<&'a Array<T, A>> for View<'a, T, Strided> {
    fn from(array: &'a Array<T, A>) -> Self {
        array.view()
    }
}

impl<'a, T, A: Allocator> From<&'a mut Array<T, A>> for ViewMut<'a, T, Strided> {
    fn from(array: &'a mut Array<T, A>) -> Self {
        array.view_mut()
    }
}
