//! Storage allocation for [`Array`](crate::Array).

use std::mem::MaybeUninit;

use crate::{Result, StridedError};

/// Source of uninitialized element storage.
///
/// The returned buffer is owned by the array and released by dropping it, so
/// an allocator only decides how, and whether, storage is obtained.
pub trait Allocator {
    /// Allocate room for exactly `capacity` elements.
    fn allocate<T>(&self, capacity: usize) -> Result<Box<[MaybeUninit<T>]>>;
}

/// The global heap allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Global;

impl Allocator for Global {
    fn allocate<T>(&self, capacity: usize) -> Result<Box<[MaybeUninit<T>]>> {
        let mut buffer: Vec<MaybeUninit<T>> = Vec::new();
        buffer
            .try_reserve_exact(capacity)
            .map_err(|_| StridedError::AllocationFailed { capacity })?;
        buffer.resize_with(capacity, MaybeUninit::uninit);
        Ok(buffer.into_boxed_slice())
    }
}

impl<A: Allocator> Allocator for &A {
    fn allocate<T>(&self, capacity: usize) -> Result<Box<[MaybeUninit<T>]>> {
        (**self).allocate(capacity)
    }
}
