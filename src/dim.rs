//! Axis descriptors: index intervals and strided dimensions.

use std::ops::Range;

// ============================================================================
// Interval
// ============================================================================

/// A half-open index interval `[min, min + extent)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    min: isize,
    extent: isize,
}

impl Interval {
    /// Create the interval `[min, min + extent)`.
    ///
    /// Negative extents are a caller error and are treated as empty.
    #[inline]
    pub fn new(min: isize, extent: isize) -> Self {
        debug_assert!(extent >= 0, "negative extent {extent}");
        Self {
            min,
            extent: extent.max(0),
        }
    }

    /// Create the interval `[begin, end)`.
    #[inline]
    pub fn from_bounds(begin: isize, end: isize) -> Self {
        Self::new(begin, (end - begin).max(0))
    }

    #[inline]
    pub fn min(&self) -> isize {
        self.min
    }

    /// The last index in the interval, `min + extent - 1`.
    #[inline]
    pub fn max(&self) -> isize {
        self.min + self.extent - 1
    }

    /// One past the last index, `min + extent`.
    #[inline]
    pub fn end(&self) -> isize {
        self.min + self.extent
    }

    #[inline]
    pub fn extent(&self) -> isize {
        self.extent
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.extent == 0
    }

    /// Returns true if `x` is inside the interval.
    #[inline]
    pub fn contains(&self, x: isize) -> bool {
        self.min <= x && x < self.end()
    }

    /// Returns true if every index of `other` is inside this interval.
    ///
    /// The empty interval is contained in every interval.
    #[inline]
    pub fn contains_interval(&self, other: &Interval) -> bool {
        other.is_empty() || (self.min <= other.min && other.end() <= self.end())
    }

    /// Split the interval into consecutive chunks of at most `chunk` indices.
    ///
    /// The last chunk is shortened to end at the end of the interval.
    pub fn split(self, chunk: isize) -> Split {
        assert!(chunk > 0, "split chunk must be positive, got {chunk}");
        Split {
            next: self.min,
            end: self.end(),
            chunk,
        }
    }
}

impl IntoIterator for Interval {
    type Item = isize;
    type IntoIter = Range<isize>;

    fn into_iter(self) -> Range<isize> {
        self.min..self.end()
    }
}

impl From<Range<isize>> for Interval {
    fn from(r: Range<isize>) -> Self {
        Interval::from_bounds(r.start, r.end)
    }
}

/// Iterator over the chunks of an [`Interval`], see [`Interval::split`].
#[derive(Debug, Clone)]
pub struct Split {
    next: isize,
    end: isize,
    chunk: isize,
}

impl Iterator for Split {
    type Item = Interval;

    fn next(&mut self) -> Option<Interval> {
        if self.next >= self.end {
            return None;
        }
        let begin = self.next;
        self.next = (begin + self.chunk).min(self.end);
        Some(Interval::from_bounds(begin, self.next))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.next).max(0);
        let n = ((remaining + self.chunk - 1) / self.chunk) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Split {}

/// Clamp `x` into the valid indices of `interval`.
///
/// The interval must not be empty.
#[inline]
pub fn clamp(x: isize, interval: impl Into<Interval>) -> isize {
    let interval = interval.into();
    debug_assert!(!interval.is_empty(), "clamp into an empty interval");
    x.max(interval.min()).min(interval.max())
}

// ============================================================================
// Dim
// ============================================================================

/// One axis of a [`Shape`](crate::Shape): an index interval and a memory stride.
///
/// The stride is `None` until it is resolved, either explicitly with
/// [`Dim::set_stride`] or by [`Shape::resolve`](crate::Shape::resolve).
/// A stride of 0 makes every index of the axis address the same element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dim {
    min: isize,
    extent: isize,
    stride: Option<isize>,
}

impl Dim {
    /// Create a dimension with a known stride.
    #[inline]
    pub fn new(min: isize, extent: isize, stride: isize) -> Self {
        Self::with_stride(min, extent, Some(stride))
    }

    /// Create a dimension whose stride will be resolved later.
    #[inline]
    pub fn unresolved(min: isize, extent: isize) -> Self {
        Self::with_stride(min, extent, None)
    }

    /// Create `[0, extent)` with an unknown stride.
    #[inline]
    pub fn with_extent(extent: isize) -> Self {
        Self::unresolved(0, extent)
    }

    /// Create a dimension with stride 1.
    #[inline]
    pub fn dense(min: isize, extent: isize) -> Self {
        Self::new(min, extent, 1)
    }

    /// Create a broadcast dimension (stride 0).
    #[inline]
    pub fn broadcast(min: isize, extent: isize) -> Self {
        Self::new(min, extent, 0)
    }

    #[inline]
    pub fn with_stride(min: isize, extent: isize, stride: Option<isize>) -> Self {
        debug_assert!(extent >= 0, "negative extent {extent}");
        Self {
            min,
            extent: extent.max(0),
            stride,
        }
    }

    #[inline]
    pub fn min(&self) -> isize {
        self.min
    }

    #[inline]
    pub fn max(&self) -> isize {
        self.min + self.extent - 1
    }

    #[inline]
    pub fn end(&self) -> isize {
        self.min + self.extent
    }

    #[inline]
    pub fn extent(&self) -> isize {
        self.extent
    }

    #[inline]
    pub fn stride(&self) -> Option<isize> {
        self.stride
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.stride.is_some()
    }

    #[inline]
    pub fn interval(&self) -> Interval {
        Interval::new(self.min, self.extent)
    }

    #[inline]
    pub fn set_stride(&mut self, stride: isize) {
        self.stride = Some(stride);
    }

    /// Forget the stride so the next resolve assigns a new one.
    #[inline]
    pub fn clear_stride(&mut self) {
        self.stride = None;
    }

    /// Replace the index interval, keeping the stride.
    #[inline]
    pub fn set_interval(&mut self, interval: Interval) {
        self.min = interval.min();
        self.extent = interval.extent();
    }

    #[inline]
    pub fn set_min_extent(&mut self, min: isize, extent: isize) {
        self.set_interval(Interval::new(min, extent));
    }

    #[inline]
    pub fn is_in_range(&self, x: isize) -> bool {
        self.interval().contains(x)
    }

    #[inline]
    pub fn is_interval_in_range(&self, interval: &Interval) -> bool {
        self.interval().contains_interval(interval)
    }

    /// Offset contributed by index `x` of this axis.
    ///
    /// An unknown stride contributes nothing.
    #[inline]
    pub fn flat_offset(&self, x: isize) -> isize {
        (x - self.min) * self.stride.unwrap_or(0)
    }

    /// The stride if resolved, otherwise 0.
    #[inline]
    pub(crate) fn stride_or_zero(&self) -> isize {
        self.stride.unwrap_or(0)
    }
}

impl From<Dim> for Interval {
    fn from(d: Dim) -> Self {
        d.interval()
    }
}

impl From<&Dim> for Interval {
    fn from(d: &Dim) -> Self {
        d.interval()
    }
}

impl From<Interval> for Dim {
    fn from(i: Interval) -> Self {
        Dim::unresolved(i.min(), i.extent())
    }
}

// ============================================================================
// Tests
// ============================================================================
