//! Joint traversal of several strided operands over one domain.
//!
//! A plan orders the axes (see [`compute_order`]), fuses contiguous ones
//! (see [`fuse_dims`]), and then walks the outer axes with an odometer while
//! handing the innermost axis to the caller as a block.

use smallvec::SmallVec;

use crate::dim::Interval;
use crate::fuse::{fuse_dims, StrideSets};
use crate::index::Odometer;
use crate::order::compute_order;
use crate::shape::{AxisVec, IndexVec};

#[derive(Debug, Clone)]
pub(crate) struct KernelPlan {
    /// Innermost first, after fusion.
    extents: IndexVec,
    /// One stride set per operand, in the order of `extents`.
    strides: StrideSets,
}

/// Build a traversal plan for `extents`, with one stride set per operand.
pub(crate) fn build_plan(
    extents: &[isize],
    strides_list: &[&[isize]],
    dest_index: Option<usize>,
) -> KernelPlan {
    let order = compute_order(extents, strides_list, dest_index);
    let ordered_extents: IndexVec = order.iter().map(|&axis| extents[axis]).collect();
    let ordered_strides: StrideSets = strides_list
        .iter()
        .map(|s| order.iter().map(|&axis| s[axis]).collect())
        .collect();
    let (extents, strides) = fuse_dims(&ordered_extents, &ordered_strides);
    log::trace!(
        "kernel plan: order={:?} fused extents={:?} strides={:?}",
        order,
        extents,
        strides
    );
    KernelPlan { extents, strides }
}

impl KernelPlan {
    #[cfg(test)]
    pub(crate) fn extents(&self) -> &[isize] {
        &self.extents
    }

    /// Call `f(offsets, len, inner_strides)` for every innermost block.
    ///
    /// `offsets` holds each operand's offset at the start of the block,
    /// starting from `base`. Stops early, returning false, when `f` does.
    pub(crate) fn for_each_inner_block<F>(&self, base: &[isize], mut f: F) -> bool
    where
        F: FnMut(&[isize], usize, &[isize]) -> bool,
    {
        if self.extents.iter().any(|&e| e == 0) {
            return true;
        }
        let Some((&inner, outer)) = self.extents.split_first() else {
            let zeros: SmallVec<[isize; 2]> = SmallVec::from_elem(0, base.len());
            return f(base, 1, &zeros);
        };
        let inner_strides: SmallVec<[isize; 2]> = self.strides.iter().map(|s| s[0]).collect();
        let outer_strides: SmallVec<[&[isize]; 2]> = self.strides.iter().map(|s| &s[1..]).collect();
        let intervals: SmallVec<[Interval; 4]> = outer.iter().map(|&e| Interval::new(0, e)).collect();
        let order: AxisVec = (0..outer.len()).collect();
        let Some(mut odometer) = Odometer::new(&intervals, &order, &outer_strides, base) else {
            return true;
        };
        loop {
            if !f(odometer.offsets(), inner as usize, &inner_strides) {
                return false;
            }
            if !odometer.advance() {
                return true;
            }
        }
    }
}
