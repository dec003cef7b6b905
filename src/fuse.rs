//! Dimension fusion for joint traversals.

use smallvec::SmallVec;

use crate::shape::IndexVec;

pub(crate) type StrideSets = SmallVec<[IndexVec; 2]>;

/// Fuse neighbouring axes of an innermost-first loop nest.
///
/// Axis `i + 1` merges into axis `i` when, for every operand,
/// `strides[i + 1] == extents[i] * strides[i]`. Axes of extent 1 are dropped
/// first. An empty result is a single element.
pub(crate) fn fuse_dims(extents: &[isize], strides_list: &StrideSets) -> (IndexVec, StrideSets) {
    let mut fused_extents = IndexVec::new();
    let mut fused_strides: StrideSets = strides_list.iter().map(|_| IndexVec::new()).collect();

    for (axis, &extent) in extents.iter().enumerate() {
        if extent == 1 {
            continue;
        }
        let can_merge = match fused_extents.last() {
            Some(&last) => strides_list.iter().zip(&fused_strides).all(|(s, fs)| {
                fs.last()
                    .map_or(false, |&inner| s[axis] == last * inner)
            }),
            None => false,
        };
        if can_merge {
            if let Some(last) = fused_extents.last_mut() {
                *last *= extent;
            }
        } else {
            fused_extents.push(extent);
            for (fs, s) in fused_strides.iter_mut().zip(strides_list) {
                fs.push(s[axis]);
            }
        }
    }
    (fused_extents, fused_strides)
}
