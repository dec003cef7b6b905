use crate::shape::AxisVec;

/// Order the axes of a joint traversal, innermost first.
///
/// Each axis is scored by the sum of its absolute strides over all operands,
/// the destination's counted twice, and axes with small scores go inside.
/// Axes of extent 1 go last since they never step.
pub(crate) fn compute_order(
    extents: &[isize],
    strides_list: &[&[isize]],
    dest_index: Option<usize>,
) -> AxisVec {
    let mut order: AxisVec = (0..extents.len()).collect();
    order.sort_by_key(|&axis| {
        (
            extents[axis] <= 1,
            axis_score(axis, strides_list, dest_index),
            axis,
        )
    });
    order
}

fn axis_score(axis: usize, strides_list: &[&[isize]], dest_index: Option<usize>) -> usize {
    let mut score = 0usize;
    for (i, strides) in strides_list.iter().enumerate() {
        let weight = if dest_index == Some(i) { 2 } else { 1 };
        let stride = strides[axis].unsigned_abs();
        score = score.saturating_add(stride.saturating_mul(weight));
    }
    score
}
