use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashSet;
use strided_array::{for_each_index, Dim, Shape};

fn random_shape(rng: &mut StdRng, max_extent: isize, max_stride: isize) -> Shape {
    let rank = rng.gen_range(1..=3);
    (0..rank)
        .map(|_| {
            Dim::new(
                rng.gen_range(-3..=3),
                rng.gen_range(0..=max_extent),
                rng.gen_range(-max_stride..=max_stride),
            )
        })
        .collect()
}

fn offsets(shape: &Shape) -> Vec<isize> {
    let mut out = Vec::new();
    for_each_index(shape, |i| out.push(shape.offset(i)));
    out
}

#[test]
fn test_flat_range_matches_enumeration() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let shape = random_shape(&mut rng, 4, 9);
        let all = offsets(&shape);
        assert_eq!(all.len(), shape.size(), "{shape:?}");
        if all.is_empty() {
            assert!(shape.is_empty());
            assert_eq!(shape.flat_extent(), 0);
            continue;
        }
        let (lo, hi) = (*all.iter().min().unwrap(), *all.iter().max().unwrap());
        assert_eq!(shape.flat_min(), lo, "{shape:?}");
        assert_eq!(shape.flat_max(), hi, "{shape:?}");
        assert_eq!(shape.flat_extent(), (hi - lo + 1) as usize, "{shape:?}");
    }
}

#[test]
fn test_is_one_to_one_matches_enumeration() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut seen_both = (false, false);
    for _ in 0..2000 {
        let shape = random_shape(&mut rng, 5, 12);
        let all = offsets(&shape);
        let distinct: HashSet<isize> = all.iter().copied().collect();
        let expected = distinct.len() == all.len();
        assert_eq!(shape.is_one_to_one(), expected, "{shape:?}");
        if expected {
            seen_both.0 = true;
        } else {
            seen_both.1 = true;
        }
    }
    assert_eq!(seen_both, (true, true));
}

#[test]
fn test_is_compact_matches_enumeration() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..2000 {
        let shape = random_shape(&mut rng, 4, 6);
        let distinct: HashSet<isize> = offsets(&shape).into_iter().collect();
        let expected = shape.is_empty() || distinct.len() == shape.flat_extent();
        assert_eq!(shape.is_compact(), expected, "{shape:?}");
    }
}

#[test]
fn test_resolved_unknown_strides_are_dense() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..200 {
        let rank = rng.gen_range(0..=4);
        let shape: Shape = (0..rank)
            .map(|_| Dim::unresolved(rng.gen_range(-2..=2), rng.gen_range(1..=5)))
            .collect();
        let shape = shape.resolved();
        assert!(shape.is_resolved());
        assert!(shape.is_compact(), "{shape:?}");
        assert!(shape.is_one_to_one(), "{shape:?}");
        assert_eq!(shape.flat_extent(), shape.size());
    }
}

#[test]
fn test_optimize_preserves_offsets() {
    let mut rng = StdRng::seed_from_u64(19);
    for _ in 0..500 {
        let shape = random_shape(&mut rng, 4, 16);
        let optimized = shape.optimize();
        assert_eq!(optimized.rank(), shape.rank());
        let mut before = offsets(&shape);
        let mut after = offsets(&optimized);
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after, "{shape:?} -> {optimized:?}");
    }
}

#[test]
fn test_optimize_fuses_dense_shapes() {
    let shape = Shape::dense(&[4, 5, 6]).transpose(&[2, 0, 1]).unwrap();
    let optimized = shape.optimize();
    assert_eq!(optimized.extents(), vec![120, 1, 1]);
    assert_eq!(optimized.dim(0).stride(), Some(1));
}
