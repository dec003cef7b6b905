use approx::assert_relative_eq;
use num_complex::{Complex32, Complex64};
use strided_array::{
    copy, equal, fill, for_all_indices, make_compact_copy, make_dense_copy, move_into, Array,
    Dense, Dim, DimSpec, Interval, Shape, ShapeSpec, StridedError, View,
};

fn make_array(width: isize, height: isize) -> Array<f64> {
    Array::from_fn(Shape::dense(&[width, height]), |i| {
        (i[0] + width * i[1]) as f64
    })
    .unwrap()
}

#[test]
fn test_tiled_transpose_copy() {
    let src = make_array(37, 23);
    let mut dst: Array<f64> =
        Array::new(Shape::dense(&[23, 37]).transpose(&[1, 0]).unwrap()).unwrap();
    assert_eq!(dst.shape().strides(), vec![23, 1]);

    for xs in Interval::new(0, 37).split(8) {
        for ys in Interval::new(0, 23).split(8) {
            let tile = src.view().crop_all(&[xs, ys]).unwrap();
            let mut out = dst.view_mut().crop_all(&[xs, ys]).unwrap();
            copy(&tile, &mut out).unwrap();
        }
    }

    for_all_indices(src.shape(), |[x, y]| {
        assert_relative_eq!(dst[[x, y]], src[[x, y]]);
    })
    .unwrap();
    assert!(equal(&src.view(), &dst.view()).unwrap());
    assert_eq!(src, dst);
}

#[test]
fn test_copy_reversed_source() {
    let src = make_array(6, 4);
    let reversed = Shape::new([Dim::new(0, 6, -1), Dim::new(0, 4, 6)]);
    let base = src.as_ptr().wrapping_offset(5);
    let flipped = unsafe { View::<f64>::from_raw_parts(base, reversed) }.unwrap();
    let mut dst: Array<f64> = Array::new(Shape::dense(&[6, 4])).unwrap();
    copy(&flipped, &mut dst.view_mut()).unwrap();
    for_all_indices(dst.shape(), |[x, y]| {
        assert_relative_eq!(dst[[x, y]], src[[5 - x, y]]);
    })
    .unwrap();
}

#[test]
fn test_copy_shape_checks() {
    let src = make_array(4, 4);
    let mut big: Array<f64> = Array::new(Shape::dense(&[5, 4])).unwrap();
    assert!(matches!(
        copy(&src.view(), &mut big.view_mut()),
        Err(StridedError::OutOfRange { axis: 0, index: 4, .. })
    ));
    let mut flat: Array<f64> = Array::new(Shape::dense(&[16])).unwrap();
    assert!(matches!(
        copy(&src.view(), &mut flat.view_mut()),
        Err(StridedError::ShapeMismatch(..))
    ));
    let mut empty: Array<f64> = Array::new(Shape::dense(&[0, 4])).unwrap();
    assert!(copy(&src.view(), &mut empty.view_mut()).is_ok());
}

#[test]
fn test_move_strings() {
    let shape = Shape::dense(&[3, 2]);
    let mut src = Array::from_fn(shape, |i| format!("{},{}", i[0], i[1])).unwrap();
    let mut dst: Array<String> =
        Array::new(Shape::dense(&[2, 3]).transpose(&[1, 0]).unwrap()).unwrap();
    move_into(&mut src.view_mut(), &mut dst.view_mut()).unwrap();
    assert_eq!(dst[[2, 1]], "2,1");
    assert_eq!(dst[[0, 0]], "0,0");
    for_all_indices(src.shape(), |[x, y]| assert!(src[[x, y]].is_empty())).unwrap();
}

#[test]
fn test_fill_broadcast_row() {
    let mut a: Array<i32> = Array::new(Shape::dense(&[4, 3])).unwrap();
    fill(&mut a.view_mut(), &1);
    let mut row = a.view_mut().crop(1, Interval::new(1, 1)).unwrap();
    fill(&mut row, &9);
    for_all_indices(a.shape(), |[x, y]| {
        assert_eq!(a[[x, y]], if y == 1 { 9 } else { 1 });
    })
    .unwrap();
}

#[test]
fn test_dense_copy_of_strided_view() {
    let a = make_array(8, 6);
    let column = a
        .view()
        .crop_all(&[Interval::new(2, 3), Interval::new(1, 4)])
        .unwrap();
    let dense = make_dense_copy(&column).unwrap();
    assert_eq!(dense.shape().min(), vec![2, 1]);
    assert_eq!(dense.shape().extents(), vec![3, 4]);
    assert_eq!(dense.shape().strides(), vec![1, 3]);
    assert!(equal(&column, &dense.view()).unwrap());

    let spec = ShapeSpec::new([DimSpec::any(), DimSpec::dense()]);
    let rows = make_compact_copy(&column, &spec).unwrap();
    assert_eq!(rows.shape().strides(), vec![4, 1]);
    assert!(equal(&column, &rows.view()).unwrap());
}

#[test]
fn test_reinterpret_interleaved_complex() {
    let data: Vec<f32> = (0..16).map(|x| x as f32 * 0.5).collect();
    let v: View<'_, f32, Dense> = View::new(&data, Shape::dense(&[8, 2])).unwrap();
    let z = v.reinterpret::<Complex32>().unwrap();
    assert_eq!(z.shape().extents(), vec![4, 2]);
    for_all_indices(z.shape(), |[x, y]| {
        let c = z[[x, y]];
        assert_relative_eq!(c.re, v[[2 * x, y]]);
        assert_relative_eq!(c.im, v[[2 * x + 1, y]]);
    })
    .unwrap();
}

#[test]
fn test_reinterpret_complex_array_as_parts() {
    let a = Array::from_fn(Shape::dense(&[3, 2]), |i| {
        Complex64::new(i[0] as f64, -(i[1] as f64))
    })
    .unwrap();
    let dense = a.view().into_layout::<Dense>().unwrap();
    let parts = dense.reinterpret::<f64>().unwrap();
    assert_eq!(parts.shape().extents(), vec![6, 2]);
    assert_relative_eq!(parts[[4, 1]], 2.0);
    assert_relative_eq!(parts[[5, 1]], -1.0);
}

#[test]
fn test_reinterpret_3d_array_as_wider_type() {
    let a = Array::from_fn(Shape::dense(&[4, 5, 6]), |i| (i[0] + 4 * i[1] + 20 * i[2]) as u32)
        .unwrap();
    let wide = a
        .view()
        .into_layout::<Dense>()
        .unwrap()
        .reinterpret::<u64>()
        .unwrap();
    assert_eq!(wide.shape().extents(), vec![2, 5, 6]);
    assert_eq!(wide.shape().strides(), vec![1, 2, 10]);
    for_all_indices(wide.shape(), |[x, y, z]| {
        let halves = [a[[2 * x, y, z]], a[[2 * x + 1, y, z]]];
        assert_eq!(wide[[x, y, z]], bytemuck::cast::<[u32; 2], u64>(halves));
    })
    .unwrap();

    // An odd innermost extent cannot be regrouped into 8-byte elements.
    let a = Array::from_fn(Shape::dense(&[3, 5, 6]), |i| i[0] as u32).unwrap();
    let dense = a.view().into_layout::<Dense>().unwrap();
    assert!(matches!(
        dense.reinterpret::<u64>(),
        Err(StridedError::ShapeMismatch(..))
    ));
}

#[test]
fn test_large_stride_predicates() {
    let t = 1isize << 40;
    let aliasing = Shape::new([Dim::new(0, 3, t), Dim::new(0, 2, 2 * t)]);
    assert!(!aliasing.is_one_to_one());
    assert!(!aliasing.is_compact());
    assert!(matches!(
        Array::<u8>::new(aliasing),
        Err(StridedError::NotOneToOne)
    ));

    let sparse = Shape::new([Dim::new(0, 3, t), Dim::new(0, 2, t + t / 2 + 1)]);
    assert!(sparse.is_one_to_one());
    assert!(!sparse.is_compact());
    assert_eq!(sparse.flat_extent(), (2 * t + t + t / 2 + 2) as usize);

    assert!(matches!(
        Array::<u8>::new(Shape::dense(&[1 << 32, 1 << 32])),
        Err(StridedError::AllocationFailed { .. })
    ));
}
