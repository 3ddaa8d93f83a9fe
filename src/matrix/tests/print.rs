use crate::matrix::Matrix;

#[test]
fn test_display_small_matrix() {
    let a = Matrix::new(&[1., 2., 3., 4.], 2, 2);
    let expected = "[[  1.0000,   2.0000],\n [  3.0000,   4.0000]]\n形状: [2, 2]\n";
    assert_eq!(format!("{a}"), expected);
}

#[test]
fn test_display_wide_matrix() {
    let a = Matrix::from_fn(1, 10, |_, c| c as f64);
    let expected = "[[  0.0000,   1.0000,   2.0000,   3.0000,      ...,   6.0000,   7.0000,   8.0000,   9.0000]]\n形状: [1, 10]\n";
    assert_eq!(format!("{a}"), expected);
}
