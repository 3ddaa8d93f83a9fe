/*
 * @Description  : Conv（“same”填充的2D互相关）与Pool（最大池化）节点的单元测试
 */

use super::{assert_grad_ok, leaf};
use crate::assert_err;
use crate::matrix::Matrix;
use crate::nn::{GraphError, Node};

fn input_3x3() -> [f64; 9] {
    [1., 2., 3., 4., 5., 6., 7., 8., 9.]
}

#[test]
fn test_conv_same_padding_stride_1() {
    let x = leaf("x", &input_3x3(), 3, 3);
    let k = leaf("k", &[1., 0., 0., 1.], 2, 2);
    let y = Node::conv(&x, &k, 1);
    // 总填充量为1，较小的一半（0）填在上/左侧，所以越界的只有右/下方
    assert_eq!(
        y.forward().unwrap(),
        Matrix::new(&[6., 8., 3., 12., 14., 6., 7., 8., 9.], 3, 3)
    );
}

#[test]
fn test_conv_stride_2() {
    let x = leaf("x", &input_3x3(), 3, 3);
    let k = leaf("k", &[1., 0., 0., 1.], 2, 2);
    let y = Node::conv(&x, &k, 2);
    assert_eq!(y.forward().unwrap(), Matrix::new(&[6., 3., 7., 9.], 2, 2));
    assert_grad_ok(
        &y,
        &[x, k],
        Some(&Matrix::new(&[1., -0.5, 2., 0.25], 2, 2)),
    );
}

#[test]
fn test_conv_gradient() {
    let x = leaf(
        "x",
        &[
            0.5, -1., 2., 0.3, //
            1.2, 0.7, -0.4, 1.1, //
            -2., 0.9, 0.1, -0.6, //
            0.8, -1.5, 1.3, 0.2,
        ],
        4,
        4,
    );
    let k = leaf("k", &[0.2, -0.3, 0.5, 0.1, 0.4, -0.2, -0.1, 0.3, 0.6], 3, 3);
    let y = Node::conv(&x, &k, 1);
    assert_eq!(y.forward().unwrap().shape(), (4, 4));
    let g = Matrix::from_fn(4, 4, |r, c| (r as f64 - 1.5) * 0.5 + c as f64 * 0.3);
    assert_grad_ok(&y, &[x, k], Some(&g));
}

#[test]
fn test_conv_invalid_stride() {
    let x = leaf("x", &input_3x3(), 3, 3);
    let k = leaf("k", &[1.], 1, 1);
    assert_err!(Node::conv(&x, &k, 0).forward(), GraphError::InvalidOperation(_));
}

#[test]
fn test_pool_forward_and_backward() {
    let x = leaf(
        "x",
        &[
            1., 5., 2., 0., //
            3., 4., 8., 6., //
            7., 1., 0., 2., //
            9., 2., 3., 4.,
        ],
        4,
        4,
    );
    let y = Node::pool(&x, 2, 2, 2);
    assert_eq!(y.forward().unwrap(), Matrix::new(&[5., 8., 9., 4.], 2, 2));

    // 梯度只流向每个窗口的最大值位置
    y.backward(Some(&Matrix::new(&[1., 2., 3., 4.], 2, 2)))
        .unwrap();
    assert_eq!(
        x.gradient(),
        Matrix::new(
            &[
                0., 1., 0., 0., //
                0., 0., 2., 0., //
                0., 0., 0., 0., //
                3., 0., 0., 4.,
            ],
            4,
            4
        )
    );
    assert_grad_ok(&y, &[x], Some(&Matrix::new(&[0.5, -1., 2., 1.5], 2, 2)));
}

#[test]
fn test_pool_overlapping_windows_accumulate() {
    let x = leaf("x", &[1., 2., 3., 4., 9., 5., 6., 7., 8.], 3, 3);
    let y = Node::pool(&x, 2, 2, 1);
    assert_eq!(y.forward().unwrap(), Matrix::constant(2, 2, 9.));
    y.backward(Some(&Matrix::ones(2, 2))).unwrap();
    assert_eq!(x.gradient().get(1, 1), 4.);
    assert_eq!(x.gradient().sum(), 4.);
}

#[test]
fn test_pool_rectangular_window() {
    // 窗口宽3、高1，步长1：输出形状为[(2-1)/1+1, (4-3)/1+1]
    let x = leaf("x", &[1., 3., 2., 0., 4., -1., 6., 5.], 2, 4);
    let y = Node::pool(&x, 3, 1, 1);
    assert_eq!(y.forward().unwrap(), Matrix::new(&[3., 3., 6., 6.], 2, 2));
}

#[test]
fn test_pool_invalid_arguments() {
    let x = leaf("x", &input_3x3(), 3, 3);
    assert_err!(
        Node::pool(&x, 4, 2, 1).forward(),
        GraphError::ShapeMismatch((2, 4), (3, 3), "Pool节点的输入不能小于池化窗口")
    );
    assert_err!(Node::pool(&x, 2, 2, 0).forward(), GraphError::InvalidOperation(_));
}
