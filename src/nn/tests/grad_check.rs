use super::{EPSILON, TOLERANCE, leaf};
use crate::assert_err;
use crate::matrix::Matrix;
use crate::nn::Node;
use crate::nn::grad_check::{GradCheckError, check_gradient};

#[test]
fn test_check_gradient_passes_and_restores_leaves() {
    let x = leaf("x", &[0.3, -0.8, 1.5], 1, 3);
    let w = leaf("w", &[0.2, -0.4, 0.9], 3, 1);
    let y = Node::tanh_with(&Node::multi(&x, &w), 0.);
    check_gradient(&y, &[x.clone(), w.clone()], Some(&Matrix::ones(1, 1)), EPSILON, TOLERANCE)
        .unwrap();

    assert_eq!(x.value(), Matrix::new(&[0.3, -0.8, 1.5], 1, 3));
    assert_eq!(w.value(), Matrix::new(&[0.2, -0.4, 0.9], 3, 1));
    assert!(!y.is_cached());
}

#[test]
fn test_check_gradient_detects_mismatch() {
    // Softmax的反向传播只保留了雅可比矩阵的对角部分：
    // x = [0, 0]、G = [1, 0]时，对x[1]的真实梯度为 -y0·y1 = -0.25，而解析梯度为0
    let x = leaf("x", &[0., 0.], 1, 2);
    let y = Node::softmax(&x);
    let result = check_gradient(&y, &[x], Some(&Matrix::new(&[1., 0.], 1, 2)), EPSILON, TOLERANCE);
    assert_err!(
        result,
        GradCheckError::GradientMismatch { leaf_index: 0, element_index: 1, analytical, numerical, .. }
            if *analytical == 0. && (numerical + 0.25).abs() < 1e-6
    );
}

#[test]
fn test_check_gradient_propagates_graph_errors() {
    let x = leaf("x", &[1., 2.], 1, 2);
    let y = Node::sigmoid(&x);
    // 非损失节点缺少上游梯度
    assert_err!(
        check_gradient(&y, &[x], None, EPSILON, TOLERANCE),
        GradCheckError::Graph(_)
    );
}
