/*
 * @Description  : 计算图整体机制的测试
 *
 * 测试策略：
 * 1. 前向缓存（重复前向不重复计算、结果逐位相同，共享子表达式只算一次）
 * 2. reset 的级联与幂等
 * 3. 共享叶子的梯度累加
 * 4. backward 的调用约定
 * 5. 多线程下共享参数的梯度累加
 */

use std::thread;

use approx::assert_abs_diff_eq;

use super::leaf;
use crate::assert_err;
use crate::matrix::Matrix;
use crate::nn::{GraphError, Node, Variable};

fn linear(x: &Variable, w: &Variable, b: &Variable) -> Node {
    Node::add(&Node::multi(x, w), b)
}

#[test]
fn test_forward_is_memoized() {
    let x = leaf("x", &[1., 2.], 1, 2);
    let w = leaf("w", &[0.5, -1., 2., 0.25], 2, 2);
    let b = leaf("b", &[0.1, 0.2], 1, 2);
    let y = Node::sigmoid(&linear(&x, &w, &b));

    assert!(!y.is_cached());
    let first = y.forward().unwrap();
    let second = y.forward().unwrap();
    assert!(y.is_cached());
    assert_eq!(y.compute_count(), 1);
    // 逐位相同
    let bits = |m: &Matrix| m.data().iter().map(|v| v.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&first), bits(&second));
}

#[test]
fn test_shared_subexpression_computed_once() {
    let x = leaf("x", &[0.3, -0.7], 1, 2);
    let s = Node::sigmoid(&x);
    let z = Node::multi_element(&Node::add(&s, &s), &s);
    z.forward().unwrap();
    assert_eq!(s.compute_count(), 1);

    // 对共享子表达式的反向传播：z = 2s²，dz/dx = 4s·σ'
    z.backward(Some(&Matrix::ones(1, 2))).unwrap();
    let sv = s.value().unwrap();
    let expected = sv.map(|v| 4. * v * v * (1. - v));
    assert_abs_diff_eq!(x.gradient(), expected, epsilon = 1e-12);
}

#[test]
fn test_reset_cascades_and_is_idempotent() {
    let x = leaf("x", &[1., 2.], 1, 2);
    let w = leaf("w", &[0.5, -1., 2., 0.25], 2, 2);
    let b = leaf("b", &[0.1, 0.2], 1, 2);
    let hidden = linear(&x, &w, &b);
    let y = Node::tanh(&hidden);

    let before = y.forward().unwrap();
    y.backward(Some(&Matrix::ones(1, 2))).unwrap();
    assert_ne!(w.gradient(), Matrix::zeros(2, 2));

    y.reset();
    assert!(!y.is_cached());
    assert!(!hidden.is_cached());
    // 叶子的梯度随级联被清零
    assert_eq!(w.gradient(), Matrix::zeros(2, 2));
    y.reset();
    assert!(!y.is_cached());

    assert_eq!(y.forward().unwrap(), before);
    assert_eq!(y.compute_count(), 2);
}

#[test]
fn test_force_reset_after_failed_forward() {
    let x = leaf("x", &[-5.], 1, 1);
    let w = leaf("w", &[2.], 1, 1);
    let product = Node::multi(&x, &w);
    let y = Node::add(&product, &Node::log(&x));

    // ln(-5)失败时，其兄弟分支x·w已被算出并缓存
    assert_err!(y.forward(), GraphError::NumericInstability(_));
    assert!(!y.is_cached());
    assert!(product.is_cached());

    // 普通reset在未缓存的y处即停止，残留缓存仍在
    y.reset();
    assert!(product.is_cached());

    y.force_reset();
    assert!(!product.is_cached());
    x.set_value(Matrix::new(&[1.], 1, 1)).unwrap();
    assert_eq!(y.forward().unwrap(), Matrix::new(&[2.], 1, 1));
}

#[test]
fn test_new_value_visible_after_reset() {
    let x = leaf("x", &[1., 2.], 1, 2);
    let y = Node::scale(&x, 2.);
    assert_eq!(y.forward().unwrap(), Matrix::new(&[2., 4.], 1, 2));

    x.set_value(Matrix::new(&[3., 4.], 1, 2)).unwrap();
    // 未重置前仍返回缓存
    assert_eq!(y.forward().unwrap(), Matrix::new(&[2., 4.], 1, 2));
    y.reset();
    assert_eq!(y.forward().unwrap(), Matrix::new(&[6., 8.], 1, 2));

    assert_err!(
        x.set_value(Matrix::zeros(2, 1)),
        GraphError::ShapeMismatch((1, 2), (2, 1), "变量x的新值形状必须与原值一致")
    );
}

#[test]
fn test_shared_leaf_gradient_accumulates() {
    let x1 = leaf("x1", &[1., 2.], 1, 2);
    let x2 = leaf("x2", &[-0.5, 3.], 1, 2);
    let w = leaf("w", &[0.5, -1., 2., 0.25], 2, 2);
    let g = Matrix::new(&[1., -2.], 1, 2);

    // 分别单独求梯度
    let isolated = |x: &Variable| {
        let y = Node::multi(x, &w);
        y.backward(Some(&g)).unwrap();
        let grad = w.gradient();
        y.reset();
        grad
    };
    let expected = isolated(&x1).add(&isolated(&x2)).unwrap();

    // 同一个w在图中被引用两次
    let y = Node::add(&Node::multi(&x1, &w), &Node::multi(&x2, &w));
    y.backward(Some(&g)).unwrap();
    assert_abs_diff_eq!(w.gradient(), expected, epsilon = 1e-12);
}

#[test]
fn test_backward_contract() {
    let x = leaf("x", &[1., 2.], 1, 2);
    let t = leaf("t", &[0., 0.], 1, 2);
    let loss = Node::mse_loss(&x, &t);
    assert_err!(
        loss.backward(Some(&Matrix::ones(1, 1))),
        GraphError::InvalidOperation(_)
    );

    let y = Node::sigmoid(&x);
    assert_err!(y.backward(None), GraphError::InvalidOperation(_));
    assert_err!(
        y.backward(Some(&Matrix::ones(2, 1))),
        GraphError::ShapeMismatch((1, 2), (2, 1), "Sigmoid节点收到的上游梯度形状与其值不一致")
    );
    assert_err!(x.node().backward(None), GraphError::InvalidOperation(_));
}

#[test]
fn test_node_handles() {
    let x = leaf("x", &[1.], 1, 1);
    let y = Node::log(&x);
    let alias = y.clone();
    assert!(alias.ptr_eq(&y));
    assert!(!y.ptr_eq(x.node()));
    assert_eq!(y.kind(), "Log");
    assert_eq!(x.node().kind(), "Variable");
    assert_eq!(format!("{y:?}"), r#"Node("Log")"#);
    // 叶子节点总有值
    assert_eq!(x.node().value(), Some(Matrix::new(&[1.], 1, 1)));
    assert_eq!(y.value(), None);
}

#[test]
fn test_concurrent_instances_share_parameters() {
    let w = leaf("w", &[0.5, -1., 2., 0.25], 2, 2);
    let workers = 8;

    thread::scope(|scope| {
        for i in 0..workers {
            let w = w.clone();
            scope.spawn(move || {
                let x = leaf("x", &[1., i as f64], 1, 2);
                let t = leaf("t", &[0., 0.], 1, 2);
                let loss = Node::mse_loss(&Node::multi(&x, &w), &t);
                loss.backward(None).unwrap();
            });
        }
    });

    // 各线程的梯度之和与顺序计算一致
    let expected = (0..workers)
        .map(|i| {
            let x = Matrix::new(&[1., i as f64], 1, 2);
            let out = x.mat_mul(&w.value()).unwrap();
            x.trans().mat_mul(&out).unwrap()
        })
        .fold(Matrix::zeros(2, 2), |acc, g| acc.add(&g).unwrap());
    assert_abs_diff_eq!(w.gradient(), expected, epsilon = 1e-9);
}
