/*
 * @Description  : 训练编排器（NeuralNetwork）的单元测试，使用 y = x · w 的单参数模型以便手算
 */

use approx::assert_abs_diff_eq;

use crate::assert_err;
use crate::matrix::Matrix;
use crate::nn::{GraphError, GraphInstance, NeuralNetwork, Node, SGD, Variable};

/// 构造共享参数`w`（1×1，初值0）的网络，学习率0.1、无动量
fn scalar_network() -> (Variable, NeuralNetwork) {
    let w = Variable::new("w", 1, 1);
    let builder = {
        let w = w.clone();
        move || {
            let input = Variable::new("x", 1, 1);
            let target = Variable::new("y", 1, 1);
            let output = Node::multi(&input, &w);
            let loss = Node::mse_loss(&output, &target);
            GraphInstance {
                input,
                target,
                output,
                loss,
            }
        }
    };
    let network = NeuralNetwork::new(builder, SGD::new(&[w.clone()], 0.1, 0.));
    (w, network)
}

#[test]
fn test_train_single_sample() {
    let (w, mut network) = scalar_network();
    // loss = (0 - 2)² = 4，dw = 2 · (0 - 2) · 1 = -4
    let loss = network.train(&[vec![1.]], &[vec![2.]], 1).unwrap();
    assert_eq!(loss, 4.);
    assert_abs_diff_eq!(w.value().get(0, 0), 0.4, epsilon = 1e-12);
    // 批次结束后梯度已随reset清零
    assert_eq!(w.gradient(), Matrix::zeros(1, 1));
}

#[test]
fn test_train_batch_averages_gradients() {
    let (w, mut network) = scalar_network();
    // 两个样本的损失为4和16，梯度为-4和-16，均值-10
    let loss = network
        .train(&[vec![1.], vec![2.]], &[vec![2.], vec![4.]], 2)
        .unwrap();
    assert_eq!(loss, 10.);
    assert_abs_diff_eq!(w.value().get(0, 0), 1., epsilon = 1e-12);

    let (loss, outputs) = network
        .evaluate(&[vec![1.], vec![2.]], &[vec![2.], vec![4.]])
        .unwrap();
    assert_abs_diff_eq!(loss, 2.5, epsilon = 1e-12);
    assert_eq!(outputs.len(), 2);
    assert_abs_diff_eq!(outputs[1][0], 2., epsilon = 1e-12);
    // 评估不更新参数
    assert_abs_diff_eq!(w.value().get(0, 0), 1., epsilon = 1e-12);
}

#[test]
fn test_train_with_partial_last_chunk() {
    let (w, mut network) = scalar_network();
    // 批大小2、3个样本：第一批[1, 1]，第二批[1]
    let inputs = vec![vec![1.]; 3];
    let targets = vec![vec![1.]; 3];
    let loss = network.train(&inputs, &targets, 2).unwrap();
    // 第一批：w=0，损失均为1，梯度均为-2 → w = 0.2
    // 第二批：w=0.2，损失0.64，梯度-1.6 → w = 0.36
    assert_abs_diff_eq!(loss, (1. + 1. + 0.64) / 3., epsilon = 1e-12);
    assert_abs_diff_eq!(w.value().get(0, 0), 0.36, epsilon = 1e-12);
}

#[test]
fn test_predict() {
    let (w, mut network) = scalar_network();
    w.set_value(Matrix::new(&[3.], 1, 1)).unwrap();
    assert_eq!(network.predict(&[2.]).unwrap(), vec![6.]);
    // 参数变化后再次预测可见新值
    w.set_value(Matrix::new(&[-1.], 1, 1)).unwrap();
    assert_eq!(network.predict(&[2.]).unwrap(), vec![-2.]);
}

#[test]
fn test_invalid_datasets() {
    let (w, mut network) = scalar_network();
    assert_err!(network.train(&[], &[], 1), GraphError::InvalidOperation(_));
    assert_err!(
        network.train(&[vec![1.]], &[], 1),
        GraphError::InvalidOperation(_)
    );
    assert_err!(
        network.train(&[vec![1.]], &[vec![1.]], 0),
        GraphError::InvalidOperation(_)
    );
    assert_err!(
        network.evaluate(&[vec![1.]], &[vec![1.], vec![2.]]),
        GraphError::InvalidOperation(_)
    );
    assert_err!(
        network.predict(&[1., 2.]),
        GraphError::ShapeMismatch((1, 1), (1, 2), "输入样本的长度必须等于输入变量的元素个数")
    );

    // 某个样本出错时整批作废，参数不变且梯度被清零
    assert_err!(
        network.train(&[vec![1.], vec![1., 2.]], &[vec![1.], vec![1.]], 2),
        GraphError::ShapeMismatch { .. }
    );
    assert_eq!(w.value(), Matrix::zeros(1, 1));
    assert_eq!(w.gradient(), Matrix::zeros(1, 1));

    // 出错后网络仍可正常训练
    assert_eq!(network.train(&[vec![1.]], &[vec![2.]], 1).unwrap(), 4.);
}

/// out = x · w + ln(x)，w = 2：x为非正数时Log节点前向失败
fn log_branch_network() -> NeuralNetwork {
    let w = Variable::from_matrix("w", Matrix::new(&[2.], 1, 1));
    let builder = {
        let w = w.clone();
        move || {
            let input = Variable::new("x", 1, 1);
            let target = Variable::new("y", 1, 1);
            let output = Node::add(&Node::multi(&input, &w), &Node::log(&input));
            let loss = Node::mse_loss(&output, &target);
            GraphInstance {
                input,
                target,
                output,
                loss,
            }
        }
    };
    NeuralNetwork::new(builder, SGD::new(&[w], 0.1, 0.))
}

#[test]
fn test_failed_forward_leaves_no_stale_cache() {
    let mut network = log_branch_network();
    assert_err!(network.predict(&[-5.]), GraphError::NumericInstability(_));
    // 不能复用上次残留的x·w = -10
    assert_eq!(network.predict(&[1.]).unwrap(), vec![2.]);

    assert_err!(
        network.evaluate(&[vec![-5.]], &[vec![0.]]),
        GraphError::NumericInstability(_)
    );
    let (loss, outputs) = network.evaluate(&[vec![1.]], &[vec![0.]]).unwrap();
    assert_eq!(outputs, vec![vec![2.]]);
    assert_eq!(loss, 4.);
}

#[test]
fn test_train_recovers_after_numeric_failure() {
    let w = Variable::from_matrix("w", Matrix::new(&[2.], 1, 1));
    let builder = {
        let w = w.clone();
        move || {
            let input = Variable::new("x", 1, 1);
            let target = Variable::new("y", 1, 1);
            let output = Node::tanh(&Node::multi(&input, &w));
            let loss = Node::mse_loss(&output, &target);
            GraphInstance {
                input,
                target,
                output,
                loss,
            }
        }
    };
    let mut network = NeuralNetwork::new(builder, SGD::new(&[w.clone()], 0.1, 0.));

    // 1e308 · 2溢出为无穷大，Tanh节点报错，整批作废
    assert_err!(
        network.train(&[vec![1e308]], &[vec![0.]], 1),
        GraphError::NumericInstability(_)
    );
    assert_eq!(w.value(), Matrix::new(&[2.], 1, 1));
    assert_eq!(w.gradient(), Matrix::zeros(1, 1));

    let expected = 0.2_f64.tanh().powi(2);
    let loss = network.train(&[vec![0.1]], &[vec![0.]], 1).unwrap();
    assert_abs_diff_eq!(loss, expected, epsilon = 1e-12);
    assert_err!(network.predict(&[1e308]), GraphError::NumericInstability(_));
    assert_eq!(network.predict(&[0.]).unwrap(), vec![0.]);
}

#[test]
fn test_optimizer_access() {
    let (_, mut network) = scalar_network();
    assert_eq!(network.optimizer().learning_rate(), 0.1);
    network.optimizer_mut().set_learning_rate(0.5);
    assert_eq!(network.optimizer().learning_rate(), 0.5);
    let instance = network.build_instance();
    assert_eq!(instance.loss.kind(), "MSELoss");
}
