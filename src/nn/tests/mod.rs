mod grad_check;
mod graph_mechanism;
mod model;
mod network;
mod node_conv_pool;

use crate::matrix::Matrix;
use crate::nn::Variable;
use crate::nn::grad_check::check_gradient;
use crate::nn::Node;

/// 梯度校验使用的差分步长与容差
const EPSILON: f64 = 1e-6;
const TOLERANCE: f64 = 1e-4;

/// 创建一个给定值的叶子变量
fn leaf(name: &str, data: &[f64], rows: usize, cols: usize) -> Variable {
    Variable::from_matrix(name, Matrix::new(data, rows, cols))
}

/// 以固定的上游梯度做有限差分校验
fn assert_grad_ok(output: &Node, leaves: &[Variable], upstream: Option<&Matrix>) {
    if let Err(e) = check_gradient(output, leaves, upstream, EPSILON, TOLERANCE) {
        panic!("{}节点梯度校验失败：{e}", output.kind());
    }
}
