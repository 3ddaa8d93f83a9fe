use rand::Rng;

use super::Node;
use super::raw_node::{self, NodeType};
use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::init::Init;

/// 叶子节点（变量）的句柄，可作为模型参数或样本的输入/目标。
/// 克隆得到的句柄指向同一个变量，所以一组参数可以被多个图实例、多个线程共享；
/// 对变量的读写都在其自身的互斥锁内完成。
#[derive(Clone, Debug)]
pub struct Variable(Node);

impl Variable {
    /// 创建值全为0的变量
    pub fn new(name: &str, rows: usize, cols: usize) -> Self {
        Self::from_matrix(name, Matrix::zeros(rows, cols))
    }

    pub fn from_matrix(name: &str, value: Matrix) -> Self {
        Self(Node::from_raw(raw_node::Variable::new(name, value)))
    }

    /// 按`init`策略随机初始化一个变量
    pub fn random<R: Rng + ?Sized>(
        name: &str,
        rows: usize,
        cols: usize,
        init: &Init,
        rng: &mut R,
    ) -> Result<Self, GraphError> {
        Ok(Self::from_matrix(name, init.generate_with_rng(rows, cols, rng)?))
    }

    pub fn node(&self) -> &Node {
        &self.0
    }

    pub fn name(&self) -> String {
        self.with_raw(|v| v.name().to_string())
    }

    pub fn value(&self) -> Matrix {
        self.with_raw(|v| v.current_value().clone())
    }

    pub fn shape(&self) -> (usize, usize) {
        self.with_raw(|v| v.current_value().shape())
    }

    /// 替换变量的值，新值的形状必须与原值一致。
    /// 注意：这不会清除下游节点的缓存，调用方需在此之前对相关的图调用`reset`。
    pub fn set_value(&self, value: Matrix) -> Result<(), GraphError> {
        self.with_raw(|v| v.set_value(value))
    }

    /// 当前累积的梯度
    pub fn gradient(&self) -> Matrix {
        self.with_raw(|v| v.gradient().clone())
    }

    pub fn zero_gradient(&self) {
        self.with_raw(raw_node::Variable::zero_gradient);
    }

    fn with_raw<T>(&self, f: impl FnOnce(&mut raw_node::Variable) -> T) -> T {
        match &mut *self.0.lock() {
            NodeType::Variable(variable) => f(variable),
            _ => unreachable!("Variable句柄只会指向叶子节点"),
        }
    }
}

impl AsRef<Node> for Variable {
    fn as_ref(&self) -> &Node {
        &self.0
    }
}

impl From<Variable> for Node {
    fn from(variable: Variable) -> Self {
        variable.0
    }
}
