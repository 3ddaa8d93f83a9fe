/*
 * @Description  : 计算图节点。`Node`是指向某个具体节点的共享句柄（可廉价克隆、可跨线程传递），
 *                 同一个子节点可以被多个父节点引用，从而构成有向无环图。
 *                 前向计算惰性求值并缓存，反向传播按链式法则递归，叶子节点（Variable）累加梯度。
 */

mod node_ops;
pub(in crate::nn) mod raw_node;
mod variable;

pub use raw_node::{DEFAULT_RELU_LEAK, DEFAULT_TANH_GRAD_EPS};
pub use variable::Variable;

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::trace;

use self::raw_node::{NodeType, TraitNode};
use crate::matrix::Matrix;
use crate::nn::GraphError;

/// 计算图节点的共享句柄
#[derive(Clone)]
pub struct Node(Arc<NodeCell>);

struct NodeCell {
    kind: &'static str,
    /// 节点本身（含缓存）由自己的互斥锁保护；加锁顺序始终是父节点先于子节点
    raw: Mutex<NodeType>,
    /// 节点公式被实际执行的次数
    compute_count: AtomicUsize,
}

impl Node {
    pub(in crate::nn) fn from_raw<T: Into<NodeType>>(raw: T) -> Self {
        let raw = raw.into();
        Self(Arc::new(NodeCell {
            kind: raw.kind(),
            raw: Mutex::new(raw),
            compute_count: AtomicUsize::new(0),
        }))
    }

    /// 某个线程在持锁期间panic并不会破坏节点数据的一致性（每次写入都是整体替换），所以直接忽略中毒状态
    pub(in crate::nn) fn lock(&self) -> MutexGuard<'_, NodeType> {
        self.0.raw.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 节点类型名，如"Add"、"MSELoss"
    pub fn kind(&self) -> &'static str {
        self.0.kind
    }

    /// 当前缓存的值（不会触发计算）。叶子节点总是返回其值
    pub fn value(&self) -> Option<Matrix> {
        self.lock().value().cloned()
    }

    pub fn is_cached(&self) -> bool {
        self.lock().value().is_some()
    }

    /// 节点公式被实际执行的次数，可用于验证缓存是否生效
    pub fn compute_count(&self) -> usize {
        self.0.compute_count.load(Ordering::Relaxed)
    }

    pub fn is_loss(&self) -> bool {
        self.lock().is_loss()
    }

    /// 两个句柄是否指向同一个节点
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// 前向计算：若已有缓存则直接返回；否则先计算所有子节点，再计算本节点并缓存。
    /// 在下一次`reset`之前，重复调用返回完全相同的结果且不会重复计算。
    pub fn forward(&self) -> Result<Matrix, GraphError> {
        let children = {
            let raw = self.lock();
            if let Some(value) = raw.value() {
                return Ok(value.clone());
            }
            raw.children().to_vec()
        };

        let child_values = children
            .iter()
            .map(Self::forward)
            .collect::<Result<Vec<_>, _>>()?;

        let mut raw = self.lock();
        raw.calc_value_by_children(&child_values)?;
        self.0.compute_count.fetch_add(1, Ordering::Relaxed);
        let value = raw.value().cloned().ok_or_else(|| {
            GraphError::ComputationError(format!(
                "{}节点计算后没有值。不该触及本错误，否则说明crate代码有问题",
                self.kind()
            ))
        })?;
        trace!("{}节点完成前向计算，形状{:?}", self.kind(), value.shape());
        Ok(value)
    }

    /// 反向传播。
    /// - 损失节点是起点，`grad`必须为`None`；
    /// - 其余节点的`grad`必须为与本节点值同形状的上游梯度；
    /// - 叶子节点把收到的梯度累加到自身（同一叶子被多处引用时，各路梯度之和即为总梯度）。
    pub fn backward(&self, grad: Option<&Matrix>) -> Result<(), GraphError> {
        {
            let mut raw = self.lock();
            if let NodeType::Variable(variable) = &mut *raw {
                let grad = grad.ok_or_else(|| {
                    GraphError::InvalidOperation(format!(
                        "变量{}的反向传播需要上游梯度",
                        variable.name()
                    ))
                })?;
                return variable.accumulate_gradient(grad);
            }
        }

        let value = self.forward()?;
        let (is_loss, children) = {
            let raw = self.lock();
            (raw.is_loss(), raw.children().to_vec())
        };

        let seed;
        let upstream = match (is_loss, grad) {
            (true, None) => {
                seed = Matrix::ones(1, 1);
                &seed
            }
            (true, Some(_)) => {
                return Err(GraphError::InvalidOperation(format!(
                    "{}损失节点是反向传播的起点，不接受上游梯度",
                    self.kind()
                )));
            }
            (false, None) => {
                return Err(GraphError::InvalidOperation(format!(
                    "{}节点的反向传播需要上游梯度",
                    self.kind()
                )));
            }
            (false, Some(grad)) if !grad.is_same_shape(&value) => {
                return Err(GraphError::ShapeMismatch {
                    expected: value.shape(),
                    got: grad.shape(),
                    message: format!("{}节点收到的上游梯度形状与其值不一致", self.kind()),
                });
            }
            (false, Some(grad)) => grad,
        };

        let child_values = children
            .iter()
            .map(Self::forward)
            .collect::<Result<Vec<_>, _>>()?;
        let grads = self
            .lock()
            .calc_grads_to_children(&child_values, upstream)?;

        for (child, grad) in children.iter().zip(grads) {
            if let Some(grad) = grad {
                child.backward(Some(&grad))?;
            }
        }
        Ok(())
    }

    /// 清除本节点的缓存并递归清除子节点的缓存；叶子节点则把梯度清零。
    /// 已无缓存的节点直接返回，所以共享子图只会被遍历一次。
    pub fn reset(&self) {
        let children = {
            let mut raw = self.lock();
            if let NodeType::Variable(variable) = &mut *raw {
                variable.zero_gradient();
                return;
            }
            if raw.value().is_none() {
                return;
            }
            raw.clear_value();
            raw.children().to_vec()
        };
        for child in &children {
            child.reset();
        }
    }

    /// 前向计算中途失败时使用的重置：失败节点本身没有缓存，`reset`会在它那里停下，
    /// 而它下方已算出的子节点仍留有缓存。本方法不论缓存与否，遍历整个子图各一次
    pub fn force_reset(&self) {
        let mut visited = HashSet::new();
        self.force_reset_from(&mut visited);
    }

    fn force_reset_from(&self, visited: &mut HashSet<*const NodeCell>) {
        if !visited.insert(Arc::as_ptr(&self.0)) {
            return;
        }
        let children = {
            let mut raw = self.lock();
            if let NodeType::Variable(variable) = &mut *raw {
                variable.zero_gradient();
                return;
            }
            raw.clear_value();
            raw.children().to_vec()
        };
        for child in &children {
            child.force_reset_from(visited);
        }
    }
}

impl AsRef<Self> for Node {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Node").field(&self.kind()).finish()
    }
}
