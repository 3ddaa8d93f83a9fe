use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;

use super::TraitNode;

/// 叶子节点：持有值与累积的梯度（两者形状始终一致）。
/// 它的值不会被`reset`清除，`reset`只会将梯度清零。
#[derive(Debug)]
pub(in crate::nn) struct Variable {
    name: String,
    value: Matrix,
    gradient: Matrix,
}

impl Variable {
    pub(in crate::nn) fn new(name: &str, value: Matrix) -> Self {
        let gradient = Matrix::zeros(value.rows(), value.cols());
        Self {
            name: name.to_string(),
            value,
            gradient,
        }
    }

    pub(in crate::nn) fn name(&self) -> &str {
        &self.name
    }

    pub(in crate::nn) const fn current_value(&self) -> &Matrix {
        &self.value
    }

    pub(in crate::nn) const fn gradient(&self) -> &Matrix {
        &self.gradient
    }

    /// 替换值，新值的形状必须与原值一致
    pub(in crate::nn) fn set_value(&mut self, value: Matrix) -> Result<(), GraphError> {
        if !value.is_same_shape(&self.value) {
            return Err(GraphError::ShapeMismatch {
                expected: self.value.shape(),
                got: value.shape(),
                message: format!("变量{}的新值形状必须与原值一致", self.name),
            });
        }
        self.value = value;
        Ok(())
    }

    /// gradient += grad
    pub(in crate::nn) fn accumulate_gradient(&mut self, grad: &Matrix) -> Result<(), GraphError> {
        if !grad.is_same_shape(&self.gradient) {
            return Err(GraphError::ShapeMismatch {
                expected: self.gradient.shape(),
                got: grad.shape(),
                message: format!("变量{}收到的梯度形状与其值不一致", self.name),
            });
        }
        self.gradient = self.gradient.add(grad)?;
        Ok(())
    }

    pub(in crate::nn) fn zero_gradient(&mut self) {
        self.gradient = Matrix::zeros(self.value.rows(), self.value.cols());
    }
}

impl TraitNode for Variable {
    fn kind(&self) -> &'static str {
        "Variable"
    }

    fn children(&self) -> &[Node] {
        &[]
    }

    fn value(&self) -> Option<&Matrix> {
        Some(&self.value)
    }

    fn clear_value(&mut self) {
        // 叶子节点的值不属于缓存，无需清除
    }

    fn calc_value_by_children(&mut self, _children: &[Matrix]) -> Result<(), GraphError> {
        // Variable节点不需要计算值
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        _children: &[Matrix],
        _upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        Ok(Vec::new())
    }
}
