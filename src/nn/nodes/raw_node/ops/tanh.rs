use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::{TraitNode, cached_value};

/// Tanh节点反向传播时默认附加的稳定项η
pub const DEFAULT_TANH_GRAD_EPS: f64 = 0.01;

/// Tanh激活函数节点
///
/// forward: tanh(x)，输入含NaN或无穷大时报`NumericInstability`
/// backward: dx = (1 - tanh²(x) + η) ⊙ G
///
/// 注：η > 0 时梯度在饱和区不会完全消失，但也就不再是精确导数；η = 0 时为精确导数。
#[derive(Debug)]
pub(in crate::nn) struct Tanh {
    children: Vec<Node>,
    value: Option<Matrix>,
    grad_eps: f64,
}

impl Tanh {
    pub(in crate::nn) fn new(x: &Node, grad_eps: f64) -> Self {
        Self {
            children: vec![x.clone()],
            value: None,
            grad_eps,
        }
    }
}

impl TraitNode for Tanh {
    fn kind(&self) -> &'static str {
        "Tanh"
    }

    fn children(&self) -> &[Node] {
        &self.children
    }

    fn value(&self) -> Option<&Matrix> {
        self.value.as_ref()
    }

    fn clear_value(&mut self) {
        self.value = None;
    }

    fn calc_value_by_children(&mut self, children: &[Matrix]) -> Result<(), GraphError> {
        if !children[0].all_finite() {
            return Err(GraphError::NumericInstability(
                "Tanh节点的输入含有NaN或无穷大".to_string(),
            ));
        }
        self.value = Some(children[0].map(f64::tanh));
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        _children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        let y = cached_value(self.kind(), &self.value)?;
        let eps = self.grad_eps;
        let local_grad = y.map(|t| 1. - t * t + eps);
        Ok(vec![Some(upstream.mul_element(&local_grad)?)])
    }
}
