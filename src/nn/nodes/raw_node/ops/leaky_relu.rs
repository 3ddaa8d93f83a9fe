use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::TraitNode;

/// ReLU节点的默认泄漏值λ
pub const DEFAULT_RELU_LEAK: f64 = 0.01;

/// ReLU激活函数节点（带泄漏值λ）
///
/// forward: x > 0 时为 x，否则为常数 λ
/// backward: x > 0 时为 G，否则为 λ · G
///
/// 注：λ = 0 时即为标准ReLU。
#[derive(Debug)]
pub(in crate::nn) struct ReLU {
    children: Vec<Node>,
    value: Option<Matrix>,
    leak: f64,
}

impl ReLU {
    pub(in crate::nn) fn new(x: &Node, leak: f64) -> Self {
        Self {
            children: vec![x.clone()],
            value: None,
            leak,
        }
    }
}

impl TraitNode for ReLU {
    fn kind(&self) -> &'static str {
        "ReLU"
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
        let leak = self.leak;
        self.value = Some(children[0].map(|x| if x > 0. { x } else { leak }));
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        let leak = self.leak;
        let local_grad = children[0].map(|x| if x > 0. { 1. } else { leak });
        Ok(vec![Some(upstream.mul_element(&local_grad)?)])
    }
}
