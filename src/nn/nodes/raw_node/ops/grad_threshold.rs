use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::TraitNode;

/// 梯度门限节点，常用于循环结构中抑制过小的梯度
///
/// forward: 恒等映射
/// backward: 仅当‖G‖₂ ≥ θ时才把G原样传给子节点，否则不再向下传播
#[derive(Debug)]
pub(in crate::nn) struct GradThreshold {
    children: Vec<Node>,
    value: Option<Matrix>,
    threshold: f64,
}

impl GradThreshold {
    pub(in crate::nn) fn new(x: &Node, threshold: f64) -> Self {
        Self {
            children: vec![x.clone()],
            value: None,
            threshold,
        }
    }
}

impl TraitNode for GradThreshold {
    fn kind(&self) -> &'static str {
        "GradThreshold"
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
        self.value = Some(children[0].clone());
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        _children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        if upstream.norm_l2() >= self.threshold {
            Ok(vec![Some(upstream.clone())])
        } else {
            Ok(vec![None])
        }
    }
}
