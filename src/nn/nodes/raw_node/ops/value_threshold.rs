use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::TraitNode;

/// 值截断节点
///
/// forward: 把x的每个元素截断到[-θ, θ]
/// backward: 只有未被截断（-θ < x < θ）的位置才传递G，其余位置梯度为0
#[derive(Debug)]
pub(in crate::nn) struct ValueThreshold {
    children: Vec<Node>,
    value: Option<Matrix>,
    threshold: f64,
}

impl ValueThreshold {
    pub(in crate::nn) fn new(x: &Node, threshold: f64) -> Self {
        Self {
            children: vec![x.clone()],
            value: None,
            threshold,
        }
    }
}

impl TraitNode for ValueThreshold {
    fn kind(&self) -> &'static str {
        "ValueThreshold"
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
        if !(self.threshold >= 0.) {
            return Err(GraphError::InvalidOperation(format!(
                "ValueThreshold节点的阈值必须为非负数，实际为{}",
                self.threshold
            )));
        }
        let theta = self.threshold;
        self.value = Some(children[0].map(|x| x.clamp(-theta, theta)));
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        let theta = self.threshold;
        let mask = children[0].map(|x| if -theta < x && x < theta { 1. } else { 0. });
        Ok(vec![Some(upstream.mul_element(&mask)?)])
    }
}
