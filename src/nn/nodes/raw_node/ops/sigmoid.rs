use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::{TraitNode, cached_value};

/// Sigmoid激活函数节点
///
/// forward: σ(x) = 1 / (1 + e^(-x))
/// backward: dx = σ(x) ⊙ (1 - σ(x)) ⊙ G
#[derive(Debug)]
pub(in crate::nn) struct Sigmoid {
    children: Vec<Node>,
    value: Option<Matrix>,
}

impl Sigmoid {
    pub(in crate::nn) fn new(x: &Node) -> Self {
        Self {
            children: vec![x.clone()],
            value: None,
        }
    }
}

impl TraitNode for Sigmoid {
    fn kind(&self) -> &'static str {
        "Sigmoid"
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
        self.value = Some(children[0].map(|x| 1. / (1. + (-x).exp())));
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        _children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        let y = cached_value(self.kind(), &self.value)?;
        let local_grad = y.map(|s| s * (1. - s));
        Ok(vec![Some(upstream.mul_element(&local_grad)?)])
    }
}
