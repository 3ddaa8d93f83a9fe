use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::TraitNode;

/// 数乘节点
///
/// forward: k · x
/// backward: dx = k · G
#[derive(Debug)]
pub(in crate::nn) struct Scale {
    children: Vec<Node>,
    value: Option<Matrix>,
    factor: f64,
}

impl Scale {
    pub(in crate::nn) fn new(x: &Node, factor: f64) -> Self {
        Self {
            children: vec![x.clone()],
            value: None,
            factor,
        }
    }
}

impl TraitNode for Scale {
    fn kind(&self) -> &'static str {
        "Scale"
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
        self.value = Some(children[0].scale(self.factor));
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        _children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        Ok(vec![Some(upstream.scale(self.factor))])
    }
}
