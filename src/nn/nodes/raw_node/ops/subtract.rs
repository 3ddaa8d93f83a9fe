use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::TraitNode;

/// 逐元素相减节点
///
/// forward: x - y
/// backward: dx = G, dy = -G
#[derive(Debug)]
pub(in crate::nn) struct Sub {
    children: Vec<Node>,
    value: Option<Matrix>,
}

impl Sub {
    pub(in crate::nn) fn new(x: &Node, y: &Node) -> Self {
        Self {
            children: vec![x.clone(), y.clone()],
            value: None,
        }
    }
}

impl TraitNode for Sub {
    fn kind(&self) -> &'static str {
        "Sub"
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
        self.value = Some(children[0].sub(&children[1])?);
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        _children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        Ok(vec![Some(upstream.clone()), Some(upstream.negate())])
    }
}
