use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::TraitNode;

/// 逐元素相乘（哈达玛积）节点
///
/// forward: x ⊙ y
/// backward: dx = y ⊙ G, dy = x ⊙ G
#[derive(Debug)]
pub(in crate::nn) struct MultiElement {
    children: Vec<Node>,
    value: Option<Matrix>,
}

impl MultiElement {
    pub(in crate::nn) fn new(x: &Node, y: &Node) -> Self {
        Self {
            children: vec![x.clone(), y.clone()],
            value: None,
        }
    }
}

impl TraitNode for MultiElement {
    fn kind(&self) -> &'static str {
        "MultiElement"
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
        self.value = Some(children[0].mul_element(&children[1])?);
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        let dx = children[1].mul_element(upstream)?;
        let dy = children[0].mul_element(upstream)?;
        Ok(vec![Some(dx), Some(dy)])
    }
}
