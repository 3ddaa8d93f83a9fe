use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::TraitNode;

/// 转置节点：forward为xᵗ，backward为dx = Gᵗ
#[derive(Debug)]
pub(in crate::nn) struct Trans {
    children: Vec<Node>,
    value: Option<Matrix>,
}

impl Trans {
    pub(in crate::nn) fn new(x: &Node) -> Self {
        Self {
            children: vec![x.clone()],
            value: None,
        }
    }
}

impl TraitNode for Trans {
    fn kind(&self) -> &'static str {
        "Trans"
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
        self.value = Some(children[0].trans());
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        _children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        Ok(vec![Some(upstream.trans())])
    }
}
