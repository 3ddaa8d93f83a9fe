use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::TraitNode;

/// 矩阵乘法节点
///
/// forward: x · y，形状 (r1, c1) × (c1, c2) → (r1, c2)
/// backward: dx = G · yᵗ, dy = xᵗ · G
#[derive(Debug)]
pub(in crate::nn) struct Multi {
    children: Vec<Node>,
    value: Option<Matrix>,
}

impl Multi {
    pub(in crate::nn) fn new(x: &Node, y: &Node) -> Self {
        Self {
            children: vec![x.clone(), y.clone()],
            value: None,
        }
    }
}

impl TraitNode for Multi {
    fn kind(&self) -> &'static str {
        "Multi"
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
        self.value = Some(children[0].mat_mul(&children[1])?);
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        let (x, y) = (&children[0], &children[1]);
        let dx = upstream.mat_mul(&y.trans())?;
        let dy = x.trans().mat_mul(upstream)?;
        Ok(vec![Some(dx), Some(dy)])
    }
}
