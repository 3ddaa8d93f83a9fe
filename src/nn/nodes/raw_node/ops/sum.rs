/*
 * @Description  : 按行/列求和的归约节点。反向传播时沿被归约的轴把上游梯度广播回输入的形状。
 */

use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::TraitNode;

/// 每行求和：(rows, cols) → (rows, 1)
#[derive(Debug)]
pub(in crate::nn) struct RowSum {
    children: Vec<Node>,
    value: Option<Matrix>,
}

impl RowSum {
    pub(in crate::nn) fn new(x: &Node) -> Self {
        Self {
            children: vec![x.clone()],
            value: None,
        }
    }
}

impl TraitNode for RowSum {
    fn kind(&self) -> &'static str {
        "RowSum"
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
        self.value = Some(children[0].row_sum());
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        let (rows, cols) = children[0].shape();
        Ok(vec![Some(Matrix::from_fn(rows, cols, |r, _| upstream.get(r, 0)))])
    }
}

/// 每列求和：(rows, cols) → (1, cols)
#[derive(Debug)]
pub(in crate::nn) struct ColSum {
    children: Vec<Node>,
    value: Option<Matrix>,
}

impl ColSum {
    pub(in crate::nn) fn new(x: &Node) -> Self {
        Self {
            children: vec![x.clone()],
            value: None,
        }
    }
}

impl TraitNode for ColSum {
    fn kind(&self) -> &'static str {
        "ColSum"
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
        self.value = Some(children[0].col_sum());
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        let (rows, cols) = children[0].shape();
        Ok(vec![Some(Matrix::from_fn(rows, cols, |_, c| upstream.get(0, c)))])
    }
}
