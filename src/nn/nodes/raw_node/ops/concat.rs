/*
 * @Description  : 拼接节点。反向传播时把上游梯度按拼接方向切回两块，分别交给两个子节点。
 */

use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::TraitNode;

/// 横向拼接节点：`[x | y]`，要求两者行数相同
#[derive(Debug)]
pub(in crate::nn) struct HConcat {
    children: Vec<Node>,
    value: Option<Matrix>,
}

impl HConcat {
    pub(in crate::nn) fn new(x: &Node, y: &Node) -> Self {
        Self {
            children: vec![x.clone(), y.clone()],
            value: None,
        }
    }
}

impl TraitNode for HConcat {
    fn kind(&self) -> &'static str {
        "HConcat"
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
        self.value = Some(children[0].hconcat(&children[1])?);
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        let split = children[0].cols();
        let dx = upstream.col_slice(0, split)?;
        let dy = upstream.col_slice(split, upstream.cols())?;
        Ok(vec![Some(dx), Some(dy)])
    }
}

/// 纵向拼接节点：x在上、y在下，要求两者列数相同
#[derive(Debug)]
pub(in crate::nn) struct VConcat {
    children: Vec<Node>,
    value: Option<Matrix>,
}

impl VConcat {
    pub(in crate::nn) fn new(x: &Node, y: &Node) -> Self {
        Self {
            children: vec![x.clone(), y.clone()],
            value: None,
        }
    }
}

impl TraitNode for VConcat {
    fn kind(&self) -> &'static str {
        "VConcat"
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
        self.value = Some(children[0].vconcat(&children[1])?);
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        let split = children[0].rows();
        let dx = upstream.row_slice(0, split)?;
        let dy = upstream.row_slice(split, upstream.rows())?;
        Ok(vec![Some(dx), Some(dy)])
    }
}
