/*
 * @Description  : 行/列切片节点，区间均为左闭右开的[start, end)。
 *                 反向传播时把上游梯度放回到与输入同形状的全零矩阵中对应的位置。
 */

use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::TraitNode;

#[derive(Debug)]
pub(in crate::nn) struct RowSlice {
    children: Vec<Node>,
    value: Option<Matrix>,
    start: usize,
    end: usize,
}

impl RowSlice {
    pub(in crate::nn) fn new(x: &Node, start: usize, end: usize) -> Self {
        Self {
            children: vec![x.clone()],
            value: None,
            start,
            end,
        }
    }
}

impl TraitNode for RowSlice {
    fn kind(&self) -> &'static str {
        "RowSlice"
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
        self.value = Some(children[0].row_slice(self.start, self.end)?);
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        let (rows, cols) = children[0].shape();
        let grad = Matrix::from_fn(rows, cols, |r, c| {
            if (self.start..self.end).contains(&r) {
                upstream.get(r - self.start, c)
            } else {
                0.
            }
        });
        Ok(vec![Some(grad)])
    }
}

#[derive(Debug)]
pub(in crate::nn) struct ColSlice {
    children: Vec<Node>,
    value: Option<Matrix>,
    start: usize,
    end: usize,
}

impl ColSlice {
    pub(in crate::nn) fn new(x: &Node, start: usize, end: usize) -> Self {
        Self {
            children: vec![x.clone()],
            value: None,
            start,
            end,
        }
    }
}

impl TraitNode for ColSlice {
    fn kind(&self) -> &'static str {
        "ColSlice"
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
        self.value = Some(children[0].col_slice(self.start, self.end)?);
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        let (rows, cols) = children[0].shape();
        let grad = Matrix::from_fn(rows, cols, |r, c| {
            if (self.start..self.end).contains(&c) {
                upstream.get(r, c - self.start)
            } else {
                0.
            }
        });
        Ok(vec![Some(grad)])
    }
}
