use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::TraitNode;

/// 变形节点
///
/// forward: 按行优先顺序将x变形为`rows`×`cols`（元素总数须不变）
/// backward: 将G变回x的形状
#[derive(Debug)]
pub(in crate::nn) struct Reshape {
    children: Vec<Node>,
    value: Option<Matrix>,
    rows: usize,
    cols: usize,
}

impl Reshape {
    pub(in crate::nn) fn new(x: &Node, rows: usize, cols: usize) -> Self {
        Self {
            children: vec![x.clone()],
            value: None,
            rows,
            cols,
        }
    }
}

impl TraitNode for Reshape {
    fn kind(&self) -> &'static str {
        "Reshape"
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
        self.value = Some(children[0].reshape(self.rows, self.cols)?);
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        let (rows, cols) = children[0].shape();
        Ok(vec![Some(upstream.reshape(rows, cols)?)])
    }
}
