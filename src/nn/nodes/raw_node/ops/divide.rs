use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::TraitNode;

/// 逐元素相除节点
///
/// forward: x ⊘ y
/// backward: dx = G ⊘ y, dy = -G ⊙ x ⊘ y²
///
/// 除数为0时按IEEE-754得到无穷大或NaN，不做拦截。
#[derive(Debug)]
pub(in crate::nn) struct Div {
    children: Vec<Node>,
    value: Option<Matrix>,
}

impl Div {
    pub(in crate::nn) fn new(x: &Node, y: &Node) -> Self {
        Self {
            children: vec![x.clone(), y.clone()],
            value: None,
        }
    }
}

impl TraitNode for Div {
    fn kind(&self) -> &'static str {
        "Div"
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
        self.value = Some(children[0].div_element(&children[1])?);
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        let (x, y) = (&children[0], &children[1]);
        let dx = upstream.div_element(y)?;
        let y_squared = y.mul_element(y)?;
        let dy = upstream.mul_element(x)?.div_element(&y_squared)?.negate();
        Ok(vec![Some(dx), Some(dy)])
    }
}
