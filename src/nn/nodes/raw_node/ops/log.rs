use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::TraitNode;

/// 自然对数节点
///
/// forward: ln(x)，输入含非正数（结果非有限值）时报`NumericInstability`
/// backward: dx = G ⊘ x
#[derive(Debug)]
pub(in crate::nn) struct Log {
    children: Vec<Node>,
    value: Option<Matrix>,
}

impl Log {
    pub(in crate::nn) fn new(x: &Node) -> Self {
        Self {
            children: vec![x.clone()],
            value: None,
        }
    }
}

impl TraitNode for Log {
    fn kind(&self) -> &'static str {
        "Log"
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
        let value = children[0].map(f64::ln);
        if !value.all_finite() {
            return Err(GraphError::NumericInstability(
                "Log节点的输入必须全部为正的有限值".to_string(),
            ));
        }
        self.value = Some(value);
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        Ok(vec![Some(upstream.div_element(&children[0])?)])
    }
}
