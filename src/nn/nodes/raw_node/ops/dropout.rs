use rand::Rng;
use rand::rngs::StdRng;

use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::{TraitNode, cached_value};

/// Dropout节点
///
/// forward: 每个元素以概率p被保留（原样输出），否则置0；每次前向计算都会重新抽样
/// backward: 只有被保留的位置才传递G
///
/// 注：这里不会对保留下来的元素做1/p的放大。
#[derive(Debug)]
pub(in crate::nn) struct Dropout {
    children: Vec<Node>,
    value: Option<Matrix>,
    keep_prob: f64,
    rng: StdRng,
    /// 最近一次前向计算的保留掩码（1为保留，0为丢弃）
    mask: Option<Matrix>,
}

impl Dropout {
    pub(in crate::nn) fn new(x: &Node, keep_prob: f64, rng: StdRng) -> Self {
        Self {
            children: vec![x.clone()],
            value: None,
            keep_prob,
            rng,
            mask: None,
        }
    }
}

impl TraitNode for Dropout {
    fn kind(&self) -> &'static str {
        "Dropout"
    }

    fn children(&self) -> &[Node] {
        &self.children
    }

    fn value(&self) -> Option<&Matrix> {
        self.value.as_ref()
    }

    fn clear_value(&mut self) {
        self.value = None;
        self.mask = None;
    }

    fn calc_value_by_children(&mut self, children: &[Matrix]) -> Result<(), GraphError> {
        if !(0. ..=1.).contains(&self.keep_prob) {
            return Err(GraphError::InvalidOperation(format!(
                "Dropout节点的保留概率必须在[0, 1]内，实际为{}",
                self.keep_prob
            )));
        }
        let (rows, cols) = children[0].shape();
        let keep_prob = self.keep_prob;
        let mask = Matrix::random_with(rows, cols, &mut self.rng, |rng| {
            if rng.r#gen::<f64>() < keep_prob { 1. } else { 0. }
        });
        self.value = Some(children[0].mul_element(&mask)?);
        self.mask = Some(mask);
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        _children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        let mask = cached_value(self.kind(), &self.mask)?;
        Ok(vec![Some(upstream.mul_element(mask)?)])
    }
}
