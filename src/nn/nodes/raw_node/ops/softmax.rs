use rayon::prelude::*;

use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::{TraitNode, cached_value};

/// Softmax节点（按行归一化）
///
/// forward: y[r][c] = e^(x[r][c]) / Σ_c' e^(x[r][c'])，先减去每行最大值以避免溢出
/// backward: dx = y ⊙ (1 - y) ⊙ G（只取雅可比矩阵的对角部分）
///
/// 注：后接CrossEntropyLoss时，两者组合起来的梯度恰为`y - target`（再除以行数）。
#[derive(Debug)]
pub(in crate::nn) struct Softmax {
    children: Vec<Node>,
    value: Option<Matrix>,
}

impl Softmax {
    pub(in crate::nn) fn new(x: &Node) -> Self {
        Self {
            children: vec![x.clone()],
            value: None,
        }
    }

    /// 计算数值稳定的softmax（Rayon 按行并行）
    fn stable_softmax(logits: &Matrix) -> Result<Matrix, GraphError> {
        let (rows, cols) = logits.shape();
        let row_results: Vec<Vec<f64>> = (0..rows)
            .into_par_iter()
            .map(|r| {
                let row = &logits.data()[r * cols..(r + 1) * cols];
                let max_val = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let exps: Vec<f64> = row.iter().map(|x| (x - max_val).exp()).collect();
                let sum_exp: f64 = exps.iter().sum();
                exps.into_iter().map(|e| e / sum_exp).collect()
            })
            .collect();

        let all_data: Vec<f64> = row_results.into_iter().flatten().collect();
        Ok(Matrix::try_new(all_data, rows, cols)?)
    }
}

impl TraitNode for Softmax {
    fn kind(&self) -> &'static str {
        "Softmax"
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
        if !children[0].all_finite() {
            return Err(GraphError::NumericInstability(
                "Softmax节点的输入含有NaN或无穷大".to_string(),
            ));
        }
        let value = Self::stable_softmax(&children[0])?;
        if !value.all_finite() {
            return Err(GraphError::NumericInstability(
                "Softmax节点的输出含有NaN或无穷大".to_string(),
            ));
        }
        self.value = Some(value);
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        _children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        let y = cached_value(self.kind(), &self.value)?;
        let local_grad = y.map(|s| s * (1. - s));
        Ok(vec![Some(upstream.mul_element(&local_grad)?)])
    }
}
