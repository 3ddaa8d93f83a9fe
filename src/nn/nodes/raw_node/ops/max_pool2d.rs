/*
 * @Description  : 2D 最大池化节点（单通道矩阵）
 *
 * 父节点：
 * - children[0]: 输入数据，形状 [H, W]
 *
 * 输出形状：[(H - 窗口高) / 步长 + 1, (W - 窗口宽) / 步长 + 1]
 * 前向计算时记录每个窗口最大值所在的位置，反向传播时上游梯度只流向这些位置。
 */

use rayon::prelude::*;

use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::TraitNode;

#[derive(Debug)]
pub(in crate::nn) struct Pool {
    children: Vec<Node>,
    value: Option<Matrix>,
    /// 窗口宽（列数）
    width: usize,
    /// 窗口高（行数）
    height: usize,
    stride: usize,
    /// 每个输出元素对应的最大值位置(行, 列)，按行优先顺序排列
    arg_max: Vec<(usize, usize)>,
}

impl Pool {
    pub(in crate::nn) fn new(x: &Node, width: usize, height: usize, stride: usize) -> Self {
        Self {
            children: vec![x.clone()],
            value: None,
            width,
            height,
            stride,
            arg_max: Vec::new(),
        }
    }

    fn output_shape(&self, input: &Matrix) -> Result<(usize, usize), GraphError> {
        if self.width == 0 || self.height == 0 || self.stride == 0 {
            return Err(GraphError::InvalidOperation(format!(
                "Pool节点的窗口尺寸和步长必须为正数，实际窗口为{}×{}，步长为{}",
                self.height, self.width, self.stride
            )));
        }
        let (rows, cols) = input.shape();
        if rows < self.height || cols < self.width {
            return Err(GraphError::ShapeMismatch {
                expected: (self.height, self.width),
                got: (rows, cols),
                message: "Pool节点的输入不能小于池化窗口".to_string(),
            });
        }
        Ok((
            (rows - self.height) / self.stride + 1,
            (cols - self.width) / self.stride + 1,
        ))
    }
}

impl TraitNode for Pool {
    fn kind(&self) -> &'static str {
        "Pool"
    }

    fn children(&self) -> &[Node] {
        &self.children
    }

    fn value(&self) -> Option<&Matrix> {
        self.value.as_ref()
    }

    fn clear_value(&mut self) {
        self.value = None;
        self.arg_max.clear();
    }

    fn calc_value_by_children(&mut self, children: &[Matrix]) -> Result<(), GraphError> {
        let input = &children[0];
        let (out_rows, out_cols) = self.output_shape(input)?;
        let (height, width, stride) = (self.height, self.width, self.stride);

        // Rayon 并行处理每一行输出
        let row_results: Vec<Vec<(f64, (usize, usize))>> = (0..out_rows)
            .into_par_iter()
            .map(|oi| {
                (0..out_cols)
                    .map(|oj| {
                        let (top, left) = (oi * stride, oj * stride);
                        let mut best = (input.get(top, left), (top, left));
                        for r in top..top + height {
                            for c in left..left + width {
                                let v = input.get(r, c);
                                if v > best.0 {
                                    best = (v, (r, c));
                                }
                            }
                        }
                        best
                    })
                    .collect()
            })
            .collect();

        let (data, arg_max): (Vec<f64>, Vec<(usize, usize)>) =
            row_results.into_iter().flatten().unzip();
        self.value = Some(Matrix::try_new(data, out_rows, out_cols)?);
        self.arg_max = arg_max;
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        let (rows, cols) = children[0].shape();
        let mut grad = vec![0.; rows * cols];
        // 窗口重叠时同一位置可能是多个窗口的最大值，梯度需要累加
        for (g, &(r, c)) in upstream.data().iter().zip(&self.arg_max) {
            grad[r * cols + c] += g;
        }
        Ok(vec![Some(Matrix::try_new(grad, rows, cols)?)])
    }
}
