/*
 * @Description  : 2D 卷积节点（单通道矩阵，“same”填充）
 *
 * 父节点：
 * - children[0]: 输入数据，形状 [H, W]
 * - children[1]: 卷积核参数，形状 [kH, kW]
 *
 * 输出形状：[⌈H / 步长⌉, ⌈W / 步长⌉]
 * 每个方向的总填充量为 max((out - 1) * 步长 + k - in, 0)，其中较小的一半填在上/左侧。
 * 这里和主流框架一样实现的是互相关（不翻转卷积核）。
 */

use rayon::prelude::*;

use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::TraitNode;

#[derive(Debug)]
pub(in crate::nn) struct Conv {
    children: Vec<Node>,
    value: Option<Matrix>,
    stride: usize,
}

/// 一次卷积运算所需的几何信息
#[derive(Debug, Clone, Copy)]
struct ConvGeometry {
    in_h: usize,
    in_w: usize,
    k_h: usize,
    k_w: usize,
    out_h: usize,
    out_w: usize,
    pad_top: usize,
    pad_left: usize,
    stride: usize,
}

impl ConvGeometry {
    fn new(input: &Matrix, kernel: &Matrix, stride: usize) -> Result<Self, GraphError> {
        if stride == 0 {
            return Err(GraphError::InvalidOperation(
                "Conv节点的步长必须为正数".to_string(),
            ));
        }
        let (in_h, in_w) = input.shape();
        let (k_h, k_w) = kernel.shape();
        if k_h == 0 || k_w == 0 {
            return Err(GraphError::ShapeMismatch {
                expected: (1, 1),
                got: (k_h, k_w),
                message: "Conv节点的卷积核不能为空".to_string(),
            });
        }
        let out_h = in_h.div_ceil(stride);
        let out_w = in_w.div_ceil(stride);
        let pad_h = ((out_h.saturating_sub(1)) * stride + k_h).saturating_sub(in_h);
        let pad_w = ((out_w.saturating_sub(1)) * stride + k_w).saturating_sub(in_w);
        Ok(Self {
            in_h,
            in_w,
            k_h,
            k_w,
            out_h,
            out_w,
            pad_top: pad_h / 2,
            pad_left: pad_w / 2,
            stride,
        })
    }

    /// 输出位置(oi, oj)与卷积核位置(a, b)对应的输入坐标；落在填充区时返回None
    fn input_pos(&self, oi: usize, oj: usize, a: usize, b: usize) -> Option<(usize, usize)> {
        let r = (oi * self.stride + a).checked_sub(self.pad_top)?;
        let c = (oj * self.stride + b).checked_sub(self.pad_left)?;
        (r < self.in_h && c < self.in_w).then_some((r, c))
    }
}

impl Conv {
    pub(in crate::nn) fn new(x: &Node, kernel: &Node, stride: usize) -> Self {
        Self {
            children: vec![x.clone(), kernel.clone()],
            value: None,
            stride,
        }
    }
}

impl TraitNode for Conv {
    fn kind(&self) -> &'static str {
        "Conv"
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
        let (input, kernel) = (&children[0], &children[1]);
        let geo = ConvGeometry::new(input, kernel, self.stride)?;

        // Rayon 并行计算每一行输出
        let row_results: Vec<Vec<f64>> = (0..geo.out_h)
            .into_par_iter()
            .map(|oi| {
                (0..geo.out_w)
                    .map(|oj| {
                        let mut sum = 0.;
                        for a in 0..geo.k_h {
                            for b in 0..geo.k_w {
                                if let Some((r, c)) = geo.input_pos(oi, oj, a, b) {
                                    sum += input.get(r, c) * kernel.get(a, b);
                                }
                            }
                        }
                        sum
                    })
                    .collect()
            })
            .collect();

        let all_data: Vec<f64> = row_results.into_iter().flatten().collect();
        self.value = Some(Matrix::try_new(all_data, geo.out_h, geo.out_w)?);
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        let (input, kernel) = (&children[0], &children[1]);
        let geo = ConvGeometry::new(input, kernel, self.stride)?;

        // 对输入的梯度：把每个输出位置的梯度按卷积核权重散回到对应的输入位置
        let mut dx = vec![0.; geo.in_h * geo.in_w];
        for oi in 0..geo.out_h {
            for oj in 0..geo.out_w {
                let g = upstream.get(oi, oj);
                for a in 0..geo.k_h {
                    for b in 0..geo.k_w {
                        if let Some((r, c)) = geo.input_pos(oi, oj, a, b) {
                            dx[r * geo.in_w + c] += g * kernel.get(a, b);
                        }
                    }
                }
            }
        }

        // 对卷积核的梯度：每个卷积核元素相互独立，Rayon 并行
        let dk: Vec<f64> = (0..geo.k_h * geo.k_w)
            .into_par_iter()
            .map(|idx| {
                let (a, b) = (idx / geo.k_w, idx % geo.k_w);
                let mut sum = 0.;
                for oi in 0..geo.out_h {
                    for oj in 0..geo.out_w {
                        if let Some((r, c)) = geo.input_pos(oi, oj, a, b) {
                            sum += upstream.get(oi, oj) * input.get(r, c);
                        }
                    }
                }
                sum
            })
            .collect();

        Ok(vec![
            Some(Matrix::try_new(dx, geo.in_h, geo.in_w)?),
            Some(Matrix::try_new(dk, geo.k_h, geo.k_w)?),
        ])
    }
}
