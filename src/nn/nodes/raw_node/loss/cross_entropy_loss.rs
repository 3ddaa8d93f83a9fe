use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::TraitNode;

/// 交叉熵损失节点，input通常是Softmax的输出（每行为一个概率分布），target为one-hot矩阵
///
/// ## 公式
/// `CE = -Σ log(input[r][c]) / rows`，只对target[r][c] == 1的位置求和
///
/// ## 梯度
/// - `∂L/∂input`：target为1的位置是`-1 / input`，其余位置是`1 / (1 - input)`，再整体除以rows
/// - target不参与求导，不向其传播梯度
/// - 非目标位置的输入为1时梯度为无穷大，报`NumericInstability`
///
/// 注：非目标位置的梯度项来自把每个输出看作独立的二分类，
/// 它与Softmax节点的对角梯度相乘后恰好得到`(softmax - target) / rows`。
///
/// ## 输出
/// - 标量损失值 [1, 1]
#[derive(Debug)]
pub(in crate::nn) struct CrossEntropyLoss {
    children: Vec<Node>,
    value: Option<Matrix>,
}

impl CrossEntropyLoss {
    pub(in crate::nn) fn new(input: &Node, target: &Node) -> Self {
        Self {
            children: vec![input.clone(), target.clone()],
            value: None,
        }
    }

    fn check_shapes(input: &Matrix, target: &Matrix) -> Result<(), GraphError> {
        if input.is_same_shape(target) {
            Ok(())
        } else {
            Err(GraphError::ShapeMismatch {
                expected: input.shape(),
                got: target.shape(),
                message: "CrossEntropyLoss节点的input与target形状必须一致".to_string(),
            })
        }
    }
}

impl TraitNode for CrossEntropyLoss {
    fn kind(&self) -> &'static str {
        "CrossEntropyLoss"
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
        let (input, target) = (&children[0], &children[1]);
        Self::check_shapes(input, target)?;

        let sum: f64 = input
            .data()
            .iter()
            .zip(target.data())
            .filter(|&(_, &t)| t == 1.)
            .map(|(&x, _)| x.ln())
            .sum();
        let loss = -sum / input.rows() as f64;
        if !loss.is_finite() {
            return Err(GraphError::NumericInstability(
                "CrossEntropyLoss节点在目标位置的输入必须为正数".to_string(),
            ));
        }
        self.value = Some(Matrix::constant(1, 1, loss));
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        let (input, target) = (&children[0], &children[1]);
        Self::check_shapes(input, target)?;

        let factor = upstream.get(0, 0) / input.rows() as f64;
        let data = input
            .data()
            .iter()
            .zip(target.data())
            .map(|(&x, &t)| {
                if t == 1. {
                    -factor / x
                } else {
                    factor / (1. - x)
                }
            })
            .collect();
        let d_input = Matrix::try_new(data, input.rows(), input.cols())?;
        if !d_input.all_finite() {
            return Err(GraphError::NumericInstability(
                "CrossEntropyLoss节点在非目标位置的输入必须小于1".to_string(),
            ));
        }
        Ok(vec![Some(d_input), None])
    }

    fn is_loss(&self) -> bool {
        true
    }
}
