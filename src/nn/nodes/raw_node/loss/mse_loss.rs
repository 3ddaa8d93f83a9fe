use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;
use crate::nn::nodes::raw_node::TraitNode;

/// MSE（均方误差）损失节点
///
/// 计算预测值和目标值之间的均方误差损失。
///
/// ## 公式
/// `MSE = sum((input - target)^2) / N`，N为元素总数（rows × cols）
///
/// ## 梯度
/// - `∂L/∂input = 2 * (input - target) / N`
/// - `∂L/∂target = -∂L/∂input`
///
/// ## 输入
/// - 子节点 0: input（预测值）
/// - 子节点 1: target（目标值），形状须与input一致
///
/// ## 输出
/// - 标量损失值 [1, 1]
#[derive(Debug)]
pub(in crate::nn) struct MSELoss {
    children: Vec<Node>,
    value: Option<Matrix>,
}

impl MSELoss {
    pub(in crate::nn) fn new(input: &Node, target: &Node) -> Self {
        Self {
            children: vec![input.clone(), target.clone()],
            value: None,
        }
    }
}

impl TraitNode for MSELoss {
    fn kind(&self) -> &'static str {
        "MSELoss"
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
        // 计算 diff = input - target
        let diff = children[0].sub(&children[1])?;
        let squared_sum: f64 = diff.data().iter().map(|d| d * d).sum();
        self.value = Some(Matrix::constant(1, 1, squared_sum / diff.len() as f64));
        Ok(())
    }

    fn calc_grads_to_children(
        &self,
        children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError> {
        let diff = children[0].sub(&children[1])?;
        let factor = 2. * upstream.get(0, 0) / diff.len() as f64;
        let d_input = diff.scale(factor);
        let d_target = d_input.negate();
        Ok(vec![Some(d_input), Some(d_target)])
    }

    fn is_loss(&self) -> bool {
        true
    }
}
