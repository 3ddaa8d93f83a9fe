mod loss;
mod ops;
mod variable;

pub(in crate::nn) use loss::*;
pub(in crate::nn) use ops::*;
pub use ops::{DEFAULT_RELU_LEAK, DEFAULT_TANH_GRAD_EPS};
pub(in crate::nn) use variable::Variable;

use enum_dispatch::enum_dispatch;

use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::nodes::Node;

#[enum_dispatch]
#[derive(Debug)]
pub(in crate::nn) enum NodeType {
    Variable(Variable),
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓算子↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    Add(Add),
    Sub(Sub),
    Multi(Multi),
    MultiElement(MultiElement),
    Div(Div),
    Log(Log),
    Trans(Trans),
    Reshape(Reshape),
    HConcat(HConcat),
    VConcat(VConcat),
    RowSlice(RowSlice),
    ColSlice(ColSlice),
    RowSum(RowSum),
    ColSum(ColSum),
    Scale(Scale),
    ValueThreshold(ValueThreshold),
    GradThreshold(GradThreshold),
    Pool(Pool),
    Conv(Conv),
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑算子↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓激活↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    Sigmoid(Sigmoid),
    ReLU(ReLU),
    Tanh(Tanh),
    Dropout(Dropout),
    Softmax(Softmax),
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑激活↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓损失↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    MSELoss(MSELoss),
    CrossEntropyLoss(CrossEntropyLoss),
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑损失↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
}

#[enum_dispatch(NodeType)]
pub(in crate::nn) trait TraitNode {
    /// 节点类型名，用于日志和错误信息
    fn kind(&self) -> &'static str;

    /// 本节点的输入（子节点）。叶子节点返回空切片
    fn children(&self) -> &[Node];

    /// 最近一次前向计算缓存的值
    fn value(&self) -> Option<&Matrix>;

    fn clear_value(&mut self);

    // 根据子节点的值计算本节点的值并缓存（注意：调用方保证`children`与`self.children()`一一对应且均已计算）
    fn calc_value_by_children(&mut self, children: &[Matrix]) -> Result<(), GraphError>;

    /// 根据上游梯度`upstream`计算传给每个子节点的梯度，返回值与`children`一一对应。
    /// `None`表示不向该子节点继续传播。
    /// 损失节点收到的`upstream`恒为1×1的全1矩阵。
    fn calc_grads_to_children(
        &self,
        children: &[Matrix],
        upstream: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, GraphError>;

    /// 损失节点是反向传播的起点，不接受外部传入的上游梯度
    fn is_loss(&self) -> bool {
        false
    }
}

/// 取出节点缓存的值；反向传播前调用方已保证前向计算完成，所以这里出错说明crate代码有问题
pub(in crate::nn::nodes::raw_node) fn cached_value<'a>(
    kind: &str,
    value: &'a Option<Matrix>,
) -> Result<&'a Matrix, GraphError> {
    value.as_ref().ok_or_else(|| {
        GraphError::ComputationError(format!(
            "{kind}节点没有值。不该触及本错误，否则说明crate代码有问题"
        ))
    })
}
