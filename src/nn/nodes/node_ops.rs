/*
 * @Description  : 构建计算图的各类节点。构建本身不做任何计算（也就不会检查形状），
 *                 形状等问题会在第一次前向计算时以错误的形式报告。
 */

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::Node;
use super::raw_node::{
    Add, ColSlice, ColSum, Conv, CrossEntropyLoss, DEFAULT_RELU_LEAK, DEFAULT_TANH_GRAD_EPS, Div,
    Dropout, GradThreshold, HConcat, Log, MSELoss, Multi, MultiElement, Pool, ReLU, Reshape,
    RowSlice, RowSum, Scale, Sigmoid, Softmax, Sub, Tanh, Trans, VConcat, ValueThreshold,
};

impl Node {
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓二元算子↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    /// x + y
    pub fn add(x: &impl AsRef<Self>, y: &impl AsRef<Self>) -> Self {
        Self::from_raw(Add::new(x.as_ref(), y.as_ref()))
    }

    /// x - y
    pub fn sub(x: &impl AsRef<Self>, y: &impl AsRef<Self>) -> Self {
        Self::from_raw(Sub::new(x.as_ref(), y.as_ref()))
    }

    /// 矩阵乘法 x · y
    pub fn multi(x: &impl AsRef<Self>, y: &impl AsRef<Self>) -> Self {
        Self::from_raw(Multi::new(x.as_ref(), y.as_ref()))
    }

    /// 逐元素相乘 x ⊙ y
    pub fn multi_element(x: &impl AsRef<Self>, y: &impl AsRef<Self>) -> Self {
        Self::from_raw(MultiElement::new(x.as_ref(), y.as_ref()))
    }

    /// 逐元素相除 x ⊘ y
    pub fn div(x: &impl AsRef<Self>, y: &impl AsRef<Self>) -> Self {
        Self::from_raw(Div::new(x.as_ref(), y.as_ref()))
    }

    /// 横向拼接 [x | y]
    pub fn hconcat(x: &impl AsRef<Self>, y: &impl AsRef<Self>) -> Self {
        Self::from_raw(HConcat::new(x.as_ref(), y.as_ref()))
    }

    /// 纵向拼接，x在上
    pub fn vconcat(x: &impl AsRef<Self>, y: &impl AsRef<Self>) -> Self {
        Self::from_raw(VConcat::new(x.as_ref(), y.as_ref()))
    }

    /// 以`kernel`为卷积核对x做“same”填充的2D卷积
    pub fn conv(x: &impl AsRef<Self>, kernel: &impl AsRef<Self>, stride: usize) -> Self {
        Self::from_raw(Conv::new(x.as_ref(), kernel.as_ref(), stride))
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑二元算子↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓一元算子↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    pub fn log(x: &impl AsRef<Self>) -> Self {
        Self::from_raw(Log::new(x.as_ref()))
    }

    pub fn trans(x: &impl AsRef<Self>) -> Self {
        Self::from_raw(Trans::new(x.as_ref()))
    }

    pub fn reshape(x: &impl AsRef<Self>, rows: usize, cols: usize) -> Self {
        Self::from_raw(Reshape::new(x.as_ref(), rows, cols))
    }

    /// 取第[start, end)行
    pub fn row_slice(x: &impl AsRef<Self>, start: usize, end: usize) -> Self {
        Self::from_raw(RowSlice::new(x.as_ref(), start, end))
    }

    /// 取第[start, end)列
    pub fn col_slice(x: &impl AsRef<Self>, start: usize, end: usize) -> Self {
        Self::from_raw(ColSlice::new(x.as_ref(), start, end))
    }

    pub fn row_sum(x: &impl AsRef<Self>) -> Self {
        Self::from_raw(RowSum::new(x.as_ref()))
    }

    pub fn col_sum(x: &impl AsRef<Self>) -> Self {
        Self::from_raw(ColSum::new(x.as_ref()))
    }

    /// k · x
    pub fn scale(x: &impl AsRef<Self>, factor: f64) -> Self {
        Self::from_raw(Scale::new(x.as_ref(), factor))
    }

    /// 把x截断到[-threshold, threshold]
    pub fn value_threshold(x: &impl AsRef<Self>, threshold: f64) -> Self {
        Self::from_raw(ValueThreshold::new(x.as_ref(), threshold))
    }

    /// 前向恒等；反向时范数小于`threshold`的梯度不再向下传播
    pub fn grad_threshold(x: &impl AsRef<Self>, threshold: f64) -> Self {
        Self::from_raw(GradThreshold::new(x.as_ref(), threshold))
    }

    /// 窗口为`height`×`width`、步长为`stride`的最大池化
    pub fn pool(x: &impl AsRef<Self>, width: usize, height: usize, stride: usize) -> Self {
        Self::from_raw(Pool::new(x.as_ref(), width, height, stride))
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑一元算子↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓激活函数↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    pub fn sigmoid(x: &impl AsRef<Self>) -> Self {
        Self::from_raw(Sigmoid::new(x.as_ref()))
    }

    /// 使用默认泄漏值`DEFAULT_RELU_LEAK`的ReLU
    pub fn relu(x: &impl AsRef<Self>) -> Self {
        Self::relu_with(x, DEFAULT_RELU_LEAK)
    }

    pub fn relu_with(x: &impl AsRef<Self>, leak: f64) -> Self {
        Self::from_raw(ReLU::new(x.as_ref(), leak))
    }

    /// 使用默认梯度稳定项`DEFAULT_TANH_GRAD_EPS`的Tanh
    pub fn tanh(x: &impl AsRef<Self>) -> Self {
        Self::tanh_with(x, DEFAULT_TANH_GRAD_EPS)
    }

    pub fn tanh_with(x: &impl AsRef<Self>, grad_eps: f64) -> Self {
        Self::from_raw(Tanh::new(x.as_ref(), grad_eps))
    }

    pub fn softmax(x: &impl AsRef<Self>) -> Self {
        Self::from_raw(Softmax::new(x.as_ref()))
    }

    /// 每个元素以`keep_prob`的概率被保留，随机源取自系统熵
    pub fn dropout(x: &impl AsRef<Self>, keep_prob: f64) -> Self {
        Self::from_raw(Dropout::new(x.as_ref(), keep_prob, StdRng::from_entropy()))
    }

    /// 与`dropout`相同，但随机源由`seed`确定，便于复现
    pub fn dropout_seeded(x: &impl AsRef<Self>, keep_prob: f64, seed: u64) -> Self {
        Self::from_raw(Dropout::new(
            x.as_ref(),
            keep_prob,
            StdRng::seed_from_u64(seed),
        ))
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑激活函数↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓损失函数↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    pub fn mse_loss(input: &impl AsRef<Self>, target: &impl AsRef<Self>) -> Self {
        Self::from_raw(MSELoss::new(input.as_ref(), target.as_ref()))
    }

    pub fn cross_entropy_loss(input: &impl AsRef<Self>, target: &impl AsRef<Self>) -> Self {
        Self::from_raw(CrossEntropyLoss::new(input.as_ref(), target.as_ref()))
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑损失函数↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
}
