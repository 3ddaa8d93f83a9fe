/*
 * @Description  : 计算图中的各类算子与激活函数节点。
 *                 每个节点只负责自身的前向公式和对各子节点的局部梯度，缓存与递归由`Node`统一处理。
 */

mod add;
mod concat;
mod conv2d;
mod divide;
mod dropout;
mod grad_threshold;
mod leaky_relu;
mod log;
mod mat_mul;
mod max_pool2d;
mod multiply;
mod reshape;
mod scalar_multiply;
mod sigmoid;
mod slice;
mod softmax;
mod subtract;
mod sum;
mod tanh;
mod transpose;
mod value_threshold;

pub(in crate::nn) use add::Add;
pub(in crate::nn) use concat::{HConcat, VConcat};
pub(in crate::nn) use conv2d::Conv;
pub(in crate::nn) use divide::Div;
pub(in crate::nn) use dropout::Dropout;
pub(in crate::nn) use grad_threshold::GradThreshold;
pub use leaky_relu::DEFAULT_RELU_LEAK;
pub(in crate::nn) use leaky_relu::ReLU;
pub(in crate::nn) use log::Log;
pub(in crate::nn) use mat_mul::Multi;
pub(in crate::nn) use max_pool2d::Pool;
pub(in crate::nn) use multiply::MultiElement;
pub(in crate::nn) use reshape::Reshape;
pub(in crate::nn) use scalar_multiply::Scale;
pub(in crate::nn) use sigmoid::Sigmoid;
pub(in crate::nn) use slice::{ColSlice, RowSlice};
pub(in crate::nn) use softmax::Softmax;
pub(in crate::nn) use subtract::Sub;
pub(in crate::nn) use sum::{ColSum, RowSum};
pub use tanh::DEFAULT_TANH_GRAD_EPS;
pub(in crate::nn) use tanh::Tanh;
pub(in crate::nn) use transpose::Trans;
pub(in crate::nn) use value_threshold::ValueThreshold;
