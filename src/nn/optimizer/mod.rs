/*
 * @Description  : 优化器模块。优化器绑定一组共享的参数变量，
 *                 每次`step`读取其中累积的梯度（先除以批大小），据此更新参数值。
 */

mod adam;
mod sgd;

pub use adam::Adam;
pub use sgd::SGD;

use crate::nn::{GraphError, Variable};

/// Optimizer trait
///
/// # 设计要点
/// - Optimizer 绑定特定参数（通过 Variable 句柄共享）
/// - `backward()` 把梯度累加到参数中（由各图实例调用）
/// - `step()` 只更新参数值，不会清零梯度；梯度的清零由图的`reset`完成
///
/// # 使用示例
/// ```ignore
/// let mut optimizer = SGD::new(&[w.clone(), b.clone()], 0.1, 0.9);
/// loss.backward(None)?;
/// optimizer.step(1)?;
/// loss.reset();
/// ```
pub trait Optimizer: Send {
    /// 用累积梯度的均值（梯度 / `batch_size`）更新参数；`batch_size`为0时报错
    fn step(&mut self, batch_size: usize) -> Result<(), GraphError>;

    /// 重置累积状态（如动量）
    fn reset(&mut self);

    /// 获取学习率
    fn learning_rate(&self) -> f64;

    /// 设置学习率
    fn set_learning_rate(&mut self, lr: f64);

    /// 优化器绑定的参数列表
    fn params(&self) -> &[Variable];
}

/// 批大小必须为正数
fn check_batch_size(batch_size: usize) -> Result<(), GraphError> {
    if batch_size == 0 {
        Err(GraphError::InvalidOperation(
            "优化器的step需要正的批大小".to_string(),
        ))
    } else {
        Ok(())
    }
}
