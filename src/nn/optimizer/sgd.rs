use log::debug;

use super::{Optimizer, check_batch_size};
use crate::matrix::Matrix;
use crate::nn::{GraphError, Variable};

/// 带动量的随机梯度下降
///
/// - velocity = m · velocity + (1 - m) · g
/// - θ = θ - α · velocity
///
/// 其中 g 为本批次梯度的均值；m = 0 时即为普通的SGD。
pub struct SGD {
    /// 要优化的参数
    params: Vec<Variable>,
    /// 学习率
    lr: f64,
    /// 动量系数
    momentum: f64,
    /// 每个参数的速度（与`params`一一对应）
    velocities: Vec<Matrix>,
}

impl SGD {
    /// 创建新的 SGD 优化器
    ///
    /// # 参数
    /// - `params`: 要优化的参数列表
    /// - `lr`: 学习率
    /// - `momentum`: 动量系数，取值[0, 1)
    pub fn new(params: &[Variable], lr: f64, momentum: f64) -> Self {
        let velocities = zeros_like(params);
        Self {
            params: params.to_vec(),
            lr,
            momentum,
            velocities,
        }
    }

    pub const fn momentum(&self) -> f64 {
        self.momentum
    }
}

impl Optimizer for SGD {
    fn step(&mut self, batch_size: usize) -> Result<(), GraphError> {
        check_batch_size(batch_size)?;
        let mean_factor = 1. / batch_size as f64;
        for (param, velocity) in self.params.iter().zip(&mut self.velocities) {
            let grad = param.gradient().scale(mean_factor);
            *velocity = velocity
                .scale(self.momentum)
                .add(&grad.scale(1. - self.momentum))?;
            let new_value = param.value().sub(&velocity.scale(self.lr))?;
            param.set_value(new_value)?;
        }
        debug!("SGD完成一次更新（批大小{batch_size}，学习率{}）", self.lr);
        Ok(())
    }

    fn reset(&mut self) {
        self.velocities = zeros_like(&self.params);
    }

    fn learning_rate(&self) -> f64 {
        self.lr
    }

    fn set_learning_rate(&mut self, lr: f64) {
        self.lr = lr;
    }

    fn params(&self) -> &[Variable] {
        &self.params
    }
}

/// 为每个参数生成同形状的全零矩阵
pub(super) fn zeros_like(params: &[Variable]) -> Vec<Matrix> {
    params
        .iter()
        .map(|p| {
            let (rows, cols) = p.shape();
            Matrix::zeros(rows, cols)
        })
        .collect()
}
