use log::debug;

use super::sgd::zeros_like;
use super::{Optimizer, check_batch_size};
use crate::matrix::Matrix;
use crate::nn::{GraphError, Variable};

/// Adam 优化器
///
/// Adam: Adaptive Moment Estimation
/// - m = β1 * m + (1 - β1) * g
/// - v = β2 * v + (1 - β2) * g²
/// - `m_hat` = m / (1 - β1^T)，`v_hat` = v / (1 - β2^T)
/// - θ = θ - α * `m_hat` / (√`v_hat` + ε)
///
/// 时间步 T 从1开始，每次`step`后加1。
pub struct Adam {
    /// 要优化的参数
    params: Vec<Variable>,
    /// 学习率
    lr: f64,
    /// β1 (一阶矩衰减)
    beta1: f64,
    /// β2 (二阶矩衰减)
    beta2: f64,
    /// 数值稳定项
    epsilon: f64,
    /// 一阶矩估计（与`params`一一对应）
    m: Vec<Matrix>,
    /// 二阶矩估计（与`params`一一对应）
    v: Vec<Matrix>,
    /// 时间步
    t: i32,
}

impl Adam {
    /// 创建带完整配置的Adam优化器
    pub fn new(params: &[Variable], lr: f64, beta1: f64, beta2: f64, epsilon: f64) -> Self {
        Self {
            params: params.to_vec(),
            lr,
            beta1,
            beta2,
            epsilon,
            m: zeros_like(params),
            v: zeros_like(params),
            t: 1,
        }
    }

    /// 使用默认参数（β1 = 0.9，β2 = 0.999，ε = 1e-8）创建Adam优化器
    pub fn new_default(params: &[Variable], lr: f64) -> Self {
        Self::new(params, lr, 0.9, 0.999, 1e-8)
    }

    /// 获取当前时间步
    pub const fn timestep(&self) -> i32 {
        self.t
    }
}

impl Optimizer for Adam {
    fn step(&mut self, batch_size: usize) -> Result<(), GraphError> {
        check_batch_size(batch_size)?;
        let mean_factor = 1. / batch_size as f64;
        let (beta1, beta2, epsilon) = (self.beta1, self.beta2, self.epsilon);
        let m_correction = 1. - beta1.powi(self.t);
        let v_correction = 1. - beta2.powi(self.t);

        for ((param, m), v) in self.params.iter().zip(&mut self.m).zip(&mut self.v) {
            let grad = param.gradient().scale(mean_factor);

            // 更新一阶矩与二阶矩
            *m = m.scale(beta1).add(&grad.scale(1. - beta1))?;
            let grad_squared = grad.mul_element(&grad)?;
            *v = v.scale(beta2).add(&grad_squared.scale(1. - beta2))?;

            // 偏差修正后更新参数
            let m_hat = m.scale(1. / m_correction);
            let v_hat = v.scale(1. / v_correction);
            let denom = v_hat.map(|x| x.sqrt() + epsilon);
            let update = m_hat.div_element(&denom)?;
            let new_value = param.value().sub(&update.scale(self.lr))?;
            param.set_value(new_value)?;
        }
        debug!("Adam完成第{}步更新（批大小{batch_size}）", self.t);
        self.t += 1;
        Ok(())
    }

    fn reset(&mut self) {
        self.m = zeros_like(&self.params);
        self.v = zeros_like(&self.params);
        self.t = 1;
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
