/*
 * @Description  : 参数初始化策略。所有随机初始化都从显式传入的随机数生成器中抽样，
 *                 因此给定种子即可完全复现。
 *                 对于形状为(rows, cols)的权重矩阵，约定 fan_in = rows，fan_out = cols（对应 x · W 的用法）。
 */

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::matrix::Matrix;
use crate::nn::GraphError;

/// 参数初始化策略
#[derive(Debug, Clone, PartialEq)]
pub enum Init {
    /// 常数初始化
    Constant(f64),
    /// 全零
    Zeros,
    /// 全一
    Ones,
    /// [min, max) 上的均匀分布
    Uniform { min: f64, max: f64 },
    /// 正态分布
    Normal { mean: f64, std: f64 },
    /// Xavier/Glorot 正态初始化（适用于 Sigmoid/Tanh）：std = √(2 / (fan_in + fan_out))
    XavierNormal,
    /// Xavier/Glorot 均匀初始化：limit = √(6 / (fan_in + fan_out))
    XavierUniform,
    /// Kaiming/He 正态初始化（适用于 `ReLU`）：std = √(2 / fan_in)
    KaimingNormal,
}

impl Init {
    /// 生成初始化后的矩阵（使用指定的 RNG）
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        rows: usize,
        cols: usize,
        rng: &mut R,
    ) -> Result<Matrix, GraphError> {
        let (fan_in, fan_out) = (rows.max(1) as f64, cols.max(1) as f64);
        match *self {
            Self::Constant(v) => Ok(Matrix::constant(rows, cols, v)),
            Self::Zeros => Ok(Matrix::zeros(rows, cols)),
            Self::Ones => Ok(Matrix::ones(rows, cols)),
            Self::Uniform { min, max } => uniform(rows, cols, min, max, rng),
            Self::Normal { mean, std } => normal(rows, cols, mean, std, rng),
            Self::XavierNormal => normal(rows, cols, 0., (2. / (fan_in + fan_out)).sqrt(), rng),
            Self::XavierUniform => {
                let limit = (6. / (fan_in + fan_out)).sqrt();
                uniform(rows, cols, -limit, limit, rng)
            }
            Self::KaimingNormal => normal(rows, cols, 0., (2. / fan_in).sqrt(), rng),
        }
    }

    /// 生成初始化后的矩阵（使用由`seed`确定的 RNG）
    pub fn generate_seeded(&self, rows: usize, cols: usize, seed: u64) -> Result<Matrix, GraphError> {
        self.generate_with_rng(rows, cols, &mut StdRng::seed_from_u64(seed))
    }
}

fn uniform<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    min: f64,
    max: f64,
    rng: &mut R,
) -> Result<Matrix, GraphError> {
    if !(min < max) {
        return Err(GraphError::InvalidOperation(format!(
            "均匀分布的下界必须小于上界，实际为[{min}, {max})"
        )));
    }
    Ok(Matrix::random_with(rows, cols, rng, |rng| rng.gen_range(min..max)))
}

fn normal<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    mean: f64,
    std: f64,
    rng: &mut R,
) -> Result<Matrix, GraphError> {
    let dist = Normal::new(mean, std).map_err(|e| {
        GraphError::InvalidOperation(format!("无效的正态分布参数（均值{mean}，标准差{std}）：{e}"))
    })?;
    Ok(Matrix::random_with(rows, cols, rng, |rng| dist.sample(rng)))
}
