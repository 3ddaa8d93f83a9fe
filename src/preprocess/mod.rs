//! 数据预处理：按列分组的缩放器（`Scaler`）与按行分段的L2归一化器（`L2Normalizer`）
//!
//! 同一组内的列共享统计量（最小/最大值、均值/标准差或L2范数），
//! 未被任何组包含的列原样保留。

mod normalizer;
mod scaler;


pub use normalizer::L2Normalizer;
pub use scaler::{AnyScaler, MinMaxScaler, Scaler, ZScoreScaler};

use thiserror::Error;

/// 预处理相关错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PreprocessError {
    /// 分组中的列号超出数据维度
    #[error("列号越界: {column} >= {dim}")]
    ColumnOutOfRange { column: usize, dim: usize },

    /// 数据的列数与预处理器的维度不符
    #[error("维度不匹配: 期望 {expected} 列, 实际 {got} 列")]
    DimensionMismatch { expected: usize, got: usize },

    /// 行数据的长度不是分段宽度的整数倍
    #[error("第{row}行数据长度{len}不是分段宽度{dim}的整数倍")]
    SegmentLength { row: usize, len: usize, dim: usize },

    /// 用于拟合的数据为空
    #[error("无法用空数据拟合缩放器")]
    EmptyData,
}

/// 检查每个分组中的列号都小于`dim`
fn check_groups(dim: usize, groups: &[Vec<usize>]) -> Result<(), PreprocessError> {
    match groups.iter().flatten().find(|&&column| column >= dim) {
        Some(&column) => Err(PreprocessError::ColumnOutOfRange { column, dim }),
        None => Ok(()),
    }
}
