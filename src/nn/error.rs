use thiserror::Error;

use crate::errors::MatrixError;

/// 计算图相关操作的错误类型。
/// 这里的错误都属于“致命”错误：引擎内部不会重试，由调用方决定如何处理。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error("形状不匹配：预期{expected:?}，实际{got:?}。{message}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
        message: String,
    },
    #[error("无效操作：{0}")]
    InvalidOperation(String),
    #[error("数值不稳定：{0}")]
    NumericInstability(String),
    #[error("计算错误：{0}")]
    ComputationError(String),
}
