use thiserror::Error;
mod ops;
pub use self::ops::*;

/// 矩阵运算的错误类型。所有形状相关的违规都会立即报错，绝不做截断或广播。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    // 矩阵二元运算
    #[error("形状不一致，故无法{operator}：第一个矩阵的形状为{left:?}，第二个矩阵的形状为{right:?}")]
    ShapeMismatch {
        operator: Operator,
        left: (usize, usize),
        right: (usize, usize),
    },
    #[error("数据长度{len}与矩阵形状[{rows}, {cols}]不符")]
    DataLength { rows: usize, cols: usize, len: usize },
    #[error("{axis}切片范围[{start}, {end})无效，须满足 0 ≤ start < end ≤ {extent}")]
    InvalidRange {
        axis: MatrixAxis,
        start: usize,
        end: usize,
        extent: usize,
    },
    #[error("无法将形状为{from:?}的矩阵变形为{to:?}")]
    IncompatibleReshape {
        from: (usize, usize),
        to: (usize, usize),
    },
}
