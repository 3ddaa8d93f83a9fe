use crate::errors::{MatrixError, Operator};
use crate::matrix::Matrix;

impl Matrix {
    /// 实现矩阵乘法。
    /// 需要保证前一个矩阵的列数等于后一个矩阵的行数，否则返回错误。
    pub fn mat_mul(&self, other: &Self) -> Result<Self, MatrixError> {
        if self.cols() != other.rows() {
            return Err(MatrixError::ShapeMismatch {
                operator: Operator::MatMul,
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(Self::from_array(self.array().dot(other.array())))
    }
}
