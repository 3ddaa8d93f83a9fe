/*
 * @Description  : 矩阵的“逐元素”相乘（哈达玛积）以及矩阵与纯数的数乘。
 *                 注意：运算符`*`在这里只表示数乘，矩阵乘法请用`mat_mul`。
 */

use std::ops::Mul;

use super::add::check_same_shape;
use crate::errors::{MatrixError, Operator};
use crate::matrix::Matrix;

impl Matrix {
    /// 逐元素相乘，两矩阵形状须严格一致
    pub fn mul_element(&self, other: &Self) -> Result<Self, MatrixError> {
        check_same_shape(self, other, Operator::MulElement)?;
        Ok(Self::from_array(self.array() * other.array()))
    }

    /// 每个元素乘以`factor`
    pub fn scale(&self, factor: f64) -> Self {
        Self::from_array(self.array() * factor)
    }
}

impl Mul<f64> for Matrix {
    type Output = Self;

    fn mul(self, factor: f64) -> Self {
        self.scale(factor)
    }
}
impl Mul<f64> for &Matrix {
    type Output = Matrix;

    fn mul(self, factor: f64) -> Matrix {
        self.scale(factor)
    }
}
impl Mul<Matrix> for f64 {
    type Output = Matrix;

    fn mul(self, matrix: Matrix) -> Matrix {
        matrix.scale(self)
    }
}
impl<'a> Mul<&'a Matrix> for f64 {
    type Output = Matrix;

    fn mul(self, matrix: &'a Matrix) -> Matrix {
        matrix.scale(self)
    }
}
