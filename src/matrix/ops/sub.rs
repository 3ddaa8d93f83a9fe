/*
 * @Description  : 矩阵的减法与取负。两矩阵相减要求形状严格一致，不支持广播。
 */

use std::ops::{Neg, Sub};

use super::add::check_same_shape;
use crate::errors::{MatrixError, Operator};
use crate::matrix::Matrix;

impl Matrix {
    /// 逐元素相减（self - other），两矩阵形状须严格一致
    pub fn sub(&self, other: &Self) -> Result<Self, MatrixError> {
        check_same_shape(self, other, Operator::Sub)?;
        Ok(Self::from_array(self.array() - other.array()))
    }

    /// 每个元素取相反数
    pub fn negate(&self) -> Self {
        Self::from_array(-self.array())
    }
}

impl Neg for Matrix {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}
impl Neg for &Matrix {
    type Output = Matrix;

    fn neg(self) -> Matrix {
        self.negate()
    }
}

impl Sub<f64> for &Matrix {
    type Output = Matrix;

    fn sub(self, scalar: f64) -> Matrix {
        Matrix::from_array(self.array() - scalar)
    }
}

impl<'a> Sub<&'a Matrix> for &'a Matrix {
    type Output = Matrix;

    fn sub(self, other: &'a Matrix) -> Matrix {
        match Matrix::sub(self, other) {
            Ok(result) => result,
            Err(e) => panic!("{}", e),
        }
    }
}
