/*
 * @Description  : 矩阵的加法，实现了两个形状严格一致的矩阵“逐元素”相加，并返回一个新的矩阵。
 *                 不支持广播：形状不一致时`add`返回错误，运算符`+`（仅对引用实现）则直接panic。
 *                 另外还实现了矩阵与纯数相加（每个元素都加上该纯数）。
 */

use std::ops::Add;

use crate::errors::{MatrixError, Operator};
use crate::matrix::Matrix;

impl Matrix {
    /// 逐元素相加，两矩阵形状须严格一致
    pub fn add(&self, other: &Self) -> Result<Self, MatrixError> {
        check_same_shape(self, other, Operator::Add)?;
        Ok(Self::from_array(self.array() + other.array()))
    }
}

/// 二元逐元素运算前的形状检查，供加减乘除共用
pub(in crate::matrix) fn check_same_shape(
    left: &Matrix,
    right: &Matrix,
    operator: Operator,
) -> Result<(), MatrixError> {
    if left.is_same_shape(right) {
        Ok(())
    } else {
        Err(MatrixError::ShapeMismatch {
            operator,
            left: left.shape(),
            right: right.shape(),
        })
    }
}

// 只为引用实现运算符：按值的版本会在方法调用`matrix.add(&other)`时与上面返回`Result`的同名方法冲突
impl Add<f64> for &Matrix {
    type Output = Matrix;

    fn add(self, scalar: f64) -> Matrix {
        Matrix::from_array(self.array() + scalar)
    }
}

impl<'a> Add<&'a Matrix> for &'a Matrix {
    type Output = Matrix;

    fn add(self, other: &'a Matrix) -> Matrix {
        match Matrix::add(self, other) {
            Ok(result) => result,
            Err(e) => panic!("{}", e),
        }
    }
}
