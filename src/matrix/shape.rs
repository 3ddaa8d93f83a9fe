/*
 * @Description  : 与矩阵形状相关的运算：转置、变形、行/列切片、横向/纵向拼接以及按行/列求和。
 */

use ndarray::{Array2, Axis, s};

use crate::errors::{MatrixAxis, MatrixError, Operator};
use crate::matrix::Matrix;

impl Matrix {
    /// 转置
    pub fn trans(&self) -> Self {
        Self::from_array(self.array().t().to_owned())
    }

    /// 保持行优先的元素顺序不变，将矩阵变形为`rows`×`cols`
    pub fn reshape(&self, rows: usize, cols: usize) -> Result<Self, MatrixError> {
        if rows * cols != self.len() {
            return Err(MatrixError::IncompatibleReshape {
                from: self.shape(),
                to: (rows, cols),
            });
        }
        Self::try_new(self.to_vec(), rows, cols)
    }

    /// 取第[start, end)行，返回(end-start)×cols的新矩阵
    pub fn row_slice(&self, start: usize, end: usize) -> Result<Self, MatrixError> {
        check_range(MatrixAxis::Row, start, end, self.rows())?;
        Ok(Self::from_array(
            self.array().slice(s![start..end, ..]).to_owned(),
        ))
    }

    /// 取第[start, end)列，返回rows×(end-start)的新矩阵
    pub fn col_slice(&self, start: usize, end: usize) -> Result<Self, MatrixError> {
        check_range(MatrixAxis::Col, start, end, self.cols())?;
        Ok(Self::from_array(
            self.array().slice(s![.., start..end]).to_owned(),
        ))
    }

    /// 横向拼接：`[self | other]`，两者行数须相同
    pub fn hconcat(&self, other: &Self) -> Result<Self, MatrixError> {
        if self.rows() != other.rows() {
            return Err(self.concat_error(other, Operator::HConcat));
        }
        self.concat(other, Axis(1), Operator::HConcat)
    }

    /// 纵向拼接：`self`在上，`other`在下，两者列数须相同
    pub fn vconcat(&self, other: &Self) -> Result<Self, MatrixError> {
        if self.cols() != other.cols() {
            return Err(self.concat_error(other, Operator::VConcat));
        }
        self.concat(other, Axis(0), Operator::VConcat)
    }

    /// 每行求和，得到rows×1的列向量
    pub fn row_sum(&self) -> Self {
        Self::from_array(self.array().sum_axis(Axis(1)).insert_axis(Axis(1)))
    }

    /// 每列求和，得到1×cols的行向量
    pub fn col_sum(&self) -> Self {
        Self::from_array(self.array().sum_axis(Axis(0)).insert_axis(Axis(0)))
    }

    fn concat(&self, other: &Self, axis: Axis, operator: Operator) -> Result<Self, MatrixError> {
        let joined: Array2<f64> =
            ndarray::concatenate(axis, &[self.array().view(), other.array().view()])
                .map_err(|_| self.concat_error(other, operator))?;
        Ok(Self::from_array(joined))
    }

    fn concat_error(&self, other: &Self, operator: Operator) -> MatrixError {
        MatrixError::ShapeMismatch {
            operator,
            left: self.shape(),
            right: other.shape(),
        }
    }
}

fn check_range(axis: MatrixAxis, start: usize, end: usize, extent: usize) -> Result<(), MatrixError> {
    if start < end && end <= extent {
        Ok(())
    } else {
        Err(MatrixError::InvalidRange {
            axis,
            start,
            end,
            extent,
        })
    }
}
