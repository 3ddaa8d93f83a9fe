/*
 * @Description  : 稠密二维矩阵（行优先存储），计算图中所有节点的值与梯度都用它表示。
 *                 约定：任何代数运算都返回新的矩阵，不会原地修改调用者的数据。
 */

use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::MatrixError;

mod ops {
    pub mod add;
    pub mod div;
    pub mod mat_mul;
    pub mod mul;
    pub mod sub;
}

mod print;
mod property;
mod shape;

#[cfg(test)]
mod tests;

/// 定义矩阵的结构体，固定为2阶（行数×列数）。
/// 注：内部数据始终保持行优先（standard layout）的连续内存布局，
/// 所以`data()`返回的切片与`{rows, cols, data}`这一序列化形式一一对应。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatrixRepr", into = "MatrixRepr")]
pub struct Matrix {
    data: Array2<f64>,
}

/// 矩阵的持久化形式：`{rows, cols, data}`
#[derive(Serialize, Deserialize)]
struct MatrixRepr {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl TryFrom<MatrixRepr> for Matrix {
    type Error = MatrixError;

    fn try_from(repr: MatrixRepr) -> Result<Self, Self::Error> {
        Self::try_new(repr.data, repr.rows, repr.cols)
    }
}

impl From<Matrix> for MatrixRepr {
    fn from(matrix: Matrix) -> Self {
        Self {
            rows: matrix.rows(),
            cols: matrix.cols(),
            data: matrix.to_vec(),
        }
    }
}

impl Matrix {
    /// 用`data`按行优先顺序创建一个`rows`×`cols`的矩阵。
    /// `data`的长度必须等于`rows * cols`，否则会panic（属于调用方的编程错误）。
    pub fn new(data: &[f64], rows: usize, cols: usize) -> Self {
        match Self::try_new(data.to_vec(), rows, cols) {
            Ok(matrix) => matrix,
            Err(e) => panic!("{}", e),
        }
    }

    /// 与`new`相同，但长度不符时返回错误而不是panic
    pub fn try_new(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self, MatrixError> {
        if data.len() != rows * cols {
            return Err(MatrixError::DataLength {
                rows,
                cols,
                len: data.len(),
            });
        }
        let data = Array2::from_shape_vec((rows, cols), data).map_err(|_| {
            MatrixError::DataLength {
                rows,
                cols,
                len: rows * cols,
            }
        })?;
        Ok(Self { data })
    }

    /// 创建所有元素均为`value`的矩阵
    pub fn constant(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), value),
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::constant(rows, cols, 0.)
    }

    pub fn ones(rows: usize, cols: usize) -> Self {
        Self::constant(rows, cols, 1.)
    }

    /// 按(行, 列)坐标逐元素生成矩阵
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        Self {
            data: Array2::from_shape_fn((rows, cols), |(r, c)| f(r, c)),
        }
    }

    /// 用随机数生成器逐元素生成矩阵，`f`决定每个元素如何从`rng`中抽取
    pub fn random_with<R, F>(rows: usize, cols: usize, rng: &mut R, mut f: F) -> Self
    where
        R: Rng + ?Sized,
        F: FnMut(&mut R) -> f64,
    {
        Self::from_fn(rows, cols, |_, _| f(&mut *rng))
    }

    /// 包装一个ndarray数组，必要时转换为行优先布局
    pub(crate) fn from_array(data: Array2<f64>) -> Self {
        if data.is_standard_layout() {
            Self { data }
        } else {
            Self {
                data: data.as_standard_layout().into_owned(),
            }
        }
    }

    pub(crate) const fn array(&self) -> &Array2<f64> {
        &self.data
    }
}
