/*
 * @Description  : 列分组缩放器。先用`fit`统计每组的参数，再用`transform`对任意行数的同维数据做变换。
 */

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use super::{PreprocessError, check_groups};
use crate::matrix::Matrix;

#[enum_dispatch]
pub trait Scaler {
    /// 统计`data`（每行一个样本）中每个列组的参数
    fn fit(&mut self, data: &Matrix) -> Result<(), PreprocessError>;
    /// 按已拟合的参数变换`data`，返回新矩阵
    fn transform(&self, data: &Matrix) -> Result<Matrix, PreprocessError>;
}

/// 可持久化的缩放器，序列化时以`type`字段区分具体类型
#[enum_dispatch(Scaler)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnyScaler {
    MinMaxScaler,
    ZScoreScaler,
}

/// 把每组列线性映射到[0, 1]：(x - min) / (max - min)；max == min时结果为0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    min: Vec<f64>,
    max: Vec<f64>,
    groups: Vec<Vec<usize>>,
}

impl MinMaxScaler {
    pub fn new(dim: usize, groups: Vec<Vec<usize>>) -> Result<Self, PreprocessError> {
        check_groups(dim, &groups)?;
        Ok(Self {
            min: vec![0.; dim],
            max: vec![0.; dim],
            groups,
        })
    }

    pub fn min(&self) -> &[f64] {
        &self.min
    }

    pub fn max(&self) -> &[f64] {
        &self.max
    }
}

impl Scaler for MinMaxScaler {
    fn fit(&mut self, data: &Matrix) -> Result<(), PreprocessError> {
        check_fit_data(self.min.len(), data)?;
        for group in &self.groups {
            let values = group_values(data, group);
            let min = values.clone().fold(f64::INFINITY, f64::min);
            let max = values.fold(f64::NEG_INFINITY, f64::max);
            for &col in group {
                self.min[col] = min;
                self.max[col] = max;
            }
        }
        Ok(())
    }

    fn transform(&self, data: &Matrix) -> Result<Matrix, PreprocessError> {
        check_cols(self.min.len(), data)?;
        let grouped = grouped_columns(self.min.len(), &self.groups);
        Ok(Matrix::from_fn(data.rows(), data.cols(), |r, c| {
            let x = data.get(r, c);
            if !grouped[c] {
                return x;
            }
            let spread = self.max[c] - self.min[c];
            if spread == 0. { 0. } else { (x - self.min[c]) / spread }
        }))
    }
}

/// 把每组列标准化：(x - mean) / std，其中均值与（总体）标准差按组内所有元素统计；std == 0时结果为0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZScoreScaler {
    mean: Vec<f64>,
    std_deviation: Vec<f64>,
    groups: Vec<Vec<usize>>,
}

impl ZScoreScaler {
    pub fn new(dim: usize, groups: Vec<Vec<usize>>) -> Result<Self, PreprocessError> {
        check_groups(dim, &groups)?;
        Ok(Self {
            mean: vec![0.; dim],
            std_deviation: vec![0.; dim],
            groups,
        })
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn std_deviation(&self) -> &[f64] {
        &self.std_deviation
    }
}

impl Scaler for ZScoreScaler {
    fn fit(&mut self, data: &Matrix) -> Result<(), PreprocessError> {
        check_fit_data(self.mean.len(), data)?;
        for group in &self.groups {
            if group.is_empty() {
                continue;
            }
            let count = (data.rows() * group.len()) as f64;
            let mean = group_values(data, group).sum::<f64>() / count;
            let variance = group_values(data, group)
                .map(|x| (x - mean).powi(2))
                .sum::<f64>()
                / count;
            for &col in group {
                self.mean[col] = mean;
                self.std_deviation[col] = variance.sqrt();
            }
        }
        Ok(())
    }

    fn transform(&self, data: &Matrix) -> Result<Matrix, PreprocessError> {
        check_cols(self.mean.len(), data)?;
        let grouped = grouped_columns(self.mean.len(), &self.groups);
        Ok(Matrix::from_fn(data.rows(), data.cols(), |r, c| {
            let x = data.get(r, c);
            if !grouped[c] {
                return x;
            }
            let std = self.std_deviation[c];
            if std == 0. { 0. } else { (x - self.mean[c]) / std }
        }))
    }
}

fn check_cols(dim: usize, data: &Matrix) -> Result<(), PreprocessError> {
    if data.cols() == dim {
        Ok(())
    } else {
        Err(PreprocessError::DimensionMismatch {
            expected: dim,
            got: data.cols(),
        })
    }
}

fn check_fit_data(dim: usize, data: &Matrix) -> Result<(), PreprocessError> {
    check_cols(dim, data)?;
    if data.rows() == 0 {
        return Err(PreprocessError::EmptyData);
    }
    Ok(())
}

/// 某一列组在所有行上的全部取值
fn group_values<'a>(data: &'a Matrix, group: &'a [usize]) -> impl Iterator<Item = f64> + Clone + 'a {
    (0..data.rows()).flat_map(move |r| group.iter().map(move |&c| data.get(r, c)))
}

fn grouped_columns(dim: usize, groups: &[Vec<usize>]) -> Vec<bool> {
    let mut grouped = vec![false; dim];
    for &col in groups.iter().flatten() {
        grouped[col] = true;
    }
    grouped
}
