use serde::{Deserialize, Serialize};

use super::{PreprocessError, check_groups};

/// L2归一化器：每行数据被切成若干个`dim`宽的分段，
/// 每个分段内的每个列组各自缩放为单位L2范数（范数为0的组保持不变）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct L2Normalizer {
    dim: usize,
    groups: Vec<Vec<usize>>,
}

impl L2Normalizer {
    pub fn new(dim: usize, groups: Vec<Vec<usize>>) -> Result<Self, PreprocessError> {
        check_groups(dim, &groups)?;
        Ok(Self { dim, groups })
    }

    pub const fn dim(&self) -> usize {
        self.dim
    }

    pub fn normalize(&self, data: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, PreprocessError> {
        data.iter()
            .enumerate()
            .map(|(row, item)| self.normalize_row(row, item))
            .collect()
    }

    fn normalize_row(&self, row: usize, item: &[f64]) -> Result<Vec<f64>, PreprocessError> {
        if self.dim == 0 || item.len() % self.dim != 0 {
            return Err(PreprocessError::SegmentLength {
                row,
                len: item.len(),
                dim: self.dim,
            });
        }
        let mut result = item.to_vec();
        for segment in result.chunks_mut(self.dim) {
            for group in &self.groups {
                let norm = group
                    .iter()
                    .map(|&c| segment[c] * segment[c])
                    .sum::<f64>()
                    .sqrt();
                if norm == 0. {
                    continue;
                }
                for &c in group {
                    segment[c] /= norm;
                }
            }
        }
        Ok(result)
    }
}
