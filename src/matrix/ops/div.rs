/*
 * @Description  : 矩阵的“逐元素”相除。除数中的0按IEEE-754浮点规则得到无穷大或NaN，这里不做拦截。
 */

use super::add::check_same_shape;
use crate::errors::{MatrixError, Operator};
use crate::matrix::Matrix;

impl Matrix {
    /// 逐元素相除（self / other），两矩阵形状须严格一致
    pub fn div_element(&self, other: &Self) -> Result<Self, MatrixError> {
        check_same_shape(self, other, Operator::DivElement)?;
        Ok(Self::from_array(self.array() / other.array()))
    }
}
