use approx::AbsDiffEq;

use super::Matrix;

impl Matrix {
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// 返回(行数, 列数)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    /// 元素个数
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 判断两个矩阵的形状是否严格一致
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /// 按行优先顺序返回底层数据
    pub fn data(&self) -> &[f64] {
        self.data
            .as_slice()
            .expect("矩阵内部数据应始终为行优先的连续布局")
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }

    /// 获取(row, col)处的元素，越界会panic
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[[row, col]]
    }

    /// 若为1×1矩阵，则返回其唯一元素
    pub fn scalar(&self) -> Option<f64> {
        (self.shape() == (1, 1)).then(|| self.data[[0, 0]])
    }

    /// 所有元素之和
    pub fn sum(&self) -> f64 {
        self.data.sum()
    }

    /// L2范数（所有元素平方和的平方根）
    pub fn norm_l2(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// 是否不含NaN或无穷大
    pub fn all_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    /// 逐元素映射，返回新矩阵
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self::from_array(self.data.mapv(f))
    }
}

impl AbsDiffEq for Matrix {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.is_same_shape(other)
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}
