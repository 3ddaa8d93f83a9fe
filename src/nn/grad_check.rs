/*
 * @Description  : 有限差分梯度校验：对每个叶子变量的每个元素做中心差分，
 *                 与反向传播得到的解析梯度比较，用于验证各类节点的反向传播公式。
 */

use thiserror::Error;

use crate::matrix::Matrix;
use crate::nn::{GraphError, Node, Variable};

/// 梯度校验的错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error(
        "第{leaf_index}个叶子变量的第{element_index}个元素梯度校验失败：解析梯度{analytical}，数值梯度{numerical}，差值{difference}"
    )]
    GradientMismatch {
        leaf_index: usize,
        element_index: usize,
        analytical: f64,
        numerical: f64,
        difference: f64,
    },
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// 校验`output`对`leaves`的梯度。
///
/// - 若`output`是损失节点，目标函数即损失值本身，`upstream`须为`None`；
/// - 否则目标函数为 Σ(output ⊙ upstream)，`upstream`须与`output`同形状。
///
/// 当 |解析梯度 - 数值梯度| > `tolerance` · max(1, |数值梯度|) 时报`GradientMismatch`。
/// 校验结束后各叶子的值保持不变，图被重置。
pub fn check_gradient(
    output: &Node,
    leaves: &[Variable],
    upstream: Option<&Matrix>,
    epsilon: f64,
    tolerance: f64,
) -> Result<(), GradCheckError> {
    // 1. 解析梯度
    output.reset();
    for leaf in leaves {
        leaf.zero_gradient();
    }
    output.forward()?;
    output.backward(upstream)?;
    let analytical: Vec<Matrix> = leaves.iter().map(Variable::gradient).collect();

    // 2. 数值梯度（中心差分）
    for (leaf_index, leaf) in leaves.iter().enumerate() {
        let original = leaf.value();
        let (rows, cols) = original.shape();
        for element_index in 0..original.len() {
            let perturbed = |delta: f64| -> Result<f64, GradCheckError> {
                let mut data = original.to_vec();
                data[element_index] += delta;
                leaf.set_value(Matrix::try_new(data, rows, cols).map_err(GraphError::from)?)?;
                output.reset();
                let value = output.forward()?;
                objective(&value, upstream)
            };
            let plus = perturbed(epsilon);
            let minus = perturbed(-epsilon);
            leaf.set_value(original.clone())?;
            let numerical = (plus? - minus?) / (2. * epsilon);

            let analytical_grad = analytical[leaf_index].data()[element_index];
            let difference = (analytical_grad - numerical).abs();
            if difference > tolerance * numerical.abs().max(1.) {
                output.reset();
                return Err(GradCheckError::GradientMismatch {
                    leaf_index,
                    element_index,
                    analytical: analytical_grad,
                    numerical,
                    difference,
                });
            }
        }
    }

    output.reset();
    Ok(())
}

fn objective(value: &Matrix, upstream: Option<&Matrix>) -> Result<f64, GradCheckError> {
    match upstream {
        None => Ok(value.sum()),
        Some(g) => Ok(value.mul_element(g).map_err(GraphError::from)?.sum()),
    }
}
