use std::fmt::{self, Display};

/// 矩阵的二元运算符（用于错误信息）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    MatMul,
    MulElement,
    DivElement,
    HConcat,
    VConcat,
}
impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operation_name = match self {
            Self::Add => "相加",
            Self::Sub => "相减",
            Self::MatMul => "矩阵相乘",
            Self::MulElement => "逐元素相乘",
            Self::DivElement => "逐元素相除",
            Self::HConcat => "横向拼接",
            Self::VConcat => "纵向拼接",
        };
        write!(f, "{}", operation_name)
    }
}

/// 矩阵的轴
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixAxis {
    Row,
    Col,
}
impl Display for MatrixAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row => write!(f, "行"),
            Self::Col => write!(f, "列"),
        }
    }
}
