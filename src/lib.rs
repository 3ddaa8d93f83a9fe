//! # Lazy Grad
//!
//! `lazy_grad`是一个基于稠密二维矩阵的自动微分引擎：
//! 用共享的节点句柄搭建有向无环计算图，前向惰性求值并缓存，反向按链式法则求导，
//! 被多处引用的叶子变量会正确累加各路梯度。
//! 在此之上提供SGD/Adam优化器、按样本并行的小批量训练，以及模型参数的JSON持久化。
//!

pub mod errors;
pub mod matrix;
pub mod nn;
pub mod preprocess;
pub mod utils;
