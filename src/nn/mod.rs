/*
 * @Description  : 负责计算图（自动微分引擎）、参数初始化、优化器、训练调度与模型持久化
 */

mod error;
pub mod grad_check;
pub mod init;
pub mod model;
mod network;
mod nodes;
pub mod optimizer;

pub use error::GraphError;
pub use init::Init;
pub use network::{GraphBuilder, GraphInstance, NeuralNetwork};
pub use nodes::{DEFAULT_RELU_LEAK, DEFAULT_TANH_GRAD_EPS, Node, Variable};
pub use optimizer::{Adam, Optimizer, SGD};

#[cfg(test)]
mod tests;
