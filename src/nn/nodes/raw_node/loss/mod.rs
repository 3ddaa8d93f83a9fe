mod cross_entropy_loss;
mod mse_loss;

pub(in crate::nn) use cross_entropy_loss::CrossEntropyLoss;
pub(in crate::nn) use mse_loss::MSELoss;
