/*
 * @Description  : 训练编排器。由用户提供的构建函数生成若干个图实例（共享同一组参数变量），
 *                 每个批次内各样本在各自的实例上并行完成前向与反向传播（Rayon fork-join），
 *                 全部完成后优化器统一更新一次参数，再重置这些实例以迎接下一批。
 */

use log::{debug, info};
use rayon::prelude::*;

use crate::matrix::Matrix;
use crate::nn::optimizer::Optimizer;
use crate::nn::{GraphError, Node, Variable};

/// 一个图实例：构建函数每次调用都应返回全新的输入/目标变量和中间节点，
/// 但引用同一组（被构建函数捕获的）参数变量。
#[derive(Clone, Debug)]
pub struct GraphInstance {
    pub input: Variable,
    pub target: Variable,
    pub output: Node,
    pub loss: Node,
}

impl GraphInstance {
    fn load_sample(&self, input: &[f64], target: &[f64]) -> Result<(), GraphError> {
        load_flat(&self.input, input, "输入")?;
        load_flat(&self.target, target, "目标")
    }

    /// 前向计算损失并反向传播，返回该样本的损失
    fn train_sample(&self, input: &[f64], target: &[f64]) -> Result<f64, GraphError> {
        self.load_sample(input, target)?;
        let loss = loss_scalar(&self.loss.forward()?)?;
        self.loss.backward(None)?;
        Ok(loss)
    }

    fn reset(&self) {
        self.loss.reset();
        self.output.reset();
    }

    /// 出错后的重置，清除失败节点下方残留的缓存
    fn force_reset(&self) {
        self.loss.force_reset();
        self.output.force_reset();
    }
}

/// 图实例的构建函数，需能在多个线程间共享
pub type GraphBuilder = dyn Fn() -> GraphInstance + Send + Sync;

pub struct NeuralNetwork {
    builder: Box<GraphBuilder>,
    optimizer: Box<dyn Optimizer>,
    /// 训练用的实例池，按需扩充，跨批次、跨`train`调用复用
    instances: Vec<GraphInstance>,
    /// `evaluate`/`predict`共用的实例
    eval_instance: Option<GraphInstance>,
}

impl NeuralNetwork {
    pub fn new<F, O>(builder: F, optimizer: O) -> Self
    where
        F: Fn() -> GraphInstance + Send + Sync + 'static,
        O: Optimizer + 'static,
    {
        Self {
            builder: Box::new(builder),
            optimizer: Box::new(optimizer),
            instances: Vec::new(),
            eval_instance: None,
        }
    }

    pub fn optimizer(&self) -> &dyn Optimizer {
        self.optimizer.as_ref()
    }

    pub fn optimizer_mut(&mut self) -> &mut dyn Optimizer {
        self.optimizer.as_mut()
    }

    /// 调用构建函数得到一个新的图实例
    pub fn build_instance(&self) -> GraphInstance {
        (self.builder)()
    }

    /// 训练一轮（epoch）：按`batch_size`分批，最后一批可以不满。
    /// 返回本轮所有样本损失的均值。
    ///
    /// 任一样本出错时，本批不会更新参数：所有实例被重置、参数梯度被清零，然后返回该错误。
    pub fn train(
        &mut self,
        inputs: &[Vec<f64>],
        targets: &[Vec<f64>],
        batch_size: usize,
    ) -> Result<f64, GraphError> {
        check_dataset(inputs, targets)?;
        if batch_size == 0 {
            return Err(GraphError::InvalidOperation(
                "训练的批大小必须为正数".to_string(),
            ));
        }
        while self.instances.len() < batch_size {
            let instance = self.build_instance();
            self.instances.push(instance);
        }

        let mut loss_sum = 0.;
        for (chunk_idx, (input_chunk, target_chunk)) in inputs
            .chunks(batch_size)
            .zip(targets.chunks(batch_size))
            .enumerate()
        {
            let instances = &self.instances[..input_chunk.len()];
            let chunk_result = instances
                .par_iter()
                .zip(input_chunk.par_iter())
                .zip(target_chunk.par_iter())
                .map(|((instance, input), target)| instance.train_sample(input, target))
                .collect::<Result<Vec<f64>, GraphError>>()
                .and_then(|losses| {
                    self.optimizer.step(input_chunk.len())?;
                    Ok(losses)
                });

            let losses = match chunk_result {
                Ok(losses) => losses,
                Err(e) => {
                    abort_chunk(&self.instances, self.optimizer.params());
                    return Err(e);
                }
            };
            for instance in instances {
                instance.loss.reset();
            }

            let chunk_sum: f64 = losses.iter().sum();
            debug!(
                "第{}批训练完成：样本数{}，平均损失{:.6}",
                chunk_idx,
                losses.len(),
                chunk_sum / losses.len() as f64
            );
            loss_sum += chunk_sum;
        }

        let mean_loss = loss_sum / inputs.len() as f64;
        info!(
            "训练完成：样本数{}，批大小{}，平均损失{:.6}",
            inputs.len(),
            batch_size,
            mean_loss
        );
        Ok(mean_loss)
    }

    /// 依次计算每个样本的输出与损失，不更新参数。返回(平均损失, 各样本的输出)
    pub fn evaluate(
        &mut self,
        inputs: &[Vec<f64>],
        targets: &[Vec<f64>],
    ) -> Result<(f64, Vec<Vec<f64>>), GraphError> {
        check_dataset(inputs, targets)?;
        let instance = self.eval_instance();

        let mut loss_sum = 0.;
        let mut outputs = Vec::with_capacity(inputs.len());
        for (input, target) in inputs.iter().zip(targets) {
            let result = instance.load_sample(input, target).and_then(|()| {
                let output = instance.output.forward()?;
                let loss = loss_scalar(&instance.loss.forward()?)?;
                Ok((output, loss))
            });
            if result.is_err() {
                instance.force_reset();
            } else {
                instance.reset();
            }
            let (output, loss) = result?;
            outputs.push(output.to_vec());
            loss_sum += loss;
        }

        let mean_loss = loss_sum / inputs.len() as f64;
        info!("评估完成：样本数{}，平均损失{:.6}", inputs.len(), mean_loss);
        Ok((mean_loss, outputs))
    }

    /// 计算单个样本的输出
    pub fn predict(&mut self, input: &[f64]) -> Result<Vec<f64>, GraphError> {
        let instance = self.eval_instance();
        let result = load_flat(&instance.input, input, "输入").and_then(|()| instance.output.forward());
        if result.is_err() {
            instance.output.force_reset();
        } else {
            instance.output.reset();
        }
        Ok(result?.to_vec())
    }

    fn eval_instance(&mut self) -> GraphInstance {
        if let Some(instance) = &self.eval_instance {
            return instance.clone();
        }
        let instance = self.build_instance();
        self.eval_instance = Some(instance.clone());
        instance
    }
}

/// 放弃当前批次：重置所有实例并清零参数梯度
fn abort_chunk(instances: &[GraphInstance], params: &[Variable]) {
    for instance in instances {
        instance.force_reset();
    }
    for param in params {
        param.zero_gradient();
    }
}

fn check_dataset(inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<(), GraphError> {
    if inputs.is_empty() {
        return Err(GraphError::InvalidOperation("数据集不能为空".to_string()));
    }
    if inputs.len() != targets.len() {
        return Err(GraphError::InvalidOperation(format!(
            "输入样本数{}与目标样本数{}不一致",
            inputs.len(),
            targets.len()
        )));
    }
    Ok(())
}

/// 把一行扁平数据按变量的形状写入变量
fn load_flat(variable: &Variable, data: &[f64], role: &str) -> Result<(), GraphError> {
    let (rows, cols) = variable.shape();
    if data.len() != rows * cols {
        return Err(GraphError::ShapeMismatch {
            expected: (rows, cols),
            got: (1, data.len()),
            message: format!("{role}样本的长度必须等于{role}变量的元素个数"),
        });
    }
    variable.set_value(Matrix::try_new(data.to_vec(), rows, cols)?)
}

fn loss_scalar(loss: &Matrix) -> Result<f64, GraphError> {
    loss.scalar().ok_or_else(|| GraphError::ShapeMismatch {
        expected: (1, 1),
        got: loss.shape(),
        message: "损失节点的值必须是1×1的矩阵".to_string(),
    })
}
