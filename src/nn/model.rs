/*
 * @Description  : 模型的保存与加载。模型即一组按名字区分的参数变量（外加可选的数据缩放器），
 *                 以 JSON 格式持久化：
 *                 {"parameters":[{"name":..,"value":{"rows":..,"cols":..,"data":[..]}}],"scaler":..}
 */

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matrix::Matrix;
use crate::nn::{GraphError, Variable};
use crate::preprocess::AnyScaler;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("模型文件读写失败：{0}")]
    Io(#[from] std::io::Error),
    #[error("模型文件格式错误：{0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[derive(Serialize, Deserialize)]
struct SavedParameter {
    name: String,
    value: Matrix,
}

#[derive(Serialize, Deserialize)]
struct SavedModel {
    parameters: Vec<SavedParameter>,
    #[serde(default)]
    scaler: Option<AnyScaler>,
}

/// 一组待持久化的参数变量（按名字匹配）及可选的缩放器
#[derive(Debug, Clone)]
pub struct Model {
    parameters: Vec<Variable>,
    scaler: Option<AnyScaler>,
}

impl Model {
    pub fn new(parameters: &[Variable]) -> Self {
        Self {
            parameters: parameters.to_vec(),
            scaler: None,
        }
    }

    pub fn with_scaler(mut self, scaler: impl Into<AnyScaler>) -> Self {
        self.scaler = Some(scaler.into());
        self
    }

    pub fn parameters(&self) -> &[Variable] {
        &self.parameters
    }

    pub const fn scaler(&self) -> Option<&AnyScaler> {
        self.scaler.as_ref()
    }

    /// 将所有参数的当前值（及缩放器）写入`path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let path = path.as_ref();
        let saved = SavedModel {
            parameters: self
                .parameters
                .iter()
                .map(|p| SavedParameter {
                    name: p.name(),
                    value: p.value(),
                })
                .collect(),
            scaler: self.scaler.clone(),
        };
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &saved)?;
        writer.flush()?;
        info!("模型已保存到{}（参数{}个）", path.display(), saved.parameters.len());
        Ok(())
    }

    /// 从`path`加载参数：按名字匹配，只覆盖参数的值；文件中有缩放器时一并替换。
    /// 文件不存在不算错误（记录警告并返回`Ok(false)`），成功加载返回`Ok(true)`。
    /// 文件内容损坏或参数形状不符时报错。
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<bool, ModelError> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("模型文件{}不存在，保持当前参数不变", path.display());
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };
        let saved: SavedModel = serde_json::from_reader(BufReader::new(file))?;

        for param in &self.parameters {
            let name = param.name();
            match saved.parameters.iter().find(|p| p.name == name) {
                Some(p) => param.set_value(p.value.clone())?,
                None => warn!("模型文件{}中没有参数{}，保持其当前值", path.display(), name),
            }
        }
        if saved.scaler.is_some() {
            self.scaler = saved.scaler;
        }
        info!("已从{}加载模型", path.display());
        Ok(true)
    }
}
