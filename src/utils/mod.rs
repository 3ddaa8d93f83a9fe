//! # 常用接口模块
//!
//! 本模块提供单元测试中常用的断言宏


#[cfg(test)]
mod tests;
