//! # 批量处理模块
//!
//! 图像批处理流水线核心。
//!
//! ## 功能
//! - 收集候选图像文件（collector）
//! - 推导输出路径（output_path）
//! - 单文件 解码 → 缩放 → 编码（transform）
//! - 顺序/并行执行、进度回报与结果统计（runner）
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `codec/`, `models/`
//! - 使用 `rayon` 进行并行处理

pub mod collector;
pub mod output_path;
pub mod runner;
pub mod transform;

pub use collector::FileCollector;
pub use output_path::derive_output_path;
pub use runner::{BatchResult, BatchRunner, FileFailure, WrittenFile};
