//! # 数据模型模块
//!
//! 定义批处理流水线使用的数据模型。
//!
//! ## 依赖关系
//! - 被 `batch/`, `codec/` 和 `commands/` 使用
//! - 子模块: format, file, options

pub mod file;
pub mod format;
pub mod options;

pub use file::{DiscoveredFile, TransformRequest, TransformSummary};
pub use format::{is_image_file, ImageFormatKind};
pub use options::{BatchOptions, OutputLayout, ResolutionPreset};
