//! # 文件与请求模型
//!
//! - `DiscoveredFile`: 发现阶段的产物（绝对路径 + 相对路径）
//! - `TransformRequest`: 单文件转换请求，调用前构造、调用后丢弃
//! - `TransformSummary`: 单文件转换成功后的结果
//!
//! ## 依赖关系
//! - 被 `batch/` 使用
//! - 使用 `models/format.rs`

use crate::models::ImageFormatKind;
use std::path::PathBuf;

/// 发现的候选图像文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// 绝对路径
    pub absolute_path: PathBuf,
    /// 相对扫描根目录的路径
    pub relative_path: PathBuf,
}

impl DiscoveredFile {
    pub fn new(absolute_path: PathBuf, relative_path: PathBuf) -> Self {
        Self {
            absolute_path,
            relative_path,
        }
    }

    /// 用于展示的相对路径（统一使用 `/` 分隔）
    pub fn display_path(&self) -> String {
        self.relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// 单文件转换请求
#[derive(Debug, Clone)]
pub struct TransformRequest {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub max_width: u32,
    pub max_height: u32,
    pub quality: u8,
    pub convert_format: Option<ImageFormatKind>,
}

impl TransformRequest {
    /// 实际写出的格式：显式目标格式，否则沿用输入扩展名对应的格式
    pub fn target_format(&self) -> Option<ImageFormatKind> {
        self.convert_format
            .or_else(|| ImageFormatKind::from_path(&self.input_path))
    }
}

/// 单文件转换成功的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformSummary {
    /// 实际写出的文件
    pub output_path: PathBuf,
    /// 原始尺寸
    pub original: (u32, u32),
    /// 输出尺寸
    pub resized: (u32, u32),
    /// 写出格式
    pub format: ImageFormatKind,
}
