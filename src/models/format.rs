//! # 图像格式模型
//!
//! 定义支持的图像容器格式，以及基于扩展名的候选文件判定。
//!
//! ## 依赖关系
//! - 被 `batch/`, `codec/`, `cli/` 使用
//! - 无外部模块依赖

use clap::ValueEnum;
use serde::Serialize;
use std::path::Path;

/// 被视为图像候选的扩展名（小写）
pub const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp"];

/// 支持的图像格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Hash, Serialize)]
pub enum ImageFormatKind {
    /// JPEG (quality applies)
    #[value(alias = "jpg")]
    Jpeg,
    /// PNG (lossless, best compression)
    Png,
    /// GIF (first frame only)
    Gif,
    /// Windows bitmap
    Bmp,
    /// TIFF
    Tiff,
    /// WebP (lossless)
    Webp,
}

impl ImageFormatKind {
    /// 输出文件使用的规范扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormatKind::Jpeg => "jpg",
            ImageFormatKind::Png => "png",
            ImageFormatKind::Gif => "gif",
            ImageFormatKind::Bmp => "bmp",
            ImageFormatKind::Tiff => "tiff",
            ImageFormatKind::Webp => "webp",
        }
    }

    /// 是否支持 quality 参数
    pub fn supports_quality(&self) -> bool {
        matches!(self, ImageFormatKind::Jpeg)
    }

    /// 从扩展名解析（大小写不敏感）
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormatKind::Jpeg),
            "png" => Some(ImageFormatKind::Png),
            "gif" => Some(ImageFormatKind::Gif),
            "bmp" => Some(ImageFormatKind::Bmp),
            "tiff" => Some(ImageFormatKind::Tiff),
            "webp" => Some(ImageFormatKind::Webp),
            _ => None,
        }
    }

    /// 从文件路径的扩展名推断格式
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

impl std::fmt::Display for ImageFormatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageFormatKind::Jpeg => write!(f, "jpeg"),
            ImageFormatKind::Png => write!(f, "png"),
            ImageFormatKind::Gif => write!(f, "gif"),
            ImageFormatKind::Bmp => write!(f, "bmp"),
            ImageFormatKind::Tiff => write!(f, "tiff"),
            ImageFormatKind::Webp => write!(f, "webp"),
        }
    }
}

/// 仅凭扩展名判断是否为图像候选（不读取文件内容）
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}
