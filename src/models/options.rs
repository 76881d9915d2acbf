//! # 批处理参数模型
//!
//! 一次批处理运行的全部配置：尺寸上限、质量、目标格式、输出位置与命名策略。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs`, `batch/output_path.rs`, `commands/` 使用
//! - 使用 `models/format.rs`

use crate::error::{ImgoptError, Result};
use crate::models::ImageFormatKind;

use clap::ValueEnum;
use std::path::PathBuf;

/// 默认宽度上限
pub const DEFAULT_MAX_WIDTH: u32 = 800;
/// 默认高度上限
pub const DEFAULT_MAX_HEIGHT: u32 = 800;
/// 默认质量
pub const DEFAULT_QUALITY: u8 = 85;
/// 前缀命名策略的默认前缀
pub const DEFAULT_PREFIX: &str = "optimized_";
/// 镜像策略下默认输出子目录名
pub const DEFAULT_OUTPUT_DIR: &str = "optimized";

/// 输出路径命名策略
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputLayout {
    /// output_root/<relative path> (keeps the input's subfolder structure)
    #[default]
    Mirror,
    /// output_root/<relative folder>/<prefix><filename>
    Prefix,
}

impl std::fmt::Display for OutputLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputLayout::Mirror => write!(f, "mirror"),
            OutputLayout::Prefix => write!(f, "prefix"),
        }
    }
}

/// 分辨率预设
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ResolutionPreset {
    /// 1280x720
    Hd,
    /// 1920x1080
    FullHd,
    /// 2560x1440
    #[value(name = "2k")]
    Qhd,
    /// 3840x2160
    #[value(name = "4k")]
    Uhd,
}

impl ResolutionPreset {
    /// (宽, 高)
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            ResolutionPreset::Hd => (1280, 720),
            ResolutionPreset::FullHd => (1920, 1080),
            ResolutionPreset::Qhd => (2560, 1440),
            ResolutionPreset::Uhd => (3840, 2160),
        }
    }
}

/// 批处理配置
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// 宽度上限（像素）
    pub max_width: u32,
    /// 高度上限（像素）
    pub max_height: u32,
    /// 编码质量 [1, 100]
    pub quality: u8,
    /// 目标格式；None 表示保持输入格式
    pub convert_format: Option<ImageFormatKind>,
    /// 输出根目录
    pub output_root: PathBuf,
    /// 输出命名策略
    pub layout: OutputLayout,
    /// `OutputLayout::Prefix` 使用的文件名前缀
    pub prefix: String,
}

impl BatchOptions {
    /// 使用默认尺寸/质量创建配置
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            quality: DEFAULT_QUALITY,
            convert_format: None,
            output_root: output_root.into(),
            layout: OutputLayout::default(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    /// 设置尺寸上限
    pub fn with_bounds(mut self, max_width: u32, max_height: u32) -> Self {
        self.max_width = max_width;
        self.max_height = max_height;
        self
    }

    /// 设置质量
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// 设置目标格式
    pub fn with_format(mut self, format: Option<ImageFormatKind>) -> Self {
        self.convert_format = format;
        self
    }

    /// 设置命名策略与前缀
    pub fn with_layout(mut self, layout: OutputLayout, prefix: &str) -> Self {
        self.layout = layout;
        self.prefix = prefix.to_string();
        self
    }

    /// 批处理前置校验，失败时整个批次不会开始
    pub fn validate(&self) -> Result<()> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(ImgoptError::InvalidInput(format!(
                "dimensions must be positive, got {}x{}",
                self.max_width, self.max_height
            )));
        }

        if !(1..=100).contains(&self.quality) {
            return Err(ImgoptError::InvalidInput(format!(
                "quality must be within 1-100, got {}",
                self.quality
            )));
        }

        if self.layout == OutputLayout::Prefix {
            if self.prefix.is_empty() {
                return Err(ImgoptError::InvalidInput(
                    "prefix must not be empty for the prefix layout".to_string(),
                ));
            }
            if self.prefix.contains(['/', '\\']) {
                return Err(ImgoptError::InvalidInput(format!(
                    "prefix must not contain path separators: '{}'",
                    self.prefix
                )));
            }
        }

        if self.output_root.as_os_str().is_empty() {
            return Err(ImgoptError::InvalidInput(
                "output root must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = BatchOptions::new("/tmp/out");
        assert_eq!(options.max_width, 800);
        assert_eq!(options.max_height, 800);
        assert_eq!(options.quality, 85);
        assert_eq!(options.layout, OutputLayout::Mirror);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        let options = BatchOptions::new("/tmp/out").with_bounds(0, 600);
        assert!(matches!(
            options.validate(),
            Err(ImgoptError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_rejects_quality_out_of_range() {
        assert!(BatchOptions::new("/tmp/out")
            .with_quality(0)
            .validate()
            .is_err());
        assert!(BatchOptions::new("/tmp/out")
            .with_quality(101)
            .validate()
            .is_err());
        assert!(BatchOptions::new("/tmp/out")
            .with_quality(100)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_prefix_layout() {
        let empty = BatchOptions::new("/tmp/out").with_layout(OutputLayout::Prefix, "");
        assert!(empty.validate().is_err());

        let nested = BatchOptions::new("/tmp/out").with_layout(OutputLayout::Prefix, "a/b_");
        assert!(nested.validate().is_err());

        // 镜像策略不关心前缀
        let mirror = BatchOptions::new("/tmp/out").with_layout(OutputLayout::Mirror, "");
        assert!(mirror.validate().is_ok());
    }

    #[test]
    fn test_preset_dimensions() {
        assert_eq!(ResolutionPreset::Hd.dimensions(), (1280, 720));
        assert_eq!(ResolutionPreset::Uhd.dimensions(), (3840, 2160));
    }
}
