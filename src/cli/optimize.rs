//! # optimize 子命令 CLI 定义
//!
//! 批量缩放图像并可选转换格式
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用，`SourceArgs`/`LayoutArgs` 也被 `cli/scan.rs` 复用
//! - 参数传递给 `commands/optimize.rs`

use crate::models::options::{
    DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH, DEFAULT_PREFIX, DEFAULT_QUALITY,
};
use crate::models::{ImageFormatKind, OutputLayout, ResolutionPreset};

use clap::Args;
use std::path::PathBuf;

/// 输入目录与发现选项
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Input directory containing images
    #[arg(short, long)]
    pub input: PathBuf,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Comma-separated glob patterns of file names to skip (e.g. "thumb_*,*.gif")
    #[arg(long)]
    pub exclude: Option<String>,
}

/// 输出位置与命名选项
#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Output directory [default: <input>/optimized for mirror, <input> for prefix]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// How output files are named
    #[arg(long, value_enum, default_value_t = OutputLayout::Mirror)]
    pub layout: OutputLayout,

    /// File name prefix used by the prefix layout
    #[arg(long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Convert every image to this format (keeps the input format when omitted)
    #[arg(short, long, value_enum)]
    pub format: Option<ImageFormatKind>,
}

/// optimize 子命令参数
#[derive(Args, Debug)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Maximum output width in pixels
    #[arg(long, env = "IMGOPT_MAX_WIDTH", default_value_t = DEFAULT_MAX_WIDTH)]
    pub max_width: u32,

    /// Maximum output height in pixels
    #[arg(long, env = "IMGOPT_MAX_HEIGHT", default_value_t = DEFAULT_MAX_HEIGHT)]
    pub max_height: u32,

    /// Resolution preset (overrides --max-width/--max-height)
    #[arg(long, value_enum)]
    pub preset: Option<ResolutionPreset>,

    /// Encoding quality (1-100, used by JPEG)
    #[arg(
        short,
        long,
        env = "IMGOPT_QUALITY",
        default_value_t = DEFAULT_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    pub quality: u8,

    /// Number of parallel jobs (1 = sequential, 0 = auto)
    #[arg(short, long, env = "IMGOPT_JOBS", default_value_t = 1)]
    pub jobs: usize,

    /// Write a per-file CSV report
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl OptimizeArgs {
    /// 生效的尺寸上限（预设优先）
    pub fn bounds(&self) -> (u32, u32) {
        match self.preset {
            Some(preset) => preset.dimensions(),
            None => (self.max_width, self.max_height),
        }
    }
}
