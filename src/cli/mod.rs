//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `optimize`: 批量缩放 / 格式转换
//! - `scan`: 预览发现的文件与输出路径
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: optimize, scan

pub mod optimize;
pub mod scan;

use clap::{ArgAction, Parser, Subcommand};

/// imgopt - 批量图像优化工具
#[derive(Parser)]
#[command(name = "imgopt")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Batch image optimizer: resize to a bounding box and convert formats", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug; IMGOPT_LOG overrides)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Resize images to fit a bounding box and optionally convert their format
    Optimize(optimize::OptimizeArgs),

    /// List the images that would be processed and where their output would go
    Scan(scan::ScanArgs),
}
