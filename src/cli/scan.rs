//! # scan 子命令 CLI 定义
//!
//! 预览将被处理的文件及其输出路径，不写入任何文件
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/scan.rs`

use super::optimize::{LayoutArgs, SourceArgs};
use clap::Args;

/// scan 子命令参数
#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Maximum number of rows to print (0 = all)
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}
