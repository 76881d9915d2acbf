//! # imgopt - 批量图像优化工具
//!
//! 将文件夹中的图像等比缩放到边界框内，可选转换格式，写入输出目录。
//!
//! ## 子命令
//! - `optimize` - 批量缩放 / 格式转换
//! - `scan`     - 预览将处理的文件与输出路径
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (发现、转换、批量执行)
//!   │     ├── codec/     (图像编解码)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (输出、进度、日志、报告)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod codec;
mod commands;
mod error;
mod models;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    utils::logging::init(cli.verbose);

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
