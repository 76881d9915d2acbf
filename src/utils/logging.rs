//! # 日志初始化
//!
//! 使用 `tracing-subscriber` 输出到 stderr，与进度条和状态输出分开。
//!
//! 过滤级别优先读取 `IMGOPT_LOG` 环境变量（EnvFilter 语法），
//! 否则由 `-v` 次数决定：0 = warn, 1 = info, 2+ = debug。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `tracing-subscriber` crate

use tracing_subscriber::EnvFilter;

/// 日志级别环境变量
pub const LOG_ENV: &str = "IMGOPT_LOG";

/// `-v` 次数对应的默认过滤级别
pub fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// 初始化全局日志
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));

    // 测试或重复初始化时忽略错误
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .ok();
}
