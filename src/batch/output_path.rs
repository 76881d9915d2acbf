//! # 输出路径推导
//!
//! 根据 `OutputLayout` 与目标格式，为每个发现的文件计算输出路径。
//!
//! - `Mirror`: `output_root/<相对路径>`
//! - `Prefix`: `output_root/<相对目录>/<前缀><文件名>`
//!
//! 请求格式转换时，扩展名替换为目标格式的规范扩展名。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs`, `commands/scan.rs` 使用

use crate::models::{BatchOptions, DiscoveredFile, OutputLayout};
use std::path::PathBuf;

/// 计算单个文件的输出路径
pub fn derive_output_path(file: &DiscoveredFile, options: &BatchOptions) -> PathBuf {
    let mut path = match options.layout {
        OutputLayout::Mirror => options.output_root.join(&file.relative_path),
        OutputLayout::Prefix => {
            let file_name = file
                .relative_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let dir = match file.relative_path.parent() {
                Some(parent) => options.output_root.join(parent),
                None => options.output_root.clone(),
            };
            dir.join(format!("{}{}", options.prefix, file_name))
        }
    };

    if let Some(format) = options.convert_format {
        path.set_extension(format.extension());
    }

    path
}
