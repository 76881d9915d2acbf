//! # scan 命令实现
//!
//! 列出将被处理的图像及其输出路径，不写入任何文件。
//!
//! ## 依赖关系
//! - 使用 `cli/scan.rs` 定义的参数
//! - 复用 `commands/optimize.rs` 的配置构造
//! - 使用 `batch/`, `utils/report.rs`

use super::optimize::{build_collector, build_options};
use crate::batch::derive_output_path;
use crate::cli::scan::ScanArgs;
use crate::error::Result;
use crate::models::options::{DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH};
use crate::models::{BatchOptions, DiscoveredFile};
use crate::utils::output;
use crate::utils::report::{self, PlanRow};

/// 执行 scan 命令
pub fn execute(args: ScanArgs) -> Result<()> {
    output::print_header("Scanning images");

    let options = build_options(
        &args.source,
        &args.layout,
        DEFAULT_MAX_WIDTH,
        DEFAULT_MAX_HEIGHT,
    );
    options.validate()?;

    let files = build_collector(&args.source, &options)?.discover()?;

    if files.is_empty() {
        output::print_warning(&format!(
            "No images found in '{}'",
            args.source.input.display()
        ));
        return Ok(());
    }

    let rows = plan_rows(&files, &options, args.limit);
    println!("{}", report::plan_table(&rows));

    if rows.len() < files.len() {
        output::print_info(&format!("  ... and {} more", files.len() - rows.len()));
    }

    output::print_info(&format!(
        "Found {} image(s); output root '{}' ({} layout)",
        files.len(),
        options.output_root.display(),
        options.layout
    ));

    Ok(())
}

/// 生成预览行（limit = 0 表示全部）
fn plan_rows(files: &[DiscoveredFile], options: &BatchOptions, limit: usize) -> Vec<PlanRow> {
    let limit = if limit == 0 { files.len() } else { limit };
    files
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, file)| PlanRow {
            index: i + 1,
            input: file.display_path(),
            output: derive_output_path(file, options).display().to_string(),
        })
        .collect()
}
