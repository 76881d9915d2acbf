//! # optimize 命令实现
//!
//! 批量缩放图像并可选转换格式。
//!
//! ## 功能
//! - 前置校验（目录、尺寸、质量）
//! - 收集输入文件，跳过位于输入目录内的输出
//! - 顺序或并行处理，进度条显示
//! - 结果汇总与可选 CSV 报告
//!
//! ## 依赖关系
//! - 使用 `cli/optimize.rs` 定义的参数
//! - 使用 `batch/`, `codec/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`, `utils/report.rs`

use crate::batch::{BatchRunner, FileCollector};
use crate::cli::optimize::{LayoutArgs, OptimizeArgs, SourceArgs};
use crate::codec::ImageCrateCodec;
use crate::error::{ImgoptError, Result};
use crate::models::options::DEFAULT_OUTPUT_DIR;
use crate::models::{BatchOptions, OutputLayout};
use crate::utils::{output, progress, report};

use std::path::{Path, PathBuf};

/// 失败列表最多打印的行数
const MAX_LISTED_FAILURES: usize = 10;

/// 执行 optimize 命令
pub fn execute(args: OptimizeArgs) -> Result<()> {
    output::print_header("Optimizing images");

    let (max_width, max_height) = args.bounds();
    let options = build_options(&args.source, &args.layout, max_width, max_height)
        .with_quality(args.quality);
    options.validate()?;

    let files = build_collector(&args.source, &options)?.discover()?;

    if files.is_empty() {
        output::print_warning(&format!(
            "No images found in '{}'",
            args.source.input.display()
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} image(s)", files.len()));
    output::print_info(&format!(
        "Bounding box {}x{}, quality {}, format {}",
        options.max_width,
        options.max_height,
        options.quality,
        options
            .convert_format
            .map(|f| f.to_string())
            .unwrap_or_else(|| "unchanged".to_string())
    ));
    if let Some(format) = options.convert_format.filter(|f| !f.supports_quality()) {
        output::print_info(&format!("Quality has no effect on {} output", format));
    }
    output::print_info(&format!(
        "Writing to '{}' ({} layout)",
        options.output_root.display(),
        options.layout
    ));

    let runner = BatchRunner::new(ImageCrateCodec::new()).with_jobs(args.jobs);
    if runner.jobs() > 1 {
        output::print_info(&format!("Using {} parallel jobs", runner.jobs()));
    }

    let pb = progress::create_progress_bar(files.len() as u64, "Optimizing");
    let result = runner.run(&files, &options, |event| {
        if let Err(err) = event.outcome {
            pb.suspend(|| output::print_file_error(&event.file.display_path(), &err.to_string()));
        }
        pb.set_length(event.total as u64);
        pb.set_position(event.processed as u64);
    })?;
    pb.finish_and_clear();

    output::print_separator();
    output::print_done(&format!(
        "{} succeeded, {} failed ({} total)",
        result.succeeded, result.failed, result.total
    ));

    if result.is_clean() {
        output::print_success(&format!(
            "All images written to '{}'",
            options.output_root.display()
        ));
    } else {
        output::print_warning("Failed files:");
        println!(
            "{}",
            report::failure_table(&result.failures, MAX_LISTED_FAILURES)
        );
        if result.failures.len() > MAX_LISTED_FAILURES {
            output::print_warning(&format!(
                "  ... and {} more",
                result.failures.len() - MAX_LISTED_FAILURES
            ));
        }
    }

    if let Some(report_path) = &args.report {
        report::write_csv(&result, report_path)?;
        output::print_success(&format!("Report saved to '{}'", report_path.display()));
    }

    Ok(())
}

/// 输出根目录：显式指定，否则镜像策略用 `<input>/optimized`，前缀策略写回输入目录
pub fn resolve_output_root(input: &Path, layout: &LayoutArgs) -> PathBuf {
    match (&layout.output, layout.layout) {
        (Some(dir), _) => dir.clone(),
        (None, OutputLayout::Mirror) => input.join(DEFAULT_OUTPUT_DIR),
        (None, OutputLayout::Prefix) => input.to_path_buf(),
    }
}

/// 由 CLI 参数构造批处理配置（质量使用默认值）
pub fn build_options(
    source: &SourceArgs,
    layout: &LayoutArgs,
    max_width: u32,
    max_height: u32,
) -> BatchOptions {
    BatchOptions::new(resolve_output_root(&source.input, layout))
        .with_bounds(max_width, max_height)
        .with_format(layout.format)
        .with_layout(layout.layout, &layout.prefix)
}

/// 构造文件收集器，避免把本次或上次的输出当作输入
///
/// 镜像策略的输出根目录不能是输入目录本身，否则会覆盖原图。
pub fn build_collector(source: &SourceArgs, options: &BatchOptions) -> Result<FileCollector> {
    if options.layout == OutputLayout::Mirror && is_same_dir(&options.output_root, &source.input) {
        return Err(ImgoptError::InvalidInput(format!(
            "output directory '{}' is the input directory; mirror layout would overwrite the originals (use another --output or --layout prefix)",
            options.output_root.display()
        )));
    }

    let mut collector = FileCollector::new(&source.input)
        .recursive(source.recursive)
        .exclude_dir(&options.output_root);

    if options.layout == OutputLayout::Prefix && is_within(&options.output_root, &source.input) {
        collector = collector.exclude_prefix(&options.prefix);
    }

    if let Some(patterns) = &source.exclude {
        collector = collector.with_exclude(patterns)?;
    }

    Ok(collector)
}

fn is_same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// `path` 是否位于 `dir` 内（含相等）；路径不存在时按字面比较
fn is_within(path: &Path, dir: &Path) -> bool {
    match (path.canonicalize(), dir.canonicalize()) {
        (Ok(path), Ok(dir)) => path.starts_with(dir),
        _ => path.starts_with(dir),
    }
}
