//! # 单文件转换
//!
//! 对一个 `TransformRequest` 执行 解码 → 等比缩放 → 编码，
//! 以 `Result<TransformSummary, TransformError>` 返回结果，错误不越过文件边界。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `codec/` 的 `ImageCodec`

use crate::codec::ImageCodec;
use crate::error::TransformError;
use crate::models::{TransformRequest, TransformSummary};

use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// 执行单文件转换
pub fn transform<C: ImageCodec>(
    codec: &C,
    request: &TransformRequest,
) -> Result<TransformSummary, TransformError> {
    if !request.input_path.is_file() {
        return Err(TransformError::NotFound(
            request.input_path.display().to_string(),
        ));
    }

    let format = request.target_format().ok_or_else(|| {
        TransformError::Encode(format!(
            "cannot determine output format for {}",
            request.input_path.display()
        ))
    })?;

    if is_same_file(&request.input_path, &request.output_path) {
        return Err(TransformError::Io(format!(
            "output would overwrite its input {}",
            request.input_path.display()
        )));
    }

    ensure_parent_dir(&request.output_path)?;

    let image = codec.decode(&request.input_path)?;
    let original = codec.dimensions(&image);
    let image = codec.resize_to_fit(image, request.max_width, request.max_height);
    let resized = codec.dimensions(&image);

    codec.encode(&image, &request.output_path, request.quality, format)?;

    debug!(
        input = %request.input_path.display(),
        output = %request.output_path.display(),
        "{}x{} -> {}x{} ({})",
        original.0,
        original.1,
        resized.0,
        resized.1,
        format
    );

    Ok(TransformSummary {
        output_path: request.output_path.clone(),
        original,
        resized,
        format,
    })
}

/// 两个路径是否指向同一个已存在的文件
fn is_same_file(input: &Path, output: &Path) -> bool {
    match (input.canonicalize(), output.canonicalize()) {
        (Ok(input), Ok(output)) => input == output,
        _ => false,
    }
}

/// 创建输出文件的父目录；目录已存在（包括并发创建）视为成功
fn ensure_parent_dir(output_path: &Path) -> Result<(), TransformError> {
    let parent = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => return Ok(()),
    };

    match fs::create_dir_all(parent) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && parent.is_dir() => Ok(()),
        Err(e) => Err(TransformError::Io(format!(
            "cannot create directory {}: {}",
            parent.display(),
            e
        ))),
    }
}
