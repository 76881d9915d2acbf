//! # 批处理报告
//!
//! - CSV 报告：每个文件一行（成功与失败）
//! - 终端表格：失败列表、扫描预览
//!
//! ## 依赖关系
//! - 被 `commands/optimize.rs`, `commands/scan.rs` 调用
//! - 使用 `csv` + `serde` 写入 CSV，`tabled` 渲染表格

use crate::batch::{BatchResult, FileFailure};
use crate::error::{ImgoptError, Result};

use serde::Serialize;
use std::path::Path;
use tabled::{Table, Tabled};

/// CSV 报告行
#[derive(Debug, Serialize)]
struct ReportRow {
    relative_path: String,
    status: &'static str,
    format: String,
    output_path: String,
    original: String,
    output: String,
    error: String,
}

fn size(dims: (u32, u32)) -> String {
    format!("{}x{}", dims.0, dims.1)
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// 导出批处理结果为 CSV，成功与失败按相对路径（即发现顺序）交错排列
pub fn write_csv(result: &BatchResult, output_path: &Path) -> Result<()> {
    let mut rows: Vec<(&Path, ReportRow)> =
        Vec::with_capacity(result.written.len() + result.failures.len());

    for written in &result.written {
        let row = ReportRow {
            relative_path: slash_path(&written.relative_path),
            status: "ok",
            format: written.summary.format.to_string(),
            output_path: written.summary.output_path.display().to_string(),
            original: size(written.summary.original),
            output: size(written.summary.resized),
            error: String::new(),
        };
        rows.push((written.relative_path.as_path(), row));
    }

    for failure in &result.failures {
        let row = ReportRow {
            relative_path: slash_path(&failure.relative_path),
            status: "failed",
            format: String::new(),
            output_path: String::new(),
            original: String::new(),
            output: String::new(),
            error: format!("{}: {}", failure.kind, failure.message),
        };
        rows.push((failure.relative_path.as_path(), row));
    }

    rows.sort_by(|a, b| a.0.cmp(b.0));

    let mut wtr = csv::Writer::from_path(output_path)?;
    for (_, row) in rows {
        wtr.serialize(row)?;
    }

    wtr.flush().map_err(|e| ImgoptError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 失败列表表格（最多 `limit` 行）
pub fn failure_table(failures: &[FileFailure], limit: usize) -> String {
    #[derive(Tabled)]
    struct FailureRow {
        #[tabled(rename = "File")]
        file: String,
        #[tabled(rename = "Kind")]
        kind: String,
        #[tabled(rename = "Message")]
        message: String,
    }

    let rows: Vec<FailureRow> = failures
        .iter()
        .take(limit)
        .map(|f| FailureRow {
            file: slash_path(&f.relative_path),
            kind: f.kind.to_string(),
            message: f.message.clone(),
        })
        .collect();

    Table::new(&rows).to_string()
}

/// 扫描预览的一行
#[derive(Tabled)]
pub struct PlanRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Input")]
    pub input: String,
    #[tabled(rename = "Output")]
    pub output: String,
}

/// 扫描预览表格
pub fn plan_table(rows: &[PlanRow]) -> String {
    Table::new(rows).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::WrittenFile;
    use crate::error::ErrorKind;
    use crate::models::{ImageFormatKind, TransformSummary};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn sample_result() -> BatchResult {
        BatchResult {
            total: 2,
            succeeded: 1,
            failed: 1,
            written: vec![WrittenFile {
                relative_path: PathBuf::from("sub").join("a.jpg"),
                summary: TransformSummary {
                    output_path: PathBuf::from("/out/sub/a.webp"),
                    original: (1600, 1200),
                    resized: (800, 600),
                    format: ImageFormatKind::Webp,
                },
            }],
            failures: vec![FileFailure {
                relative_path: PathBuf::from("broken.png"),
                kind: ErrorKind::Decode,
                message: "bad header".to_string(),
            }],
        }
    }

    #[test]
    fn test_write_csv() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("report.csv");
        write_csv(&sample_result(), &path).expect("write csv");

        let mut reader = csv::Reader::from_path(&path).expect("reader");
        let headers = reader.headers().expect("headers").clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec![
                "relative_path",
                "status",
                "format",
                "output_path",
                "original",
                "output",
                "error"
            ]
        );

        let records: Vec<_> = reader.records().map(|r| r.expect("record")).collect();
        assert_eq!(records.len(), 2);
        // broken.png 在 sub/a.jpg 之前被处理
        assert_eq!(&records[0][0], "broken.png");
        assert_eq!(&records[0][1], "failed");
        assert_eq!(&records[0][6], "decode: bad header");
        assert_eq!(&records[1][0], "sub/a.jpg");
        assert_eq!(&records[1][1], "ok");
        assert_eq!(&records[1][2], "webp");
        assert_eq!(&records[1][5], "800x600");
    }

    #[test]
    fn test_failure_table_mentions_file_and_message() {
        let table = failure_table(&sample_result().failures, 10);
        assert!(table.contains("broken.png"));
        assert!(table.contains("bad header"));
        assert!(table.contains("decode"));
    }

    #[test]
    fn test_plan_table() {
        let table = plan_table(&[PlanRow {
            index: 1,
            input: "a.jpg".to_string(),
            output: "optimized/a.jpg".to_string(),
        }]);
        assert!(table.contains("optimized/a.jpg"));
    }
}
