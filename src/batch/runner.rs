//! # 批量执行器
//!
//! 对发现的文件列表逐个执行转换，汇总结果并回报进度。
//!
//! ## 功能
//! - 前置校验失败时整个批次不开始
//! - 单文件失败只记录，不影响后续文件
//! - 默认顺序执行；`jobs > 1` 时使用 rayon 线程池
//! - 进度回调恰好调用 `total` 次，`processed` 严格递增
//! - 同一输出路径只属于发现顺序中的第一个文件，后来者记为失败
//!
//! ## 依赖关系
//! - 被 `commands/optimize.rs` 调用
//! - 使用 `batch/transform.rs`, `batch/output_path.rs`
//! - 使用 `rayon` 进行并行计算

use super::output_path::derive_output_path;
use super::transform::transform;
use crate::codec::ImageCodec;
use crate::error::{ErrorKind, ImgoptError, Result, TransformError};
use crate::models::{BatchOptions, DiscoveredFile, TransformRequest, TransformSummary};

use rayon::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, info};

/// 单个文件处理结果
pub type FileOutcome = std::result::Result<TransformSummary, TransformError>;

/// 进度事件
#[derive(Debug)]
pub struct ProgressEvent<'a> {
    /// 已处理数量（含本文件）
    pub processed: usize,
    /// 总数量
    pub total: usize,
    /// 刚处理完的文件
    pub file: &'a DiscoveredFile,
    /// 该文件的结果
    pub outcome: &'a FileOutcome,
}

/// 失败记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub relative_path: PathBuf,
    pub kind: ErrorKind,
    pub message: String,
}

/// 成功记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub relative_path: PathBuf,
    pub summary: TransformSummary,
}

/// 批量处理结果统计
#[derive(Debug, Default, Clone)]
pub struct BatchResult {
    /// 文件总数
    pub total: usize,
    /// 成功数量
    pub succeeded: usize,
    /// 失败数量
    pub failed: usize,
    /// 失败详情（按发现顺序）
    pub failures: Vec<FileFailure>,
    /// 成功写出的文件（按发现顺序）
    pub written: Vec<WrittenFile>,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, file: &DiscoveredFile, outcome: FileOutcome) {
        match outcome {
            Ok(summary) => {
                self.succeeded += 1;
                self.written.push(WrittenFile {
                    relative_path: file.relative_path.clone(),
                    summary,
                });
            }
            Err(err) => {
                self.failed += 1;
                self.failures.push(FileFailure {
                    relative_path: file.relative_path.clone(),
                    kind: err.kind(),
                    message: err.message().to_string(),
                });
            }
        }
    }

    /// 是否全部成功
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// 批量执行器
pub struct BatchRunner<C> {
    codec: C,
    /// 并行作业数（1 = 顺序执行）
    jobs: usize,
}

impl<C: ImageCodec> BatchRunner<C> {
    /// 创建新的批量执行器（顺序执行）
    pub fn new(codec: C) -> Self {
        Self { codec, jobs: 1 }
    }

    /// 设置并行作业数（0 = CPU 核数）
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 处理文件列表
    pub fn run<P>(
        &self,
        files: &[DiscoveredFile],
        options: &BatchOptions,
        on_progress: P,
    ) -> Result<BatchResult>
    where
        P: FnMut(&ProgressEvent<'_>) + Send,
    {
        options.validate()?;

        let total = files.len();
        let mut result = BatchResult {
            total,
            ..BatchResult::default()
        };
        if total == 0 {
            return Ok(result);
        }

        info!(
            total,
            jobs = self.jobs,
            output = %options.output_root.display(),
            "starting batch"
        );

        let plans = plan_outputs(files, options);
        let outcomes = if self.jobs <= 1 {
            self.run_sequential(files, &plans, options, on_progress)
        } else {
            self.run_parallel(files, &plans, options, on_progress)?
        };

        for (file, outcome) in files.iter().zip(outcomes) {
            result.merge(file, outcome);
        }

        info!(
            succeeded = result.succeeded,
            failed = result.failed,
            "batch finished"
        );
        Ok(result)
    }

    fn run_sequential<P>(
        &self,
        files: &[DiscoveredFile],
        plans: &[OutputPlan],
        options: &BatchOptions,
        mut on_progress: P,
    ) -> Vec<FileOutcome>
    where
        P: FnMut(&ProgressEvent<'_>),
    {
        let total = files.len();
        files
            .iter()
            .zip(plans)
            .enumerate()
            .map(|(index, (file, plan))| {
                let outcome = self.process(file, plan, options);
                on_progress(&ProgressEvent {
                    processed: index + 1,
                    total,
                    file,
                    outcome: &outcome,
                });
                outcome
            })
            .collect()
    }

    fn run_parallel<P>(
        &self,
        files: &[DiscoveredFile],
        plans: &[OutputPlan],
        options: &BatchOptions,
        on_progress: P,
    ) -> Result<Vec<FileOutcome>>
    where
        P: FnMut(&ProgressEvent<'_>) + Send,
    {
        let total = files.len();
        // 计数与回调放在同一把锁里，保证回调观察到的计数严格递增
        let progress = Mutex::new((0_usize, on_progress));

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| ImgoptError::ThreadPool(e.to_string()))?;

        let outcomes: Vec<FileOutcome> = pool.install(|| {
            files
                .par_iter()
                .zip(plans.par_iter())
                .map(|(file, plan)| {
                    let outcome = self.process(file, plan, options);

                    let mut guard = match progress.lock() {
                        Ok(guard) => guard,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    let (processed, callback) = &mut *guard;
                    *processed += 1;
                    callback(&ProgressEvent {
                        processed: *processed,
                        total,
                        file,
                        outcome: &outcome,
                    });

                    outcome
                })
                .collect()
        });

        Ok(outcomes)
    }

    /// 构造请求并执行单文件转换
    fn process(
        &self,
        file: &DiscoveredFile,
        plan: &OutputPlan,
        options: &BatchOptions,
    ) -> FileOutcome {
        let output_path = match plan {
            Ok(path) => path.clone(),
            Err(err) => {
                debug!(file = %file.display_path(), "skipped: {}", err);
                return Err(err.clone());
            }
        };

        let request = TransformRequest {
            input_path: file.absolute_path.clone(),
            output_path,
            max_width: options.max_width,
            max_height: options.max_height,
            quality: options.quality,
            convert_format: options.convert_format,
        };

        let outcome = transform(&self.codec, &request);
        if let Err(err) = &outcome {
            debug!(file = %file.display_path(), "failed: {}", err);
        }
        outcome
    }
}

/// 预先分配的输出路径，或与之冲突的原因
type OutputPlan = std::result::Result<PathBuf, TransformError>;

/// 按发现顺序为每个文件分配输出路径
///
/// 转换格式后 `a.png` 与 `a.bmp` 会得到同一个 `a.webp`；
/// 路径归先出现的文件，后出现的记为 `Io` 失败而不是静默覆盖。
fn plan_outputs(files: &[DiscoveredFile], options: &BatchOptions) -> Vec<OutputPlan> {
    let mut claimed: HashMap<PathBuf, &DiscoveredFile> = HashMap::new();
    files
        .iter()
        .map(|file| {
            let output = derive_output_path(file, options);
            match claimed.get(&output) {
                Some(owner) => Err(TransformError::Io(format!(
                    "output {} is already written from {}",
                    output.display(),
                    owner.display_path()
                ))),
                None => {
                    claimed.insert(output.clone(), file);
                    Ok(output)
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ImageCrateCodec;
    use crate::models::{ImageFormatKind, OutputLayout};
    use image::{ImageBuffer, Rgb};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// 不读写图像内容的假编解码器：尺寸写在文件内容里（"WxH"）
    struct FakeCodec;

    impl ImageCodec for FakeCodec {
        type Image = (u32, u32);

        fn decode(&self, path: &Path) -> std::result::Result<(u32, u32), TransformError> {
            let text = fs::read_to_string(path).map_err(|e| TransformError::Io(e.to_string()))?;
            let (w, h) = text
                .trim()
                .split_once('x')
                .ok_or_else(|| TransformError::Decode(format!("bad fixture: {text}")))?;
            let w = w.parse().map_err(|_| TransformError::Decode(text.clone()))?;
            let h = h.parse().map_err(|_| TransformError::Decode(text.clone()))?;
            Ok((w, h))
        }

        fn dimensions(&self, image: &(u32, u32)) -> (u32, u32) {
            *image
        }

        fn resize_to_fit(&self, image: (u32, u32), max_w: u32, max_h: u32) -> (u32, u32) {
            crate::codec::fit_within(image.0, image.1, max_w, max_h)
        }

        fn encode(
            &self,
            image: &(u32, u32),
            path: &Path,
            _quality: u8,
            _format: ImageFormatKind,
        ) -> std::result::Result<(), TransformError> {
            fs::write(path, format!("{}x{}", image.0, image.1))
                .map_err(|e| TransformError::Encode(e.to_string()))
        }
    }

    fn fixture(root: &Path, rel: &str, content: &str) -> DiscoveredFile {
        let abs = root.join(rel);
        fs::create_dir_all(abs.parent().expect("parent")).expect("mkdir");
        fs::write(&abs, content).expect("write");
        DiscoveredFile::new(abs, PathBuf::from(rel))
    }

    fn write_image(root: &Path, rel: &str, width: u32, height: u32) -> DiscoveredFile {
        let abs = root.join(rel);
        fs::create_dir_all(abs.parent().expect("parent")).expect("mkdir");
        let img = ImageBuffer::from_fn(width, height, |x, _y| Rgb([(x % 256) as u8, 0, 0]));
        img.save(&abs).expect("save");
        DiscoveredFile::new(abs, PathBuf::from(rel))
    }

    #[test]
    fn test_failure_isolation() {
        let input = TempDir::new().expect("tempdir");
        let output = TempDir::new().expect("tempdir");
        let files = vec![
            fixture(input.path(), "a.jpg", "1600x1200"),
            fixture(input.path(), "broken.jpg", "garbage"),
            fixture(input.path(), "sub/c.png", "300x900"),
        ];

        let options = BatchOptions::new(output.path()).with_bounds(800, 800);
        let result = BatchRunner::new(FakeCodec)
            .run(&files, &options, |_| {})
            .expect("run");

        assert_eq!(result.total, 3);
        assert_eq!(result.failed, 1);
        assert_eq!(result.succeeded, 2);
        assert_eq!(result.failures[0].relative_path, Path::new("broken.jpg"));
        assert_eq!(result.failures[0].kind, ErrorKind::Decode);

        let a = fs::read_to_string(output.path().join("a.jpg")).expect("a");
        assert_eq!(a, "800x600");
        let c = fs::read_to_string(output.path().join("sub/c.png")).expect("c");
        assert_eq!(c, "266x800");
    }

    #[test]
    fn test_progress_is_monotonic_and_complete() {
        let input = TempDir::new().expect("tempdir");
        let output = TempDir::new().expect("tempdir");
        let files: Vec<_> = (0..5)
            .map(|i| fixture(input.path(), &format!("{i}.png"), "10x10"))
            .collect();

        let mut seen = Vec::new();
        let result = BatchRunner::new(FakeCodec)
            .run(&files, &BatchOptions::new(output.path()), |event| {
                seen.push((event.processed, event.total));
            })
            .expect("run");

        assert_eq!(result.succeeded, 5);
        assert_eq!(seen, (1..=5).map(|i| (i, 5)).collect::<Vec<_>>());
    }

    #[test]
    fn test_parallel_keeps_invariants() {
        let input = TempDir::new().expect("tempdir");
        let output = TempDir::new().expect("tempdir");
        let mut files: Vec<_> = (0..20)
            .map(|i| fixture(input.path(), &format!("d{}/{i:02}.png", i % 3), "40x20"))
            .collect();
        files.push(fixture(input.path(), "zz_bad.png", "nope"));

        let mut seen = Vec::new();
        let result = BatchRunner::new(FakeCodec)
            .with_jobs(4)
            .run(&files, &BatchOptions::new(output.path()), |event| {
                seen.push(event.processed);
            })
            .expect("run");

        assert_eq!(result.total, 21);
        assert_eq!(result.succeeded, 20);
        assert_eq!(result.failed, 1);
        assert_eq!(seen, (1..=21).collect::<Vec<_>>());
        // 成功记录保持发现顺序
        let order: Vec<_> = result.written.iter().map(|w| w.relative_path.clone()).collect();
        let expected: Vec<_> = files[..20].iter().map(|f| f.relative_path.clone()).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn test_empty_input_returns_empty_result() {
        let output = TempDir::new().expect("tempdir");
        let mut calls = 0;
        let result = BatchRunner::new(FakeCodec)
            .run(&[], &BatchOptions::new(output.path()), |_| calls += 1)
            .expect("run");

        assert_eq!(result.total, 0);
        assert_eq!(result.succeeded, 0);
        assert_eq!(result.failed, 0);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_preflight_failure_touches_nothing() {
        let input = TempDir::new().expect("tempdir");
        let output = TempDir::new().expect("tempdir");
        let files = vec![fixture(input.path(), "a.jpg", "10x10")];

        let mut calls = 0;
        let options = BatchOptions::new(output.path().join("out")).with_quality(0);
        let result = BatchRunner::new(FakeCodec).run(&files, &options, |_| calls += 1);

        assert!(matches!(result, Err(ImgoptError::InvalidInput(_))));
        assert_eq!(calls, 0);
        assert!(!output.path().join("out").exists());
    }

    #[test]
    fn test_converted_name_collision_is_reported() {
        let input = TempDir::new().expect("tempdir");
        let output = TempDir::new().expect("tempdir");
        let files = vec![
            fixture(input.path(), "a.bmp", "20x20"),
            fixture(input.path(), "a.png", "10x10"),
            fixture(input.path(), "b.png", "5x5"),
        ];

        let options = BatchOptions::new(output.path()).with_format(Some(ImageFormatKind::Webp));
        for jobs in [1, 3] {
            let result = BatchRunner::new(FakeCodec)
                .with_jobs(jobs)
                .run(&files, &options, |_| {})
                .expect("run");

            assert_eq!(result.succeeded, 2);
            assert_eq!(result.failed, 1);
            assert_eq!(result.failures[0].relative_path, Path::new("a.png"));
            assert_eq!(result.failures[0].kind, ErrorKind::Io);
            assert!(result.failures[0].message.contains("a.bmp"));

            let a = fs::read_to_string(output.path().join("a.webp")).expect("a");
            assert_eq!(a, "20x20");
        }
    }

    #[test]
    fn test_output_root_equal_to_input_keeps_originals() {
        let input = TempDir::new().expect("tempdir");
        let files = vec![write_image(input.path(), "a.png", 400, 200)];

        let options = BatchOptions::new(input.path()).with_bounds(100, 100);
        let result = BatchRunner::new(ImageCrateCodec::new())
            .run(&files, &options, |_| {})
            .expect("run");

        assert_eq!(result.succeeded, 0);
        assert_eq!(result.failures[0].kind, ErrorKind::Io);
        let original = image::open(input.path().join("a.png")).expect("open");
        assert_eq!((original.width(), original.height()), (400, 200));
    }

    #[test]
    fn test_rerun_into_same_output_root() {
        let input = TempDir::new().expect("tempdir");
        let output = TempDir::new().expect("tempdir");
        let files = vec![
            write_image(input.path(), "a.png", 120, 80),
            write_image(input.path(), "nested/deeper/b.png", 50, 50),
        ];

        let runner = BatchRunner::new(ImageCrateCodec::new());
        let options = BatchOptions::new(output.path()).with_bounds(60, 60);
        for _ in 0..2 {
            let result = runner.run(&files, &options, |_| {}).expect("run");
            assert!(result.is_clean(), "{:?}", result.failures);
            assert_eq!(result.written[0].summary.resized, (60, 40));
            assert_eq!(result.written[1].summary.resized, (50, 50));
        }
    }

    #[test]
    fn test_real_codec_conversion_and_corrupt_file() {
        let input = TempDir::new().expect("tempdir");
        let files = vec![
            write_image(input.path(), "a.png", 64, 64),
            fixture(input.path(), "corrupt.jpg", "not really a jpeg"),
            write_image(input.path(), "sub/b.bmp", 32, 16),
        ];

        let options = BatchOptions::new(input.path())
            .with_layout(OutputLayout::Prefix, "optimized_")
            .with_format(Some(ImageFormatKind::Webp));
        let result = BatchRunner::new(ImageCrateCodec::new())
            .run(&files, &options, |_| {})
            .expect("run");

        assert_eq!(result.failed, 1);
        assert_eq!(result.failures[0].relative_path, Path::new("corrupt.jpg"));
        assert!(input.path().join("optimized_a.webp").is_file());
        assert!(input.path().join("sub").join("optimized_b.webp").is_file());
        for written in &result.written {
            assert_eq!(
                written.summary.output_path.extension().and_then(|e| e.to_str()),
                Some("webp")
            );
        }
    }
}
