//! # 文件收集器
//!
//! 扫描输入目录，收集候选图像文件列表。
//!
//! ## 功能
//! - 按扩展名识别图像（jpg, jpeg, png, gif, bmp, tiff, webp，大小写不敏感）
//! - 可选递归搜索，相对路径保留中间目录
//! - 排除目录（如位于输入目录内的输出目录）、文件名前缀与 glob 排除模式
//! - 结果按相对路径排序，保证可复现
//!
//! ## 依赖关系
//! - 被 `commands/optimize.rs`, `commands/scan.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配排除模式

use crate::error::{ImgoptError, Result};
use crate::models::{is_image_file, DiscoveredFile};

use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// 文件收集器
pub struct FileCollector {
    /// 扫描根目录
    root: PathBuf,
    /// 是否递归
    recursive: bool,
    /// 跳过的目录
    excluded_dirs: Vec<PathBuf>,
    /// 文件名排除模式
    excluded_patterns: Vec<Pattern>,
    /// 文件名排除前缀
    excluded_prefixes: Vec<String>,
}

impl FileCollector {
    /// 创建新的文件收集器
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            recursive: false,
            excluded_dirs: Vec::new(),
            excluded_patterns: Vec::new(),
            excluded_prefixes: Vec::new(),
        }
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 跳过某个目录及其子树（目录不存在时忽略）
    pub fn exclude_dir(mut self, dir: &Path) -> Self {
        if let Ok(canonical) = dir.canonicalize() {
            self.excluded_dirs.push(canonical);
        }
        self
    }

    /// 设置文件名排除模式（逗号分隔的多模式）
    pub fn with_exclude(mut self, patterns: &str) -> Result<Self> {
        for raw in patterns.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = Pattern::new(raw).map_err(|e| ImgoptError::InvalidPattern {
                pattern: raw.to_string(),
                reason: e.to_string(),
            })?;
            self.excluded_patterns.push(pattern);
        }
        Ok(self)
    }

    /// 跳过以 `prefix` 开头的文件名（如上次运行写回输入目录的输出）
    pub fn exclude_prefix(mut self, prefix: &str) -> Self {
        if !prefix.is_empty() {
            self.excluded_prefixes.push(prefix.to_string());
        }
        self
    }

    /// 收集所有候选图像文件
    pub fn discover(&self) -> Result<Vec<DiscoveredFile>> {
        if !self.root.is_dir() {
            return Err(ImgoptError::InvalidInput(format!(
                "not an existing directory: {}",
                self.root.display()
            )));
        }

        let root = self.root.canonicalize().map_err(|e| {
            ImgoptError::InvalidInput(format!("cannot resolve {}: {}", self.root.display(), e))
        })?;

        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let walker = WalkDir::new(&root)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !(e.file_type().is_dir() && self.is_excluded_dir(e.path())));

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping unreadable entry: {}", e);
                    continue;
                }
            };

            // 指向图像文件的符号链接也算候选；目录链接不跟随
            if !entry.path().is_file() || !is_image_file(entry.path()) {
                continue;
            }
            if self.matches_exclude(entry.path()) {
                debug!(path = %entry.path().display(), "excluded by pattern");
                continue;
            }

            let relative = match entry.path().strip_prefix(&root) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => continue,
            };
            files.push(DiscoveredFile::new(entry.path().to_path_buf(), relative));
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        debug!(root = %root.display(), count = files.len(), "discovery finished");
        Ok(files)
    }

    fn is_excluded_dir(&self, path: &Path) -> bool {
        self.excluded_dirs.iter().any(|d| d == path)
    }

    /// 检查文件名是否匹配任一排除模式
    fn matches_exclude(&self, path: &Path) -> bool {
        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };
        self.excluded_prefixes.iter().any(|p| filename.starts_with(p.as_str()))
            || self.excluded_patterns.iter().any(|p| p.matches(filename))
    }
}
