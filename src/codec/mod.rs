//! # 图像编解码模块
//!
//! 将解码/缩放/编码抽象为 `ImageCodec` trait，批处理逻辑只依赖该 trait。
//!
//! ## 功能
//! - `ImageCodec`: 解码 → 等比缩放 → 编码 三步接口
//! - `fit_within`: 等比缩放到边界框内的尺寸计算（不放大）
//! - `ImageCrateCodec`: 基于 `image` crate 的默认实现
//!
//! ## 依赖关系
//! - 被 `batch/transform.rs`, `batch/runner.rs` 使用
//! - 使用 `models/format.rs`

pub mod image_rs;

pub use image_rs::ImageCrateCodec;

use crate::error::TransformError;
use crate::models::ImageFormatKind;
use std::path::Path;

/// 图像编解码能力
pub trait ImageCodec: Send + Sync {
    /// 解码后的图像句柄
    type Image;

    /// 从文件解码
    fn decode(&self, path: &Path) -> Result<Self::Image, TransformError>;

    /// (宽, 高)
    fn dimensions(&self, image: &Self::Image) -> (u32, u32);

    /// 等比缩放到 `max_width` x `max_height` 以内，不放大
    fn resize_to_fit(&self, image: Self::Image, max_width: u32, max_height: u32) -> Self::Image;

    /// 编码写出到 `path`
    fn encode(
        &self,
        image: &Self::Image,
        path: &Path,
        quality: u8,
        format: ImageFormatKind,
    ) -> Result<(), TransformError>;
}

/// 计算等比缩放后的尺寸
///
/// 两边都不超过上限时原样返回；否则受限的一边恰好等于上限，
/// 另一边按比例向下取整（至少 1 像素）。
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let (w, h) = (u64::from(width), u64::from(height));
    let (mw, mh) = (u64::from(max_width), u64::from(max_height));

    // 比较 mw/w 与 mh/h，避免浮点误差
    if mw * h <= mh * w {
        let scaled_h = (h * mw / w).max(1);
        (max_width, scaled_h as u32)
    } else {
        let scaled_w = (w * mh / h).max(1);
        (scaled_w as u32, max_height)
    }
}
