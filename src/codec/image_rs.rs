//! # 基于 `image` crate 的编解码实现
//!
//! ## 依赖关系
//! - 被 `commands/optimize.rs` 作为默认编解码器使用
//! - 使用 `image` crate 完成解码、Lanczos3 缩放与各格式编码

use super::{fit_within, ImageCodec};
use crate::error::TransformError;
use crate::models::ImageFormatKind;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// `image` crate 编解码器
#[derive(Debug, Clone, Copy)]
pub struct ImageCrateCodec {
    filter: FilterType,
}

impl Default for ImageCrateCodec {
    fn default() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }
}

impl ImageCrateCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageCodec for ImageCrateCodec {
    type Image = DynamicImage;

    fn decode(&self, path: &Path) -> Result<DynamicImage, TransformError> {
        let reader = ImageReader::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => TransformError::NotFound(path.display().to_string()),
            _ => TransformError::Io(format!("{}: {}", path.display(), e)),
        })?;

        reader
            .with_guessed_format()
            .map_err(|e| TransformError::Io(format!("{}: {}", path.display(), e)))?
            .decode()
            .map_err(|e| TransformError::Decode(e.to_string()))
    }

    fn dimensions(&self, image: &DynamicImage) -> (u32, u32) {
        (image.width(), image.height())
    }

    fn resize_to_fit(&self, image: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
        let (width, height) = (image.width(), image.height());
        let (target_w, target_h) = fit_within(width, height, max_width, max_height);
        if (target_w, target_h) == (width, height) {
            return image;
        }
        image.resize_exact(target_w, target_h, self.filter)
    }

    fn encode(
        &self,
        image: &DynamicImage,
        path: &Path,
        quality: u8,
        format: ImageFormatKind,
    ) -> Result<(), TransformError> {
        let file = File::create(path)
            .map_err(|e| TransformError::Encode(format!("{}: {}", path.display(), e)))?;
        let mut writer = BufWriter::new(file);

        let result = write_image(image, &mut writer, quality, format).and_then(|_| {
            writer
                .flush()
                .map_err(|e| TransformError::Encode(e.to_string()))
        });

        if result.is_err() {
            // 不留下写了一半的文件
            drop(writer);
            fs::remove_file(path).ok();
        }
        result
    }
}

/// 按目标格式编码
fn write_image(
    image: &DynamicImage,
    writer: &mut BufWriter<File>,
    quality: u8,
    format: ImageFormatKind,
) -> Result<(), TransformError> {
    let encoded = match format {
        ImageFormatKind::Jpeg => {
            // JPEG 不支持 alpha 通道
            let rgb = image.to_rgb8();
            JpegEncoder::new_with_quality(writer, quality).encode_image(&rgb)
        }
        ImageFormatKind::Png => {
            let encoder =
                PngEncoder::new_with_quality(writer, CompressionType::Best, PngFilterType::Adaptive);
            png_compatible(image).write_with_encoder(encoder)
        }
        ImageFormatKind::Webp => {
            normalize_8bit(image).write_with_encoder(WebPEncoder::new_lossless(writer))
        }
        ImageFormatKind::Gif => normalize_8bit(image).write_to(writer, ImageFormat::Gif),
        ImageFormatKind::Bmp => normalize_8bit(image).write_to(writer, ImageFormat::Bmp),
        ImageFormatKind::Tiff => normalize_8bit(image).write_to(writer, ImageFormat::Tiff),
    };

    encoded.map_err(|e| TransformError::Encode(e.to_string()))
}

/// PNG 支持 8/16 位整数通道；浮点图像（如 32 位 TIFF）转为 16 位
fn png_compatible(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageRgb32F(_) => Cow::Owned(DynamicImage::ImageRgb16(image.to_rgb16())),
        DynamicImage::ImageRgba32F(_) => Cow::Owned(DynamicImage::ImageRgba16(image.to_rgba16())),
        _ => Cow::Borrowed(image),
    }
}

/// 转为 8 位 RGB/RGBA，保证各编码器都能接受
fn normalize_8bit(image: &DynamicImage) -> DynamicImage {
    if image.color().has_alpha() {
        DynamicImage::ImageRgba8(image.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    }
}
