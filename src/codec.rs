//! # 图像编解码模块
//!
//! 核心算法只处理 [`RgbaImage`]；文件字节与像素缓冲之间的转换通过 [`ImageCodec`] 注入。

use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

/// 字节与像素缓冲之间的编解码能力。
pub trait ImageCodec {
    /// 将图像文件字节解码为 RGBA 像素缓冲。
    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, image::ImageError>;

    /// 将像素缓冲编码为图像文件字节。输出格式必须无损，否则隐藏的比特会丢失。
    fn encode(&self, pix: &RgbaImage) -> Result<Vec<u8>, image::ImageError>;
}

/// 读取 `image` crate 已启用的任意格式 (PNG, BMP, TIFF, WebP, QOI)，始终输出 PNG。
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl ImageCodec for PngCodec {
    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, image::ImageError> {
        Ok(image::load_from_memory(bytes)?.into_rgba8())
    }

    fn encode(&self, pix: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
        let mut out = Cursor::new(Vec::new());
        pix.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }
}
