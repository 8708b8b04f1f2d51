//! # 错误类型模块
//!
//! 核心算法在宽松模式下不会失败；只有严格模式的前置检查和图像编解码会产生 [`StegoError`]。

use thiserror::Error;

/// 隐写流程中可能出现的错误。
#[derive(Debug, Error)]
pub enum StegoError {
    /// 载荷比特数超过图像像素数。
    #[error("payload needs {required} bits but the image only has {available} pixels")]
    CapacityExceeded { required: usize, available: usize },

    /// 消息中存在码点大于 255 的字符，无法用单字节表示。
    #[error("character {ch:?} at index {index} does not fit in a single byte")]
    UnencodableChar { ch: char, index: usize },

    /// 载荷末尾的像素落在水印覆盖区域之内，水印会破坏隐藏的数据。
    #[error("payload ends at pixel {payload_end} but the watermark starts at pixel {watermark_start}")]
    WatermarkOverlap {
        payload_end: usize,
        watermark_start: usize,
    },

    #[error(transparent)]
    Codec(#[from] image::ImageError),
}
