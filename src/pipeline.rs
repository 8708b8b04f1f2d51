//! # 编码/解码流程模块
//!
//! 编码：打包比特 → 写入载荷 → 绘制水印，严格按此顺序，水印必须在载荷之后写入。
//! 解码：读取比特 → 组装消息。
//!
//! 默认的宽松模式保持原有行为：容量不足时静默截断，宽字符照常展开，水印可以覆盖载荷。
//! 严格模式把这三种情况改为返回 [`StegoError`]。

use crate::bits::{check_encodable, pack, unpack};
use crate::codec::ImageCodec;
use crate::error::StegoError;
use crate::steganography::{capacity, embed, extract};
use crate::watermark::Watermark;
use image::RgbaImage;
use log::{debug, warn};

/// 编码选项。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// 开启后，容量不足、宽字符以及载荷与水印重叠都会报错，而不是静默降级。
    pub strict: bool,
}

/// 编码结果。
#[derive(Debug, Clone)]
pub struct Encoded {
    pub image: RgbaImage,
    /// 实际写入图像的比特数。
    pub bits_written: usize,
    /// 完整载荷 (含结束标记) 的比特数。
    pub bits_required: usize,
}

impl Encoded {
    /// 载荷是否因容量不足被截断。
    pub fn is_truncated(&self) -> bool {
        self.bits_written < self.bits_required
    }
}

/// 在严格模式下检查载荷能否完整、安全地写入。
fn check_payload(
    pix: &RgbaImage,
    message: &str,
    bits: &[bool],
    watermark: &Watermark,
) -> Result<(), StegoError> {
    check_encodable(message)?;

    let available = capacity(pix);
    if bits.len() > available {
        return Err(StegoError::CapacityExceeded {
            required: bits.len(),
            available,
        });
    }

    if let Some(footprint) = watermark.footprint(pix.width(), pix.height()) {
        let watermark_start = footprint.first_pixel(pix.width());
        if bits.len() > watermark_start {
            return Err(StegoError::WatermarkOverlap {
                payload_end: bits.len() - 1,
                watermark_start,
            });
        }
    }

    Ok(())
}

/// 将消息隐藏到图像中，然后绘制可见水印。
///
/// # Errors
///
/// 宽松模式下不会失败。严格模式下可能返回：
/// * [`StegoError::UnencodableChar`] - 消息含有码点大于 255 的字符。
/// * [`StegoError::CapacityExceeded`] - 载荷比特数超过像素数。
/// * [`StegoError::WatermarkOverlap`] - 载荷延伸到了水印区域。
pub fn encode(
    mut image: RgbaImage,
    message: &str,
    watermark: &str,
    options: EncodeOptions,
) -> Result<Encoded, StegoError> {
    let watermark = Watermark::new(watermark);
    let bits = pack(message);
    debug!(
        "packed {} chars into {} bits for a {}x{} image",
        message.chars().count(),
        bits.len(),
        image.width(),
        image.height()
    );

    if options.strict {
        check_payload(&image, message, &bits, &watermark)?;
    }

    let bits_written = embed(&mut image, &bits);
    if bits_written < bits.len() {
        warn!(
            "image holds {} bits, payload truncated from {} bits",
            bits_written,
            bits.len()
        );
    }

    watermark.draw(&mut image);
    debug!("watermark {:?} drawn", watermark.text());

    Ok(Encoded {
        image,
        bits_written,
        bits_required: bits.len(),
    })
}

/// 从图像中读取隐藏的消息。任何图像都能得到一个结果，未隐写的图像得到的是噪声或空串。
pub fn decode(image: &RgbaImage) -> String {
    let bits = extract(image);
    let message = unpack(&bits);
    debug!(
        "read {} bits, assembled {} chars",
        bits.len(),
        message.chars().count()
    );
    message
}

/// 绑定了图像编解码器的隐写器，直接处理图像文件字节。
#[derive(Debug, Clone, Default)]
pub struct Steganographer<C> {
    codec: C,
    options: EncodeOptions,
}

impl<C: ImageCodec> Steganographer<C> {
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            options: EncodeOptions::default(),
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.options.strict = strict;
        self
    }

    /// 解码载体字节，隐藏消息并绘制水印，再重新编码为图像字节。
    pub fn encode(
        &self,
        carrier: &[u8],
        message: &str,
        watermark: &str,
    ) -> Result<(Vec<u8>, Encoded), StegoError> {
        let image = self.codec.decode(carrier)?;
        let encoded = encode(image, message, watermark, self.options)?;
        let bytes = self.codec.encode(&encoded.image)?;
        Ok((bytes, encoded))
    }

    /// 解码载体字节并读取隐藏的消息。
    pub fn decode(&self, carrier: &[u8]) -> Result<String, StegoError> {
        let image = self.codec.decode(carrier)?;
        Ok(decode(&image))
    }
}
