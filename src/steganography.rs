use crate::constants::{BITS_PER_CHAR, TERMINATOR_BITS};
use image::RgbaImage;

/// 红色通道在 RGBA 像素中的下标。
const RED: usize = 0;

/// 图像最多能容纳的载荷比特数，即像素总数。
pub fn capacity(pix: &RgbaImage) -> usize {
    pix.width() as usize * pix.height() as usize
}

/// 在不截断的前提下能隐藏的最长单字节消息长度。
pub fn max_message_len(pix: &RgbaImage) -> usize {
    capacity(pix).saturating_sub(TERMINATOR_BITS) / BITS_PER_CHAR
}

/// 将比特序列按像素顺序写入红色通道的最低位。
///
/// 第 i 个比特写入第 i 个像素；超出像素数的比特被丢弃，不报错。
/// 返回实际写入的比特数。
pub fn embed(pix: &mut RgbaImage, bits: &[bool]) -> usize {
    let mut written = 0;
    for (pixel, &bit) in pix.pixels_mut().zip(bits) {
        let red = &mut pixel.0[RED];
        *red = (*red & 0xFE) | bit as u8;
        written += 1;
    }
    written
}

/// 按像素顺序读出每个像素红色通道的最低位，共 `capacity(pix)` 个比特。
pub fn extract(pix: &RgbaImage) -> Vec<bool> {
    pix.pixels().map(|pixel| (pixel.0[RED] & 1) != 0).collect()
}
