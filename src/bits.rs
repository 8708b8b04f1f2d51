//! # 比特打包模块
//!
//! 在消息字符串与比特序列之间转换，并定义结束标记约定：
//! 每个字符按大端序展开为 8 个比特，末尾追加 16 个零比特。

use crate::constants::{BITS_PER_CHAR, TERMINATOR_BITS};
use crate::error::StegoError;

/// 单个字符展开后的比特宽度。
///
/// 码点不超过 255 时固定为 8；更大的码点按其最短二进制表示展开，
/// 会破坏后续所有字符的字节对齐。
fn char_width(ch: char) -> usize {
    let significant = (u32::BITS - (ch as u32).leading_zeros()) as usize;
    significant.max(BITS_PER_CHAR)
}

/// 计算 [`pack`] 为该消息生成的比特数 (含结束标记)。
pub fn payload_len(message: &str) -> usize {
    message.chars().map(char_width).sum::<usize>() + TERMINATOR_BITS
}

/// 将消息转换为比特序列，末尾附带 16 比特的零结束标记。
///
/// 码点大于 255 的字符不会被截断或拒绝，详见 [`check_encodable`]。
pub fn pack(message: &str) -> Vec<bool> {
    let mut bits = Vec::with_capacity(payload_len(message));

    for ch in message.chars() {
        let code = ch as u32;
        bits.extend((0..char_width(ch)).rev().map(|shift| ((code >> shift) & 1) != 0));
    }

    bits.extend(std::iter::repeat_n(false, TERMINATOR_BITS));
    bits
}

/// 严格模式下的字符检查：找到第一个无法用单字节表示的字符即返回错误。
pub fn check_encodable(message: &str) -> Result<(), StegoError> {
    match message.chars().enumerate().find(|&(_, ch)| u32::from(ch) > 0xFF) {
        Some((index, ch)) => Err(StegoError::UnencodableChar { ch, index }),
        None => Ok(()),
    }
}

/// 将比特序列还原为消息。
///
/// 按 8 比特一组读取；遇到全零字节或不足 8 比特的尾部即停止。
pub fn unpack(bits: &[bool]) -> String {
    bits.chunks_exact(BITS_PER_CHAR)
        .map(|byte| byte.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8))
        .take_while(|&byte| byte != 0)
        .map(char::from)
        .collect()
}
