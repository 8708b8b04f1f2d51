//! # lsb_mark 库
//!
//! 本库包含 LSB 隐写与可见水印工具的核心逻辑。

// 声明库包含的所有模块。

pub mod bits;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod error;
pub mod handler;
pub mod pipeline;
pub mod steganography;
pub mod watermark;

pub use error::StegoError;
pub use pipeline::{EncodeOptions, Encoded, Steganographer, decode, encode};
