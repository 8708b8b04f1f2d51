//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、检查输入、调用核心隐写流程以及向用户报告结果。

use crate::cli::{CapacityArgs, HideArgs, MessageSource, RecoverArgs};
use crate::codec::{ImageCodec, PngCodec};
use crate::constants::{HIDDEN_IMAGE_PREFIX, RECOVERED_TEXT_PREFIX};
use crate::pipeline::Steganographer;
use crate::steganography::{capacity, max_message_len};
use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// 根据输入文件生成默认输出路径：同目录下的 `<前缀><文件名>.<扩展名>`。
fn default_output_path(input: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{prefix}{stem}.{extension}"))
}

/// 目标文件已存在且未指定 `--force` 时拒绝覆盖。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

fn read_image(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

fn read_message(source: &MessageSource) -> Result<String> {
    match (&source.message, &source.text) {
        (Some(message), _) => Ok(message.clone()),
        (None, Some(path)) => fs::read_to_string(path).with_context(|| {
            format!(
                "Unable to read text file: {}",
                path.to_string_lossy().red().bold()
            )
        }),
        (None, None) => Ok(String::new()),
    }
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和文本、检查输入是否为空、调用隐写流程隐藏文本并绘制水印，
/// 最后将结果以 PNG 格式写入目标文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径和选项的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或文本文件。
/// * 消息或水印为空。
/// * 目标文件已存在且未指定 `--force`。
/// * 图像无法解码，或在严格模式下载荷无法完整安全地写入。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let picture = read_image(&args.image)?;
    let message = read_message(&args.source)?;

    anyhow::ensure!(
        !message.is_empty() && !args.watermark.is_empty(),
        "Please provide image, message, and watermark."
    );

    let dest = args
        .dest
        .unwrap_or_else(|| default_output_path(&args.image, HIDDEN_IMAGE_PREFIX, "png"));
    ensure_writable(&dest, args.force)?;

    let stego = Steganographer::new(PngCodec).strict(args.strict);
    let (output, encoded) = stego
        .encode(&picture, &message, &args.watermark)
        .with_context(|| {
            format!(
                "Failed to hide the message in '{}'.",
                args.image.to_string_lossy().red().bold()
            )
        })?;

    if encoded.is_truncated() {
        println!(
            "{} only {} of {} payload bits fit in the image, the hidden text is truncated.",
            "Warning:".yellow().bold(),
            encoded.bits_written.to_string().red().bold(),
            encoded.bits_required.to_string().green().bold()
        );
    }

    fs::write(&dest, output).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    info!(
        "hid {} bits in {}",
        encoded.bits_written,
        dest.to_string_lossy()
    );
    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、提取隐藏的文本并打印，
/// 最后将恢复的文本内容写入目标文本文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取或解码输入的图像文件。
/// * 目标文件已存在且未指定 `--force`。
/// * 无法写入到目标文本文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let picture = read_image(&args.image)?;

    let text_path = args
        .text
        .unwrap_or_else(|| default_output_path(&args.image, RECOVERED_TEXT_PREFIX, "txt"));
    ensure_writable(&text_path, args.force)?;

    let message = Steganographer::new(PngCodec)
        .decode(&picture)
        .with_context(|| {
            format!(
                "Failed to decode image '{}'.",
                args.image.to_string_lossy().red().bold()
            )
        })?;

    if message.is_empty() {
        println!("Hidden message: {}", "(no message)".yellow());
    } else {
        println!("Hidden message: {}", message.cyan());
    }

    fs::write(&text_path, &message).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            text_path.to_string_lossy().red().bold()
        )
    })?;

    info!(
        "recovered {} chars into {}",
        message.chars().count(),
        text_path.to_string_lossy()
    );
    println!(
        "The text has been successfully recovered and saved: {}",
        text_path.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑：打印图像尺寸、可写入的比特数和不截断时的最长消息。
///
/// # Errors
///
/// 无法读取或解码输入的图像文件时返回错误。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let picture = read_image(&args.image)?;
    let pix = PngCodec.decode(&picture).with_context(|| {
        format!(
            "Failed to decode image '{}'.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "{}x{} pixels: {} payload bits, up to {} characters.",
        pix.width(),
        pix.height(),
        capacity(&pix).to_string().green().bold(),
        max_message_len(&pix).to_string().green().bold()
    );
    Ok(())
}
