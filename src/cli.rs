//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{ArgAction, Args, Parser};
use std::path::PathBuf;

/// 一款基于红色通道 LSB 隐写的命令行工具：在图像中隐藏文本，并在右下角加盖可见水印。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于红色通道 LSB (最低有效位) 隐写的命令行工具：在图像中隐藏文本，并在右下角加盖可见水印。结果始终保存为 PNG。"
)]
pub struct Cli {
    /// 输出更多日志 (-v 为 info，-vv 为 debug)。设置 RUST_LOG 时以其为准。
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 capacity (容量)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在图像中隐藏文本并加盖水印。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的文本。
    Recover(RecoverArgs),

    /// 显示图像能容纳的载荷大小。
    Capacity(CapacityArgs),
}

/// 要隐藏的文本来源：直接给出，或从文件读取，二选一。
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct MessageSource {
    /// 要隐藏的文本。
    #[arg(short, long)]
    pub message: Option<String>,

    /// 要隐藏的文本内容的文件路径。
    #[arg(short, long)]
    pub text: Option<PathBuf>,
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    #[command(flatten)]
    pub source: MessageSource,

    /// 绘制在图像右下角的水印文字。
    #[arg(short, long)]
    pub watermark: String,

    /// 结果图像的输出路径。默认为输入图像同目录下的 `doctored_<文件名>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 容量不足、含宽字符或载荷与水印重叠时报错，而不是静默降级。
    #[arg(short, long)]
    pub strict: bool,

    /// 输出文件已存在时直接覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文本的输出路径。默认为图像同目录下的 `recovered_<文件名>.txt`。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 输出文件已存在时直接覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要检查的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,
}
