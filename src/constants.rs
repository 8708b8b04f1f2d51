/// 每个字符占用的比特数。
/// 字符按单字节 (码点 0-255) 处理，每个比特写入一个像素的红色通道最低位。
pub const BITS_PER_CHAR: usize = 8;

/// 消息结束标记的比特数：两个全零字节。
pub const TERMINATOR_BITS: usize = 16;

/// 水印字号 = 图像宽度 / 该除数 (向下取整)。宽度不足该除数时字号为 0，不绘制水印。
pub const FONT_SIZE_DIVISOR: u32 = 20;

/// 水印文字距右下角的边距 (像素)。
pub const WATERMARK_MARGIN: u32 = 10;

/// 水印描边线宽 (像素)，描边以字形边缘为中心向内外各扩展一半。
pub const OUTLINE_WIDTH: u32 = 2;

/// 水印填充色：白色，不透明度 0.8。
pub const FILL_COLOR: [u8; 3] = [255, 255, 255];
pub const FILL_OPACITY: f32 = 0.8;

/// 水印描边色：黑色，不透明度 0.5。
pub const OUTLINE_COLOR: [u8; 3] = [0, 0, 0];
pub const OUTLINE_OPACITY: f32 = 0.5;

/// 未指定输出路径时，隐写结果图像的文件名前缀。
pub const HIDDEN_IMAGE_PREFIX: &str = "doctored_";

/// 未指定输出路径时，恢复文本的文件名前缀。
pub const RECOVERED_TEXT_PREFIX: &str = "recovered_";
