//! # 可见水印模块
//!
//! 在图像右下角绘制半透明文字：先画深色描边，再画浅色填充，两者均按 source-over 混合。
//! 水印只改变像素外观，不读取也不避让隐藏载荷所在的区域。

use crate::constants::{
    FILL_COLOR, FILL_OPACITY, FONT_SIZE_DIVISOR, OUTLINE_COLOR, OUTLINE_OPACITY, OUTLINE_WIDTH,
    WATERMARK_MARGIN,
};
use image::{Rgba, RgbaImage};

/// 字形单元格尺寸：5x7 的点阵，右侧和底部各留一列/一行空白。
const CELL_COLS: i64 = 6;
const CELL_ROWS: i64 = 8;
const GLYPH_COLS: i64 = 5;
const GLYPH_ROWS: i64 = 7;

/// 5x7 ASCII 点阵字体 (0x20..=0x7E)，按列存储，bit 0 为最上一行。
const FONT_5X7: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // '!'
    [0x00, 0x07, 0x00, 0x07, 0x00], // '"'
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // '#'
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // '$'
    [0x23, 0x13, 0x08, 0x64, 0x62], // '%'
    [0x36, 0x49, 0x55, 0x22, 0x50], // '&'
    [0x00, 0x05, 0x03, 0x00, 0x00], // '''
    [0x00, 0x1C, 0x22, 0x41, 0x00], // '('
    [0x00, 0x41, 0x22, 0x1C, 0x00], // ')'
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // '*'
    [0x08, 0x08, 0x3E, 0x08, 0x08], // '+'
    [0x00, 0x50, 0x30, 0x00, 0x00], // ','
    [0x08, 0x08, 0x08, 0x08, 0x08], // '-'
    [0x00, 0x60, 0x60, 0x00, 0x00], // '.'
    [0x20, 0x10, 0x08, 0x04, 0x02], // '/'
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // '0'
    [0x00, 0x42, 0x7F, 0x40, 0x00], // '1'
    [0x42, 0x61, 0x51, 0x49, 0x46], // '2'
    [0x21, 0x41, 0x45, 0x4B, 0x31], // '3'
    [0x18, 0x14, 0x12, 0x7F, 0x10], // '4'
    [0x27, 0x45, 0x45, 0x45, 0x39], // '5'
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // '6'
    [0x01, 0x71, 0x09, 0x05, 0x03], // '7'
    [0x36, 0x49, 0x49, 0x49, 0x36], // '8'
    [0x06, 0x49, 0x49, 0x29, 0x1E], // '9'
    [0x00, 0x36, 0x36, 0x00, 0x00], // ':'
    [0x00, 0x56, 0x36, 0x00, 0x00], // ';'
    [0x08, 0x14, 0x22, 0x41, 0x00], // '<'
    [0x14, 0x14, 0x14, 0x14, 0x14], // '='
    [0x00, 0x41, 0x22, 0x14, 0x08], // '>'
    [0x02, 0x01, 0x51, 0x09, 0x06], // '?'
    [0x32, 0x49, 0x79, 0x41, 0x3E], // '@'
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // 'A'
    [0x7F, 0x49, 0x49, 0x49, 0x36], // 'B'
    [0x3E, 0x41, 0x41, 0x41, 0x22], // 'C'
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // 'D'
    [0x7F, 0x49, 0x49, 0x49, 0x41], // 'E'
    [0x7F, 0x09, 0x09, 0x09, 0x01], // 'F'
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // 'G'
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // 'H'
    [0x00, 0x41, 0x7F, 0x41, 0x00], // 'I'
    [0x20, 0x40, 0x41, 0x3F, 0x01], // 'J'
    [0x7F, 0x08, 0x14, 0x22, 0x41], // 'K'
    [0x7F, 0x40, 0x40, 0x40, 0x40], // 'L'
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // 'M'
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // 'N'
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // 'O'
    [0x7F, 0x09, 0x09, 0x09, 0x06], // 'P'
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // 'Q'
    [0x7F, 0x09, 0x19, 0x29, 0x46], // 'R'
    [0x46, 0x49, 0x49, 0x49, 0x31], // 'S'
    [0x01, 0x01, 0x7F, 0x01, 0x01], // 'T'
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // 'U'
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // 'V'
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // 'W'
    [0x63, 0x14, 0x08, 0x14, 0x63], // 'X'
    [0x07, 0x08, 0x70, 0x08, 0x07], // 'Y'
    [0x61, 0x51, 0x49, 0x45, 0x43], // 'Z'
    [0x00, 0x7F, 0x41, 0x41, 0x00], // '['
    [0x02, 0x04, 0x08, 0x10, 0x20], // '\'
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ']'
    [0x04, 0x02, 0x01, 0x02, 0x04], // '^'
    [0x40, 0x40, 0x40, 0x40, 0x40], // '_'
    [0x00, 0x01, 0x02, 0x04, 0x00], // '`'
    [0x20, 0x54, 0x54, 0x54, 0x78], // 'a'
    [0x7F, 0x48, 0x44, 0x44, 0x38], // 'b'
    [0x38, 0x44, 0x44, 0x44, 0x20], // 'c'
    [0x38, 0x44, 0x44, 0x48, 0x7F], // 'd'
    [0x38, 0x54, 0x54, 0x54, 0x18], // 'e'
    [0x08, 0x7E, 0x09, 0x01, 0x02], // 'f'
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // 'g'
    [0x7F, 0x08, 0x04, 0x04, 0x78], // 'h'
    [0x00, 0x44, 0x7D, 0x40, 0x00], // 'i'
    [0x20, 0x40, 0x44, 0x3D, 0x00], // 'j'
    [0x7F, 0x10, 0x28, 0x44, 0x00], // 'k'
    [0x00, 0x41, 0x7F, 0x40, 0x00], // 'l'
    [0x7C, 0x04, 0x18, 0x04, 0x78], // 'm'
    [0x7C, 0x08, 0x04, 0x04, 0x78], // 'n'
    [0x38, 0x44, 0x44, 0x44, 0x38], // 'o'
    [0x7C, 0x14, 0x14, 0x14, 0x08], // 'p'
    [0x08, 0x14, 0x14, 0x18, 0x7C], // 'q'
    [0x7C, 0x08, 0x04, 0x04, 0x08], // 'r'
    [0x48, 0x54, 0x54, 0x54, 0x20], // 's'
    [0x04, 0x3F, 0x44, 0x40, 0x20], // 't'
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // 'u'
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // 'v'
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // 'w'
    [0x44, 0x28, 0x10, 0x28, 0x44], // 'x'
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // 'y'
    [0x44, 0x64, 0x54, 0x4C, 0x44], // 'z'
    [0x00, 0x08, 0x36, 0x41, 0x00], // '{'
    [0x00, 0x00, 0x7F, 0x00, 0x00], // '|'
    [0x00, 0x41, 0x36, 0x08, 0x00], // '}'
    [0x08, 0x04, 0x08, 0x10, 0x08], // '~'
];

fn glyph(ch: char) -> &'static [u8; 5] {
    let index = match ch {
        ' '..='~' => ch as usize - ' ' as usize,
        _ => '?' as usize - ' ' as usize,
    };
    &FONT_5X7[index]
}

/// 水印的绘制参数。默认值与 [`crate::constants`] 中的常量一致。
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkStyle {
    /// 字号 = 图像宽度 / `font_divisor`，为 0 时不绘制。
    pub font_divisor: u32,
    pub margin: u32,
    pub outline_width: u32,
    pub fill: [u8; 3],
    pub fill_opacity: f32,
    pub outline: [u8; 3],
    pub outline_opacity: f32,
}

impl Default for WatermarkStyle {
    fn default() -> Self {
        Self {
            font_divisor: FONT_SIZE_DIVISOR,
            margin: WATERMARK_MARGIN,
            outline_width: OUTLINE_WIDTH,
            fill: FILL_COLOR,
            fill_opacity: FILL_OPACITY,
            outline: OUTLINE_COLOR,
            outline_opacity: OUTLINE_OPACITY,
        }
    }
}

/// 水印实际会修改的像素的外接矩形 (已裁剪到图像范围内)。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Footprint {
    /// 按行优先顺序，矩形内第一个像素的下标。
    pub fn first_pixel(&self, image_width: u32) -> usize {
        self.y as usize * image_width as usize + self.x as usize
    }
}

/// 一段待绘制的水印文字。
#[derive(Debug, Clone)]
pub struct Watermark {
    text: String,
    style: WatermarkStyle,
}

/// 某个像素被水印覆盖的方式。
#[derive(Debug, Clone, Copy, Default)]
struct Coverage {
    outline: bool,
    fill: bool,
}

/// 文字在图像坐标系中的排版结果。坐标可能为负，绘制时裁剪。
struct Layout {
    glyphs: Vec<&'static [u8; 5]>,
    left: i64,
    top: i64,
    font_size: i64,
    cell_width: i64,
    radius: i64,
}

impl Layout {
    fn text_width(&self) -> i64 {
        self.cell_width * self.glyphs.len() as i64
    }

    fn is_filled(&self, x: i64, y: i64) -> bool {
        let (lx, ly) = (x - self.left, y - self.top);
        if lx < 0 || ly < 0 || lx >= self.text_width() || ly >= self.font_size {
            return false;
        }

        let col = (lx % self.cell_width) * CELL_COLS / self.cell_width;
        let row = ly * CELL_ROWS / self.font_size;
        if col >= GLYPH_COLS || row >= GLYPH_ROWS {
            return false;
        }

        let glyph = self.glyphs[(lx / self.cell_width) as usize];
        ((glyph[col as usize] >> row) & 1) != 0
    }

    /// 描边覆盖距离字形边缘不超过 `radius` 的像素，即邻域内既有字形内像素也有字形外像素。
    fn is_outlined(&self, x: i64, y: i64) -> bool {
        if self.radius == 0 {
            return false;
        }

        let (mut inside, mut outside) = (false, false);
        for dy in -self.radius..=self.radius {
            for dx in -self.radius..=self.radius {
                if self.is_filled(x + dx, y + dy) {
                    inside = true;
                } else {
                    outside = true;
                }
                if inside && outside {
                    return true;
                }
            }
        }
        false
    }

    fn coverage(&self, x: i64, y: i64) -> Coverage {
        Coverage {
            outline: self.is_outlined(x, y),
            fill: self.is_filled(x, y),
        }
    }

    /// 排版区域 (含描边) 与图像的交集，按 (x 范围, y 范围) 返回。
    fn clip(&self, width: u32, height: u32) -> (std::ops::Range<i64>, std::ops::Range<i64>) {
        let x0 = (self.left - self.radius).max(0);
        let x1 = (self.left + self.text_width() + self.radius).min(width as i64);
        let y0 = (self.top - self.radius).max(0);
        let y1 = (self.top + self.font_size + self.radius).min(height as i64);
        (x0..x1.max(x0), y0..y1.max(y0))
    }
}

impl Watermark {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_style(text, WatermarkStyle::default())
    }

    pub fn with_style(text: impl Into<String>, style: WatermarkStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 给定图像宽度下的字号 (像素)。图像窄于 `font_divisor` 时为 0。
    pub fn font_size(&self, image_width: u32) -> u32 {
        image_width.checked_div(self.style.font_divisor).unwrap_or(0)
    }

    /// 字号为 0 或文字为空时没有任何可绘制的内容。
    fn layout(&self, width: u32, height: u32) -> Option<Layout> {
        let font_size = self.font_size(width) as i64;
        if font_size == 0 || self.text.is_empty() {
            return None;
        }

        let cell_width = (font_size * CELL_COLS / CELL_ROWS).max(1);
        let glyphs: Vec<_> = self.text.chars().map(glyph).collect();

        let right = width as i64 - self.style.margin as i64;
        let bottom = height as i64 - self.style.margin as i64;

        Some(Layout {
            left: right - cell_width * glyphs.len() as i64,
            top: bottom - font_size,
            glyphs,
            font_size,
            cell_width,
            radius: self.style.outline_width.div_ceil(2) as i64,
        })
    }

    /// 计算水印在给定尺寸的图像上会修改的像素范围；完全落在图像外时返回 `None`。
    ///
    /// 结果只取决于文字、样式和图像尺寸，与像素内容无关。
    pub fn footprint(&self, width: u32, height: u32) -> Option<Footprint> {
        let layout = self.layout(width, height)?;
        let (xs, ys) = layout.clip(width, height);

        let mut bounds: Option<(i64, i64, i64, i64)> = None;
        for y in ys {
            for x in xs.clone() {
                let cover = layout.coverage(x, y);
                if !(cover.outline || cover.fill) {
                    continue;
                }
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }

        bounds.map(|(x0, y0, x1, y1)| Footprint {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0 + 1) as u32,
            height: (y1 - y0 + 1) as u32,
        })
    }

    /// 将水印绘制到图像上，原地修改。
    pub fn draw(&self, pix: &mut RgbaImage) {
        let Some(layout) = self.layout(pix.width(), pix.height()) else {
            return;
        };
        let (xs, ys) = layout.clip(pix.width(), pix.height());

        for y in ys {
            for x in xs.clone() {
                let cover = layout.coverage(x, y);
                let pixel = pix.get_pixel_mut(x as u32, y as u32);
                if cover.outline {
                    blend(pixel, self.style.outline, self.style.outline_opacity);
                }
                if cover.fill {
                    blend(pixel, self.style.fill, self.style.fill_opacity);
                }
            }
        }
    }
}

/// 非预乘 alpha 的 source-over 混合。
fn blend(dst: &mut Rgba<u8>, color: [u8; 3], opacity: f32) {
    let src_a = opacity.clamp(0.0, 1.0);
    let dst_a = dst.0[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return;
    }

    for (channel, &src) in dst.0.iter_mut().zip(&color) {
        let mixed = (src as f32 * src_a + *channel as f32 * dst_a * (1.0 - src_a)) / out_a;
        *channel = mixed.round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}
