//! Rasterizes a rendered terminal buffer into an RGB PNG.
//!
//! Each cell is a fixed 8x16 pixel tile. Block and box-drawing glyphs are
//! painted geometrically; every other visible glyph is painted as an inset
//! foreground bar, which keeps layout and color readable without a font.

use std::io::Cursor;

use ratatui::buffer::{Buffer, Cell};
use ratatui::style::{Color, Modifier};

use crate::error::CaptureError;

pub const CELL_WIDTH: u32 = 8;
pub const CELL_HEIGHT: u32 = 16;

pub type Rgb = [u8; 3];

/// `#111827`, the dashboard backdrop.
pub const BACKGROUND: Rgb = [0x11, 0x18, 0x27];
pub const FOREGROUND: Rgb = [0xe5, 0xe7, 0xeb];

const ANSI: [Rgb; 16] = [
    [0x00, 0x00, 0x00],
    [0xcd, 0x31, 0x31],
    [0x0d, 0xbc, 0x79],
    [0xe5, 0xe5, 0x10],
    [0x24, 0x72, 0xc8],
    [0xbc, 0x3f, 0xbc],
    [0x11, 0xa8, 0xcd],
    [0xe5, 0xe5, 0xe5],
    [0x66, 0x66, 0x66],
    [0xf1, 0x4c, 0x4c],
    [0x23, 0xd1, 0x8b],
    [0xf5, 0xf5, 0x43],
    [0x3b, 0x8e, 0xea],
    [0xd6, 0x70, 0xd6],
    [0x29, 0xb8, 0xdb],
    [0xff, 0xff, 0xff],
];

fn indexed(i: u8) -> Rgb {
    match i {
        0..=15 => ANSI[i as usize],
        16..=231 => {
            let i = i - 16;
            let level = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
            [level(i / 36), level((i / 6) % 6), level(i % 6)]
        }
        _ => {
            let v = 8 + (i - 232) * 10;
            [v, v, v]
        }
    }
}

/// `Reset` resolves to `default`; named colors use a fixed ANSI palette.
pub fn color_to_rgb(color: Color, default: Rgb) -> Rgb {
    match color {
        Color::Reset => default,
        Color::Black => ANSI[0],
        Color::Red => ANSI[1],
        Color::Green => ANSI[2],
        Color::Yellow => ANSI[3],
        Color::Blue => ANSI[4],
        Color::Magenta => ANSI[5],
        Color::Cyan => ANSI[6],
        Color::Gray => ANSI[7],
        Color::DarkGray => ANSI[8],
        Color::LightRed => ANSI[9],
        Color::LightGreen => ANSI[10],
        Color::LightYellow => ANSI[11],
        Color::LightBlue => ANSI[12],
        Color::LightMagenta => ANSI[13],
        Color::LightCyan => ANSI[14],
        Color::White => ANSI[15],
        Color::Rgb(r, g, b) => [r, g, b],
        Color::Indexed(i) => indexed(i),
    }
}

fn blend(fg: Rgb, bg: Rgb, alpha: f32) -> Rgb {
    let mix = |f: u8, b: u8| (f as f32 * alpha + b as f32 * (1.0 - alpha)).round() as u8;
    [mix(fg[0], bg[0]), mix(fg[1], bg[1]), mix(fg[2], bg[2])]
}

/// Unscaled RGB pixels, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbImage {
    fn new(width: u32, height: u32) -> Self {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&BACKGROUND);
        }
        RgbImage {
            width,
            height,
            pixels,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let i = ((y * self.width + x) * 3) as usize;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    fn fill(&mut self, x0: u32, y0: u32, w: u32, h: u32, color: Rgb) {
        let x1 = (x0 + w).min(self.width);
        let y1 = (y0 + h).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let i = ((y * self.width + x) * 3) as usize;
                self.pixels[i..i + 3].copy_from_slice(&color);
            }
        }
    }

    /// Nearest-neighbour upscale by an integer factor.
    pub fn scaled(&self, scale: u32) -> RgbImage {
        let scale = scale.max(1);
        if scale == 1 {
            return self.clone();
        }
        let width = self.width * scale;
        let height = self.height * scale;
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&self.pixel(x / scale, y / scale));
            }
        }
        RgbImage {
            width,
            height,
            pixels,
        }
    }
}

#[derive(Clone, Copy, Default)]
struct Arms {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

fn box_arms(ch: char) -> Option<Arms> {
    let arms = |up, down, left, right| {
        Some(Arms {
            up,
            down,
            left,
            right,
        })
    };
    match ch {
        '─' | '━' | '═' | '╌' | '┄' => arms(false, false, true, true),
        '│' | '┃' | '║' | '╎' | '┆' => arms(true, true, false, false),
        '┌' | '╭' | '┏' | '╔' => arms(false, true, false, true),
        '┐' | '╮' | '┓' | '╗' => arms(false, true, true, false),
        '└' | '╰' | '┗' | '╚' => arms(true, false, false, true),
        '┘' | '╯' | '┛' | '╝' => arms(true, false, true, false),
        '├' | '┣' | '╠' => arms(true, true, false, true),
        '┤' | '┫' | '╣' => arms(true, true, true, false),
        '┬' | '┳' | '╦' => arms(false, true, true, true),
        '┴' | '┻' | '╩' => arms(true, false, true, true),
        '┼' | '╋' | '╬' => arms(true, true, true, true),
        '╴' => arms(false, false, true, false),
        '╶' => arms(false, false, false, true),
        '╵' => arms(true, false, false, false),
        '╷' => arms(false, true, false, false),
        _ => None,
    }
}

fn paint_cell(image: &mut RgbImage, col: u32, row: u32, cell: &Cell) {
    let mut fg = color_to_rgb(cell.fg, FOREGROUND);
    let mut bg = color_to_rgb(cell.bg, BACKGROUND);
    if cell.modifier.contains(Modifier::REVERSED) {
        std::mem::swap(&mut fg, &mut bg);
    }
    if cell.modifier.contains(Modifier::DIM) {
        fg = blend(fg, bg, 0.6);
    }

    let x = col * CELL_WIDTH;
    let y = row * CELL_HEIGHT;
    image.fill(x, y, CELL_WIDTH, CELL_HEIGHT, bg);

    let Some(ch) = cell.symbol().chars().next() else {
        return;
    };
    if ch.is_whitespace() {
        return;
    }

    let (w, h) = (CELL_WIDTH, CELL_HEIGHT);
    match ch {
        '█' => image.fill(x, y, w, h, fg),
        '▀' => image.fill(x, y, w, h / 2, fg),
        '▄' => image.fill(x, y + h / 2, w, h / 2, fg),
        '▌' => image.fill(x, y, w / 2, h, fg),
        '▐' => image.fill(x + w / 2, y, w / 2, h, fg),
        '░' => image.fill(x, y, w, h, blend(fg, bg, 0.25)),
        '▒' => image.fill(x, y, w, h, blend(fg, bg, 0.5)),
        '▓' => image.fill(x, y, w, h, blend(fg, bg, 0.75)),
        '▁'..='▇' => {
            let eighths = ch as u32 - '▁' as u32 + 1;
            let filled = h * eighths / 8;
            image.fill(x, y + h - filled, w, filled, fg);
        }
        _ => {
            if let Some(arms) = box_arms(ch) {
                let (cx, cy) = (x + w / 2 - 1, y + h / 2 - 1);
                if arms.left {
                    image.fill(x, cy, w / 2 + 1, 2, fg);
                }
                if arms.right {
                    image.fill(cx, cy, w - w / 2 + 1, 2, fg);
                }
                if arms.up {
                    image.fill(cx, y, 2, h / 2 + 1, fg);
                }
                if arms.down {
                    image.fill(cx, cy, 2, h - h / 2 + 1, fg);
                }
            } else {
                let bold = cell.modifier.contains(Modifier::BOLD);
                let inset_y = if bold { 4 } else { 5 };
                image.fill(x + 1, y + inset_y, w - 2, h - inset_y * 2, fg);
            }
        }
    }
}

pub fn rasterize(buffer: &Buffer) -> RgbImage {
    let area = buffer.area;
    let mut image = RgbImage::new(
        area.width as u32 * CELL_WIDTH,
        area.height as u32 * CELL_HEIGHT,
    );
    for row in 0..area.height {
        for col in 0..area.width {
            if let Some(cell) = buffer.cell((area.x + col, area.y + row)) {
                paint_cell(&mut image, col as u32, row as u32, cell);
            }
        }
    }
    image
}

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, CaptureError> {
    if image.width == 0 || image.height == 0 {
        return Err(CaptureError::Rasterize("surface has no area".to_string()));
    }
    let mut out = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut out, image.width, image.height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&image.pixels)?;
        writer.finish()?;
    }
    Ok(out.into_inner())
}

/// Rasterize, upscale and encode in one pass. CPU-bound; run off the
/// async scheduler.
pub fn render_png(buffer: &Buffer, scale: u32) -> Result<Vec<u8>, CaptureError> {
    encode_png(&rasterize(buffer).scaled(scale))
}
