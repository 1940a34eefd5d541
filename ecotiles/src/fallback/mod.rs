//! Fallback tile images.
//!
//! Every tile request is answered with a PNG, even when no imagery can be
//! produced. This module renders those substitutes:
//!
//! - static placeholders for requests rejected up front or with no upstream
//!   data, generated once per kind and cached for the process lifetime
//! - error tiles carrying a message, rendered per call and never cached
//!
//! Rendering never fails from the caller's point of view. If PNG encoding
//! fails, a pre-encoded 1×1 transparent PNG is returned instead.

mod font;

use std::io::Cursor;
use std::sync::OnceLock;

use image::{ImageFormat, Rgba, RgbaImage};
use tracing::error;

/// Width and height of every fallback tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// MIME type of every tile response.
pub const TILE_CONTENT_TYPE: &str = "image/png";

/// A valid 1×1 fully transparent PNG.
pub const MINIMAL_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Pixel scale applied to the bitmap font.
const TEXT_SCALE: u32 = 2;
const MARGIN: u32 = 8;
const CHAR_ADVANCE: u32 = (font::GLYPH_WIDTH + 1) * TEXT_SCALE;
const LINE_ADVANCE: u32 = (font::GLYPH_HEIGHT + 2) * TEXT_SCALE;
const MAX_COLS: usize = ((TILE_SIZE - 2 * MARGIN) / CHAR_ADVANCE) as usize;
const MAX_LINES: usize = ((TILE_SIZE - 2 * MARGIN) / LINE_ADVANCE) as usize;

const ERROR_BACKGROUND: Rgba<u8> = Rgba([120, 20, 20, 200]);
const ERROR_TEXT: Rgba<u8> = Rgba([255, 255, 255, 255]);

static ZOOM_UNSUPPORTED: OnceLock<Vec<u8>> = OnceLock::new();
static NOT_FOUND: OnceLock<Vec<u8>> = OnceLock::new();

/// Kinds of static placeholder tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderKind {
    /// Zoom level outside the served range.
    ZoomUnsupported,
    /// No imagery exists for the request, or the request could not be read.
    NotFound,
}

impl PlaceholderKind {
    pub fn caption(&self) -> &'static str {
        match self {
            PlaceholderKind::ZoomUnsupported => "Zoom level not supported",
            PlaceholderKind::NotFound => "No data",
        }
    }

    fn colors(&self) -> (Rgba<u8>, Rgba<u8>) {
        match self {
            PlaceholderKind::ZoomUnsupported => (Rgba([40, 40, 40, 96]), Rgba([255, 255, 255, 230])),
            PlaceholderKind::NotFound => (Rgba([0, 0, 0, 0]), Rgba([90, 90, 90, 200])),
        }
    }

    fn cell(&self) -> &'static OnceLock<Vec<u8>> {
        match self {
            PlaceholderKind::ZoomUnsupported => &ZOOM_UNSUPPORTED,
            PlaceholderKind::NotFound => &NOT_FOUND,
        }
    }
}

/// Get the cached placeholder image for `kind`.
pub fn placeholder(kind: PlaceholderKind) -> &'static [u8] {
    kind.cell()
        .get_or_init(|| {
            let (background, text) = kind.colors();
            render(kind.caption(), background, text)
        })
        .as_slice()
}

/// Render a tile carrying `message`, word-wrapped to the tile width.
///
/// Text beyond the last line that fits is dropped.
pub fn render_error(message: &str) -> Vec<u8> {
    render(message, ERROR_BACKGROUND, ERROR_TEXT)
}

fn render(message: &str, background: Rgba<u8>, foreground: Rgba<u8>) -> Vec<u8> {
    let mut image = RgbaImage::from_pixel(TILE_SIZE, TILE_SIZE, background);

    let lines = font::wrap(message, MAX_COLS);
    let lines = &lines[..lines.len().min(MAX_LINES)];

    // Center the block vertically and each line horizontally
    let block_height = lines.len() as u32 * LINE_ADVANCE;
    let top = (TILE_SIZE.saturating_sub(block_height)) / 2;
    for (row, line) in lines.iter().enumerate() {
        let width = line.chars().count() as u32 * CHAR_ADVANCE;
        let left = TILE_SIZE.saturating_sub(width) / 2;
        draw_line(&mut image, line, left, top + row as u32 * LINE_ADVANCE, foreground);
    }

    encode_png(&image)
}

fn draw_line(image: &mut RgbaImage, line: &str, left: u32, top: u32, color: Rgba<u8>) {
    for (col, c) in line.chars().enumerate() {
        let origin_x = left + col as u32 * CHAR_ADVANCE;
        for (gy, bits) in font::glyph(c).iter().enumerate() {
            for gx in 0..font::GLYPH_WIDTH {
                if *bits & (1u8 << (font::GLYPH_WIDTH - 1 - gx)) == 0 {
                    continue;
                }
                for dy in 0..TEXT_SCALE {
                    for dx in 0..TEXT_SCALE {
                        let x = origin_x + gx * TEXT_SCALE + dx;
                        let y = top + gy as u32 * TEXT_SCALE + dy;
                        if x < image.width() && y < image.height() {
                            image.put_pixel(x, y, color);
                        }
                    }
                }
            }
        }
    }
}

fn encode_png(image: &RgbaImage) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    match image.write_to(&mut buffer, ImageFormat::Png) {
        Ok(()) => buffer.into_inner(),
        Err(e) => {
            error!(error = %e, "Failed to encode fallback tile, using minimal PNG");
            MINIMAL_PNG.to_vec()
        }
    }
}
