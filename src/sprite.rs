//! Sprite decoding and half-block rendering.

use image::GenericImageView;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span, Text},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const ALPHA_CUTOFF: u8 = 128;
const UPPER_HALF: &str = "\u{2580}";
const LOWER_HALF: &str = "\u{2584}";

/// RGBA pixels cropped to the opaque bounding box of the source image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpriteData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 4]>,
}

impl SpriteData {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get((y * self.width + x) as usize)
            .copied()
            .filter(|px| px[3] >= ALPHA_CUTOFF)
    }

    /// Cell footprint when scaled to fit `max_cols` x `max_rows`; each cell
    /// carries two vertical pixels.
    pub fn fit(&self, max_cols: u16, max_rows: u16) -> (u16, u16) {
        if self.width == 0 || self.height == 0 || max_cols == 0 || max_rows == 0 {
            return (0, 0);
        }
        let scale = self.scale(max_cols, max_rows);
        let cols = ((self.width as f32 * scale).floor() as u16).clamp(1, max_cols);
        let pixel_rows = (self.height as f32 * scale).floor().max(1.0) as u16;
        let rows = pixel_rows.div_ceil(2).clamp(1, max_rows);
        (cols, rows)
    }

    fn scale(&self, max_cols: u16, max_rows: u16) -> f32 {
        let by_width = max_cols as f32 / self.width as f32;
        let by_height = (max_rows as f32 * 2.0) / self.height as f32;
        by_width.min(by_height)
    }
}

pub fn decode_sprite(bytes: &[u8]) -> Result<SpriteData, String> {
    let image = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let (width, height) = image.dimensions();
    let rgba = image.to_rgba8();

    let opaque = |x: u32, y: u32| rgba.get_pixel(x, y)[3] >= ALPHA_CUTOFF;
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in 0..height {
        for x in 0..width {
            if !opaque(x, y) {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((min_x, min_y, max_x, max_y)) => {
                    (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
                }
            });
        }
    }
    let Some((min_x, min_y, max_x, max_y)) = bounds else {
        return Err("sprite has no visible pixels".to_string());
    };

    let crop_width = max_x - min_x + 1;
    let crop_height = max_y - min_y + 1;
    let mut pixels = Vec::with_capacity((crop_width * crop_height) as usize);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            pixels.push(rgba.get_pixel(x, y).0);
        }
    }
    Ok(SpriteData {
        width: crop_width,
        height: crop_height,
        pixels,
    })
}

/// Nearest-neighbour downscale into half-block cells.
pub fn sprite_text(sprite: &SpriteData, max_cols: u16, max_rows: u16) -> Text<'static> {
    let (cols, rows) = sprite.fit(max_cols, max_rows);
    if cols == 0 || rows == 0 {
        return Text::default();
    }
    let scale = sprite.scale(max_cols, max_rows);
    let sample = |col: u16, pixel_row: u16| {
        let x = (col as f32 / scale) as u32;
        let y = (pixel_row as f32 / scale) as u32;
        sprite.pixel(x, y)
    };

    let lines = (0..rows)
        .map(|row| {
            let spans = (0..cols)
                .map(|col| {
                    let top = sample(col, row * 2);
                    let bottom = sample(col, row * 2 + 1);
                    half_block(top, bottom)
                })
                .collect::<Vec<_>>();
            Line::from(spans)
        })
        .collect::<Vec<_>>();
    Text::from(lines)
}

fn half_block(top: Option<[u8; 4]>, bottom: Option<[u8; 4]>) -> Span<'static> {
    match (top, bottom) {
        (None, None) => Span::raw(" "),
        (Some(top), None) => Span::styled(UPPER_HALF, Style::default().fg(rgb(top))),
        (None, Some(bottom)) => Span::styled(LOWER_HALF, Style::default().fg(rgb(bottom))),
        (Some(top), Some(bottom)) => Span::styled(
            UPPER_HALF,
            Style::default().fg(rgb(top)).bg(rgb(bottom)),
        ),
    }
}

fn rgb(px: [u8; 4]) -> Color {
    Color::Rgb(px[0], px[1], px[2])
}
