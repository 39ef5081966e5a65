use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use tracing::warn;

use crate::error::{CatalogError, CatalogResult};
use crate::render::Canvas;

/// PNG-backed canvas. Text needs font bytes; without them the canvas still
/// encodes a valid image and text draws are skipped with a warning.
pub struct PngCanvas {
    image: RgbImage,
    font: Option<FontVec>,
}

impl PngCanvas {
    pub fn new(width: u32, height: u32, font_data: Option<&[u8]>) -> CatalogResult<Self> {
        let font = match font_data {
            Some(bytes) => Some(
                FontVec::try_from_vec(bytes.to_vec())
                    .map_err(|e| CatalogError::Internal(format!("font: {e}")))?,
            ),
            None => None,
        };

        Ok(Self {
            image: RgbImage::new(width, height),
            font,
        })
    }

    pub fn encode(&self) -> CatalogResult<Vec<u8>> {
        let mut bytes = Cursor::new(Vec::new());
        self.image
            .write_to(&mut bytes, ImageFormat::Png)
            .map_err(|e| CatalogError::Internal(format!("png encode: {e}")))?;
        Ok(bytes.into_inner())
    }
}

impl Canvas for PngCanvas {
    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: [u8; 3]) {
        let x_end = (x + width).min(self.image.width());
        let y_end = (y + height).min(self.image.height());
        for py in y..y_end {
            for px in x..x_end {
                self.image.put_pixel(px, py, Rgb(color));
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: u32, y: u32, size: f32, color: [u8; 3]) {
        let Some(font) = self.font.as_ref() else {
            warn!("No font configured; skipping text draw");
            return;
        };

        let image = &mut self.image;
        let (width, height) = image.dimensions();
        let scale = PxScale::from(size);
        let scaled = font.as_scaled(scale);

        let mut caret = x as f32;
        for ch in text.chars() {
            let glyph_id = scaled.glyph_id(ch);
            let glyph = glyph_id.with_scale_and_position(scale, point(caret, y as f32));
            caret += scaled.h_advance(glyph_id);

            let Some(outline) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outline.px_bounds();
            outline.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i32 + gx as i32;
                let py = bounds.min.y as i32 + gy as i32;
                if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height {
                    return;
                }
                let pixel = image.get_pixel_mut(px as u32, py as u32);
                for channel in 0..3 {
                    let blended = f32::from(pixel.0[channel]) * (1.0 - coverage)
                        + f32::from(color[channel]) * coverage;
                    pixel.0[channel] = blended.round() as u8;
                }
            });
        }
    }
}
