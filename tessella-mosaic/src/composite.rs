use image::{Rgba, RgbaImage};
use itertools::iproduct;

/// Creates a canvas of the given size filled with opaque black.
pub fn blank_canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]))
}

/// Draws `tile` onto `canvas` with its top left corner at `x` and `y`, using source-over
/// blending.
///
/// Every tile pixel is weighted by its own alpha times the constant `opacity`. Parts of the tile
/// that stick out of the canvas are clipped. The canvas is expected to be opaque and stays opaque.
pub fn draw_over(canvas: &mut RgbaImage, tile: &RgbaImage, x: u32, y: u32, opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.0);
    let width = tile.width().min(canvas.width().saturating_sub(x));
    let height = tile.height().min(canvas.height().saturating_sub(y));

    for (tile_x, tile_y) in iproduct!(0..width, 0..height) {
        let source = tile.get_pixel(tile_x, tile_y);
        let alpha = f32::from(source[3]) / 255.0 * opacity;
        if alpha == 0.0 {
            continue;
        }

        let target = canvas.get_pixel_mut(x + tile_x, y + tile_y);
        for channel in 0..3 {
            target[channel] = blend(source[channel], target[channel], alpha);
        }
    }
}

fn blend(source: u8, target: u8, alpha: f32) -> u8 {
    (f32::from(source) * alpha + f32::from(target) * (1.0 - alpha))
        .round()
        .clamp(0.0, 255.0) as u8
}
