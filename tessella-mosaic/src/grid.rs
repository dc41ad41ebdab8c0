use image::RgbaImage;

use crate::color::Argb;

/// A decoded image that can be read pixel by pixel.
pub trait PixelGrid {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Returns the color at the given position.
    ///
    /// # Panics
    ///
    /// May panic if the position lies outside of the grid.
    fn argb(&self, x: u32, y: u32) -> Argb;
}

impl PixelGrid for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn argb(&self, x: u32, y: u32) -> Argb {
        let [red, green, blue, alpha] = self.get_pixel(x, y).0;
        Argb::from_channels(alpha, red, green, blue)
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    #[test]
    fn rgba_image_packs_argb() {
        let mut image = RgbaImage::new(2, 3);
        image.put_pixel(1, 2, Rgba([0x12, 0x34, 0x56, 0x78]));
        assert_eq!(PixelGrid::width(&image), 2);
        assert_eq!(PixelGrid::height(&image), 3);
        assert_eq!(image.argb(1, 2), Argb(0x78_12_34_56));
        assert_eq!(image.argb(0, 0), Argb(0));
    }
}
