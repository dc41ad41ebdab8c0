use std::fmt;

use itertools::iproduct;
use tessella_lib::math::point::Point3;

use crate::{grid::PixelGrid, tile::TileError};

/// A color packed into 32 bits as alpha, red, green and blue, 8 bits each.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct Argb(pub u32);

impl Argb {
    pub const fn from_channels(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self((alpha as u32) << 24 | (red as u32) << 16 | (green as u32) << 8 | blue as u32)
    }

    pub const fn alpha(self) -> u8 {
        ((self.0 >> 24) & 0xff) as u8
    }

    pub const fn red(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub const fn green(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub const fn blue(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// Drops the alpha channel.
    pub const fn rgb(self) -> Rgb {
        Rgb::new(self.red(), self.green(), self.blue())
    }
}

/// An opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The value channel of the HSB (or HSV) representation, in `[0, 1]`.
    pub fn brightness(self) -> f32 {
        f32::from(self.r.max(self.g).max(self.b)) / 255.0
    }

    /// The color as a point in the RGB color cube.
    pub const fn to_point(self) -> Point3 {
        Point3::new(self.r as i32, self.g as i32, self.b as i32)
    }

    /// Converts a point in the RGB color cube back to a color.
    ///
    /// Returns [`None`] if any coordinate lies outside of `[0, 255]`.
    pub fn from_point(point: Point3) -> Option<Self> {
        Some(Self::new(
            point.x().try_into().ok()?,
            point.y().try_into().ok()?,
            point.z().try_into().ok()?,
        ))
    }

    pub fn key(self) -> ColorKey {
        self.into()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Identifies a color within a tile lookup.
///
/// Packs the three channels into the lower 24 bits, so distinct colors never share a key.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ColorKey(u32);

impl ColorKey {
    /// The key of the color at the given `point` in the RGB color cube.
    ///
    /// Returns [`None`] for points outside of the color cube.
    pub fn from_point(point: Point3) -> Option<Self> {
        Rgb::from_point(point).map(Self::from)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<Rgb> for ColorKey {
    fn from(color: Rgb) -> Self {
        Self(u32::from(color.r) << 16 | u32::from(color.g) << 8 | u32::from(color.b))
    }
}

impl From<ColorKey> for Rgb {
    fn from(key: ColorKey) -> Self {
        let [_, r, g, b] = key.0.to_be_bytes();
        Self::new(r, g, b)
    }
}

/// Computes the per-channel mean over all pixels with a non-zero alpha.
///
/// Partially transparent pixels count fully; their alpha is not used as a weight. The mean is
/// truncated towards zero.
pub fn average_color(grid: &(impl PixelGrid + ?Sized)) -> Result<Rgb, TileError> {
    let mut totals = [0u64; 3];
    let mut count = 0u64;
    for (x, y) in iproduct!(0..grid.width(), 0..grid.height()) {
        let argb = grid.argb(x, y);
        if argb.alpha() == 0 {
            continue;
        }
        count += 1;
        totals[0] += u64::from(argb.red());
        totals[1] += u64::from(argb.green());
        totals[2] += u64::from(argb.blue());
    }

    if count == 0 {
        return Err(TileError::NoOpaquePixels {
            width: grid.width(),
            height: grid.height(),
        });
    }

    // the mean of u8 values always fits into an u8
    let [r, g, b] = totals.map(|total| (total / count) as u8);
    Ok(Rgb::new(r, g, b))
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::*;

    #[test]
    fn argb_channels() {
        let argb = Argb(0x80_12_34_56);
        assert_eq!(argb.alpha(), 0x80);
        assert_eq!(argb.red(), 0x12);
        assert_eq!(argb.green(), 0x34);
        assert_eq!(argb.blue(), 0x56);
        assert_eq!(argb.rgb(), Rgb::new(0x12, 0x34, 0x56));
        assert_eq!(Argb::from_channels(0x80, 0x12, 0x34, 0x56), argb);
    }

    #[test]
    fn brightness_is_max_channel() {
        assert_eq!(Rgb::BLACK.brightness(), 0.0);
        assert_eq!(Rgb::WHITE.brightness(), 1.0);
        assert_eq!(Rgb::new(200, 200, 200).brightness(), 200.0 / 255.0);
        assert_eq!(Rgb::new(10, 51, 20).brightness(), 0.2);
    }

    #[test]
    fn keys_are_injective() {
        assert_ne!(Rgb::new(1, 0, 0).key(), Rgb::new(0, 1, 0).key());
        assert_ne!(Rgb::new(0, 1, 0).key(), Rgb::new(0, 0, 1).key());
        assert_eq!(Rgb::new(0x12, 0x34, 0x56).key().get(), 0x123456);
        assert_eq!(Rgb::from(Rgb::new(0x12, 0x34, 0x56).key()), Rgb::new(0x12, 0x34, 0x56));
    }

    #[test]
    fn key_from_point() {
        assert_eq!(
            ColorKey::from_point(Point3::new(255, 0, 128)),
            Some(Rgb::new(255, 0, 128).key())
        );
        assert_eq!(ColorKey::from_point(Point3::new(256, 0, 0)), None);
        assert_eq!(ColorKey::from_point(Point3::new(0, -1, 0)), None);
    }

    #[test]
    fn average_of_uniform_tile() {
        let image = RgbaImage::from_pixel(7, 5, Rgba([12, 34, 56, 255]));
        assert_eq!(average_color(&image).unwrap(), Rgb::new(12, 34, 56));
    }

    #[test]
    fn average_ignores_transparent_pixels() {
        let mut image = RgbaImage::from_pixel(4, 4, Rgba([90, 120, 150, 255]));
        for x in 0..4 {
            image.put_pixel(x, 0, Rgba([255, 0, 255, 0]));
            image.put_pixel(x, 3, Rgba([0, 255, 0, 0]));
        }
        assert_eq!(average_color(&image).unwrap(), Rgb::new(90, 120, 150));
    }

    #[test]
    fn average_truncates() {
        let mut image = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([3, 2, 1, 1]));
        assert_eq!(average_color(&image).unwrap(), Rgb::new(1, 1, 0));
    }

    #[test]
    fn average_of_invisible_tile_fails() {
        let image = RgbaImage::from_pixel(3, 2, Rgba([255, 255, 255, 0]));
        assert!(matches!(
            average_color(&image),
            Err(TileError::NoOpaquePixels {
                width: 3,
                height: 2
            })
        ));
    }

    #[test]
    fn average_of_empty_tile_fails() {
        let image = RgbaImage::new(0, 0);
        assert!(average_color(&image).is_err());
    }
}
