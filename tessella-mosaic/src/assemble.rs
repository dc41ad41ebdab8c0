use image::RgbaImage;
use rand::Rng;
use thiserror::Error;

use crate::{
    composite::{blank_canvas, draw_over},
    grid::PixelGrid,
    mode::Mode,
    tile::TileSet,
};

/// How often progress is logged by default, in samples.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 6500;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssembleError {
    #[error("scale must be at least 1")]
    InvalidScale,
    #[error("density must be a finite, non-negative number, got {0}")]
    InvalidDensity(f64),
    #[error("a {width}x{height} source image scaled by {scale} exceeds the maximum canvas size")]
    CanvasTooLarge { width: u32, height: u32, scale: u32 },
}

/// The result of [`MosaicAssembler::assemble`].
#[derive(Clone, Debug)]
pub struct Mosaic {
    /// The composited, opaque output image.
    pub canvas: RgbaImage,
    /// The number of random positions that were sampled.
    pub samples: u64,
    /// The number of samples that actually placed a tile.
    ///
    /// Lower than [`Self::samples`] if the tile lookup missed for some colors.
    pub placed: u64,
}

/// Paints tiles at random positions of an enlarged canvas, choosing each tile by the color of the
/// source pixel underneath.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MosaicAssembler {
    scale: u32,
    density: f64,
    progress_interval: u64,
}

impl MosaicAssembler {
    /// Constructs a [`MosaicAssembler`] that scales the source by `scale` along each axis and
    /// samples `density` positions per source pixel.
    pub fn new(scale: u32, density: f64) -> Result<Self, AssembleError> {
        if scale == 0 {
            return Err(AssembleError::InvalidScale);
        }
        if !density.is_finite() || density < 0.0 {
            return Err(AssembleError::InvalidDensity(density));
        }
        Ok(Self {
            scale,
            density,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        })
    }

    pub fn from_mode(mode: Mode) -> Self {
        Self {
            scale: mode.scale(),
            density: f64::from(mode.density()),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Logs progress every `interval` samples; `0` disables progress logging.
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    /// The number of samples taken for a source image of the given size.
    pub fn sample_count(&self, width: u32, height: u32) -> u64 {
        (f64::from(width) * f64::from(height) * self.density).floor() as u64
    }

    /// Assembles a mosaic of `source` out of `tiles`.
    ///
    /// Tiles are painted in the order their positions are drawn from `rng`, later tiles blending
    /// over earlier ones. Each tile is painted with its top left corner at the sampled position and
    /// an opacity equal to the brightness of the source pixel. Samples whose color has no tile are
    /// skipped.
    pub fn assemble<G, R>(
        &self,
        source: &G,
        tiles: &TileSet,
        rng: &mut R,
    ) -> Result<Mosaic, AssembleError>
    where
        G: PixelGrid + ?Sized,
        R: Rng + ?Sized,
    {
        let too_large = || AssembleError::CanvasTooLarge {
            width: source.width(),
            height: source.height(),
            scale: self.scale,
        };
        let width = source.width().checked_mul(self.scale).ok_or_else(too_large)?;
        let height = source.height().checked_mul(self.scale).ok_or_else(too_large)?;

        let mut canvas = blank_canvas(width, height);
        let samples = if width == 0 || height == 0 {
            0
        } else {
            self.sample_count(source.width(), source.height())
        };

        if tiles.is_empty() {
            log::warn!("no tiles available, the mosaic stays black");
        }

        let mut placed = 0;
        for sample in 0..samples {
            if self.progress_interval != 0 && sample % self.progress_interval == 0 {
                log::info!("{sample}/{samples}");
            }

            let x = rng.random_range(0..width);
            let y = rng.random_range(0..height);
            let color = source.argb(x / self.scale, y / self.scale).rgb();
            let Some(tile) = tiles.nearest(color) else {
                continue;
            };

            draw_over(&mut canvas, tile.image(), x, y, color.brightness());
            placed += 1;
        }

        Ok(Mosaic {
            canvas,
            samples,
            placed,
        })
    }
}

impl From<Mode> for MosaicAssembler {
    fn from(mode: Mode) -> Self {
        Self::from_mode(mode)
    }
}
