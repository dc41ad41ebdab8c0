use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Preset combinations of output scale and sample density.
#[derive(
    Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Deserialize, Serialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// 4 times the width and height, one tile per source pixel.
    #[default]
    X4,
    /// 8 times the width and height, 16 tiles per source pixel.
    X8,
}

impl Mode {
    /// How much larger the output is than the source image along each axis.
    pub const fn scale(self) -> u32 {
        match self {
            Self::X4 => 4,
            Self::X8 => 8,
        }
    }

    /// How many tiles are placed per source pixel.
    pub const fn density(self) -> u32 {
        match self {
            Self::X4 => 1,
            Self::X8 => 16,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::X4 => "width * 4; height * 4; number of tiles = number of source pixels",
            Self::X8 => "width * 8; height * 8; number of tiles = number of source pixels * 16",
        }
    }

    /// The number of tiles to place for a source image of the given size.
    pub const fn sample_count(self, width: u32, height: u32) -> u64 {
        width as u64 * height as u64 * self.density() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        assert_eq!((Mode::X4.scale(), Mode::X4.density()), (4, 1));
        assert_eq!((Mode::X8.scale(), Mode::X8.density()), (8, 16));
        assert_eq!(Mode::default(), Mode::X4);
    }

    #[test]
    fn sample_count() {
        assert_eq!(Mode::X4.sample_count(1, 1), 1);
        assert_eq!(Mode::X4.sample_count(640, 480), 307_200);
        assert_eq!(Mode::X8.sample_count(640, 480), 4_915_200);
        assert_eq!(Mode::X8.sample_count(0, 480), 0);
    }

    #[test]
    fn parses_from_command_line_names() {
        assert_eq!(Mode::from_str("x4", true), Ok(Mode::X4));
        assert_eq!(Mode::from_str("X8", true), Ok(Mode::X8));
        assert!(Mode::from_str("x16", true).is_err());
    }
}
