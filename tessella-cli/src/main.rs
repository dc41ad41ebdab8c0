//! Photomosaic builder.
//!
//! Loads every PNG from a tile directory, indexes the tiles by their average color and paints
//! them over an enlarged copy of the input image, picking each tile by the color underneath it.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use tessella_mosaic::{
    assemble::{Mosaic, MosaicAssembler},
    mode::Mode,
    tile::TileSet,
};

use config::{Config, Search, Settings};

#[derive(Parser, Debug)]
#[command(name = "tessella", about = "Builds a photomosaic out of tile images", version)]
struct Args {
    /// Image to recreate as a mosaic
    input: PathBuf,

    /// Directory with the tile images [default: assets]
    #[arg(short, long)]
    tiles: Option<PathBuf>,

    /// Where to write the mosaic [default: output.png]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output scale and tile density [default: x4]
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Seed for tile placement, random if omitted
    #[arg(long)]
    seed: Option<u64>,

    /// How tiles are matched to colors [default: single-path]
    #[arg(long, value_enum)]
    search: Option<Search>,

    /// Log progress every this many tiles, 0 disables progress logging [default: 6500]
    #[arg(long)]
    progress_interval: Option<u64>,

    /// TOML file with defaults for any of the options above
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Config {
        Config {
            tiles: self.tiles.clone(),
            output: self.output.clone(),
            mode: self.mode,
            seed: self.seed,
            search: self.search,
            progress_interval: self.progress_interval,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let file_config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let settings = file_config.overridden_by(args.overrides()).resolve();

    let mosaic = run(&args.input, &settings)?;
    println!("number of tiles placed: {}", mosaic.placed);
    Ok(())
}

fn run(input: &Path, settings: &Settings) -> Result<Mosaic> {
    log::info!("{:?}: {}", settings.mode, settings.mode.description());

    let source = image::open(input)
        .with_context(|| format!("failed to open input image {}", input.display()))?
        .to_rgba8();

    let (tiles, report) = TileSet::load_dir(&settings.tiles, settings.search)
        .with_context(|| format!("failed to load tiles from {}", settings.tiles.display()))?;
    if report.accepted == 0 {
        log::warn!("no usable tiles in {}", settings.tiles.display());
    }

    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!("placing tiles with seed {seed}");

    let mosaic = MosaicAssembler::from_mode(settings.mode)
        .with_progress_interval(settings.progress_interval)
        .assemble(&source, &tiles, &mut StdRng::seed_from_u64(seed))?;

    mosaic
        .canvas
        .save(&settings.output)
        .with_context(|| format!("failed to write mosaic to {}", settings.output.display()))?;
    log::info!(
        "wrote {}x{} mosaic to {}",
        mosaic.canvas.width(),
        mosaic.canvas.height(),
        settings.output.display()
    );

    Ok(mosaic)
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use tessella_lib::octree::NearestSearch;

    use super::*;

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "tessella", "in.png", "--mode", "x8", "--search", "exact", "--seed", "3", "-t", "tiles",
        ])
        .unwrap();
        assert_eq!(args.input, Path::new("in.png"));
        assert_eq!(
            args.overrides(),
            Config {
                tiles: Some("tiles".into()),
                mode: Some(Mode::X8),
                seed: Some(3),
                search: Some(Search::Exact),
                ..Default::default()
            }
        );

        assert!(Args::try_parse_from(["tessella"]).is_err());
        assert!(Args::try_parse_from(["tessella", "in.png", "--mode", "x2"]).is_err());
    }

    #[test]
    fn builds_mosaic_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let tiles = dir.path().join("tiles");
        std::fs::create_dir(&tiles).unwrap();
        RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]))
            .save(tiles.join("red.png"))
            .unwrap();
        RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]))
            .save(tiles.join("blue.png"))
            .unwrap();

        let input = dir.path().join("input.png");
        RgbaImage::from_pixel(3, 2, Rgba([250, 10, 10, 255]))
            .save(&input)
            .unwrap();

        let settings = Settings {
            tiles,
            output: dir.path().join("mosaic.png"),
            mode: Mode::X8,
            seed: Some(5),
            search: NearestSearch::Exact,
            progress_interval: 0,
        };
        let mosaic = run(&input, &settings).unwrap();
        assert_eq!(mosaic.samples, 96);
        assert_eq!(mosaic.placed, 96);

        let written = image::open(&settings.output).unwrap().to_rgba8();
        assert_eq!(written.dimensions(), (24, 16));
        assert_eq!(written, mosaic.canvas);
        assert!(written.pixels().all(|pixel| pixel[1] == 0 && pixel[2] == 0));
    }

    #[test]
    fn missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Config {
            tiles: Some(dir.path().to_path_buf()),
            output: Some(dir.path().join("out.png")),
            ..Default::default()
        }
        .resolve();
        let error = run(&dir.path().join("missing.png"), &settings).unwrap_err();
        assert!(error.to_string().contains("missing.png"));
    }
}
