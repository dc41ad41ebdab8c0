use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use image::RgbaImage;
use tessella_lib::octree::{NearestSearch, Octree, OctreeError};
use thiserror::Error;
use walkdir::WalkDir;

use crate::color::{average_color, ColorKey, Rgb};

#[derive(Debug, Error)]
pub enum TileError {
    #[error("tile of {width}x{height} pixels has no pixels with a non-zero alpha")]
    NoOpaquePixels { width: u32, height: u32 },
    #[error(transparent)]
    Index(#[from] OctreeError),
    #[error("failed to read tile directory {}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("failed to decode tile {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// A tile image along with its average color.
#[derive(Clone, Debug)]
pub struct Tile {
    name: String,
    image: RgbaImage,
    color: Rgb,
}

impl Tile {
    /// Reduces the `image` to its average color.
    ///
    /// Fails if the image has no visible pixels.
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Result<Self, TileError> {
        let color = average_color(&image)?;
        Ok(Self {
            name: name.into(),
            image,
            color,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// The average color over all visible pixels.
    pub fn color(&self) -> Rgb {
        self.color
    }
}

/// How many tiles made it into a [`TileSet`].
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct TileSetReport {
    /// Tiles that were added, including those replacing a tile of the same color.
    pub accepted: usize,
    /// Tiles that could not be decoded or had no visible pixels.
    pub rejected: usize,
    /// Accepted tiles that replaced an earlier tile with the same average color.
    pub duplicates: usize,
}

/// A set of tiles that can be searched by color.
///
/// Every distinct average color is inserted into an [`Octree`] exactly once and maps to the last
/// tile added with that color.
#[derive(Clone, Debug, Default)]
pub struct TileSet {
    index: Octree,
    tiles: HashMap<ColorKey, Tile>,
}

impl TileSet {
    pub fn new(search: NearestSearch) -> Self {
        Self {
            index: Octree::with_search(search),
            tiles: HashMap::new(),
        }
    }

    /// Builds a [`TileSet`] from named images, skipping those without visible pixels.
    pub fn from_images(
        images: impl IntoIterator<Item = (String, RgbaImage)>,
        search: NearestSearch,
    ) -> (Self, TileSetReport) {
        let mut tile_set = Self::new(search);
        let mut report = TileSetReport::default();
        for (name, image) in images {
            match Tile::new(name.as_str(), image).and_then(|tile| tile_set.add(tile)) {
                Ok(replaced) => {
                    report.accepted += 1;
                    if replaced.is_some() {
                        report.duplicates += 1;
                    }
                }
                Err(error) => {
                    log::warn!("skipping tile {name}: {error}");
                    report.rejected += 1;
                }
            }
        }
        tile_set.log_index_stats();
        (tile_set, report)
    }

    /// Loads every `.png` file directly within `dir`, in file name order.
    ///
    /// Files that fail to decode or have no visible pixels are skipped.
    pub fn load_dir(
        dir: impl AsRef<Path>,
        search: NearestSearch,
    ) -> Result<(Self, TileSetReport), TileError> {
        let dir = dir.as_ref();
        let mut images = Vec::new();
        let mut undecodable = 0;

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| TileError::Walk {
                path: dir.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() || !is_png(entry.path()) {
                continue;
            }

            match image::open(entry.path()) {
                Ok(image) => {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    images.push((name, image.to_rgba8()));
                }
                Err(source) => {
                    let error = TileError::Decode {
                        path: entry.path().to_path_buf(),
                        source,
                    };
                    log::warn!("skipping tile: {error}");
                    undecodable += 1;
                }
            }
        }

        let (tile_set, mut report) = Self::from_images(images, search);
        report.rejected += undecodable;
        log::info!(
            "loaded {} tiles from {} ({} rejected, {} duplicate colors)",
            report.accepted,
            dir.display(),
            report.rejected,
            report.duplicates
        );
        Ok((tile_set, report))
    }

    /// Adds the `tile`, returning the tile with the same average color that it replaced.
    pub fn add(&mut self, tile: Tile) -> Result<Option<Tile>, TileError> {
        let key = tile.color.key();
        if !self.tiles.contains_key(&key) {
            self.index.insert(tile.color.to_point())?;
        }
        Ok(self.tiles.insert(key, tile))
    }

    /// Returns the tile with exactly the given average color.
    pub fn get(&self, color: Rgb) -> Option<&Tile> {
        self.tiles.get(&color.key())
    }

    /// Returns the tile whose average color is closest to `color`.
    ///
    /// Returns [`None`] if no tile is associated with the color found by the index, which is always
    /// the case for an empty set.
    pub fn nearest(&self, color: Rgb) -> Option<&Tile> {
        let point = self.index.nearest_neighbor(color.to_point());
        ColorKey::from_point(point).and_then(|key| self.tiles.get(&key))
    }

    pub fn index(&self) -> &Octree {
        &self.index
    }

    /// The number of distinct tile colors.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    fn log_index_stats(&self) {
        let stats = self.index.stats();
        log::debug!(
            "indexed {} colors in {} leaves and {} splits, max depth {}, fullest leaf {}",
            stats.points,
            stats.leaves,
            stats.splits,
            stats.max_depth,
            stats.max_leaf_points
        );
    }
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("png"))
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    fn solid(r: u8, g: u8, b: u8) -> RgbaImage {
        RgbaImage::from_pixel(2, 2, Rgba([r, g, b, 255]))
    }

    fn black_and_white() -> TileSet {
        let (tile_set, report) = TileSet::from_images(
            [
                ("black".to_owned(), solid(0, 0, 0)),
                ("white".to_owned(), solid(255, 255, 255)),
            ],
            NearestSearch::default(),
        );
        assert_eq!(
            report,
            TileSetReport {
                accepted: 2,
                ..Default::default()
            }
        );
        tile_set
    }

    #[test]
    fn nearest_tile_by_color() {
        let tile_set = black_and_white();
        assert_eq!(tile_set.len(), 2);
        assert_eq!(tile_set.index().len(), 2);
        assert_eq!(tile_set.nearest(Rgb::new(10, 10, 10)).unwrap().name(), "black");
        assert_eq!(
            tile_set.nearest(Rgb::new(250, 250, 250)).unwrap().name(),
            "white"
        );
        assert_eq!(tile_set.get(Rgb::WHITE).unwrap().color(), Rgb::WHITE);
        assert!(tile_set.get(Rgb::new(1, 1, 1)).is_none());
    }

    #[test]
    fn empty_set_misses() {
        let tile_set = TileSet::new(NearestSearch::Exact);
        assert!(tile_set.is_empty());
        assert!(tile_set.nearest(Rgb::new(128, 128, 128)).is_none());
        assert!(tile_set.nearest(Rgb::BLACK).is_none());
    }

    #[test]
    fn invisible_tiles_are_rejected() {
        let invisible = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 0]));
        assert!(matches!(
            Tile::new("invisible", invisible.clone()),
            Err(TileError::NoOpaquePixels { .. })
        ));

        let (tile_set, report) = TileSet::from_images(
            [
                ("invisible".to_owned(), invisible),
                ("red".to_owned(), solid(255, 0, 0)),
            ],
            NearestSearch::default(),
        );
        assert_eq!(report.accepted, 1);
        assert_eq!(report.rejected, 1);
        assert_eq!(tile_set.len(), 1);
    }

    #[test]
    fn add_returns_replaced_tile() {
        let mut tile_set = TileSet::default();
        assert!(tile_set
            .add(Tile::new("first", solid(9, 9, 9)).unwrap())
            .unwrap()
            .is_none());
        let replaced = tile_set
            .add(Tile::new("second", solid(9, 9, 9)).unwrap())
            .unwrap();
        assert_eq!(replaced.unwrap().name(), "first");
        assert_eq!(tile_set.tiles().count(), 1);
    }

    #[test]
    fn duplicate_colors_keep_last_tile_and_single_point() {
        let (tile_set, report) = TileSet::from_images(
            [
                ("first".to_owned(), solid(1, 2, 3)),
                ("second".to_owned(), solid(1, 2, 3)),
            ],
            NearestSearch::default(),
        );
        assert_eq!(report.accepted, 2);
        assert_eq!(report.duplicates, 1);
        assert_eq!(tile_set.len(), 1);
        assert_eq!(tile_set.index().len(), 1);
        assert_eq!(tile_set.get(Rgb::new(1, 2, 3)).unwrap().name(), "second");
    }

    #[test]
    fn load_dir_reads_png_files_only() {
        let dir = tempfile::tempdir().unwrap();
        solid(0, 0, 0).save(dir.path().join("a.png")).unwrap();
        solid(200, 10, 10).save(dir.path().join("b.PNG")).unwrap();
        RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]))
            .save(dir.path().join("c.png"))
            .unwrap();
        std::fs::write(dir.path().join("d.png"), b"not a png").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let (tile_set, report) = TileSet::load_dir(dir.path(), NearestSearch::default()).unwrap();
        assert_eq!(
            report,
            TileSetReport {
                accepted: 2,
                rejected: 2,
                duplicates: 0
            }
        );
        assert_eq!(tile_set.get(Rgb::BLACK).unwrap().name(), "a.png");
        assert_eq!(tile_set.get(Rgb::new(200, 10, 10)).unwrap().name(), "b.PNG");
    }

    #[test]
    fn load_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = TileSet::load_dir(dir.path().join("missing"), NearestSearch::default());
        assert!(matches!(result, Err(TileError::Walk { .. })));
    }
}
