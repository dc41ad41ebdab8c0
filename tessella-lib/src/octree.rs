mod node;
pub mod visit;

use std::ops::ControlFlow;

use node::Node;
use thiserror::Error;
use visit::{OctreeStats, OctreeVisitor};

use crate::math::{bounds::CubeBounds, point::Point3};

/// The number of points a leaf can hold before it is split into octants.
pub const MAX_POINTS_PER_NODE: usize = 10;

/// How [`Octree::nearest_neighbor`] searches the tree.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum NearestSearch {
    /// Descends along the single path that the target would be inserted along and only scans the
    /// leaf at its end.
    ///
    /// This is fast, but only approximate: a closer point just across an octant boundary is
    /// missed. The result is still always one of the inserted points and the closest one within
    /// the scanned leaf.
    #[default]
    SinglePath,
    /// Branch and bound search that always finds the closest point.
    Exact,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OctreeError {
    #[error("point {point} lies outside of the octree bounds {bounds}")]
    OutOfDomain { point: Point3, bounds: CubeBounds },
}

/// An octree over integer points supporting insertion and nearest neighbor queries.
///
/// Leaves hold up to [`MAX_POINTS_PER_NODE`] points and split into 8 octants once they exceed that
/// number. Points can not be removed; the intended lifecycle is to insert everything first and then
/// query, which only needs shared access.
#[derive(Clone, Debug)]
pub struct Octree {
    root: Node,
    bounds: CubeBounds,
    len: usize,
    search: NearestSearch,
}

impl Default for Octree {
    fn default() -> Self {
        Self::new()
    }
}

impl Octree {
    /// Constructs an empty [`Octree`] covering the 8-bit RGB color cube.
    pub fn new() -> Self {
        Self::with_search(NearestSearch::default())
    }

    /// Constructs an empty [`Octree`] covering the 8-bit RGB color cube using the given `search`.
    pub fn with_search(search: NearestSearch) -> Self {
        Self {
            root: Node::default(),
            bounds: CubeBounds::COLORS,
            len: 0,
            search,
        }
    }

    pub fn bounds(&self) -> CubeBounds {
        self.bounds
    }

    pub fn search(&self) -> NearestSearch {
        self.search
    }

    /// The number of inserted points, including duplicates.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts the given `point`.
    ///
    /// Points outside of the octree's bounds are rejected rather than misrouted into a border
    /// octant.
    pub fn insert(&mut self, point: Point3) -> Result<(), OctreeError> {
        if !self.bounds.contains(point) {
            return Err(OctreeError::OutOfDomain {
                point,
                bounds: self.bounds,
            });
        }
        self.root.insert(self.bounds, point);
        self.len += 1;
        Ok(())
    }

    /// Returns the inserted point closest to `target` according to [`Self::search`].
    ///
    /// Returns the center of the octree's bounds if nothing was inserted yet. That point is not
    /// part of the octree; use [`Self::try_nearest_neighbor`] to tell the two cases apart.
    pub fn nearest_neighbor(&self, target: Point3) -> Point3 {
        self.try_nearest_neighbor(target)
            .unwrap_or(self.bounds.center())
    }

    /// Returns the inserted point closest to `target` or [`None`] if the octree is empty.
    pub fn try_nearest_neighbor(&self, target: Point3) -> Option<Point3> {
        let candidate = match self.search {
            NearestSearch::SinglePath => self.root.nearest_along_path(self.bounds, target),
            NearestSearch::Exact => {
                let mut best = None;
                self.root.nearest_exact(self.bounds, target, &mut best);
                best
            }
        };
        candidate.map(|(point, _)| point)
    }

    /// Traverses the octree depth-first using the given `visitor`.
    pub fn visit<V: OctreeVisitor>(&self, visitor: &mut V) -> ControlFlow<V::Break> {
        self.root.visit(visitor, self.bounds, 0)
    }

    /// Collects statistics about the shape of the octree.
    pub fn stats(&self) -> OctreeStats {
        let mut stats = OctreeStats::default();
        match self.visit(&mut stats) {
            ControlFlow::Continue(()) => stats,
            ControlFlow::Break(never) => match never {},
        }
    }
}

impl Extend<Point3> for Octree {
    /// Inserts all points, logging and skipping those outside of the bounds.
    fn extend<I: IntoIterator<Item = Point3>>(&mut self, iter: I) {
        for point in iter {
            if let Err(error) = self.insert(point) {
                log::warn!("{error}");
            }
        }
    }
}
