use std::ops::ControlFlow;

use arrayvec::ArrayVec;
use enum_map::EnumMap;

use super::{
    visit::{OctreeLeaf, OctreeNode, OctreeVisitor},
    MAX_POINTS_PER_NODE,
};
use crate::math::{
    bounds::CubeBounds,
    enums::{Corner3, Corners3},
    point::Point3,
};

/// A node within an octree, holding either points directly or a split into 8 octants.
///
/// Nodes don't know their own bounds; they are passed down during traversal instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Node {
    /// A leaf node holding points in insertion order.
    Leaf(Vec<Point3>),
    /// A node that was split into 8 octants. Never turns back into a leaf.
    Split(Octants),
}

impl Default for Node {
    fn default() -> Self {
        Self::Leaf(Vec::new())
    }
}

/// The best candidate of a nearest neighbor search along with its squared distance.
pub(crate) type Candidate = (Point3, i64);

impl Node {
    /// Inserts the `point` into the leaf it routes to, splitting that leaf if it gets too full.
    pub(crate) fn insert(&mut self, bounds: CubeBounds, point: Point3) {
        match self {
            Self::Leaf(points) => {
                points.push(point);
                if points.len() > MAX_POINTS_PER_NODE && bounds.can_split() {
                    self.split(bounds);
                }
            }
            Self::Split(octants) => {
                let corner = bounds.corner_of(point);
                octants[corner].insert(bounds.child(corner), point);
            }
        }
    }

    /// Splits the leaf into 8 octants and moves its points into them.
    ///
    /// Points are moved without triggering further splits, even if all of them end up in the
    /// same octant.
    ///
    /// # Panics
    ///
    /// Panics if the node is already split.
    fn split(&mut self, bounds: CubeBounds) {
        let Self::Leaf(points) = self else {
            panic!("node already split");
        };

        let mut octants = Octants::default();
        for point in points.drain(..) {
            match &mut octants[bounds.corner_of(point)] {
                Self::Leaf(octant_points) => octant_points.push(point),
                Self::Split(_) => unreachable!("fresh octants should be leaves"),
            }
        }
        *self = Self::Split(octants);
    }

    /// Descends only into the octant `target` routes to and scans the leaf found there.
    ///
    /// Within a leaf, the first point with the smallest distance wins. Sibling octants are only
    /// consulted if the routed octant holds no points at all, closest octant first.
    pub(crate) fn nearest_along_path(&self, bounds: CubeBounds, target: Point3) -> Option<Candidate> {
        match self {
            Self::Leaf(points) => nearest_in_leaf(points, target),
            Self::Split(octants) => {
                let routed = bounds.corner_of(target);
                octants[routed]
                    .nearest_along_path(bounds.child(routed), target)
                    .or_else(|| {
                        octants_by_distance(bounds, target)
                            .into_iter()
                            .filter(|&(corner, _)| corner != routed)
                            .find_map(|(corner, _)| {
                                octants[corner].nearest_along_path(bounds.child(corner), target)
                            })
                    })
            }
        }
    }

    /// Branch and bound search for the point closest to `target`.
    ///
    /// Octants are visited closest first and skipped once their bounds can no longer beat `best`.
    pub(crate) fn nearest_exact(
        &self,
        bounds: CubeBounds,
        target: Point3,
        best: &mut Option<Candidate>,
    ) {
        match self {
            Self::Leaf(points) => {
                if let Some(candidate) = nearest_in_leaf(points, target) {
                    if best.map_or(true, |(_, distance)| candidate.1 < distance) {
                        *best = Some(candidate);
                    }
                }
            }
            Self::Split(octants) => {
                for (corner, bound) in octants_by_distance(bounds, target) {
                    if best.is_some_and(|(_, distance)| bound >= distance) {
                        break;
                    }
                    octants[corner].nearest_exact(bounds.child(corner), target, best);
                }
            }
        }
    }

    /// Recursively visits all nodes and leaves using the given `visitor`.
    pub(crate) fn visit<V: OctreeVisitor>(
        &self,
        visitor: &mut V,
        bounds: CubeBounds,
        depth: u8,
    ) -> ControlFlow<V::Break> {
        match self {
            Self::Leaf(points) => visitor.leaf(OctreeLeaf::new(bounds, depth, points)),
            Self::Split(octants) => {
                if visitor.node(OctreeNode::new(bounds, depth))?.is_enter() {
                    for (corner, octant) in octants.iter() {
                        octant.visit(visitor, bounds.child(corner), depth + 1)?;
                    }
                }
                ControlFlow::Continue(())
            }
        }
    }
}

/// The 8 children of a split [`Node`].
pub(crate) type Octants = Box<EnumMap<Corner3, Node>>;

fn nearest_in_leaf(points: &[Point3], target: Point3) -> Option<Candidate> {
    points
        .iter()
        .map(|&point| (point, point.distance_squared(target)))
        .min_by_key(|&(_, distance)| distance)
}

/// Returns all octants of `bounds` along with their squared distance to `target`, closest first.
fn octants_by_distance(bounds: CubeBounds, target: Point3) -> ArrayVec<(Corner3, i64), 8> {
    let mut octants = Corners3::all()
        .iter()
        .map(|corner| (corner, bounds.child(corner).distance_squared_to(target)))
        .collect::<ArrayVec<_, 8>>();
    octants.sort_by_key(|&(_, distance)| distance);
    octants
}
