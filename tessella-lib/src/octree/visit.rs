use std::ops::ControlFlow;

use crate::math::{bounds::CubeBounds, point::Point3};

/// Contains callbacks for [`Octree`](super::Octree) traversal.
///
/// - [`OctreeVisitor::leaf`] is called for nodes that hold points directly.
/// - [`OctreeVisitor::node`] is called for nodes that were split into octants.
///
/// [`Octree::visit`](super::Octree::visit) traverses depth-first, octants in [`Corner3`] order.
///
/// [`Corner3`]: crate::math::enums::Corner3
pub trait OctreeVisitor {
    /// The type within the [`ControlFlow::Break`] used to break visitation.
    type Break;

    /// Called for leaves, including empty ones.
    fn leaf(&mut self, leaf: OctreeLeaf) -> ControlFlow<Self::Break>;

    /// Called for split nodes.
    ///
    /// Return [`VisitNode::Enter`] to enter the node, resulting in further callbacks.
    fn node(&mut self, node: OctreeNode) -> ControlFlow<Self::Break, VisitNode>;
}

/// Immutable access to a leaf within an [`Octree`](super::Octree).
#[derive(Clone, Copy, Debug)]
pub struct OctreeLeaf<'a> {
    bounds: CubeBounds,
    depth: u8,
    points: &'a [Point3],
}

impl<'a> OctreeLeaf<'a> {
    pub(crate) fn new(bounds: CubeBounds, depth: u8, points: &'a [Point3]) -> Self {
        Self {
            bounds,
            depth,
            points,
        }
    }

    /// The area of the color cube that this leaf covers.
    pub fn bounds(self) -> CubeBounds {
        self.bounds
    }

    /// The number of splits between the root and this leaf.
    pub fn depth(self) -> u8 {
        self.depth
    }

    /// The points held by this leaf in insertion order.
    pub fn points(self) -> &'a [Point3] {
        self.points
    }
}

/// A split node within an [`Octree`](super::Octree).
#[derive(Clone, Copy, Debug)]
pub struct OctreeNode {
    bounds: CubeBounds,
    depth: u8,
}

impl OctreeNode {
    pub(crate) fn new(bounds: CubeBounds, depth: u8) -> Self {
        Self { bounds, depth }
    }

    pub fn bounds(self) -> CubeBounds {
        self.bounds
    }

    pub fn depth(self) -> u8 {
        self.depth
    }
}

/// [`Octree`](super::Octree) control flow for nodes that can be entered.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum VisitNode {
    /// Skips over this node without entering it.
    Skip,
    /// Enters this node, causing additional calls on the visitor.
    Enter,
}

impl VisitNode {
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip)
    }

    pub fn is_enter(&self) -> bool {
        matches!(self, Self::Enter)
    }
}

/// Summary of the shape of an [`Octree`](super::Octree), collected by visiting every node.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct OctreeStats {
    /// The total number of points.
    pub points: usize,
    /// The number of leaves, including empty ones.
    pub leaves: usize,
    /// The number of split nodes.
    pub splits: usize,
    /// The depth of the deepest leaf.
    pub max_depth: u8,
    /// The number of points in the fullest leaf.
    pub max_leaf_points: usize,
}

impl OctreeVisitor for OctreeStats {
    type Break = std::convert::Infallible;

    fn leaf(&mut self, leaf: OctreeLeaf) -> ControlFlow<Self::Break> {
        self.points += leaf.points().len();
        self.leaves += 1;
        self.max_depth = self.max_depth.max(leaf.depth());
        self.max_leaf_points = self.max_leaf_points.max(leaf.points().len());
        ControlFlow::Continue(())
    }

    fn node(&mut self, _node: OctreeNode) -> ControlFlow<Self::Break, VisitNode> {
        self.splits += 1;
        ControlFlow::Continue(VisitNode::Enter)
    }
}
