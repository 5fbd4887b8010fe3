//! Voronoi Cell Summary
//!
//! A self-contained snapshot of one site's cell: its polygon, neighbors and
//! inscribed-circle radius, detached from the diagram that produced it.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{polygon_area, polygon_centroid};

/// A single cell of a planar Voronoi diagram
///
/// # Design Notes
///
/// Cells are plain data: they are built on demand by
/// [`Voronoi::cells`](crate::Voronoi::cells) and do not borrow the diagram,
/// so they can be kept after the diagram is relaxed or dropped.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiCell {
    /// Input index of the cell's site
    pub index: usize,

    /// Site coordinate
    pub center: DVec2,

    /// Input indices of sites sharing an edge with this cell
    ///
    /// Empty for duplicate points, which own no edges.
    pub neighbors: Vec<usize>,

    /// Cell polygon clipped to the diagram bounds, counter-clockwise
    ///
    /// Empty when the cell has no visible part inside the bounds.
    pub vertices: Vec<DVec2>,

    /// Half the distance to the nearest neighbor site, 0 on the hull
    pub radius: f64,
}

impl VoronoiCell {
    /// Create a new Voronoi cell
    ///
    /// This is typically called by the diagram, not by user code.
    pub fn new(
        index: usize,
        center: DVec2,
        neighbors: Vec<usize>,
        vertices: Vec<DVec2>,
        radius: f64,
    ) -> Self {
        Self {
            index,
            center,
            neighbors,
            vertices,
            radius,
        }
    }

    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    #[inline]
    pub fn is_neighbor_of(&self, other_index: usize) -> bool {
        self.neighbors.contains(&other_index)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Area of the clipped polygon
    pub fn area(&self) -> f64 {
        polygon_area(&self.vertices)
    }

    /// Area-weighted centroid of the clipped polygon
    ///
    /// `None` for empty or zero-area polygons.
    pub fn centroid(&self) -> Option<DVec2> {
        polygon_centroid(&self.vertices)
    }

    /// Euclidean distance between the two sites
    #[inline]
    pub fn distance_to(&self, other: &VoronoiCell) -> f64 {
        self.center.distance(other.center)
    }
}
