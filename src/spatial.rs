//! Nearest-site lookups for point-in-cell queries
//!
//! This module is only available with the `spatial-index` feature.

use glam::DVec2;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// KD-tree over site coordinates
///
/// The nearest site to a point is the site whose Voronoi cell contains it,
/// so one O(log n) query answers "which cell is this point in".
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f64, usize, 2, 32>,
    /// Maps tree items back to site indices
    sites: Vec<usize>,
}

impl SpatialIndex {
    /// Build the index from `(site index, coordinate)` pairs
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_diagram::*;
    ///
    /// let index = SpatialIndex::new(&[
    ///     (0, DVec2::new(1.0, 1.0)),
    ///     (1, DVec2::new(9.0, 1.0)),
    ///     (2, DVec2::new(5.0, 9.0)),
    /// ]);
    /// assert_eq!(index.find_nearest(DVec2::new(8.0, 2.0)), Some(1));
    /// ```
    pub fn new(sites: &[(usize, DVec2)]) -> Self {
        let points: Vec<[f64; 2]> = sites.iter().map(|(_, p)| [p.x, p.y]).collect();
        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
            sites: sites.iter().map(|&(index, _)| index).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Site index nearest to `position`, or `None` for an empty index
    pub fn find_nearest(&self, position: DVec2) -> Option<usize> {
        if self.sites.is_empty() {
            return None;
        }
        let result = self
            .tree
            .nearest_one::<SquaredEuclidean>(&[position.x, position.y]);
        self.sites.get(result.item as usize).copied()
    }
}
