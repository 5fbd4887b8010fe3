//! Spanning trees over the Delaunay graph (Kruskal with union-find)

use std::mem;

use crate::geometry::LineSegment;

/// Which extreme spanning tree to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpanningTreeKind {
    #[default]
    Minimum,
    Maximum,
}

#[derive(Debug, Clone)]
struct DisjointSet {
    // Represents parent if >= 0, size if < 0
    link: Vec<i32>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            link: vec![-1; n],
        }
    }

    fn find_root_with_size(&mut self, u: usize) -> (usize, u32) {
        let p = self.link[u];
        if p >= 0 {
            let (root, size) = self.find_root_with_size(p as usize);
            self.link[u] = root as i32;
            (root, size)
        } else {
            (u, (-p) as u32)
        }
    }

    // Returns true iff two sets were previously disjoint
    fn merge(&mut self, u: usize, v: usize) -> bool {
        let (mut u, size_u) = self.find_root_with_size(u);
        let (mut v, size_v) = self.find_root_with_size(v);
        if u == v {
            return false;
        }
        if size_u < size_v {
            mem::swap(&mut u, &mut v);
        }
        self.link[v] = u as i32;
        self.link[u] = -((size_u + size_v) as i32);
        true
    }
}

/// Kruskal over weighted site-to-site segments
///
/// `edges` holds `(site, site, segment)` triples; weights are segment
/// lengths. Returns one tree per connected component (a forest), as
/// segments in the order they were accepted.
pub(crate) fn kruskal(
    site_count: usize,
    mut edges: Vec<(usize, usize, LineSegment)>,
    kind: SpanningTreeKind,
) -> Vec<LineSegment> {
    match kind {
        SpanningTreeKind::Minimum => {
            edges.sort_by(|a, b| a.2.length().total_cmp(&b.2.length()));
        }
        SpanningTreeKind::Maximum => {
            edges.sort_by(|a, b| b.2.length().total_cmp(&a.2.length()));
        }
    }

    let mut dset = DisjointSet::new(site_count);
    let mut remaining = site_count.saturating_sub(1);
    let mut tree = Vec::with_capacity(remaining);
    for (u, v, segment) in edges {
        if remaining == 0 {
            break;
        }
        if dset.merge(u, v) {
            tree.push(segment);
            remaining -= 1;
        }
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> LineSegment {
        LineSegment::new(DVec2::new(x0, y0), DVec2::new(x1, y1))
    }

    fn square_graph() -> Vec<(usize, usize, LineSegment)> {
        // Unit-ish rectangle 0-1-3-2 plus one diagonal
        vec![
            (0, 1, seg(0.0, 0.0, 2.0, 0.0)),
            (0, 2, seg(0.0, 0.0, 0.0, 1.0)),
            (1, 3, seg(2.0, 0.0, 2.0, 1.0)),
            (2, 3, seg(0.0, 1.0, 2.0, 1.0)),
            (0, 3, seg(0.0, 0.0, 2.0, 1.0)),
        ]
    }

    #[test]
    fn test_disjoint_set_merge() {
        let mut dset = DisjointSet::new(4);
        assert!(dset.merge(0, 1));
        assert!(dset.merge(2, 3));
        assert!(!dset.merge(1, 0));
        assert!(dset.merge(1, 3));
        assert_eq!(dset.find_root_with_size(2).1, 4);
    }

    #[test]
    fn test_minimum_spanning_tree() {
        let tree = kruskal(4, square_graph(), SpanningTreeKind::Minimum);
        assert_eq!(tree.len(), 3);
        let total: f64 = tree.iter().map(LineSegment::length).sum();
        assert!((total - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_maximum_spanning_tree() {
        let tree = kruskal(4, square_graph(), SpanningTreeKind::Maximum);
        assert_eq!(tree.len(), 3);
        let total: f64 = tree.iter().map(LineSegment::length).sum();
        assert!((total - (5f64.sqrt() + 4.0)).abs() < 1e-12);
    }

    #[test]
    fn test_forest_on_disconnected_graph() {
        let edges = vec![(0, 1, seg(0.0, 0.0, 1.0, 0.0)), (2, 3, seg(5.0, 0.0, 6.0, 0.0))];
        assert_eq!(kruskal(4, edges, SpanningTreeKind::Minimum).len(), 2);
    }
}
