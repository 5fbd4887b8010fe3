//! Input sites and the sorted site stream consumed by the sweep

use std::cmp::Ordering;

use glam::DVec2;

use crate::edge::{EdgeId, Side};
use crate::geometry::Rect;

/// Total order driving the sweep: ascending y, ties broken by ascending x
///
/// Also used as the tie-break inside circle-event validation, so it must
/// stay identical for sites and for circle-event positions.
pub fn compare_by_y_then_x(a: DVec2, b: DVec2) -> Ordering {
    a.y.partial_cmp(&b.y)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
}

/// A diagram site: one input point and the Voronoi edges bounding its cell
#[derive(Debug, Clone)]
pub struct Site {
    coord: DVec2,
    /// Input index; stable for the lifetime of the diagram
    index: usize,
    /// Randomly assigned at construction and never read by the diagram
    weight: f64,
    /// Incident edges in creation order
    edges: Vec<EdgeId>,
    /// Incident edges threaded into boundary order, paired with orientations
    ordered_edges: Vec<(EdgeId, Side)>,
    /// False for a later copy of a coincident point; such sites skip the sweep
    swept: bool,
}

impl Site {
    pub(crate) fn new(coord: DVec2, index: usize, weight: f64, swept: bool) -> Self {
        Self {
            coord,
            index,
            weight,
            edges: Vec::new(),
            ordered_edges: Vec::new(),
            swept,
        }
    }

    #[inline]
    pub fn coord(&self) -> DVec2 {
        self.coord
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.coord.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.coord.y
    }

    /// Input index of this site
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Whether this site took part in the sweep (false for duplicates)
    #[inline]
    pub fn is_swept(&self) -> bool {
        self.swept
    }

    /// Incident edges in the order the sweep created them
    #[inline]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Incident edges in boundary traversal order
    ///
    /// Empty when the site has no edges or its edges could not be threaded
    /// into a single chain.
    #[inline]
    pub fn ordered_edges(&self) -> &[(EdgeId, Side)] {
        &self.ordered_edges
    }

    #[inline]
    pub fn dist(&self, p: DVec2) -> f64 {
        self.coord.distance(p)
    }

    pub(crate) fn add_edge(&mut self, edge: EdgeId) {
        self.edges.push(edge);
    }

    pub(crate) fn set_ordered_edges(&mut self, ordered: Vec<(EdgeId, Side)>) {
        self.ordered_edges = ordered;
    }
}

/// Sequential stream of sites in sweep order
///
/// Holds indices into the diagram's site storage. The stream must be sorted
/// with [`SiteList::sort`] before it can be read.
#[derive(Debug, Clone, Default)]
pub struct SiteList {
    order: Vec<usize>,
    cursor: usize,
    sorted: bool,
}

impl SiteList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a site index; invalidates any previous sort
    pub fn push(&mut self, site: usize) {
        self.order.push(site);
        self.sorted = false;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[inline]
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Sort into [`compare_by_y_then_x`] order and rewind the cursor
    ///
    /// The sort is stable and has no side effects on the sites themselves.
    pub fn sort(&mut self, sites: &[Site]) {
        self.order
            .sort_by(|&a, &b| compare_by_y_then_x(sites[a].coord, sites[b].coord));
        self.sorted = true;
        self.cursor = 0;
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Next site index in sweep order, or `None` once exhausted
    ///
    /// # Panics
    ///
    /// Panics if the list has not been sorted. Reading an unsorted stream
    /// would silently corrupt the sweep.
    pub fn next(&mut self) -> Option<usize> {
        assert!(self.sorted, "SiteList::next(): sites have not been sorted");
        let site = self.order.get(self.cursor).copied();
        if site.is_some() {
            self.cursor += 1;
        }
        site
    }

    /// Bounding rectangle of the listed sites, sorting first if needed
    ///
    /// The y-range is read from the first and last sites of the sorted order.
    pub fn sites_bounds(&mut self, sites: &[Site]) -> Rect {
        if !self.sorted {
            self.sort(sites);
        }
        let (Some(&first), Some(&last)) = (self.order.first(), self.order.last()) else {
            return Rect::new(0.0, 0.0, 0.0, 0.0);
        };

        let (xmin, xmax) = self
            .order
            .iter()
            .map(|&i| sites[i].coord.x)
            .fold((f64::MAX, f64::MIN), |(lo, hi), x| (lo.min(x), hi.max(x)));
        let ymin = sites[first].coord.y;
        let ymax = sites[last].coord.y;
        Rect::new(xmin, ymin, xmax - xmin, ymax - ymin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sites(points: &[(f64, f64)]) -> Vec<Site> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Site::new(DVec2::new(x, y), i, 0.0, true))
            .collect()
    }

    #[test]
    fn test_compare_by_y_then_x() {
        let a = DVec2::new(5.0, 1.0);
        let b = DVec2::new(0.0, 2.0);
        let c = DVec2::new(1.0, 2.0);
        assert_eq!(compare_by_y_then_x(a, b), Ordering::Less);
        assert_eq!(compare_by_y_then_x(c, b), Ordering::Greater);
        assert_eq!(compare_by_y_then_x(b, b), Ordering::Equal);
    }

    #[test]
    fn test_sort_is_pure() {
        let sites = sites(&[(3.0, 3.0), (1.0, 0.0), (0.0, 3.0), (2.0, 1.0)]);
        let mut list = SiteList::new();
        for i in 0..sites.len() {
            list.push(i);
        }
        list.sort(&sites);

        let order: Vec<usize> = std::iter::from_fn(|| list.next()).collect();
        assert_eq!(order, vec![1, 3, 2, 0]);

        // Input indices are untouched by sorting
        for (i, site) in sites.iter().enumerate() {
            assert_eq!(site.index(), i);
        }
    }

    #[test]
    #[should_panic(expected = "have not been sorted")]
    fn test_next_before_sort_panics() {
        let mut list = SiteList::new();
        list.push(0);
        let _ = list.next();
    }

    #[test]
    fn test_push_invalidates_sort() {
        let sites = sites(&[(0.0, 0.0), (1.0, 1.0)]);
        let mut list = SiteList::new();
        list.push(0);
        list.sort(&sites);
        assert!(list.is_sorted());
        list.push(1);
        assert!(!list.is_sorted());
    }

    #[test]
    fn test_sites_bounds() {
        let sites = sites(&[(3.0, 4.0), (-1.0, 0.0), (2.0, 8.0)]);
        let mut list = SiteList::new();
        for i in 0..sites.len() {
            list.push(i);
        }
        let bounds = list.sites_bounds(&sites);
        assert_eq!(bounds, Rect::new(-1.0, 0.0, 4.0, 8.0));
        assert!(list.is_sorted());
        assert_eq!(list.next(), Some(1));
    }
}
