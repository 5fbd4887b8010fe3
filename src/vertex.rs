//! Diagram vertices and the circle-event intersection test

use glam::DVec2;

use crate::edge::{Edge, Side};
use crate::site::compare_by_y_then_x;

/// Determinants below this magnitude are treated as parallel bisectors
pub const PARALLEL_EPSILON: f64 = 1e-10;

/// Handle of a finalized vertex inside its diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub(crate) usize);

impl VertexId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A finalized Voronoi vertex
///
/// Candidate intersections found while sweeping are plain coordinates; only
/// a processed circle event turns one into a `Vertex` and assigns its
/// sequence index. An edge end that never receives a vertex is unbounded
/// and is stored as `None` on the edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    coord: DVec2,
    id: VertexId,
}

impl Vertex {
    pub(crate) fn new(coord: DVec2, index: usize) -> Self {
        Self {
            coord,
            id: VertexId(index),
        }
    }

    #[inline]
    pub fn coord(&self) -> DVec2 {
        self.coord
    }

    #[inline]
    pub fn id(&self) -> VertexId {
        self.id
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.id.0
    }
}

/// Intersection of two adjacent beach-line boundaries, if it is a valid circle event
///
/// Each argument is a bisector with the side of it the boundary represents.
/// Returns `None` when either boundary has no bisector (a beach-line end),
/// when both bisectors share their right site, when the lines are (nearly)
/// parallel, or when the intersection lies on the wrong side of the
/// right site of whichever bisector sorts first.
pub(crate) fn intersect(
    first: Option<(&Edge, Side)>,
    second: Option<(&Edge, Side)>,
) -> Option<DVec2> {
    let ((edge0, side0), (edge1, side1)) = (first?, second?);

    if edge0.right_site() == edge1.right_site() {
        return None;
    }

    let determinant = edge0.a * edge1.b - edge0.b * edge1.a;
    if determinant.abs() < PARALLEL_EPSILON {
        return None;
    }

    let x = (edge0.c * edge1.b - edge1.c * edge0.b) / determinant;
    let y = (edge1.c * edge0.a - edge0.c * edge1.a) / determinant;

    let (edge, side) = if compare_by_y_then_x(edge0.right_coord(), edge1.right_coord()).is_lt() {
        (edge0, side0)
    } else {
        (edge1, side1)
    };

    let right_of_site = x >= edge.right_coord().x;
    if (right_of_site && side == Side::Left) || (!right_of_site && side == Side::Right) {
        return None;
    }

    Some(DVec2::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> DVec2 {
        DVec2::new(x, y)
    }

    #[test]
    fn test_intersect_square() {
        // Bisectors of (0,0)-(0,10) and (0,0)-(10,0) meet at (5,5)
        let ac = Edge::bisecting(0, p(0.0, 0.0), 2, p(0.0, 10.0));
        let ab = Edge::bisecting(0, p(0.0, 0.0), 1, p(10.0, 0.0));
        let v = intersect(Some((&ac, Side::Right)), Some((&ab, Side::Left))).unwrap();
        assert!((v - p(5.0, 5.0)).length() < 1e-12);
    }

    #[test]
    fn test_intersect_rejects_wrong_side() {
        let ab = Edge::bisecting(0, p(0.0, 0.0), 1, p(10.0, 0.0));
        let bd = Edge::bisecting(1, p(10.0, 0.0), 3, p(10.0, 10.0));
        // Same lines as a valid event, but the right boundary of AB sorts first
        // and the intersection lies left of its right site.
        assert!(intersect(Some((&bd, Side::Right)), Some((&ab, Side::Right))).is_none());
        assert!(intersect(Some((&ab, Side::Left)), Some((&bd, Side::Left))).is_some());
    }

    #[test]
    fn test_intersect_parallel() {
        let ab = Edge::bisecting(0, p(0.0, 0.0), 1, p(5.0, 0.0));
        let bc = Edge::bisecting(1, p(5.0, 0.0), 2, p(10.0, 0.0));
        assert!(intersect(Some((&ab, Side::Left)), Some((&bc, Side::Left))).is_none());
    }

    #[test]
    fn test_intersect_shared_right_site() {
        let ad = Edge::bisecting(0, p(0.0, 0.0), 3, p(10.0, 10.0));
        let bd = Edge::bisecting(1, p(10.0, 0.0), 3, p(10.0, 10.0));
        assert!(intersect(Some((&ad, Side::Left)), Some((&bd, Side::Right))).is_none());
    }

    #[test]
    fn test_intersect_beach_line_end() {
        let ab = Edge::bisecting(0, p(0.0, 0.0), 1, p(10.0, 0.0));
        assert!(intersect(None, Some((&ab, Side::Left))).is_none());
        assert!(intersect(Some((&ab, Side::Right)), None).is_none());
    }
}
