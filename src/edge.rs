//! Voronoi edges: perpendicular bisectors between two sites
//!
//! An edge is stored in implicit form `a·x + b·y = c` with one of `a`, `b`
//! fixed to 1 (whichever keeps the other coefficient bounded). Its two end
//! vertices are assigned during the sweep; an end that never receives one
//! extends to infinity until [`Edge::clip_vertices`] cuts it at the bounds.

use glam::DVec2;

use crate::geometry::{LineSegment, Rect};
use crate::vertex::{Vertex, VertexId};

/// One of the two sides of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Handle of an edge inside its diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Edge endpoints after clipping to the bounds, keyed by the vertex side they came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClippedEnds {
    pub left: DVec2,
    pub right: DVec2,
}

impl ClippedEnds {
    #[inline]
    pub fn get(&self, side: Side) -> DVec2 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// A bisector between two sites, with its end vertices and clipped segment
#[derive(Debug, Clone)]
pub struct Edge {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    left_site: usize,
    right_site: usize,
    left_coord: DVec2,
    right_coord: DVec2,
    left_vertex: Option<VertexId>,
    right_vertex: Option<VertexId>,
    clipped: Option<ClippedEnds>,
}

impl Edge {
    /// Perpendicular bisector of the segment from `s0` to `s1`
    ///
    /// `s0` becomes the left site, `s1` the right site. The coefficient on
    /// the axis with the larger delta is fixed to 1 so the other stays finite
    /// for near-vertical and near-horizontal bisectors.
    pub fn bisecting(s0_index: usize, s0: DVec2, s1_index: usize, s1: DVec2) -> Self {
        let dx = s1.x - s0.x;
        let dy = s1.y - s0.y;
        let mut c = s0.x * dx + s0.y * dy + (dx * dx + dy * dy) * 0.5;

        let (a, b) = if dx.abs() > dy.abs() {
            c /= dx;
            (1.0, dy / dx)
        } else {
            c /= dy;
            (dx / dy, 1.0)
        };

        Self {
            a,
            b,
            c,
            left_site: s0_index,
            right_site: s1_index,
            left_coord: s0,
            right_coord: s1,
            left_vertex: None,
            right_vertex: None,
            clipped: None,
        }
    }

    #[inline]
    pub fn left_site(&self) -> usize {
        self.left_site
    }

    #[inline]
    pub fn right_site(&self) -> usize {
        self.right_site
    }

    /// Index of the site on the given side
    #[inline]
    pub fn site(&self, side: Side) -> usize {
        match side {
            Side::Left => self.left_site,
            Side::Right => self.right_site,
        }
    }

    #[inline]
    pub fn left_coord(&self) -> DVec2 {
        self.left_coord
    }

    #[inline]
    pub fn right_coord(&self) -> DVec2 {
        self.right_coord
    }

    #[inline]
    pub fn site_coord(&self, side: Side) -> DVec2 {
        match side {
            Side::Left => self.left_coord,
            Side::Right => self.right_coord,
        }
    }

    /// The site across this edge from `site`, if `site` owns the edge
    pub fn neighbor_of(&self, site: usize) -> Option<usize> {
        if site == self.left_site {
            Some(self.right_site)
        } else if site == self.right_site {
            Some(self.left_site)
        } else {
            None
        }
    }

    /// End vertex on the given side; `None` means unbounded
    #[inline]
    pub fn vertex(&self, side: Side) -> Option<VertexId> {
        match side {
            Side::Left => self.left_vertex,
            Side::Right => self.right_vertex,
        }
    }

    pub(crate) fn set_vertex(&mut self, side: Side, vertex: VertexId) {
        match side {
            Side::Left => self.left_vertex = Some(vertex),
            Side::Right => self.right_vertex = Some(vertex),
        }
    }

    /// An edge with an unbounded end separates two consecutive hull sites
    #[inline]
    pub fn is_part_of_convex_hull(&self) -> bool {
        self.left_vertex.is_none() || self.right_vertex.is_none()
    }

    /// True when neither end received a vertex (all-collinear input)
    #[inline]
    pub fn is_fully_unbounded(&self) -> bool {
        self.left_vertex.is_none() && self.right_vertex.is_none()
    }

    #[inline]
    pub fn sites_distance(&self) -> f64 {
        self.left_coord.distance(self.right_coord)
    }

    /// Whether any part of the edge lies inside the clipping bounds
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.clipped.is_some()
    }

    #[inline]
    pub fn clipped_ends(&self) -> Option<&ClippedEnds> {
        self.clipped.as_ref()
    }

    /// The clipped Voronoi segment, if visible
    pub fn voronoi_segment(&self) -> Option<LineSegment> {
        self.clipped
            .map(|ends| LineSegment::new(ends.left, ends.right))
    }

    /// The dual Delaunay segment joining the two sites
    pub fn delaunay_line(&self) -> LineSegment {
        LineSegment::new(self.left_coord, self.right_coord)
    }

    /// Clip the edge to `bounds`, recording the visible part
    ///
    /// Walks from the lower end along the dominant axis, substituting the
    /// border value wherever an end is unbounded or lies past the border,
    /// then checks the cross axis. An edge entirely outside the bounds stays
    /// invisible.
    pub fn clip_vertices(&mut self, bounds: &Rect, vertices: &[Vertex]) {
        let xmin = bounds.left();
        let ymin = bounds.top();
        let xmax = bounds.right();
        let ymax = bounds.bottom();

        let (first_side, second_side) = if self.a == 1.0 && self.b >= 0.0 {
            (Side::Right, Side::Left)
        } else {
            (Side::Left, Side::Right)
        };
        let vertex0 = self.vertex(first_side).map(|v| vertices[v.index()].coord());
        let vertex1 = self.vertex(second_side).map(|v| vertices[v.index()].coord());

        let (a, b, c) = (self.a, self.b, self.c);
        let mut x0: f64;
        let mut y0: f64;
        let mut x1: f64;
        let mut y1: f64;

        if a == 1.0 {
            y0 = ymin;
            if let Some(v) = vertex0 {
                if v.y > ymin {
                    y0 = v.y;
                }
            }
            if y0 > ymax {
                return;
            }
            x0 = c - b * y0;

            y1 = ymax;
            if let Some(v) = vertex1 {
                if v.y < ymax {
                    y1 = v.y;
                }
            }
            if y1 < ymin {
                return;
            }
            x1 = c - b * y1;

            if (x0 > xmax && x1 > xmax) || (x0 < xmin && x1 < xmin) {
                return;
            }

            if x0 > xmax {
                x0 = xmax;
                y0 = (c - x0) / b;
            } else if x0 < xmin {
                x0 = xmin;
                y0 = (c - x0) / b;
            }

            if x1 > xmax {
                x1 = xmax;
                y1 = (c - x1) / b;
            } else if x1 < xmin {
                x1 = xmin;
                y1 = (c - x1) / b;
            }
        } else {
            x0 = xmin;
            if let Some(v) = vertex0 {
                if v.x > xmin {
                    x0 = v.x;
                }
            }
            if x0 > xmax {
                return;
            }
            y0 = c - a * x0;

            x1 = xmax;
            if let Some(v) = vertex1 {
                if v.x < xmax {
                    x1 = v.x;
                }
            }
            if x1 < xmin {
                return;
            }
            y1 = c - a * x1;

            if (y0 > ymax && y1 > ymax) || (y0 < ymin && y1 < ymin) {
                return;
            }

            if y0 > ymax {
                y0 = ymax;
                x0 = (c - y0) / a;
            } else if y0 < ymin {
                y0 = ymin;
                x0 = (c - y0) / a;
            }

            if y1 > ymax {
                y1 = ymax;
                x1 = (c - y1) / a;
            } else if y1 < ymin {
                y1 = ymin;
                x1 = (c - y1) / a;
            }
        }

        let first = DVec2::new(x0, y0);
        let second = DVec2::new(x1, y1);
        self.clipped = Some(match first_side {
            Side::Left => ClippedEnds { left: first, right: second },
            Side::Right => ClippedEnds { left: second, right: first },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> DVec2 {
        DVec2::new(x, y)
    }

    #[test]
    fn test_bisecting_edge_vertical() {
        let edge = Edge::bisecting(0, p(0.0, 0.0), 1, p(10.0, 0.0));
        assert_eq!((edge.a, edge.b, edge.c), (1.0, 0.0, 5.0));
        assert_eq!(edge.left_site(), 0);
        assert_eq!(edge.right_site(), 1);
    }

    #[test]
    fn test_bisecting_edge_horizontal_and_diagonal() {
        let horizontal = Edge::bisecting(0, p(0.0, 0.0), 1, p(0.0, 10.0));
        assert_eq!((horizontal.a, horizontal.b, horizontal.c), (0.0, 1.0, 5.0));

        let diagonal = Edge::bisecting(0, p(0.0, 0.0), 1, p(10.0, 10.0));
        assert_eq!((diagonal.a, diagonal.b, diagonal.c), (1.0, 1.0, 10.0));
    }

    #[test]
    fn test_bisector_is_equidistant() {
        let s0 = p(1.0, 2.0);
        let s1 = p(4.0, -3.0);
        let edge = Edge::bisecting(0, s0, 1, s1);
        // Two points on the line
        for t in [-3.0, 0.0, 7.5] {
            let point = if edge.a == 1.0 {
                p(edge.c - edge.b * t, t)
            } else {
                p(t, edge.c - edge.a * t)
            };
            assert!((point.distance(s0) - point.distance(s1)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_clip_unbounded_edge() {
        let mut edge = Edge::bisecting(0, p(0.0, 0.0), 1, p(10.0, 0.0));
        edge.clip_vertices(&Rect::new(-5.0, -5.0, 20.0, 10.0), &[]);

        let ends = edge.clipped_ends().unwrap();
        let mut ys = [ends.left.y, ends.right.y];
        ys.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(ends.left.x, 5.0);
        assert_eq!(ends.right.x, 5.0);
        assert_eq!(ys, [-5.0, 5.0]);
    }

    #[test]
    fn test_clip_half_bounded_edge() {
        let vertices = [Vertex::new(p(5.0, 5.0), 0)];
        let mut edge = Edge::bisecting(0, p(0.0, 0.0), 1, p(10.0, 0.0));
        edge.set_vertex(Side::Left, VertexId(0));
        edge.clip_vertices(&Rect::new(0.0, 0.0, 10.0, 10.0), &vertices);

        let ends = edge.clipped_ends().unwrap();
        assert_eq!(ends.left, p(5.0, 5.0));
        assert_eq!(ends.right, p(5.0, 0.0));
        assert!(edge.is_part_of_convex_hull());
    }

    #[test]
    fn test_clip_outside_bounds_is_invisible() {
        let mut edge = Edge::bisecting(0, p(0.0, 0.0), 1, p(40.0, 0.0));
        edge.clip_vertices(&Rect::new(0.0, 0.0, 10.0, 10.0), &[]);
        assert!(!edge.is_visible());
        assert!(edge.voronoi_segment().is_none());
    }

    #[test]
    fn test_neighbor_of() {
        let edge = Edge::bisecting(3, p(0.0, 0.0), 8, p(1.0, 0.0));
        assert_eq!(edge.neighbor_of(3), Some(8));
        assert_eq!(edge.neighbor_of(8), Some(3));
        assert_eq!(edge.neighbor_of(4), None);
        assert_eq!(edge.delaunay_line().length(), 1.0);
    }
}
