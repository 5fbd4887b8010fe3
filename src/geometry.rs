//! Plane geometry value types shared by the diagram and its consumers
//!
//! Coordinates follow screen conventions for naming: the *top* border of a
//! [`Rect`] is its minimum y, the *bottom* border its maximum y. Winding is
//! reported in the usual mathematical sense (positive signed area is
//! counter-clockwise when y grows upwards).

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoronoiError};

/// Axis-aligned clipping rectangle
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Minimum x
    pub x: f64,
    /// Minimum y
    pub y: f64,
    /// Extent along x
    pub width: f64,
    /// Extent along y
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its minimum corner and extents
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Length of the longer side
    #[inline]
    pub fn longest_side(&self) -> f64 {
        self.width.max(self.height)
    }

    /// Inclusive containment test
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Corners in border-walk order: (left, top), (right, top), (right, bottom), (left, bottom)
    pub fn corners(&self) -> [DVec2; 4] {
        [
            DVec2::new(self.left(), self.top()),
            DVec2::new(self.right(), self.top()),
            DVec2::new(self.right(), self.bottom()),
            DVec2::new(self.left(), self.bottom()),
        ]
    }

    /// Perimeter length
    #[inline]
    pub fn perimeter(&self) -> f64 {
        2.0 * (self.width + self.height)
    }

    /// Check that the rectangle is finite and has positive extents
    ///
    /// # Errors
    ///
    /// Returns `InvalidBounds` otherwise.
    pub fn validate(&self) -> Result<()> {
        let finite = self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite();
        if !finite || self.width <= 0.0 || self.height <= 0.0 {
            return Err(VoronoiError::InvalidBounds {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Smallest rectangle containing all points (zero-sized for fewer than two)
    pub fn bounding(points: impl IntoIterator<Item = DVec2>) -> Self {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return Rect::new(0.0, 0.0, 0.0, 0.0);
        };
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

impl Default for Rect {
    fn default() -> Self {
        Rect::new(0.0, 0.0, 1.0, 1.0)
    }
}

/// Bit flags naming which rectangle borders a point lies on
///
/// A corner carries two flags. A point strictly inside (or outside) the
/// rectangle carries none. Membership uses exact equality: clipping writes
/// border coordinates verbatim, so clipped endpoints compare exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BorderFlags(u8);

impl BorderFlags {
    pub const NONE: BorderFlags = BorderFlags(0);
    pub const TOP: BorderFlags = BorderFlags(1);
    pub const BOTTOM: BorderFlags = BorderFlags(2);
    pub const LEFT: BorderFlags = BorderFlags(4);
    pub const RIGHT: BorderFlags = BorderFlags(8);

    /// Classify a point against the rectangle borders
    pub fn classify(p: DVec2, bounds: &Rect) -> Self {
        let mut bits = 0;
        if p.x == bounds.left() {
            bits |= Self::LEFT.0;
        }
        if p.x == bounds.right() {
            bits |= Self::RIGHT.0;
        }
        if p.y == bounds.top() {
            bits |= Self::TOP.0;
        }
        if p.y == bounds.bottom() {
            bits |= Self::BOTTOM.0;
        }
        BorderFlags(bits)
    }

    #[inline]
    pub fn contains(self, other: BorderFlags) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Line segment between two points
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub p0: DVec2,
    pub p1: DVec2,
}

impl LineSegment {
    pub fn new(p0: DVec2, p1: DVec2) -> Self {
        Self { p0, p1 }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.p0.distance(self.p1)
    }
}

/// Circle centered on a site, used for inscribed-circle queries
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: DVec2,
    pub radius: f64,
}

/// Orientation of a closed polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
    /// Zero signed area
    None,
}

/// Twice the signed area of a closed polygon (shoelace formula)
pub fn signed_double_area(points: &[DVec2]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.perp_dot(*b))
        .sum()
}

/// Unsigned polygon area
pub fn polygon_area(points: &[DVec2]) -> f64 {
    (signed_double_area(points) * 0.5).abs()
}

pub fn polygon_winding(points: &[DVec2]) -> Winding {
    let area = signed_double_area(points);
    if area > 0.0 {
        Winding::CounterClockwise
    } else if area < 0.0 {
        Winding::Clockwise
    } else {
        Winding::None
    }
}

/// Area-weighted centroid of a closed polygon
///
/// Returns `None` for polygons with fewer than three points or zero area.
pub fn polygon_centroid(points: &[DVec2]) -> Option<DVec2> {
    if points.len() < 3 {
        return None;
    }

    let mut double_area = 0.0;
    let mut centroid = DVec2::ZERO;
    for (a, b) in points.iter().zip(points.iter().cycle().skip(1)) {
        let cross = a.perp_dot(*b);
        double_area += cross;
        centroid += (*a + *b) * cross;
    }

    if double_area == 0.0 || !double_area.is_finite() {
        return None;
    }
    Some(centroid / (3.0 * double_area))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_borders() {
        let r = Rect::new(-5.0, -5.0, 20.0, 10.0);
        assert_eq!(r.left(), -5.0);
        assert_eq!(r.right(), 15.0);
        assert_eq!(r.top(), -5.0);
        assert_eq!(r.bottom(), 5.0);
        assert_eq!(r.area(), 200.0);
        assert!(r.contains(DVec2::new(15.0, 5.0)));
        assert!(!r.contains(DVec2::new(15.1, 0.0)));
    }

    #[test]
    fn test_rect_validate() {
        assert!(Rect::new(0.0, 0.0, 1.0, 1.0).validate().is_ok());
        assert!(Rect::new(0.0, 0.0, 0.0, 1.0).validate().is_err());
        assert!(Rect::new(0.0, 0.0, 1.0, -1.0).validate().is_err());
        assert!(Rect::new(f64::NAN, 0.0, 1.0, 1.0).validate().is_err());
    }

    #[test]
    fn test_bounding_rect() {
        let r = Rect::bounding([DVec2::new(1.0, 4.0), DVec2::new(-2.0, 3.0), DVec2::new(0.0, 9.0)]);
        assert_eq!(r, Rect::new(-2.0, 3.0, 3.0, 6.0));
        assert_eq!(Rect::bounding(std::iter::empty()), Rect::new(0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_border_classification() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(BorderFlags::classify(DVec2::new(5.0, 5.0), &r), BorderFlags::NONE);

        let top = BorderFlags::classify(DVec2::new(5.0, 0.0), &r);
        assert!(top.contains(BorderFlags::TOP));
        assert!(!top.contains(BorderFlags::LEFT));

        let corner = BorderFlags::classify(DVec2::new(10.0, 10.0), &r);
        assert!(corner.contains(BorderFlags::RIGHT));
        assert!(corner.contains(BorderFlags::BOTTOM));
    }

    #[test]
    fn test_polygon_area_and_winding() {
        let ccw = [
            DVec2::new(0.0, 0.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(4.0, 3.0),
            DVec2::new(0.0, 3.0),
        ];
        assert_eq!(polygon_area(&ccw), 12.0);
        assert_eq!(polygon_winding(&ccw), Winding::CounterClockwise);

        let mut cw = ccw;
        cw.reverse();
        assert_eq!(polygon_winding(&cw), Winding::Clockwise);
        assert_eq!(polygon_winding(&ccw[..2]), Winding::None);
    }

    #[test]
    fn test_polygon_centroid() {
        let square = [
            DVec2::new(2.0, 2.0),
            DVec2::new(4.0, 2.0),
            DVec2::new(4.0, 4.0),
            DVec2::new(2.0, 4.0),
        ];
        let c = polygon_centroid(&square).unwrap();
        assert!((c - DVec2::new(3.0, 3.0)).length() < 1e-12);

        let degenerate = [DVec2::ZERO, DVec2::X, DVec2::new(2.0, 0.0)];
        assert!(polygon_centroid(&degenerate).is_none());
    }
}
