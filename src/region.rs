//! Cell polygons from a site's ordered, clipped edges
//!
//! Consecutive clipped endpoints that lie on the rectangle border are joined
//! by walking the border counter-clockwise, inserting every corner passed.
//! Border membership comes from [`BorderFlags`], so only endpoints that
//! clipping placed exactly on a border take part in corner insertion.

use glam::DVec2;

use crate::edge::{Edge, EdgeId, Side};
use crate::geometry::{polygon_winding, BorderFlags, Rect, Winding};

/// Relative tolerance for treating two polygon points as the same point
const CLOSE_EPSILON: f64 = 1e-7;

#[derive(Debug, Clone, Copy)]
struct Segment {
    start: DVec2,
    end: DVec2,
    /// At least one end is a real Voronoi vertex
    bounded: bool,
}

impl Segment {
    fn reversed(self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            ..self
        }
    }

    /// Positive when `site` lies left of the segment direction
    fn turn(&self, site: DVec2) -> f64 {
        (self.end - self.start).perp_dot(site - self.start)
    }
}

/// Position of a border point along the perimeter, starting at (left, top)
///
/// Follows the corner order of [`Rect::corners`]. Returns `None` for points
/// off the border.
fn border_parameter(p: DVec2, bounds: &Rect) -> Option<f64> {
    let flags = BorderFlags::classify(p, bounds);
    let (w, h) = (bounds.width, bounds.height);
    if flags.contains(BorderFlags::TOP) {
        Some(p.x - bounds.left())
    } else if flags.contains(BorderFlags::RIGHT) {
        Some(w + (p.y - bounds.top()))
    } else if flags.contains(BorderFlags::BOTTOM) {
        Some(w + h + (bounds.right() - p.x))
    } else if flags.contains(BorderFlags::LEFT) {
        Some(2.0 * w + h + (bounds.bottom() - p.y))
    } else {
        None
    }
}

/// Rectangle corners passed when walking the border from `from` to `to`
///
/// Empty when either point is off the border.
fn corners_between(from: DVec2, to: DVec2, bounds: &Rect) -> Vec<DVec2> {
    let (Some(t0), Some(t1)) = (border_parameter(from, bounds), border_parameter(to, bounds))
    else {
        return Vec::new();
    };
    let perimeter = bounds.perimeter();
    let span = (t1 - t0).rem_euclid(perimeter);
    let (w, h) = (bounds.width, bounds.height);
    let at = [0.0, w, w + h, 2.0 * w + h];

    let mut passed: Vec<(f64, DVec2)> = bounds
        .corners()
        .into_iter()
        .zip(at)
        .map(|(corner, t)| ((t - t0).rem_euclid(perimeter), corner))
        .filter(|&(delta, _)| delta > 0.0 && delta < span)
        .collect();
    passed.sort_by(|a, b| a.0.total_cmp(&b.0));
    passed.into_iter().map(|(_, corner)| corner).collect()
}

/// Build the counter-clockwise cell polygon of `site` clipped to `bounds`
///
/// `chain` is the output of the vertex-keyed reorderer for that site. Edges
/// outside the bounds are skipped; an empty chain yields an empty polygon.
pub(crate) fn region_polygon(
    site: DVec2,
    chain: &[(EdgeId, Side)],
    edges: &[Edge],
    bounds: &Rect,
) -> Vec<DVec2> {
    let tolerance = CLOSE_EPSILON * bounds.longest_side().max(1.0);
    let close = |a: DVec2, b: DVec2| a.distance(b) <= tolerance;

    let mut segments: Vec<Segment> = chain
        .iter()
        .filter_map(|&(id, side)| {
            let edge = &edges[id.index()];
            let ends = edge.clipped_ends()?;
            Some(Segment {
                start: ends.get(side),
                end: ends.get(side.other()),
                bounded: !edge.is_fully_unbounded(),
            })
        })
        .collect();

    // The chain may run either way around the site
    let strongest = segments
        .iter()
        .filter(|s| s.bounded)
        .map(|s| s.turn(site))
        .max_by(|a, b| a.abs().total_cmp(&b.abs()));
    if strongest.is_some_and(|turn| turn < 0.0) {
        segments.reverse();
        for segment in &mut segments {
            *segment = segment.reversed();
        }
    }
    for segment in segments.iter_mut().filter(|s| !s.bounded) {
        if segment.turn(site) < 0.0 {
            *segment = segment.reversed();
        }
    }

    let mut points: Vec<DVec2> = Vec::with_capacity(segments.len() * 2 + 4);
    // Set when the last segment ends back on the first point
    let mut closed = false;
    for segment in segments.iter().filter(|s| !close(s.start, s.end)) {
        match points.last().copied() {
            None => points.push(segment.start),
            Some(last) if !close(last, segment.start) => {
                points.extend(corners_between(last, segment.start, bounds));
                points.push(segment.start);
            }
            Some(_) => {}
        }
        closed = close(segment.end, points[0]);
        if !closed {
            points.push(segment.end);
        }
    }

    if !closed {
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            points.extend(corners_between(last, first, bounds));
        }
    }
    if points.len() > 1 && close(points[0], points[points.len() - 1]) {
        points.pop();
    }
    if polygon_winding(&points) == Winding::Clockwise {
        points.reverse();
    }
    points
}
