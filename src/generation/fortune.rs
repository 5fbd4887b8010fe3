//! Fortune's sweep-line construction
//!
//! Consumes sites in [`compare_by_y_then_x`] order. A site event splits the
//! beach-line arc above it with the two halves of a new bisector; a circle
//! event collapses an arc, finalizes a Voronoi vertex and starts the bisector
//! of the two arcs that become adjacent. Edges are left unclipped.

use std::cmp::Ordering;
use std::collections::HashMap;

use glam::DVec2;
use tracing::{debug, trace};

use super::halfedge::{EdgeList, HalfedgeArena, HalfedgeId};
use super::queue::HalfedgePriorityQueue;
use crate::edge::{Edge, EdgeId, Side};
use crate::site::{compare_by_y_then_x, Site, SiteList};
use crate::vertex::{intersect, Vertex, VertexId};

/// Delaunay triangle recorded at a circle event, as three site indices
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub sites: [usize; 3],
}

/// Raw sweep result, before clipping
#[derive(Debug, Default)]
pub(crate) struct SweepOutput {
    pub edges: Vec<Edge>,
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

/// Distance, relative to the input extent, under which a circle event
/// reuses an existing vertex
const COINCIDENT_VERTEX_EPSILON: f64 = 1e-9;

/// Vertices bucketed on a grid whose cell is the merge tolerance
///
/// A lookup scans the 3x3 block around the query cell, so every vertex
/// within tolerance is found regardless of which edges it sits on.
struct VertexGrid {
    cell: f64,
    buckets: HashMap<(i64, i64), Vec<VertexId>>,
}

impl VertexGrid {
    fn new(tolerance: f64) -> Self {
        Self {
            cell: tolerance,
            buckets: HashMap::new(),
        }
    }

    fn key(&self, coord: DVec2) -> (i64, i64) {
        ((coord.x / self.cell).floor() as i64, (coord.y / self.cell).floor() as i64)
    }

    fn find(&self, coord: DVec2, vertices: &[Vertex]) -> Option<VertexId> {
        let (kx, ky) = self.key(coord);
        (-1..=1)
            .flat_map(|dx| (-1..=1).map(move |dy| (kx.saturating_add(dx), ky.saturating_add(dy))))
            .filter_map(|key| self.buckets.get(&key))
            .flatten()
            .copied()
            .find(|v| vertices[v.index()].coord().distance(coord) <= self.cell)
    }

    fn insert(&mut self, coord: DVec2, id: VertexId) {
        self.buckets.entry(self.key(coord)).or_default().push(id);
    }
}

struct Sweep<'a> {
    sites: &'a mut [Site],
    arena: HalfedgeArena,
    beach: EdgeList,
    queue: HalfedgePriorityQueue,
    bottom_most: usize,
    vertex_grid: VertexGrid,
    out: SweepOutput,
}

/// Run the sweep over every site in `site_list`
///
/// Incident edges are appended to the sites as they are created.
pub(crate) fn sweep(sites: &mut [Site], site_list: &mut SiteList) -> SweepOutput {
    let data_bounds = site_list.sites_bounds(sites);
    let sqrt_sites = ((site_list.len() + 4) as f64).sqrt() as usize;

    site_list.reset();
    let Some(bottom_most) = site_list.next() else {
        return SweepOutput::default();
    };

    let mut arena = HalfedgeArena::new();
    let beach = EdgeList::new(&mut arena, data_bounds.left(), data_bounds.width, sqrt_sites);
    let queue = HalfedgePriorityQueue::new(data_bounds.top(), data_bounds.height, sqrt_sites);
    let extent = [
        data_bounds.left().abs(),
        data_bounds.right().abs(),
        data_bounds.top().abs(),
        data_bounds.bottom().abs(),
        data_bounds.width,
        data_bounds.height,
    ]
    .into_iter()
    .fold(1.0, f64::max);

    let mut state = Sweep {
        sites,
        arena,
        beach,
        queue,
        bottom_most,
        vertex_grid: VertexGrid::new(COINCIDENT_VERTEX_EPSILON * extent),
        out: SweepOutput::default(),
    };

    let mut site_events = 0usize;
    let mut circle_events = 0usize;
    let mut next_site = site_list.next();
    loop {
        let next_circle = state.queue.min(&state.arena);
        let site_first = match (next_site, next_circle) {
            (Some(_), None) => true,
            (Some(site), Some((x, ystar))) => {
                compare_by_y_then_x(state.sites[site].coord(), DVec2::new(x, ystar))
                    != Ordering::Greater
            }
            (None, Some(_)) => false,
            (None, None) => break,
        };

        if site_first {
            if let Some(site) = next_site {
                state.site_event(site);
                site_events += 1;
            }
            next_site = site_list.next();
        } else {
            state.circle_event();
            circle_events += 1;
        }
    }

    debug!(
        "sweep: {} site events, {} circle events, {} edges, {} vertices, {} halfedges",
        site_events,
        circle_events,
        state.out.edges.len(),
        state.out.vertices.len(),
        state.arena.len()
    );
    state.out
}

impl Sweep<'_> {
    fn left_region(&self, he: HalfedgeId) -> usize {
        let node = self.arena.get(he);
        node.edge
            .map_or(self.bottom_most, |e| self.out.edges[e.index()].site(node.side))
    }

    fn right_region(&self, he: HalfedgeId) -> usize {
        let node = self.arena.get(he);
        node.edge
            .map_or(self.bottom_most, |e| self.out.edges[e.index()].site(node.side.other()))
    }

    fn intersect(&self, first: HalfedgeId, second: HalfedgeId) -> Option<DVec2> {
        intersect(
            self.arena.edge_side(first, &self.out.edges),
            self.arena.edge_side(second, &self.out.edges),
        )
    }

    fn new_edge(&mut self, s0: usize, s1: usize) -> EdgeId {
        let id = EdgeId(self.out.edges.len());
        self.out.edges.push(Edge::bisecting(
            s0,
            self.sites[s0].coord(),
            s1,
            self.sites[s1].coord(),
        ));
        self.sites[s0].add_edge(id);
        self.sites[s1].add_edge(id);
        id
    }

    /// Schedule a circle event on `he`, replacing any pending one
    fn schedule(&mut self, he: HalfedgeId, vertex: DVec2, focus: DVec2) {
        self.queue.remove(&mut self.arena, he);
        let node = self.arena.get_mut(he);
        node.vertex = Some(vertex);
        node.ystar = vertex.y + focus.distance(vertex);
        self.queue.insert(&mut self.arena, he);
    }

    fn site_event(&mut self, site: usize) {
        let coord = self.sites[site].coord();
        let lbnd = self.beach.left_neighbor(&self.arena, coord, &self.out.edges);
        let rbnd = self.beach.step(&self.arena, lbnd, Side::Right);
        let bottom = self.right_region(lbnd);
        trace!("site event {} at ({}, {}) under site {}", site, coord.x, coord.y, bottom);

        let edge = self.new_edge(bottom, site);

        let left_half = self.arena.create(Some(edge), Side::Left);
        self.beach.insert(&mut self.arena, lbnd, left_half);
        if let Some(v) = self.intersect(lbnd, left_half) {
            self.schedule(lbnd, v, coord);
        }

        let right_half = self.arena.create(Some(edge), Side::Right);
        self.beach.insert(&mut self.arena, left_half, right_half);
        if let Some(v) = self.intersect(right_half, rbnd) {
            self.schedule(right_half, v, coord);
        }
    }

    /// The vertex at `coord`, reusing one already finalized there
    ///
    /// Cocircular sites produce several circle events at one point: the
    /// first finalizes the vertex and later ones reuse it, even when the
    /// collapsing edges never touched it. Such an event may close an edge
    /// that started at the same vertex, leaving a zero-length loop.
    fn vertex_at(&mut self, coord: DVec2) -> VertexId {
        if let Some(existing) = self.vertex_grid.find(coord, &self.out.vertices) {
            return existing;
        }
        let id = VertexId(self.out.vertices.len());
        self.out.vertices.push(Vertex::new(coord, id.index()));
        self.vertex_grid.insert(coord, id);
        id
    }

    fn circle_event(&mut self) {
        let Some(lbnd) = self.queue.extract_min(&mut self.arena) else {
            return;
        };
        let llbnd = self.beach.step(&self.arena, lbnd, Side::Left);
        let rbnd = self.beach.step(&self.arena, lbnd, Side::Right);
        let rrbnd = self.beach.step(&self.arena, rbnd, Side::Right);

        let mut bottom = self.left_region(lbnd);
        let mut top = self.right_region(rbnd);
        let middle = self.right_region(lbnd);
        self.out.triangles.push(Triangle {
            sites: [bottom, top, middle],
        });

        let Some(coord) = self.arena.get(lbnd).vertex else {
            return;
        };
        let vertex = self.vertex_at(coord);
        trace!("circle event at ({}, {}) -> vertex {}", coord.x, coord.y, vertex.index());

        for he in [lbnd, rbnd] {
            let node = self.arena.get(he);
            if let Some(e) = node.edge {
                self.out.edges[e.index()].set_vertex(node.side, vertex);
            }
        }

        self.beach.remove(&mut self.arena, lbnd);
        self.queue.remove(&mut self.arena, rbnd);
        self.beach.remove(&mut self.arena, rbnd);

        let mut side = Side::Left;
        if self.sites[bottom].y() > self.sites[top].y() {
            std::mem::swap(&mut bottom, &mut top);
            side = Side::Right;
        }

        let edge = self.new_edge(bottom, top);
        let bisector = self.arena.create(Some(edge), side);
        self.beach.insert(&mut self.arena, llbnd, bisector);
        self.out.edges[edge.index()].set_vertex(side.other(), vertex);

        let focus = self.sites[bottom].coord();
        if let Some(v) = self.intersect(llbnd, bisector) {
            self.schedule(llbnd, v, focus);
        }
        if let Some(v) = self.intersect(bisector, rrbnd) {
            self.schedule(bisector, v, focus);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(points: &[(f64, f64)]) -> (Vec<Site>, SweepOutput) {
        let mut sites: Vec<Site> = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Site::new(DVec2::new(x, y), i, 0.0, true))
            .collect();
        let mut list = SiteList::new();
        for i in 0..sites.len() {
            list.push(i);
        }
        let out = sweep(&mut sites, &mut list);
        (sites, out)
    }

    #[test]
    fn test_two_sites_single_edge() {
        let (sites, out) = run(&[(0.0, 0.0), (10.0, 0.0)]);
        assert_eq!(out.edges.len(), 1);
        assert!(out.vertices.is_empty());
        assert!(out.edges[0].is_fully_unbounded());
        assert_eq!(sites[0].edges(), &[EdgeId(0)]);
        assert_eq!(sites[1].edges(), &[EdgeId(0)]);
    }

    #[test]
    fn test_triangle_has_circumcenter() {
        let (_, out) = run(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)]);
        assert_eq!(out.edges.len(), 3);
        assert_eq!(out.vertices.len(), 1);
        assert_eq!(out.triangles.len(), 1);

        let v = out.vertices[0].coord();
        let d0 = v.distance(DVec2::new(0.0, 0.0));
        let d1 = v.distance(DVec2::new(10.0, 0.0));
        let d2 = v.distance(DVec2::new(5.0, 8.0));
        assert!((d0 - d1).abs() < 1e-9);
        assert!((d0 - d2).abs() < 1e-9);

        let mut sites = out.triangles[0].sites;
        sites.sort_unstable();
        assert_eq!(sites, [0, 1, 2]);
    }

    #[test]
    fn test_cocircular_square_shares_vertex() {
        let (sites, out) = run(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0)]);
        assert_eq!(out.vertices.len(), 1);
        assert!((out.vertices[0].coord() - DVec2::new(5.0, 5.0)).length() < 1e-9);

        // Every site borders its two side neighbours
        for site in &sites {
            assert!(site.edges().len() >= 2);
        }
    }

    #[test]
    fn test_cocircular_polygon_has_one_vertex() {
        for n in [5, 6, 12] {
            let points: Vec<(f64, f64)> = (0..n)
                .map(|k| {
                    let angle = std::f64::consts::TAU * k as f64 / n as f64;
                    (50.0 + 30.0 * angle.cos(), 50.0 + 30.0 * angle.sin())
                })
                .collect();
            let (_, out) = run(&points);
            assert_eq!(out.vertices.len(), 1, "{n}-gon");
            assert!((out.vertices[0].coord() - DVec2::new(50.0, 50.0)).length() < 1e-9);
        }
    }

    #[test]
    fn test_collinear_sites_have_no_vertices() {
        let (_, out) = run(&[(0.0, 5.0), (5.0, 5.0), (10.0, 5.0)]);
        assert_eq!(out.edges.len(), 2);
        assert!(out.vertices.is_empty());
        assert!(out.triangles.is_empty());
    }

    #[test]
    fn test_every_edge_is_a_bisector() {
        let points = [
            (1.0, 2.0),
            (7.5, 1.0),
            (4.0, 6.0),
            (9.0, 8.5),
            (2.5, 9.0),
            (6.0, 3.5),
        ];
        let (_, out) = run(&points);
        for edge in &out.edges {
            for side in [Side::Left, Side::Right] {
                if let Some(v) = edge.vertex(side) {
                    let c = out.vertices[v.index()].coord();
                    let d0 = c.distance(edge.left_coord());
                    let d1 = c.distance(edge.right_coord());
                    assert!((d0 - d1).abs() < 1e-7);
                }
            }
        }
    }

    #[test]
    fn test_empty_input() {
        let (_, out) = run(&[]);
        assert!(out.edges.is_empty());
    }
}
