//! Voronoi diagram: construction and queries
//!
//! [`Voronoi`] owns the sites, edges and vertices produced by one sweep,
//! with every edge already clipped to the bounds and every site's edges
//! threaded into boundary order. Queries (cell polygons, neighbors, hull,
//! circles, Delaunay lines) are computed on demand from that state.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::Instant;

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::cell::VoronoiCell;
use crate::config::DiagramConfig;
use crate::edge::{Edge, EdgeId};
use crate::error::{Result, VoronoiError};
use crate::generation::{relax, sweep, LloydOptions, RelaxationReport, SweepOutput, Triangle};
use crate::geometry::{polygon_winding, Circle, LineSegment, Rect, Winding};
use crate::kruskal::{kruskal, SpanningTreeKind};
use crate::region::region_polygon;
use crate::reorder::{reorder_edges, ReorderCriterion};
use crate::site::{Site, SiteList};
use crate::vertex::Vertex;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// Upper bound of the inert per-site weights
const MAX_WEIGHT: f64 = 100.0;

/// A planar Voronoi diagram clipped to a rectangle
///
/// Sites keep their input order: every per-site query takes the index of
/// the point in the slice the diagram was built from. Coincident input
/// points are accepted; only the first copy takes part in the sweep and the
/// others report empty cells and no neighbors.
///
/// # Examples
///
/// ```
/// use rust_voronoi_diagram::*;
///
/// let points = [
///     DVec2::new(0.0, 0.0),
///     DVec2::new(10.0, 0.0),
///     DVec2::new(0.0, 10.0),
///     DVec2::new(10.0, 10.0),
/// ];
/// let diagram = Voronoi::new(&points, Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
///
/// for index in 0..points.len() {
///     let area = polygon_area(&diagram.region(index));
///     assert!((area - 25.0).abs() < 1e-9);
/// }
/// assert_eq!(diagram.vertices().len(), 1);
/// ```
#[derive(Clone)]
pub struct Voronoi {
    sites: Vec<Site>,
    edges: Vec<Edge>,
    vertices: Vec<Vertex>,
    triangles: Vec<Triangle>,
    bounds: Rect,
    seed: u64,
    /// Number of sites that took part in the sweep
    swept: usize,

    /// Nearest-site lookups (optional, requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: Option<SpatialIndex>,
}

impl std::fmt::Debug for Voronoi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Voronoi")
            .field("bounds", &self.bounds)
            .field("sites", &self.sites.len())
            .field("edges", &self.edges.len())
            .field("vertices", &self.vertices.len())
            .finish()
    }
}

impl Voronoi {
    /// Build the diagram of `points` clipped to `bounds`
    ///
    /// # Arguments
    ///
    /// * `points` - Site coordinates; duplicates are allowed
    /// * `bounds` - Clipping rectangle for edges and cells
    ///
    /// # Errors
    ///
    /// Returns `InvalidBounds` for a non-finite or empty rectangle and
    /// `NonFinitePoint` if any coordinate is NaN or infinite.
    pub fn new(points: &[DVec2], bounds: Rect) -> Result<Self> {
        Self::build(points, bounds, rand::random())
    }

    /// Build the diagram described by `config`, then apply its Lloyd iterations
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_diagram::*;
    ///
    /// let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
    /// let config = DiagramConfigBuilder::new()
    ///     .bounds(bounds)
    ///     .unwrap()
    ///     .seed(7)
    ///     .lloyd_iterations(3)
    ///     .unwrap()
    ///     .build()
    ///     .unwrap();
    ///
    /// let points = generation::random_points(50, bounds, 7);
    /// let diagram = Voronoi::with_config(&points, &config).unwrap();
    /// assert_eq!(diagram.sites().len(), 50);
    /// ```
    pub fn with_config(points: &[DVec2], config: &DiagramConfig) -> Result<Self> {
        let mut diagram = Self::build(points, config.bounds, config.seed)?;
        if config.lloyd_iterations > 0 {
            diagram.lloyd_relaxation_with_options(config.lloyd_options())?;
        }
        Ok(diagram)
    }

    pub(crate) fn build(points: &[DVec2], bounds: Rect, seed: u64) -> Result<Self> {
        bounds.validate()?;
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(VoronoiError::NonFinitePoint { index });
        }
        let start = Instant::now();

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut first_seen: HashMap<(u64, u64), usize> = HashMap::with_capacity(points.len());
        let mut sites = Vec::with_capacity(points.len());
        let mut site_list = SiteList::new();

        for (index, &coord) in points.iter().enumerate() {
            let weight = rng.gen_range(0.0..MAX_WEIGHT);
            // Adding 0.0 folds -0.0 into 0.0 so both hash alike
            let key = ((coord.x + 0.0).to_bits(), (coord.y + 0.0).to_bits());
            let swept = match first_seen.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(index);
                    true
                }
                Entry::Occupied(slot) => {
                    trace!("point {} duplicates point {}, skipping it", index, slot.get());
                    false
                }
            };
            if swept {
                site_list.push(index);
            }
            sites.push(Site::new(coord, index, weight, swept));
        }
        let swept = site_list.len();

        let SweepOutput {
            mut edges,
            vertices,
            triangles,
        } = sweep(&mut sites, &mut site_list);

        for edge in &mut edges {
            edge.clip_vertices(&bounds, &vertices);
        }
        for site in &mut sites {
            let chain = reorder_edges(site.edges(), &edges, ReorderCriterion::Vertex);
            site.set_ordered_edges(chain);
        }

        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let swept_sites: Vec<(usize, DVec2)> = sites
                .iter()
                .filter(|s| s.is_swept())
                .map(|s| (s.index(), s.coord()))
                .collect();
            (!swept_sites.is_empty()).then(|| SpatialIndex::new(&swept_sites))
        };

        debug!(
            "voronoi: {} sites ({} distinct), {} edges, {} vertices in {:?}",
            sites.len(),
            swept,
            edges.len(),
            vertices.len(),
            start.elapsed()
        );

        Ok(Self {
            sites,
            edges,
            vertices,
            triangles,
            bounds,
            seed,
            swept,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Seed used for the per-site weights
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// All sites in input order
    #[inline]
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    #[inline]
    pub fn site(&self, index: usize) -> Option<&Site> {
        self.sites.get(index)
    }

    /// All edges in creation order, including invisible ones
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// Finalized vertices, indexed by [`VertexId`](crate::VertexId)
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Delaunay triangles recorded by circle events
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn site_coords(&self) -> Vec<DVec2> {
        self.sites.iter().map(Site::coord).collect()
    }

    /// Number of distinct sites that took part in the sweep
    #[inline]
    pub fn distinct_site_count(&self) -> usize {
        self.swept
    }

    /// The clipped cell polygon of site `index`, counter-clockwise
    ///
    /// Empty for duplicate points, out-of-range indices, and cells that do
    /// not reach into the bounds. A site whose cell covers the whole
    /// rectangle (including a lone site) gets the rectangle itself.
    pub fn region(&self, index: usize) -> Vec<DVec2> {
        let Some(site) = self.sites.get(index).filter(|s| s.is_swept()) else {
            return Vec::new();
        };
        if site.edges().is_empty() {
            return if self.swept == 1 {
                self.bounds.corners().to_vec()
            } else {
                Vec::new()
            };
        }

        let chain = site.ordered_edges();
        if chain.is_empty() {
            return Vec::new();
        }
        if !chain.iter().any(|&(id, _)| self.edge(id).is_visible()) {
            // No boundary crosses the rectangle: it is either wholly inside
            // this cell or wholly outside it
            return if self.nearest_swept_site(self.bounds.center()) == Some(index) {
                self.bounds.corners().to_vec()
            } else {
                Vec::new()
            };
        }
        region_polygon(site.coord(), chain, &self.edges, &self.bounds)
    }

    /// Cell polygons of every site, in input order
    pub fn regions(&self) -> Vec<Vec<DVec2>> {
        (0..self.sites.len()).map(|i| self.region(i)).collect()
    }

    /// Input indices of the sites sharing an edge with site `index`
    ///
    /// Listed in boundary order when the site's edges form a chain.
    pub fn neighbor_sites(&self, index: usize) -> Vec<usize> {
        let Some(site) = self.sites.get(index) else {
            return Vec::new();
        };
        let ids: Vec<EdgeId> = if site.ordered_edges().is_empty() {
            site.edges().to_vec()
        } else {
            site.ordered_edges().iter().map(|&(id, _)| id).collect()
        };

        let mut neighbors = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(other) = self.edge(id).neighbor_of(index) {
                if !neighbors.contains(&other) {
                    neighbors.push(other);
                }
            }
        }
        neighbors
    }

    pub fn neighbor_coords(&self, index: usize) -> Vec<DVec2> {
        self.neighbor_sites(index)
            .into_iter()
            .map(|i| self.sites[i].coord())
            .collect()
    }

    /// Largest circle around each site that stays inside its cell
    ///
    /// The radius is half the distance to the nearest neighbor site, or 0
    /// when that neighbor lies across a hull edge or the site has no edges.
    pub fn circles(&self) -> Vec<Circle> {
        self.sites
            .iter()
            .map(|site| {
                let nearest = site
                    .edges()
                    .iter()
                    .map(|&id| self.edge(id))
                    .min_by(|a, b| a.sites_distance().total_cmp(&b.sites_distance()));
                let radius = match nearest {
                    Some(edge) if !edge.is_part_of_convex_hull() => edge.sites_distance() * 0.5,
                    _ => 0.0,
                };
                Circle {
                    center: site.coord(),
                    radius,
                }
            })
            .collect()
    }

    /// Every visible clipped Voronoi edge
    pub fn voronoi_diagram(&self) -> Vec<LineSegment> {
        self.edges.iter().filter_map(Edge::voronoi_segment).collect()
    }

    /// Visible clipped edges bounding site `index`
    pub fn voronoi_boundary_for_site(&self, index: usize) -> Vec<LineSegment> {
        self.site_edges(index)
            .filter_map(Edge::voronoi_segment)
            .collect()
    }

    /// Delaunay segments from site `index` to each of its neighbors
    pub fn delaunay_lines_for_site(&self, index: usize) -> Vec<LineSegment> {
        self.site_edges(index).map(Edge::delaunay_line).collect()
    }

    /// Every Delaunay segment (one per Voronoi edge)
    pub fn delaunay_triangulation(&self) -> Vec<LineSegment> {
        self.edges.iter().map(Edge::delaunay_line).collect()
    }

    /// Edges with an unbounded end; their sites form the convex hull
    pub fn hull_edges(&self) -> Vec<EdgeId> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_part_of_convex_hull())
            .map(|(i, _)| EdgeId(i))
            .collect()
    }

    /// Delaunay segments along the convex hull
    pub fn hull(&self) -> Vec<LineSegment> {
        self.hull_edges()
            .into_iter()
            .map(|id| self.edge(id).delaunay_line())
            .collect()
    }

    /// Convex hull sites in counter-clockwise order
    ///
    /// # Errors
    ///
    /// Returns `InsufficientSites` with fewer than 3 distinct sites. Hulls
    /// that do not close into a ring (all sites collinear) come back empty.
    pub fn hull_points_in_order(&self) -> Result<Vec<DVec2>> {
        if self.swept < 3 {
            return Err(VoronoiError::InsufficientSites {
                required: 3,
                found: self.swept,
            });
        }

        let chain = reorder_edges(&self.hull_edges(), &self.edges, ReorderCriterion::Site);
        let (Some(&(first, first_side)), Some(&(last, last_side))) = (chain.first(), chain.last())
        else {
            return Ok(Vec::new());
        };
        if self.edge(first).site(first_side) != self.edge(last).site(last_side.other()) {
            return Ok(Vec::new());
        }

        let mut points: Vec<DVec2> = chain
            .iter()
            .map(|&(id, side)| self.edge(id).site_coord(side))
            .collect();
        if polygon_winding(&points) == Winding::Clockwise {
            points.reverse();
        }
        Ok(points)
    }

    /// Minimum or maximum spanning tree of the Delaunay graph
    pub fn spanning_tree(&self, kind: SpanningTreeKind) -> Vec<LineSegment> {
        let weighted = self
            .edges
            .iter()
            .map(|e| (e.left_site(), e.right_site(), e.delaunay_line()))
            .collect();
        kruskal(self.sites.len(), weighted, kind)
    }

    /// Self-contained summaries of every cell, in input order
    pub fn cells(&self) -> Vec<VoronoiCell> {
        self.circles()
            .into_iter()
            .enumerate()
            .map(|(index, circle)| {
                VoronoiCell::new(
                    index,
                    circle.center,
                    self.neighbor_sites(index),
                    self.region(index),
                    circle.radius,
                )
            })
            .collect()
    }

    /// Index of the site whose cell contains `point`
    ///
    /// Ties on a cell boundary resolve to either side. `None` only for a
    /// diagram without sites.
    pub fn site_at(&self, point: DVec2) -> Option<usize> {
        #[cfg(feature = "spatial-index")]
        {
            self.spatial_index
                .as_ref()
                .and_then(|index| index.find_nearest(point))
        }
        #[cfg(not(feature = "spatial-index"))]
        {
            self.nearest_swept_site(point)
        }
    }

    /// Relax the diagram in place with default options and `iterations` iterations
    pub fn lloyd_relaxation(&mut self, iterations: usize) -> Result<RelaxationReport> {
        self.lloyd_relaxation_with_options(LloydOptions {
            max_iterations: iterations,
            ..Default::default()
        })
    }

    /// Relax the diagram in place, rebuilding it after every centroid step
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_diagram::*;
    ///
    /// let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
    /// let mut diagram = Voronoi::new(&generation::random_points(20, bounds, 3), bounds).unwrap();
    /// let report = diagram
    ///     .lloyd_relaxation_with_options(LloydOptions {
    ///         max_iterations: 50,
    ///         convergence_threshold: 0.01,
    ///     })
    ///     .unwrap();
    /// assert!(report.iterations_run >= 1);
    /// ```
    pub fn lloyd_relaxation_with_options(
        &mut self,
        options: LloydOptions,
    ) -> Result<RelaxationReport> {
        relax(self, options)
    }

    fn site_edges(&self, index: usize) -> impl Iterator<Item = &Edge> + '_ {
        self.sites
            .get(index)
            .map(Site::edges)
            .unwrap_or_default()
            .iter()
            .map(|&id| self.edge(id))
    }

    fn nearest_swept_site(&self, point: DVec2) -> Option<usize> {
        self.sites
            .iter()
            .filter(|s| s.is_swept())
            .min_by(|a, b| a.dist(point).total_cmp(&b.dist(point)))
            .map(Site::index)
    }
}
