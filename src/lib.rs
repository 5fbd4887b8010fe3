//! Planar Voronoi diagrams via Fortune's sweep
//!
//! A standalone library computing Voronoi/Delaunay diagrams of 2D point
//! sets clipped to a rectangle: cell polygons, edge segments, the convex
//! hull, neighbor graphs, inscribed circles and Lloyd's relaxation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rust_voronoi_diagram::*;
//!
//! // Configure the diagram
//! let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
//! let config = DiagramConfigBuilder::new()
//!     .bounds(bounds).unwrap()
//!     .seed(42)
//!     .lloyd_iterations(5).unwrap()
//!     .build().unwrap();
//!
//! // Build it from some points
//! let points = generation::random_points(500, bounds, 42);
//! let diagram = Voronoi::with_config(&points, &config).unwrap();
//!
//! for (index, region) in diagram.regions().iter().enumerate() {
//!     println!("site {} has a cell of area {}", index, polygon_area(region));
//! }
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) point-to-cell lookups using KD-tree
//! - `serde`: Enables serialization support for configuration and output types

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod site;
pub mod vertex;
pub mod edge;
pub mod reorder;
pub mod cell;
pub mod kruskal;
pub mod generation;
pub mod diagram;
mod region;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{VoronoiError, Result};
pub use config::{DiagramConfig, DiagramConfigBuilder};
pub use geometry::{
    polygon_area, polygon_centroid, polygon_winding, signed_double_area, BorderFlags, Circle,
    LineSegment, Rect, Winding,
};
pub use site::{compare_by_y_then_x, Site, SiteList};
pub use vertex::{Vertex, VertexId};
pub use edge::{ClippedEnds, Edge, EdgeId, Side};
pub use reorder::{reorder_edges, ReorderCriterion};
pub use cell::VoronoiCell;
pub use kruskal::SpanningTreeKind;
pub use diagram::Voronoi;
pub use generation::{LloydOptions, RelaxationReport, Triangle};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam for convenience
pub use glam;
pub use glam::DVec2;
