//! Core Voronoi generation algorithm
//!
//! Fortune's sweep over the sites (beach line, circle-event queue and the
//! event loop), seeded point sampling, and Lloyd's relaxation.

mod fortune;
mod halfedge;
mod lloyd;
mod points;
mod queue;

pub use fortune::Triangle;
pub use lloyd::{lloyd_relaxation, lloyd_relaxation_with_options, LloydOptions, RelaxationReport};
pub use points::random_points;

pub(crate) use fortune::{sweep, SweepOutput};
pub(crate) use lloyd::relax;
