//! Error types for Voronoi diagram construction and queries

/// Errors that can occur while building or querying a diagram
///
/// Only caller-fixable usage errors are reported here. Degenerate geometry
/// (collinear or coincident sites, parallel bisectors, unbounded cells) is
/// never an error; it shows up as empty result collections instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VoronoiError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The clipping rectangle is empty, negative or not finite
    #[error("invalid bounds: width {width}, height {height}")]
    InvalidBounds {
        /// Rectangle width as given
        width: f64,
        /// Rectangle height as given
        height: f64,
    },

    /// An input point has a NaN or infinite coordinate
    #[error("point {index} has a non-finite coordinate")]
    NonFinitePoint {
        /// Input index of the offending point
        index: usize,
    },

    /// The query needs more distinct sites than the diagram holds
    #[error("at least {required} distinct sites required (got {found})")]
    InsufficientSites {
        /// Minimum number of distinct sites
        required: usize,
        /// Distinct sites present in the diagram
        found: usize,
    },
}

/// Result type alias for voronoi operations
pub type Result<T> = std::result::Result<T, VoronoiError>;
