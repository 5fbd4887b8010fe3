//! Diagram Configuration and Builder
//!
//! This module provides configuration types for building Voronoi diagrams,
//! optionally relaxed with Lloyd's algorithm.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoronoiError};
use crate::geometry::Rect;

/// Upper bound accepted for `lloyd_iterations`
pub const MAX_LLOYD_ITERATIONS: usize = 100;

/// Configuration for building a Voronoi diagram
///
/// # Example
///
/// ```rust
/// use rust_voronoi_diagram::*;
///
/// let config = DiagramConfigBuilder::new()
///     .bounds(Rect::new(0.0, 0.0, 100.0, 100.0))
///     .unwrap()
///     .seed(42)
///     .build()
///     .unwrap();
///
/// // Config is serializable (with "serde" feature)
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: DiagramConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramConfig {
    /// Clipping rectangle for edges and cell polygons
    pub bounds: Rect,

    /// Seed for the per-site weight generator
    ///
    /// Weights are carried on every site but do not affect the geometry.
    pub seed: u64,

    /// Number of Lloyd's Relaxation iterations applied after the first build
    ///
    /// - 0: Plain Voronoi diagram of the input points (default)
    /// - 2-5: Noticeably more even cells
    /// - 20+: Close to a centroidal Voronoi tessellation
    pub lloyd_iterations: usize,

    /// Convergence threshold for Lloyd's relaxation (fraction of the longest bounds side)
    ///
    /// Relaxation stops early when the largest site displacement in one
    /// iteration falls below `threshold * max(width, height)`.
    ///
    /// - 0.0: Disable early termination (run all iterations)
    pub lloyd_convergence: f64,
}

impl DiagramConfig {
    /// Lloyd options derived from this configuration
    #[inline]
    pub fn lloyd_options(&self) -> crate::LloydOptions {
        crate::LloydOptions {
            max_iterations: self.lloyd_iterations,
            convergence_threshold: self.lloyd_convergence,
        }
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            bounds: Rect::default(),
            seed: rand::random(),
            lloyd_iterations: 0,
            lloyd_convergence: 0.0,
        }
    }
}

/// Builder for creating DiagramConfig with validation
///
/// # Example
///
/// ```rust
/// use rust_voronoi_diagram::*;
///
/// // Use defaults
/// let config = DiagramConfigBuilder::new().build().unwrap();
///
/// // Customize
/// let config = DiagramConfigBuilder::new()
///     .bounds(Rect::new(-50.0, -50.0, 100.0, 100.0))
///     .unwrap()
///     .seed(12345)
///     .lloyd_iterations(10)
///     .unwrap()
///     .lloyd_convergence(0.001)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.lloyd_iterations, 10);
/// ```
#[derive(Debug, Clone)]
pub struct DiagramConfigBuilder {
    bounds: Rect,
    seed: Option<u64>,
    lloyd_iterations: usize,
    lloyd_convergence: f64,
}

impl DiagramConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - bounds: unit square at the origin
    /// - seed: Random (generated from thread_rng)
    /// - lloyd_iterations: 0 (no relaxation)
    /// - lloyd_convergence: 0.0 (run every requested iteration)
    pub fn new() -> Self {
        Self {
            bounds: Rect::default(),
            seed: None,
            lloyd_iterations: 0,
            lloyd_convergence: 0.0,
        }
    }

    /// Set the clipping rectangle
    ///
    /// # Errors
    ///
    /// Returns `InvalidBounds` unless the rectangle is finite with positive
    /// width and height
    pub fn bounds(mut self, bounds: Rect) -> Result<Self> {
        bounds.validate()?;
        self.bounds = bounds;
        Ok(self)
    }

    /// Set the seed for site weights
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of Lloyd's Relaxation iterations
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if iterations > 100
    pub fn lloyd_iterations(mut self, iterations: usize) -> Result<Self> {
        if iterations > MAX_LLOYD_ITERATIONS {
            return Err(VoronoiError::InvalidConfig(format!(
                "Lloyd iterations must be <= {} (got {})",
                MAX_LLOYD_ITERATIONS, iterations
            )));
        }
        self.lloyd_iterations = iterations;
        Ok(self)
    }

    /// Set the convergence threshold for Lloyd's relaxation
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if threshold is negative or not finite
    pub fn lloyd_convergence(mut self, threshold: f64) -> Result<Self> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(VoronoiError::InvalidConfig(format!(
                "Lloyd convergence threshold must be >= 0 (got {})",
                threshold
            )));
        }
        self.lloyd_convergence = threshold;
        Ok(self)
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    pub fn build(self) -> Result<DiagramConfig> {
        let seed = self.seed.unwrap_or_else(rand::random);
        Ok(DiagramConfig {
            bounds: self.bounds,
            seed,
            lloyd_iterations: self.lloyd_iterations,
            lloyd_convergence: self.lloyd_convergence,
        })
    }
}

impl Default for DiagramConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = DiagramConfigBuilder::new().build().unwrap();
        assert_eq!(config.bounds, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(config.lloyd_iterations, 0);
        assert_eq!(config.lloyd_convergence, 0.0);
    }

    #[test]
    fn test_builder_custom() {
        let config = DiagramConfigBuilder::new()
            .bounds(Rect::new(0.0, 0.0, 640.0, 480.0))
            .unwrap()
            .seed(42)
            .lloyd_iterations(3)
            .unwrap()
            .lloyd_convergence(0.01)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.bounds.width, 640.0);
        assert_eq!(config.lloyd_iterations, 3);

        let options = config.lloyd_options();
        assert_eq!(options.max_iterations, 3);
        assert_eq!(options.convergence_threshold, 0.01);
    }

    #[test]
    fn test_builder_too_many_iterations() {
        let result = DiagramConfigBuilder::new().lloyd_iterations(101);
        assert!(result.is_err());
        assert!(DiagramConfigBuilder::new().lloyd_iterations(100).is_ok());
    }

    #[test]
    fn test_builder_invalid_convergence() {
        assert!(DiagramConfigBuilder::new().lloyd_convergence(-0.1).is_err());
        assert!(DiagramConfigBuilder::new().lloyd_convergence(f64::NAN).is_err());
    }

    #[test]
    fn test_builder_invalid_bounds() {
        let result = DiagramConfigBuilder::new().bounds(Rect::new(0.0, 0.0, 0.0, 10.0));
        assert!(matches!(result, Err(VoronoiError::InvalidBounds { .. })));

        let result = DiagramConfigBuilder::new().bounds(Rect::new(0.0, 0.0, 10.0, f64::INFINITY));
        assert!(result.is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = DiagramConfigBuilder::new()
            .seed(12345)
            .lloyd_iterations(4)
            .unwrap()
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: DiagramConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
