//! Lloyd's Relaxation for uniform point distribution
//!
//! Lloyd's Relaxation iteratively improves the uniformity of a point set by
//! moving each site to the centroid of its clipped Voronoi cell and
//! rebuilding the diagram from scratch.

use std::time::Instant;

use glam::DVec2;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::diagram::Voronoi;
use crate::error::Result;
use crate::geometry::{polygon_centroid, Rect};

/// Options for Lloyd's relaxation algorithm
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LloydOptions {
    /// Maximum number of iterations to run
    pub max_iterations: usize,
    /// Convergence threshold - stop when max displacement < this value
    /// times the longest side of the bounds.
    /// Set to 0.0 to disable early termination
    pub convergence_threshold: f64,
}

impl Default for LloydOptions {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            convergence_threshold: 0.01,
        }
    }
}

/// What a relaxation run did
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RelaxationReport {
    /// Number of rebuilds performed
    pub iterations_run: usize,
    /// Whether the run stopped early on the convergence threshold
    pub converged: bool,
    /// Largest site displacement of each iteration
    pub displacements: Vec<f64>,
}

impl RelaxationReport {
    /// Largest displacement of the last iteration, if any ran
    pub fn final_displacement(&self) -> Option<f64> {
        self.displacements.last().copied()
    }
}

/// Apply Lloyd's Relaxation to improve point distribution uniformity
///
/// # Arguments
///
/// * `points` - Initial point distribution
/// * `bounds` - Clipping rectangle the cells are computed in
/// * `iterations` - Maximum number of relaxation iterations
///
/// # Returns
///
/// Relaxed points, in input order
///
/// # Errors
///
/// Returns the diagram construction error for invalid bounds or
/// non-finite points.
pub fn lloyd_relaxation(points: Vec<DVec2>, bounds: Rect, iterations: usize) -> Result<Vec<DVec2>> {
    let options = LloydOptions {
        max_iterations: iterations,
        ..Default::default()
    };
    lloyd_relaxation_with_options(points, bounds, options)
}

/// Apply Lloyd's Relaxation with custom options
///
/// This variant allows fine-tuned control over convergence detection and
/// maximum iterations. Use `lloyd_relaxation` for the simple interface, or
/// [`Voronoi::lloyd_relaxation_with_options`] to keep the final diagram.
pub fn lloyd_relaxation_with_options(
    points: Vec<DVec2>,
    bounds: Rect,
    options: LloydOptions,
) -> Result<Vec<DVec2>> {
    let mut diagram = Voronoi::new(&points, bounds)?;
    relax(&mut diagram, options)?;
    Ok(diagram.site_coords())
}

/// Relax `diagram` in place, rebuilding it once per iteration
pub(crate) fn relax(diagram: &mut Voronoi, options: LloydOptions) -> Result<RelaxationReport> {
    let bounds = diagram.bounds();
    let convergence_threshold = options.convergence_threshold * bounds.longest_side();
    let total_start = Instant::now();

    debug!(
        "lloyd: starting with {} sites, max {} iterations, threshold {:.4} (abs: {:.4})",
        diagram.sites().len(),
        options.max_iterations,
        options.convergence_threshold,
        convergence_threshold
    );

    let mut report = RelaxationReport::default();
    for iteration in 0..options.max_iterations {
        let iter_start = Instant::now();

        let (new_points, max_displacement) = compute_new_points(diagram);
        *diagram = Voronoi::build(&new_points, bounds, diagram.seed())?;

        report.iterations_run = iteration + 1;
        report.displacements.push(max_displacement);

        debug!(
            "lloyd: iteration {} took {:?}, max_disp={:.6}",
            iteration + 1,
            iter_start.elapsed(),
            max_displacement
        );

        // Early exit if converged
        if convergence_threshold > 0.0 && max_displacement < convergence_threshold {
            report.converged = true;
            debug!(
                "lloyd: converged at iteration {} (max_disp {:.6} < threshold {:.6})",
                iteration + 1,
                max_displacement,
                convergence_threshold
            );
            break;
        }
    }

    debug!(
        "lloyd: finished {} iterations (of max {}), converged={}, total={:?}",
        report.iterations_run,
        options.max_iterations,
        report.converged,
        total_start.elapsed()
    );
    Ok(report)
}

/// Compute new site positions and track maximum displacement
///
/// Sites whose cell is empty or has zero area keep their position.
fn compute_new_points(diagram: &Voronoi) -> (Vec<DVec2>, f64) {
    let mut max_displacement: f64 = 0.0;

    let new_points = diagram
        .sites()
        .iter()
        .enumerate()
        .map(|(index, site)| {
            let old_pos = site.coord();
            let new_pos = polygon_centroid(&diagram.region(index)).unwrap_or(old_pos);
            max_displacement = max_displacement.max(old_pos.distance(new_pos));
            new_pos
        })
        .collect();

    (new_points, max_displacement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::random_points;

    fn bounds() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn test_lloyd_relaxation() {
        let points = random_points(60, bounds(), 42);
        let relaxed = lloyd_relaxation(points, bounds(), 3).unwrap();

        assert_eq!(relaxed.len(), 60);
        // Centroids of clipped cells stay inside the bounds
        for point in &relaxed {
            assert!(bounds().contains(*point));
        }
    }

    #[test]
    fn test_lloyd_relaxation_determinism() {
        let relaxed1 = lloyd_relaxation(random_points(40, bounds(), 12345), bounds(), 2).unwrap();
        let relaxed2 = lloyd_relaxation(random_points(40, bounds(), 12345), bounds(), 2).unwrap();
        assert_eq!(relaxed1, relaxed2);
    }

    #[test]
    fn test_lloyd_options_default() {
        let options = LloydOptions::default();
        assert_eq!(options.max_iterations, 5);
        assert!((options.convergence_threshold - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_lloyd_no_convergence_threshold() {
        let mut diagram = Voronoi::new(&random_points(30, bounds(), 42), bounds()).unwrap();
        let options = LloydOptions {
            max_iterations: 3,
            convergence_threshold: 0.0,
        };
        let report = relax(&mut diagram, options).unwrap();

        assert_eq!(report.iterations_run, 3);
        assert!(!report.converged);
        assert_eq!(report.displacements.len(), 3);
        assert_eq!(diagram.sites().len(), 30);
    }

    #[test]
    fn test_zero_iterations_is_identity() {
        let points = random_points(10, bounds(), 1);
        let relaxed = lloyd_relaxation(points.clone(), bounds(), 0).unwrap();
        assert_eq!(relaxed, points);
    }

    #[test]
    fn test_invalid_bounds_error() {
        let result = lloyd_relaxation(vec![DVec2::ZERO], Rect::new(0.0, 0.0, -1.0, 1.0), 1);
        assert!(result.is_err());
    }
}
