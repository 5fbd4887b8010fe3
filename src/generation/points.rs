//! Seeded Point Sampling
//!
//! Uniform random points inside a rectangle, reproducible from a seed. Used
//! as input for diagrams and as the usual starting point for Lloyd's
//! relaxation.

use glam::DVec2;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::geometry::Rect;

/// Generate `count` uniformly distributed points inside `bounds`
///
/// # Arguments
///
/// * `count` - Number of points to generate
/// * `bounds` - Rectangle to sample from (half-open on the right and bottom borders)
/// * `seed` - Random seed; the same seed always yields the same points
///
/// # Example
///
/// ```
/// use rust_voronoi_diagram::*;
///
/// let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
/// let points = generation::random_points(200, bounds, 42);
/// assert_eq!(points.len(), 200);
/// assert!(points.iter().all(|&p| bounds.contains(p)));
/// ```
pub fn random_points(count: usize, bounds: Rect, seed: u64) -> Vec<DVec2> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let x = bounds.x + rng.gen::<f64>() * bounds.width;
            let y = bounds.y + rng.gen::<f64>() * bounds.height;
            DVec2::new(x, y)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_inside_bounds() {
        let bounds = Rect::new(-20.0, 5.0, 40.0, 10.0);
        let points = random_points(500, bounds, 7);
        assert_eq!(points.len(), 500);
        for p in &points {
            assert!(bounds.contains(*p), "{p:?} outside {bounds:?}");
        }
    }

    #[test]
    fn test_points_determinism() {
        let bounds = Rect::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(random_points(100, bounds, 42), random_points(100, bounds, 42));
    }

    #[test]
    fn test_points_different_seeds() {
        let bounds = Rect::new(0.0, 0.0, 1.0, 1.0);
        let a = random_points(100, bounds, 12345);
        let b = random_points(100, bounds, 67890);
        assert!(a.iter().zip(&b).any(|(p, q)| (*p - *q).length() > 0.01));
    }
}
