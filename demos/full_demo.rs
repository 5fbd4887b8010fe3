//! Complete workflow demonstration for rust_voronoi_diagram

use rust_voronoi_diagram::*;

fn main() -> Result<()> {
    println!("=== rust_voronoi_diagram Complete Demo ===\n");

    // Step 1: Configure diagram
    println!("Step 1: Configuring diagram...");
    let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
    let config = DiagramConfigBuilder::new()
        .bounds(bounds)?
        .seed(12345)
        .lloyd_iterations(10)?
        .lloyd_convergence(0.001)?
        .build()?;

    println!("  Seed: {}", config.seed);
    println!("  Bounds: {:?}", config.bounds);
    println!("  Lloyd iterations: {}", config.lloyd_iterations);

    // Step 2: Build diagram
    println!("\nStep 2: Building diagram...");
    let points = generation::random_points(250, bounds, config.seed);
    let mut diagram = Voronoi::new(&points, config.bounds)?;
    println!("  Sites: {}", diagram.sites().len());
    println!("  Edges: {} ({} visible)", diagram.edges().len(), diagram.voronoi_diagram().len());
    println!("  Vertices: {}", diagram.vertices().len());
    println!("  Delaunay triangles: {}", diagram.triangles().len());

    // Step 3: Relax
    println!("\nStep 3: Lloyd's relaxation...");
    let report = diagram.lloyd_relaxation_with_options(config.lloyd_options())?;
    for (i, displacement) in report.displacements.iter().enumerate() {
        println!("  Iteration {}: max displacement {:.4}", i + 1, displacement);
    }
    println!("  Converged: {}", report.converged);

    // Step 4: Cell statistics
    println!("\nStep 4: Cell statistics:");
    let cells = diagram.cells();
    let total_area: f64 = cells.iter().map(VoronoiCell::area).sum();
    let (min_area, max_area) = cells
        .iter()
        .map(VoronoiCell::area)
        .fold((f64::MAX, f64::MIN), |(lo, hi), a| (lo.min(a), hi.max(a)));
    println!("  Total area: {:.2} (bounds {:.2})", total_area, bounds.area());
    println!("  Cell area range: {:.2} .. {:.2}", min_area, max_area);

    let interior = cells.iter().filter(|c| c.radius > 0.0).count();
    println!("  Interior sites: {}", interior);

    // Step 5: Hull and spanning tree
    println!("\nStep 5: Hull and spanning tree:");
    let hull = diagram.hull_points_in_order()?;
    println!("  Hull: {} sites, area {:.2}", hull.len(), polygon_area(&hull));
    let tree = diagram.spanning_tree(SpanningTreeKind::Minimum);
    let length: f64 = tree.iter().map(LineSegment::length).sum();
    println!("  Minimum spanning tree: {} segments, length {:.2}", tree.len(), length);

    // Step 6: Point queries
    println!("\nStep 6: Point queries:");
    let probe = bounds.center();
    if let Some(index) = diagram.site_at(probe) {
        println!("  Position {:?} -> site {}", probe, index);
        println!("  Site has {} neighbors", diagram.neighbor_sites(index).len());
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
