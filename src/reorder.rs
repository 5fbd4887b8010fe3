//! Threading an unordered edge set into a single traversal chain
//!
//! Used per site (edges keyed by their end vertices) to walk a cell
//! boundary, and once per diagram (edges keyed by their sites) to walk the
//! convex hull.

use std::collections::VecDeque;

use crate::edge::{Edge, EdgeId, Side};

/// Which endpoint identity links consecutive edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderCriterion {
    /// Edges share a Voronoi vertex; unbounded ends all share the point at infinity
    Vertex,
    /// Edges share a site (Delaunay view of the edge)
    Site,
}

fn endpoint(edge: &Edge, side: Side, criterion: ReorderCriterion) -> Option<usize> {
    match criterion {
        ReorderCriterion::Vertex => edge.vertex(side).map(|v| v.index()),
        ReorderCriterion::Site => Some(edge.site(side)),
    }
}

/// Order `ids` into a chain, pairing each edge with its traversal orientation
///
/// An edge oriented [`Side::Left`] is walked from its left endpoint to its
/// right endpoint; [`Side::Right`] walks it backwards. The first edge seeds
/// the chain and every later edge is appended or prepended wherever one of
/// its endpoints matches a free end of the chain.
///
/// Zero-length loops (both ends on the same vertex) are threaded in last,
/// next to the chain position where that vertex is visited.
///
/// # Returns
///
/// The ordered chain, or an empty vector when some edge can never be
/// attached (the set does not form a single chain).
pub fn reorder_edges(
    ids: &[EdgeId],
    edges: &[Edge],
    criterion: ReorderCriterion,
) -> Vec<(EdgeId, Side)> {
    let (loops, links): (Vec<EdgeId>, Vec<EdgeId>) = ids.iter().partition(|id| {
        let edge = &edges[id.index()];
        let left = endpoint(edge, Side::Left, criterion);
        left.is_some() && left == endpoint(edge, Side::Right, criterion)
    });

    let Some(&seed) = links.first() else {
        return loops_only(&loops, edges, criterion);
    };

    let mut chain = VecDeque::with_capacity(ids.len());
    let seed_edge = &edges[seed.index()];
    let mut first = endpoint(seed_edge, Side::Left, criterion);
    let mut last = endpoint(seed_edge, Side::Right, criterion);
    chain.push_back((seed, Side::Left));

    let mut done = vec![false; links.len()];
    done[0] = true;
    let mut remaining = links.len() - 1;

    while remaining > 0 {
        let mut progressed = false;
        for (i, &id) in links.iter().enumerate().skip(1) {
            if done[i] {
                continue;
            }
            let edge = &edges[id.index()];
            let left = endpoint(edge, Side::Left, criterion);
            let right = endpoint(edge, Side::Right, criterion);

            if left == last {
                last = right;
                chain.push_back((id, Side::Left));
            } else if right == first {
                first = left;
                chain.push_front((id, Side::Left));
            } else if left == first {
                first = right;
                chain.push_front((id, Side::Right));
            } else if right == last {
                last = left;
                chain.push_back((id, Side::Right));
            } else {
                continue;
            }

            done[i] = true;
            remaining -= 1;
            progressed = true;
        }

        if !progressed {
            return Vec::new();
        }
    }

    for id in loops {
        let key = endpoint(&edges[id.index()], Side::Left, criterion);
        let position = if first == key {
            Some(0)
        } else {
            chain
                .iter()
                .position(|&(e, side)| endpoint(&edges[e.index()], side.other(), criterion) == key)
                .map(|i| i + 1)
        };
        match position {
            Some(at) => chain.insert(at, (id, Side::Left)),
            None => return Vec::new(),
        }
    }

    chain.into()
}

/// A set made only of loops chains when they all sit on one vertex
fn loops_only(loops: &[EdgeId], edges: &[Edge], criterion: ReorderCriterion) -> Vec<(EdgeId, Side)> {
    let mut keys = loops
        .iter()
        .map(|id| endpoint(&edges[id.index()], Side::Left, criterion));
    match keys.next() {
        Some(key) if keys.all(|k| k == key) => loops.iter().map(|&id| (id, Side::Left)).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::VertexId;
    use glam::DVec2;

    fn edge(s0: usize, s1: usize, left: Option<usize>, right: Option<usize>) -> Edge {
        let c0 = DVec2::new(s0 as f64, 0.0);
        let c1 = DVec2::new(s1 as f64, 1.0);
        let mut edge = Edge::bisecting(s0, c0, s1, c1);
        if let Some(v) = left {
            edge.set_vertex(Side::Left, VertexId(v));
        }
        if let Some(v) = right {
            edge.set_vertex(Side::Right, VertexId(v));
        }
        edge
    }

    fn ids(n: usize) -> Vec<EdgeId> {
        (0..n).map(EdgeId).collect()
    }

    /// Endpoints visited along the chain, in order
    fn walk(chain: &[(EdgeId, Side)], edges: &[Edge]) -> Vec<(Option<usize>, Option<usize>)> {
        chain
            .iter()
            .map(|&(id, side)| {
                let e = &edges[id.index()];
                (
                    e.vertex(side).map(|v| v.index()),
                    e.vertex(side.other()).map(|v| v.index()),
                )
            })
            .collect()
    }

    #[test]
    fn test_closed_ring() {
        // Triangle of vertices 0-1-2, edges given out of order and mixed orientation
        let edges = vec![
            edge(0, 1, Some(0), Some(1)),
            edge(0, 2, Some(0), Some(2)),
            edge(0, 3, Some(1), Some(2)),
        ];
        let chain = reorder_edges(&ids(3), &edges, ReorderCriterion::Vertex);
        assert_eq!(chain.len(), 3);

        let steps = walk(&chain, &edges);
        for pair in steps.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        assert_eq!(steps.last().unwrap().1, steps[0].0);
    }

    #[test]
    fn test_open_chain_through_infinity() {
        let edges = vec![
            edge(0, 1, Some(0), Some(1)),
            edge(0, 2, None, Some(0)),
            edge(0, 3, Some(1), None),
        ];
        let chain = reorder_edges(&ids(3), &edges, ReorderCriterion::Vertex);
        let steps = walk(&chain, &edges);
        assert_eq!(steps, vec![(None, Some(0)), (Some(0), Some(1)), (Some(1), None)]);
    }

    #[test]
    fn test_disconnected_set_aborts() {
        let edges = vec![edge(0, 1, Some(0), Some(1)), edge(0, 2, Some(5), Some(6))];
        assert!(reorder_edges(&ids(2), &edges, ReorderCriterion::Vertex).is_empty());
    }

    #[test]
    fn test_loops_are_absorbed() {
        // Wedge cell at a vertex shared by several cocircular sites: two rays
        // plus zero-length edges left behind at vertex 0
        let edges = vec![
            edge(0, 1, Some(0), Some(0)),
            edge(0, 2, Some(0), None),
            edge(0, 3, Some(0), Some(0)),
            edge(0, 4, None, Some(0)),
        ];
        let chain = reorder_edges(&ids(4), &edges, ReorderCriterion::Vertex);
        assert_eq!(chain.len(), 4);

        let steps = walk(&chain, &edges);
        for pair in steps.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        assert_eq!(steps.last().unwrap().1, steps[0].0);
        assert_eq!(steps.iter().filter(|s| s.1.is_none()).count(), 1);
    }

    #[test]
    fn test_loop_inside_closed_ring() {
        let edges = vec![
            edge(0, 1, Some(0), Some(1)),
            edge(0, 2, Some(2), Some(2)),
            edge(0, 3, Some(1), Some(2)),
            edge(0, 4, Some(2), Some(0)),
        ];
        let chain = reorder_edges(&ids(4), &edges, ReorderCriterion::Vertex);
        let steps = walk(&chain, &edges);
        assert_eq!(steps.len(), 4);
        for pair in steps.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        assert_eq!(steps.last().unwrap().1, steps[0].0);
    }

    #[test]
    fn test_stray_loop_aborts() {
        let edges = vec![edge(0, 1, Some(0), Some(1)), edge(0, 2, Some(7), Some(7))];
        assert!(reorder_edges(&ids(2), &edges, ReorderCriterion::Vertex).is_empty());
    }

    #[test]
    fn test_site_criterion() {
        // Hull square 0-1-3-2 as Delaunay segments
        let edges = vec![
            edge(0, 1, None, None),
            edge(2, 3, None, None),
            edge(1, 3, None, None),
            edge(0, 2, None, None),
        ];
        let chain = reorder_edges(&ids(4), &edges, ReorderCriterion::Site);
        assert_eq!(chain.len(), 4);

        let sites: Vec<(usize, usize)> = chain
            .iter()
            .map(|&(id, side)| {
                let e = &edges[id.index()];
                (e.site(side), e.site(side.other()))
            })
            .collect();
        for pair in sites.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        assert_eq!(sites.last().unwrap().1, sites[0].0);
    }

    #[test]
    fn test_empty_input() {
        assert!(reorder_edges(&[], &[], ReorderCriterion::Site).is_empty());
    }
}
