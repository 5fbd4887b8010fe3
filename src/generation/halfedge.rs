//! Beach line of Fortune's sweep
//!
//! Halfedges live in a per-sweep arena and refer to each other by index.
//! The [`EdgeList`] threads them into a doubly linked list ordered left to
//! right along the sweep front, with a coarse x-bucket hash that seeds the
//! "which boundary lies left of this point" search.

use glam::DVec2;

use crate::edge::{Edge, EdgeId, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HalfedgeId(usize);

/// One side of a bisector as a boundary on the beach line
#[derive(Debug, Clone)]
pub(crate) struct Halfedge {
    /// `None` for the two list sentinels
    pub edge: Option<EdgeId>,
    pub side: Side,
    pub left: Option<HalfedgeId>,
    pub right: Option<HalfedgeId>,
    /// Set once removed from the beach line
    pub deleted: bool,
    /// Pending circle event: candidate vertex and its sweep coordinate
    pub vertex: Option<DVec2>,
    pub ystar: f64,
    pub next_in_queue: Option<HalfedgeId>,
    pub queued: bool,
}

impl Halfedge {
    fn new(edge: Option<EdgeId>, side: Side) -> Self {
        Self {
            edge,
            side,
            left: None,
            right: None,
            deleted: false,
            vertex: None,
            ystar: 0.0,
            next_in_queue: None,
            queued: false,
        }
    }
}

/// Owns every halfedge created during one sweep
#[derive(Debug, Default)]
pub(crate) struct HalfedgeArena {
    nodes: Vec<Halfedge>,
}

impl HalfedgeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, edge: Option<EdgeId>, side: Side) -> HalfedgeId {
        self.nodes.push(Halfedge::new(edge, side));
        HalfedgeId(self.nodes.len() - 1)
    }

    #[inline]
    pub fn get(&self, id: HalfedgeId) -> &Halfedge {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn get_mut(&mut self, id: HalfedgeId) -> &mut Halfedge {
        &mut self.nodes[id.0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The bisector and side of a halfedge, or `None` for a sentinel
    pub fn edge_side<'e>(&self, id: HalfedgeId, edges: &'e [Edge]) -> Option<(&'e Edge, Side)> {
        let he = self.get(id);
        he.edge.map(|e| (&edges[e.index()], he.side))
    }

    /// Whether `p` lies right of this boundary ("this halfedge is left of p")
    ///
    /// Cheap rejection on the right site's x first, then either a linear
    /// test or a square-root-free quadratic comparison against the parabola
    /// breakpoint.
    pub fn is_left_of(&self, id: HalfedgeId, p: DVec2, edges: &[Edge]) -> bool {
        let he = self.get(id);
        let Some(edge_id) = he.edge else {
            return false;
        };
        let edge = &edges[edge_id.index()];
        let top_site = edge.right_coord();

        let right_of_site = p.x > top_site.x;
        if right_of_site && he.side == Side::Left {
            return true;
        }
        if !right_of_site && he.side == Side::Right {
            return false;
        }

        let above = if edge.a == 1.0 {
            let dyp = p.y - top_site.y;
            let dxp = p.x - top_site.x;
            let mut fast = false;
            let mut above;

            if (!right_of_site && edge.b < 0.0) || (right_of_site && edge.b >= 0.0) {
                above = dyp >= edge.b * dxp;
                fast = above;
            } else {
                above = p.x + p.y * edge.b > edge.c;
                if edge.b < 0.0 {
                    above = !above;
                }
                if !above {
                    fast = true;
                }
            }

            if !fast {
                let dxs = top_site.x - edge.left_coord().x;
                above = edge.b * (dxp * dxp - dyp * dyp)
                    < dxs * dyp * (1.0 + 2.0 * dxp / dxs + edge.b * edge.b);
                if edge.b < 0.0 {
                    above = !above;
                }
            }
            above
        } else {
            let y1 = edge.c - edge.a * p.x;
            let t1 = p.y - y1;
            let t2 = p.x - top_site.x;
            let t3 = y1 - top_site.y;
            t1 * t1 > t2 * t2 + t3 * t3
        };

        match he.side {
            Side::Left => above,
            Side::Right => !above,
        }
    }
}

/// Ordered, hash-accelerated doubly linked list of beach-line boundaries
#[derive(Debug)]
pub(crate) struct EdgeList {
    xmin: f64,
    delta_x: f64,
    hash: Vec<Option<HalfedgeId>>,
    left_end: HalfedgeId,
    right_end: HalfedgeId,
}

impl EdgeList {
    /// Create an empty beach line spanning `[xmin, xmin + delta_x]`
    ///
    /// The hash has `2 * sqrt_sites` buckets.
    pub fn new(arena: &mut HalfedgeArena, xmin: f64, delta_x: f64, sqrt_sites: usize) -> Self {
        let hash_size = (2 * sqrt_sites).max(2);
        let left_end = arena.create(None, Side::Left);
        let right_end = arena.create(None, Side::Left);
        arena.get_mut(left_end).right = Some(right_end);
        arena.get_mut(right_end).left = Some(left_end);

        let mut hash = vec![None; hash_size];
        hash[0] = Some(left_end);
        hash[hash_size - 1] = Some(right_end);

        Self {
            xmin,
            delta_x,
            hash,
            left_end,
            right_end,
        }
    }

    #[cfg(test)]
    pub fn left_end(&self) -> HalfedgeId {
        self.left_end
    }

    #[cfg(test)]
    pub fn right_end(&self) -> HalfedgeId {
        self.right_end
    }

    /// Splice `new` immediately right of `lb`
    pub fn insert(&mut self, arena: &mut HalfedgeArena, lb: HalfedgeId, new: HalfedgeId) {
        let after = arena.get(lb).right;
        {
            let node = arena.get_mut(new);
            node.left = Some(lb);
            node.right = after;
        }
        if let Some(after) = after {
            arena.get_mut(after).left = Some(new);
        }
        arena.get_mut(lb).right = Some(new);
    }

    /// Unlink a halfedge; stale hash entries pointing at it are dropped lazily
    pub fn remove(&mut self, arena: &mut HalfedgeArena, id: HalfedgeId) {
        let (left, right) = {
            let he = arena.get(id);
            (he.left, he.right)
        };
        if let Some(left) = left {
            arena.get_mut(left).right = right;
        }
        if let Some(right) = right {
            arena.get_mut(right).left = left;
        }
        let he = arena.get_mut(id);
        he.deleted = true;
        he.left = None;
        he.right = None;
    }

    fn bucket(&self, x: f64) -> usize {
        let size = self.hash.len();
        if self.delta_x <= 0.0 {
            return 0;
        }
        let bucket = ((x - self.xmin) / self.delta_x * size as f64) as isize;
        bucket.clamp(0, size as isize - 1) as usize
    }

    fn get_hash(&mut self, arena: &HalfedgeArena, bucket: isize) -> Option<HalfedgeId> {
        if bucket < 0 || bucket as usize >= self.hash.len() {
            return None;
        }
        let slot = &mut self.hash[bucket as usize];
        match *slot {
            Some(id) if arena.get(id).deleted => {
                *slot = None;
                None
            }
            other => other,
        }
    }

    /// The boundary immediately left of `p` on the beach line
    ///
    /// Seeds the search from the hash bucket of `p.x` (probing outwards past
    /// empty or stale buckets), walks the list to the correct boundary and
    /// caches the answer in the bucket.
    pub fn left_neighbor(&mut self, arena: &HalfedgeArena, p: DVec2, edges: &[Edge]) -> HalfedgeId {
        let bucket = self.bucket(p.x);
        let signed = bucket as isize;

        let mut he = match self.get_hash(arena, signed) {
            Some(he) => he,
            None => {
                let mut i = 1;
                loop {
                    if let Some(he) = self.get_hash(arena, signed - i) {
                        break he;
                    }
                    if let Some(he) = self.get_hash(arena, signed + i) {
                        break he;
                    }
                    i += 1;
                }
            }
        };

        if he == self.left_end || (he != self.right_end && arena.is_left_of(he, p, edges)) {
            loop {
                he = self.step(arena, he, Side::Right);
                if he == self.right_end || !arena.is_left_of(he, p, edges) {
                    break;
                }
            }
            he = self.step(arena, he, Side::Left);
        } else {
            loop {
                he = self.step(arena, he, Side::Left);
                if he == self.left_end || arena.is_left_of(he, p, edges) {
                    break;
                }
            }
        }

        if bucket > 0 && bucket < self.hash.len() - 1 {
            self.hash[bucket] = Some(he);
        }
        he
    }

    /// Neighbor in the given direction; ends are their own neighbors
    pub fn step(&self, arena: &HalfedgeArena, id: HalfedgeId, direction: Side) -> HalfedgeId {
        let he = arena.get(id);
        let next = match direction {
            Side::Left => he.left,
            Side::Right => he.right,
        };
        next.unwrap_or(id)
    }

    /// Boundaries from left to right, sentinels excluded
    #[cfg(test)]
    pub fn boundaries(&self, arena: &HalfedgeArena) -> Vec<HalfedgeId> {
        let mut out = Vec::new();
        let mut he = self.step(arena, self.left_end, Side::Right);
        while he != self.right_end {
            out.push(he);
            he = self.step(arena, he, Side::Right);
        }
        out
    }
}
