//! Bucketed priority queue of pending circle events

use super::halfedge::{HalfedgeArena, HalfedgeId};

/// Circle events keyed by `(ystar, vertex.x)`
///
/// Buckets partition the sweep's y-range; each bucket is a singly linked
/// chain threaded through the halfedges themselves and kept sorted. A
/// halfedge is in the queue at most once.
#[derive(Debug)]
pub(crate) struct HalfedgePriorityQueue {
    ymin: f64,
    delta_y: f64,
    heads: Vec<Option<HalfedgeId>>,
    count: usize,
    min_bucket: usize,
}

impl HalfedgePriorityQueue {
    /// Create a queue over `[ymin, ymin + delta_y]` with `4 * sqrt_sites` buckets
    pub fn new(ymin: f64, delta_y: f64, sqrt_sites: usize) -> Self {
        let size = (4 * sqrt_sites).max(1);
        Self {
            ymin,
            delta_y,
            heads: vec![None; size],
            count: 0,
            min_bucket: 0,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.count
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn bucket(&self, ystar: f64) -> usize {
        if self.delta_y <= 0.0 {
            return 0;
        }
        let size = self.heads.len();
        let bucket = ((ystar - self.ymin) / self.delta_y * size as f64) as isize;
        bucket.clamp(0, size as isize - 1) as usize
    }

    /// Whether `node` sorts after `other`
    fn is_after(arena: &HalfedgeArena, node: HalfedgeId, other: HalfedgeId) -> bool {
        let node = arena.get(node);
        let other = arena.get(other);
        let node_x = node.vertex.map_or(f64::NAN, |v| v.x);
        let other_x = other.vertex.map_or(f64::NAN, |v| v.x);
        node.ystar > other.ystar || (node.ystar == other.ystar && node_x > other_x)
    }

    /// Queue a halfedge whose `vertex` and `ystar` are already set
    ///
    /// The halfedge must not be queued already: its bucket is derived from
    /// `ystar`, so a queued halfedge has to be removed before its key changes.
    pub fn insert(&mut self, arena: &mut HalfedgeArena, he: HalfedgeId) {
        debug_assert!(!arena.get(he).queued, "halfedge queued twice");
        let bucket = self.bucket(arena.get(he).ystar);
        if bucket < self.min_bucket {
            self.min_bucket = bucket;
        }

        let mut previous: Option<HalfedgeId> = None;
        let mut cursor = self.heads[bucket];
        while let Some(next) = cursor {
            if !Self::is_after(arena, he, next) {
                break;
            }
            previous = Some(next);
            cursor = arena.get(next).next_in_queue;
        }

        {
            let node = arena.get_mut(he);
            node.next_in_queue = cursor;
            node.queued = true;
        }
        match previous {
            Some(previous) => arena.get_mut(previous).next_in_queue = Some(he),
            None => self.heads[bucket] = Some(he),
        }
        self.count += 1;
    }

    /// Drop a halfedge from the queue and clear its pending vertex; no-op if not queued
    pub fn remove(&mut self, arena: &mut HalfedgeArena, he: HalfedgeId) {
        if !arena.get(he).queued {
            return;
        }
        let bucket = self.bucket(arena.get(he).ystar);
        let after = arena.get(he).next_in_queue;

        if self.heads[bucket] == Some(he) {
            self.heads[bucket] = after;
        } else {
            let mut cursor = self.heads[bucket];
            while let Some(current) = cursor {
                let next = arena.get(current).next_in_queue;
                if next == Some(he) {
                    arena.get_mut(current).next_in_queue = after;
                    break;
                }
                cursor = next;
            }
        }

        let node = arena.get_mut(he);
        node.next_in_queue = None;
        node.queued = false;
        node.vertex = None;
        self.count -= 1;
    }

    fn adjust_min_bucket(&mut self) {
        while self.min_bucket < self.heads.len() - 1 && self.heads[self.min_bucket].is_none() {
            self.min_bucket += 1;
        }
    }

    /// Coordinates `(vertex.x, ystar)` of the earliest event
    pub fn min(&mut self, arena: &HalfedgeArena) -> Option<(f64, f64)> {
        self.adjust_min_bucket();
        let head = self.heads[self.min_bucket]?;
        let he = arena.get(head);
        let x = he.vertex.map_or(f64::NAN, |v| v.x);
        Some((x, he.ystar))
    }

    /// Pop the earliest event; its vertex stays set for the caller
    pub fn extract_min(&mut self, arena: &mut HalfedgeArena) -> Option<HalfedgeId> {
        self.adjust_min_bucket();
        let head = self.heads[self.min_bucket]?;
        self.heads[self.min_bucket] = arena.get(head).next_in_queue;
        let node = arena.get_mut(head);
        node.next_in_queue = None;
        node.queued = false;
        self.count -= 1;
        Some(head)
    }
}
