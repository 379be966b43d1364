use super::Packer;
use crate::model::{BoundingBox, Placement, Rect};
use std::collections::HashSet;
use tracing::trace;

/// Candidate point: a bottom-left anchor the next gate may be tried at.
pub type Point = (u32, u32);

/// Greedy packer driven by a frontier of candidate points.
///
/// Every placement scans the whole frontier and tests each point against every
/// occupied region. Points that fit inside the current bounding box (tier A) are
/// preferred, leftmost then bottommost. Otherwise the point whose placement
/// yields the smallest grown bounding-box area wins (tier B). Ties in either tier
/// go to the point that entered the frontier first.
#[derive(Debug, Clone)]
pub struct FrontierPacker {
    candidates: Vec<Point>,
    occupied: Vec<Rect>,
    bounds: BoundingBox,
    // Every point ever appended; only kept when deduplication is on.
    emitted: Option<HashSet<Point>>,
}

#[derive(Clone, Copy)]
struct Choice {
    index: usize,
    point: Point,
}

impl FrontierPacker {
    /// Creates a packer with the frontier seeded at the origin.
    ///
    /// `seed` is the starting bounding box; it only steers the tier-A test for
    /// the first placements and grows as gates are placed.
    pub fn new(seed: BoundingBox, dedup_candidates: bool) -> Self {
        let origin = (0, 0);
        Self {
            candidates: vec![origin],
            occupied: Vec::new(),
            bounds: seed,
            emitted: dedup_candidates.then(|| HashSet::from([origin])),
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }

    /// Current frontier, in insertion order.
    pub fn candidates(&self) -> &[Point] {
        &self.candidates
    }

    pub fn occupied(&self) -> &[Rect] {
        &self.occupied
    }

    /// True when `rect` intersects no occupied region. Shared edges are allowed.
    pub fn is_free(&self, rect: &Rect) -> bool {
        for o in &self.occupied {
            if rect.overlaps(o) {
                return false;
            }
        }
        true
    }

    /// Picks the best candidate point for a `width` x `height` gate.
    fn find_position(&self, width: u32, height: u32) -> Option<Choice> {
        let bw = self.bounds.width as u64;
        let bh = self.bounds.height as u64;
        let mut best_within: Option<Choice> = None;
        let mut best_growth: Option<(Choice, u64)> = None;

        for (index, &(x, y)) in self.candidates.iter().enumerate() {
            // A point whose far corner leaves u32 can never be committed.
            if x.checked_add(width).is_none() || y.checked_add(height).is_none() {
                continue;
            }
            let rect = Rect::new(x, y, width, height);
            if !self.is_free(&rect) {
                continue;
            }
            let choice = Choice {
                index,
                point: (x, y),
            };
            if rect.x2() <= bw && rect.y2() <= bh {
                match best_within {
                    Some(b) if b.point <= choice.point => {}
                    _ => best_within = Some(choice),
                }
            } else if best_within.is_none() {
                let area = rect.x2().max(bw) * rect.y2().max(bh);
                match best_growth {
                    Some((_, best_area)) if best_area <= area => {}
                    _ => best_growth = Some((choice, area)),
                }
            }
        }

        best_within.or(best_growth.map(|(c, _)| c))
    }

    #[cfg(test)]
    pub(crate) fn clear_candidates(&mut self) {
        self.candidates.clear();
    }

    /// Appends the top-left and bottom-right corners of a freshly placed rect.
    fn push_corners(&mut self, rect: &Rect) {
        let top_left = (rect.x, rect.y + rect.h);
        let bottom_right = (rect.x + rect.w, rect.y);
        for p in [top_left, bottom_right] {
            match &mut self.emitted {
                Some(emitted) => {
                    if emitted.insert(p) {
                        self.candidates.push(p);
                    }
                }
                None => self.candidates.push(p),
            }
        }
    }
}

impl Packer for FrontierPacker {
    fn can_pack(&self, width: u32, height: u32) -> bool {
        self.find_position(width, height).is_some()
    }

    fn pack(&mut self, name: &str, width: u32, height: u32) -> Option<Placement> {
        let choice = self.find_position(width, height)?;
        // `remove` keeps the remaining points in insertion order for later ties.
        let (x, y) = self.candidates.remove(choice.index);
        let rect = Rect::new(x, y, width, height);
        self.occupied.push(rect);
        self.bounds.width = self.bounds.width.max(x + width);
        self.bounds.height = self.bounds.height.max(y + height);
        self.push_corners(&rect);
        trace!(
            gate = name,
            x,
            y,
            width,
            height,
            frontier = self.candidates.len(),
            "placed gate"
        );
        Some(Placement {
            name: name.to_string(),
            x,
            y,
            width,
            height,
        })
    }
}
