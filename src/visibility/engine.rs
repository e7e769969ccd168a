use std::collections::BTreeMap;

use crate::foundation::{
    core::Rect,
    error::{HeartlineError, HeartlineResult},
};

/// Handle for one observed region, returned by [`VisibilityEngine::register`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SubscriptionId(pub u64);

/// Per-edge adjustment of the viewport root box, in pixels.
///
/// Positive values grow the effective viewport (reveal earlier), negative values
/// shrink it (reveal only once the region is further inside).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RootMargin {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub left: f64,
}

impl RootMargin {
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// Only the bottom edge is moved (the common "reveal a bit later" case).
    pub const fn bottom(px: f64) -> Self {
        Self {
            top: 0.0,
            right: 0.0,
            bottom: px,
            left: 0.0,
        }
    }

    pub fn apply(self, root: Rect) -> Rect {
        Rect::new(
            root.x0 - self.left,
            root.y0 - self.top,
            root.x1 + self.right,
            root.y1 + self.bottom,
        )
    }
}

/// Reveal trigger configuration for one region.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ObserveOpts {
    /// Minimum visible fraction of the region, in `[0, 1]`.
    pub threshold: f64,
    #[serde(default)]
    pub margin: RootMargin,
}

impl Default for ObserveOpts {
    fn default() -> Self {
        Self::threshold(0.2)
    }
}

impl ObserveOpts {
    pub const fn threshold(threshold: f64) -> Self {
        Self {
            threshold,
            margin: RootMargin::ZERO,
        }
    }

    pub const fn with_margin(mut self, margin: RootMargin) -> Self {
        self.margin = margin;
        self
    }

    pub fn validate(&self) -> HeartlineResult<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(HeartlineError::validation(
                "reveal threshold must be finite and within [0, 1]",
            ));
        }
        let m = self.margin;
        if ![m.top, m.right, m.bottom, m.left]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(HeartlineError::validation("reveal margin must be finite"));
        }
        Ok(())
    }

    fn is_satisfied_by(&self, ratio: f64) -> bool {
        ratio > 0.0 && ratio >= self.threshold
    }

    /// Geometric check against `root`. A region larger than the root can never
    /// be fully visible, so its threshold scales down to the fraction of it that
    /// fits inside the root.
    fn is_satisfied_within(&self, region: Rect, root: Rect) -> bool {
        let ratio = intersection_ratio(region, root);
        ratio > 0.0 && ratio >= self.threshold * max_visible_fraction(region, root)
    }
}

/// Whether the host offers a viewport-intersection primitive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntersectionSupport {
    #[default]
    Available,
    /// Every registration reveals immediately.
    Unavailable,
}

/// One `hidden -> revealed` transition, delivered exactly once per region.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Reveal {
    pub id: SubscriptionId,
    /// Intersection ratio observed when the latch fired (1.0 when failing open).
    pub ratio: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Latch {
    Observing,
    Revealed,
    Cancelled,
}

#[derive(Clone, Debug)]
struct Entry {
    region: Rect,
    opts: ObserveOpts,
    latch: Latch,
}

/// One-way visibility latches for page regions.
///
/// Regions are registered with a threshold; the first observation that meets it
/// reveals the region, queues a [`Reveal`] and stops observing it. Nothing ever
/// hides a region again.
#[derive(Debug)]
pub struct VisibilityEngine {
    support: IntersectionSupport,
    root: Rect,
    next_id: u64,
    entries: BTreeMap<SubscriptionId, Entry>,
    pending: Vec<Reveal>,
    warned_fail_open: bool,
}

impl VisibilityEngine {
    /// `root` is the viewport box (document coordinates) regions are measured
    /// against until the next [`observe`](Self::observe).
    pub fn new(support: IntersectionSupport, root: Rect) -> Self {
        Self {
            support,
            root,
            next_id: 0,
            entries: BTreeMap::new(),
            pending: Vec::new(),
            warned_fail_open: false,
        }
    }

    pub fn support(&self) -> IntersectionSupport {
        self.support
    }

    /// Begin observing `region` (document coordinates).
    ///
    /// When the region already satisfies its threshold against the current
    /// root, the reveal is queued before this returns.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn register(&mut self, region: Rect, opts: ObserveOpts) -> HeartlineResult<SubscriptionId> {
        opts.validate()?;
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.insert(
            id,
            Entry {
                region,
                opts,
                latch: Latch::Observing,
            },
        );

        match self.support {
            IntersectionSupport::Unavailable => {
                if !self.warned_fail_open {
                    tracing::warn!("viewport intersection unavailable; revealing all regions");
                    self.warned_fail_open = true;
                }
                self.fire(id, 1.0);
            }
            IntersectionSupport::Available => {
                let root = opts.margin.apply(self.root);
                if opts.is_satisfied_within(region, root) {
                    self.fire(id, intersection_ratio(region, root));
                }
            }
        }
        Ok(id)
    }

    /// Move a region after a relayout. The latch state is kept, so a revealed
    /// region stays revealed; a pending one is checked at the next
    /// [`observe`](Self::observe).
    ///
    /// Returns `false` for unknown ids.
    pub fn update_region(&mut self, id: SubscriptionId, region: Rect) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.region = region;
                true
            }
            None => false,
        }
    }

    /// Re-evaluate every observed region against a new viewport root
    /// (document coordinates), typically after a scroll or resize.
    pub fn observe(&mut self, root: Rect) {
        self.root = root;
        if self.support == IntersectionSupport::Unavailable {
            return;
        }

        let due: Vec<(SubscriptionId, f64)> = self
            .entries
            .iter()
            .filter(|(_, e)| e.latch == Latch::Observing)
            .filter_map(|(id, e)| {
                let root = e.opts.margin.apply(root);
                e.opts
                    .is_satisfied_within(e.region, root)
                    .then(|| (*id, intersection_ratio(e.region, root)))
            })
            .collect();

        for (id, ratio) in due {
            self.fire(id, ratio);
        }
    }

    /// Feed an externally computed intersection ratio for one region.
    ///
    /// Returns `true` when this observation revealed the region. Unknown,
    /// revealed or cancelled subscriptions are ignored.
    pub fn report_ratio(&mut self, id: SubscriptionId, ratio: f64) -> bool {
        let Some(entry) = self.entries.get(&id) else {
            return false;
        };
        if entry.latch != Latch::Observing || !ratio.is_finite() {
            return false;
        }
        if entry.opts.is_satisfied_by(ratio) {
            self.fire(id, ratio);
            return true;
        }
        false
    }

    /// Drain queued notifications in the order they fired.
    pub fn take_reveals(&mut self) -> Vec<Reveal> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_revealed(&self, id: SubscriptionId) -> bool {
        self.entries
            .get(&id)
            .is_some_and(|e| e.latch == Latch::Revealed)
    }

    pub fn is_observing(&self, id: SubscriptionId) -> bool {
        self.entries
            .get(&id)
            .is_some_and(|e| e.latch == Latch::Observing)
    }

    /// Number of regions still waiting to reveal.
    pub fn observing_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| e.latch == Latch::Observing)
            .count()
    }

    fn fire(&mut self, id: SubscriptionId, ratio: f64) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.latch = Latch::Revealed;
            tracing::debug!(id = id.0, ratio, "region revealed");
            self.pending.push(Reveal { id, ratio });
        }
    }
}

/// Largest [`intersection_ratio`] `region` can reach against a root of this
/// size, wherever it scrolls.
pub fn max_visible_fraction(region: Rect, root: Rect) -> f64 {
    let region = region.abs();
    let fit = |len: f64, room: f64| {
        if len <= 0.0 {
            1.0
        } else {
            (room.max(0.0) / len).min(1.0)
        }
    };
    fit(region.width(), root.width()) * fit(region.height(), root.height())
}

/// Visible fraction of `region` inside `root`.
///
/// A zero-area region counts as fully visible when its origin lies inside the root.
pub fn intersection_ratio(region: Rect, root: Rect) -> f64 {
    let region = region.abs();

    let x0 = region.x0.max(root.x0);
    let y0 = region.y0.max(root.y0);
    let x1 = region.x1.min(root.x1);
    let y1 = region.y1.min(root.y1);
    if x1 < x0 || y1 < y0 {
        return 0.0;
    }

    let area = region.area();
    if area <= 0.0 {
        return if root.contains(region.origin()) { 1.0 } else { 0.0 };
    }
    ((x1 - x0) * (y1 - y0) / area).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/visibility/engine.rs"]
mod tests;
