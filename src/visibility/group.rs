use crate::{
    foundation::{
        core::Rect,
        error::{HeartlineError, HeartlineResult},
    },
    visibility::engine::{ObserveOpts, Reveal, SubscriptionId, VisibilityEngine},
};

/// A single observed region owned by a section (its header or body).
#[derive(Clone, Debug)]
pub struct RevealFlag {
    id: SubscriptionId,
    revealed_at: Option<f64>,
}

impl RevealFlag {
    pub fn register(
        engine: &mut VisibilityEngine,
        region: Rect,
        opts: ObserveOpts,
    ) -> HeartlineResult<Self> {
        Ok(Self {
            id: engine.register(region, opts)?,
            revealed_at: None,
        })
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Latch the flag if `reveals` contains this region. Returns `true` only on
    /// the call that flips it.
    pub fn apply(&mut self, reveals: &[Reveal], now: f64) -> bool {
        if self.revealed_at.is_some() || !reveals.iter().any(|r| r.id == self.id) {
            return false;
        }
        self.revealed_at = Some(now);
        true
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed_at.is_some()
    }

    pub fn revealed_at(&self) -> Option<f64> {
        self.revealed_at
    }

    /// Follow a relayout; a revealed flag stays revealed.
    pub fn move_to(&self, engine: &mut VisibilityEngine, region: Rect) {
        engine.update_region(self.id, region);
    }

    pub fn teardown(&self, engine: &mut VisibilityEngine) {
        engine.unregister(self.id);
    }
}

/// Ordered collection of item regions (cards, timeline entries, gallery tiles).
///
/// Index order is display order. Each item reveals independently.
#[derive(Clone, Debug, Default)]
pub struct RevealGroup {
    ids: Vec<SubscriptionId>,
    revealed_at: Vec<Option<f64>>,
}

impl RevealGroup {
    pub fn register(
        engine: &mut VisibilityEngine,
        regions: impl IntoIterator<Item = Rect>,
        opts: ObserveOpts,
    ) -> HeartlineResult<Self> {
        let ids = regions
            .into_iter()
            .map(|r| engine.register(r, opts))
            .collect::<HeartlineResult<Vec<_>>>()?;
        let revealed_at = vec![None; ids.len()];
        Ok(Self { ids, revealed_at })
    }

    /// Latch every item named in `reveals`; returns the indices that flipped now,
    /// in display order.
    pub fn apply(&mut self, reveals: &[Reveal], now: f64) -> Vec<usize> {
        let mut flipped = Vec::new();
        for (index, id) in self.ids.iter().enumerate() {
            if self.revealed_at[index].is_none() && reveals.iter().any(|r| r.id == *id) {
                self.revealed_at[index] = Some(now);
                flipped.push(index);
            }
        }
        flipped
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed_at.get(index).is_some_and(Option::is_some)
    }

    pub fn revealed_at(&self, index: usize) -> Option<f64> {
        self.revealed_at.get(index).copied().flatten()
    }

    pub fn revealed_indices(&self) -> Vec<usize> {
        (0..self.len()).filter(|i| self.is_revealed(*i)).collect()
    }

    pub fn all_revealed(&self) -> bool {
        self.revealed_at.iter().all(Option::is_some)
    }

    /// Follow a relayout. The item count is fixed at registration.
    pub fn move_to(&self, engine: &mut VisibilityEngine, regions: &[Rect]) -> HeartlineResult<()> {
        if regions.len() != self.ids.len() {
            return Err(HeartlineError::validation(format!(
                "relayout has {} items, group has {}",
                regions.len(),
                self.ids.len()
            )));
        }
        for (id, region) in self.ids.iter().zip(regions) {
            engine.update_region(*id, *region);
        }
        Ok(())
    }

    pub fn teardown(&self, engine: &mut VisibilityEngine) {
        for id in &self.ids {
            engine.unregister(*id);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/visibility/group.rs"]
mod tests;
