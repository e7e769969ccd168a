//! Scroll reporting: page-level progress bar and per-section timeline fill.

use crate::foundation::{
    core::{Rect, Viewport},
    math::clamp01,
};

/// Raw scroll position reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollState {
    pub scroll_top: f64,
    pub document_height: f64,
    pub viewport: Viewport,
}

impl ScrollState {
    pub fn new(scroll_top: f64, document_height: f64, viewport: Viewport) -> Self {
        Self {
            scroll_top,
            document_height,
            viewport,
        }
    }

    /// Largest meaningful scroll offset (0 when the document fits the viewport).
    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport.height_f64()).max(0.0)
    }

    /// Clamp an offset into the scrollable range.
    pub fn clamp_scroll(&self, scroll_top: f64) -> f64 {
        if scroll_top.is_nan() {
            return 0.0;
        }
        scroll_top.clamp(0.0, self.max_scroll())
    }

    /// Page progress bar fill: `scrollTop / (documentHeight - viewportHeight)`
    /// clamped to `[0, 1]`, and 0 when the document is not taller than the viewport.
    pub fn page_progress(&self) -> f64 {
        let max = self.document_height - self.viewport.height_f64();
        if max <= 0.0 {
            return 0.0;
        }
        clamp01(self.scroll_top / max)
    }

    /// The viewport root box in document coordinates.
    pub fn root(&self) -> Rect {
        self.viewport.at_scroll(self.scroll_top)
    }
}

/// Continuous fill of a section's timeline, derived on every scroll.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct RevealTimeline {
    pub progress: f64,
}

impl RevealTimeline {
    /// Progress of `section` (document coordinates): how far the viewport's
    /// vertical midpoint has travelled through it.
    pub fn measure(section: Rect, scroll: &ScrollState) -> Self {
        let height = section.height();
        if height <= 0.0 {
            return Self::default();
        }
        let top_in_viewport = section.y0 - scroll.scroll_top;
        let scrolled = (-top_in_viewport + scroll.viewport.height_f64() / 2.0).max(0.0);
        Self {
            progress: clamp01(scrolled / height),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/scroll.rs"]
mod tests;
