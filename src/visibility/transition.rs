use crate::{
    animation::ease::Ease,
    foundation::{core::Vec2, math::clamp01},
};

/// Entrance animation applied once a region's latch flips.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RevealStyle {
    Fade,
    FadeUp { distance: f64 },
    SlideLeft,
    SlideRight,
    ScaleIn,
    BounceIn,
    FlipIn,
}

impl Default for RevealStyle {
    fn default() -> Self {
        Self::FadeUp { distance: 32.0 }
    }
}

/// Visual state of a region at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct RevealPose {
    pub opacity: f64,
    pub offset: Vec2,
    pub scale: f64,
    pub rotate_y_deg: f64,
}

impl RevealPose {
    pub const SHOWN: Self = Self {
        opacity: 1.0,
        offset: Vec2::ZERO,
        scale: 1.0,
        rotate_y_deg: 0.0,
    };
}

const SLIDE_PX: f64 = 100.0;
const SLIDE_TILT_DEG: f64 = 45.0;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RevealTransition {
    pub style: RevealStyle,
    #[serde(default = "default_duration_s")]
    pub duration_s: f64,
    #[serde(default)]
    pub delay_s: f64,
    #[serde(default)]
    pub ease: Ease,
}

fn default_duration_s() -> f64 {
    0.7
}

impl Default for RevealTransition {
    fn default() -> Self {
        Self {
            style: RevealStyle::default(),
            duration_s: default_duration_s(),
            delay_s: 0.0,
            ease: Ease::OutCubic,
        }
    }
}

impl RevealTransition {
    pub fn new(style: RevealStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    pub fn delayed(mut self, delay_s: f64) -> Self {
        self.delay_s = delay_s;
        self
    }

    /// Per-item stagger: item `index` starts `index * step_s` after the first.
    pub fn staggered(self, index: usize, step_s: f64) -> Self {
        let base = self.delay_s;
        self.delayed(base + index as f64 * step_s)
    }

    /// Linear progress in `[0, 1]`; 0 while hidden or still in the delay.
    pub fn progress(&self, revealed_at: Option<f64>, now: f64) -> f64 {
        let Some(t0) = revealed_at else {
            return 0.0;
        };
        let elapsed = now - t0 - self.delay_s;
        if elapsed <= 0.0 {
            return 0.0;
        }
        if self.duration_s <= 0.0 {
            return 1.0;
        }
        clamp01(elapsed / self.duration_s)
    }

    pub fn sample(&self, revealed_at: Option<f64>, now: f64) -> RevealPose {
        let t = self.progress(revealed_at, now);
        // Bounce-in carries its own overshoot curve.
        let e = match self.style {
            RevealStyle::BounceIn => Ease::OutBack.apply(t),
            _ => self.ease.apply(t),
        };
        let opacity = clamp01(e);
        let rest = 1.0 - e;

        match self.style {
            RevealStyle::Fade => RevealPose {
                opacity,
                ..RevealPose::SHOWN
            },
            RevealStyle::FadeUp { distance } => RevealPose {
                opacity,
                offset: Vec2::new(0.0, distance * rest),
                ..RevealPose::SHOWN
            },
            RevealStyle::SlideLeft => RevealPose {
                opacity,
                offset: Vec2::new(-SLIDE_PX * rest, 0.0),
                rotate_y_deg: SLIDE_TILT_DEG * rest,
                ..RevealPose::SHOWN
            },
            RevealStyle::SlideRight => RevealPose {
                opacity,
                offset: Vec2::new(SLIDE_PX * rest, 0.0),
                rotate_y_deg: -SLIDE_TILT_DEG * rest,
                ..RevealPose::SHOWN
            },
            RevealStyle::ScaleIn => RevealPose {
                opacity,
                scale: 0.8 + 0.2 * e,
                ..RevealPose::SHOWN
            },
            RevealStyle::BounceIn => RevealPose {
                opacity: clamp01(t * 2.0),
                scale: 0.3 + 0.7 * e,
                ..RevealPose::SHOWN
            },
            RevealStyle::FlipIn => RevealPose {
                opacity,
                rotate_y_deg: -90.0 * rest,
                ..RevealPose::SHOWN
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/visibility/transition.rs"]
mod tests;
