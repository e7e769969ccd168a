use std::path::Path;

use anyhow::Context as _;

use crate::{
    foundation::{
        core::{Fps, Rect, Size, Viewport},
        error::{HeartlineError, HeartlineResult},
    },
    page::{audio::AudioConfig, quiz::QuizQuestion, sections::RisingHeartsConfig},
    particles::engine::EngineConfig,
    render::RenderSettings,
    visibility::{
        engine::{IntersectionSupport, ObserveOpts, RootMargin},
        transition::{RevealStyle, RevealTransition},
    },
};

/// The page's sections, top to bottom.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Hero,
    Story,
    Reasons,
    Gallery,
    Letter,
    Surprise,
    Promises,
    Footer,
}

impl SectionKind {
    pub const ALL: [Self; 8] = [
        Self::Hero,
        Self::Story,
        Self::Reasons,
        Self::Gallery,
        Self::Letter,
        Self::Surprise,
        Self::Promises,
        Self::Footer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Story => "story",
            Self::Reasons => "reasons",
            Self::Gallery => "gallery",
            Self::Letter => "letter",
            Self::Surprise => "surprise",
            Self::Promises => "promises",
            Self::Footer => "footer",
        }
    }
}

/// Document-space geometry of one section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SectionLayout {
    pub kind: SectionKind,
    pub bounds: Rect,
    /// Item regions (timeline entries, cards, tiles) in display order.
    #[serde(default)]
    pub items: Vec<Rect>,
    /// Interactive focal element, e.g. the surprise heart button.
    #[serde(default)]
    pub anchor: Option<Rect>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageLayout {
    pub document_height: f64,
    pub sections: Vec<SectionLayout>,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::for_viewport(Viewport::default())
    }
}

/// Horizontal room kept free on each side of a grid.
const SIDE_PAD: f64 = 16.0;
/// Space kept below a section's last row of items.
const BOTTOM_PAD: f64 = 56.0;

/// Centred grid of at most `cols` columns. Narrow widths shrink the cells to
/// fit and drop columns, adding rows instead.
fn grid(width: f64, top: f64, cols: usize, count: usize, cell: Size, gap: f64) -> Vec<Rect> {
    let room = (width - 2.0 * SIDE_PAD).max(1.0);
    let cell_w = cell.width.min(room);
    let fit = ((room + gap) / (cell_w + gap)).floor().max(1.0) as usize;
    let cols = cols.clamp(1, fit);

    let cols_f = cols as f64;
    let row_w = cols_f * cell_w + (cols_f - 1.0) * gap;
    let left = ((width - row_w) / 2.0).max(0.0);
    (0..count)
        .map(|i| {
            let x = left + (i % cols) as f64 * (cell_w + gap);
            let y = top + (i / cols) as f64 * (cell.height + gap);
            Rect::new(x, y, x + cell_w, y + cell.height)
        })
        .collect()
}

impl PageLayout {
    /// The stock page: a full-screen hero followed by the content sections.
    ///
    /// Sections keep their nominal height unless their items need more room.
    pub fn standard(width: f64, viewport_height: f64) -> Self {
        let mut sections = Vec::with_capacity(SectionKind::ALL.len());
        let mut top = 0.0;
        for kind in SectionKind::ALL {
            let (nominal, items, anchor) = match kind {
                SectionKind::Hero => (viewport_height, Vec::new(), None),
                SectionKind::Story => (
                    1600.0,
                    grid(width, top + 320.0, 1, 4, Size::new(560.0, 260.0), 40.0),
                    None,
                ),
                SectionKind::Reasons => (
                    1500.0,
                    grid(width, top + 300.0, 3, 9, Size::new(320.0, 360.0), 32.0),
                    None,
                ),
                SectionKind::Gallery => (
                    1500.0,
                    grid(width, top + 300.0, 3, 9, Size::new(320.0, 320.0), 24.0),
                    None,
                ),
                SectionKind::Letter => (1400.0, Vec::new(), None),
                SectionKind::Surprise => {
                    let button =
                        Rect::from_center_size((width / 2.0, top + 360.0), (160.0, 160.0));
                    (1100.0, Vec::new(), Some(button))
                }
                SectionKind::Promises => (
                    1000.0,
                    grid(width, top + 300.0, 2, 4, Size::new(480.0, 280.0), 32.0),
                    None,
                ),
                SectionKind::Footer => (600.0, Vec::new(), None),
            };
            let content_bottom = items.iter().map(|r| r.y1).fold(top, f64::max);
            let height = f64::max(nominal, content_bottom - top + BOTTOM_PAD);
            sections.push(SectionLayout {
                kind,
                bounds: Rect::new(0.0, top, width, top + height),
                items,
                anchor,
            });
            top += height;
        }

        Self {
            document_height: top,
            sections,
        }
    }

    pub fn for_viewport(viewport: Viewport) -> Self {
        Self::standard(viewport.width_f64(), viewport.height_f64())
    }

    pub fn section(&self, kind: SectionKind) -> Option<&SectionLayout> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Like [`section`](Self::section) for a layout that already passed validation.
    pub(crate) fn require(&self, kind: SectionKind) -> HeartlineResult<&SectionLayout> {
        self.section(kind).ok_or_else(|| {
            HeartlineError::validation(format!("layout has no {} section", kind.name()))
        })
    }

    pub fn validate(&self) -> HeartlineResult<()> {
        if !self.document_height.is_finite() || self.document_height <= 0.0 {
            return Err(HeartlineError::validation(
                "layout.document_height must be finite and > 0",
            ));
        }
        for kind in SectionKind::ALL {
            let n = self.sections.iter().filter(|s| s.kind == kind).count();
            if n != 1 {
                return Err(HeartlineError::validation(format!(
                    "layout must contain exactly one {} section (found {n})",
                    kind.name()
                )));
            }
        }
        for s in &self.sections {
            let all = std::iter::once(&s.bounds)
                .chain(s.items.iter())
                .chain(s.anchor.iter());
            for r in all {
                if ![r.x0, r.y0, r.x1, r.y1].iter().all(|v| v.is_finite()) {
                    return Err(HeartlineError::validation(format!(
                        "layout.{} contains a non-finite rect",
                        s.kind.name()
                    )));
                }
            }
            if s.bounds.height() <= 0.0 {
                return Err(HeartlineError::validation(format!(
                    "layout.{} must have positive height",
                    s.kind.name()
                )));
            }
        }
        Ok(())
    }
}

/// How one section's regions trigger and animate.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SectionRules {
    /// Applied to the section box (title and body reveal).
    pub header: ObserveOpts,
    /// Applied to each item region.
    #[serde(default)]
    pub items: ObserveOpts,
    #[serde(default)]
    pub transition: RevealTransition,
    /// Extra delay per item index.
    #[serde(default)]
    pub stagger_s: f64,
}

impl SectionRules {
    fn new(header: f64, items: ObserveOpts, style: RevealStyle) -> Self {
        Self {
            header: ObserveOpts::threshold(header),
            items,
            transition: RevealTransition::new(style),
            stagger_s: 0.1,
        }
    }

    pub fn item_transition(&self, index: usize) -> RevealTransition {
        self.transition.staggered(index, self.stagger_s)
    }

    fn validate(&self) -> HeartlineResult<()> {
        self.header.validate()?;
        self.items.validate()?;
        if !self.stagger_s.is_finite() || self.stagger_s < 0.0 {
            return Err(HeartlineError::validation(
                "reveal stagger_s must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RevealRules {
    pub hero: SectionRules,
    pub story: SectionRules,
    pub reasons: SectionRules,
    pub gallery: SectionRules,
    pub letter: SectionRules,
    pub surprise: SectionRules,
    pub promises: SectionRules,
    pub footer: SectionRules,
}

impl Default for RevealRules {
    fn default() -> Self {
        let item = |threshold, bottom| ObserveOpts::threshold(threshold).with_margin(RootMargin::bottom(bottom));
        let fade_up = RevealStyle::default();
        Self {
            hero: SectionRules::new(0.1, ObserveOpts::default(), fade_up),
            story: SectionRules::new(0.3, item(0.2, -50.0), RevealStyle::SlideLeft),
            reasons: SectionRules::new(0.3, item(0.2, -30.0), RevealStyle::FlipIn),
            gallery: SectionRules::new(0.2, item(0.1, -50.0), RevealStyle::ScaleIn),
            letter: SectionRules::new(0.2, ObserveOpts::default(), fade_up),
            surprise: SectionRules::new(0.2, ObserveOpts::default(), RevealStyle::BounceIn),
            promises: SectionRules::new(0.2, ObserveOpts::threshold(0.3), fade_up),
            footer: SectionRules::new(0.3, ObserveOpts::default(), RevealStyle::Fade),
        }
    }
}

impl RevealRules {
    pub fn for_section(&self, kind: SectionKind) -> &SectionRules {
        match kind {
            SectionKind::Hero => &self.hero,
            SectionKind::Story => &self.story,
            SectionKind::Reasons => &self.reasons,
            SectionKind::Gallery => &self.gallery,
            SectionKind::Letter => &self.letter,
            SectionKind::Surprise => &self.surprise,
            SectionKind::Promises => &self.promises,
            SectionKind::Footer => &self.footer,
        }
    }

    pub fn validate(&self) -> HeartlineResult<()> {
        for kind in SectionKind::ALL {
            self.for_section(kind).validate()?;
        }
        Ok(())
    }
}

/// Text the interactive sections pick from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PageContent {
    /// Hidden messages revealed by the surprise heart.
    pub messages: Vec<String>,
    pub quiz: Vec<QuizQuestion>,
    pub letter_paragraphs: usize,
}

impl Default for PageContent {
    fn default() -> Self {
        Self {
            messages: [
                "I'm always with you, in every heartbeat",
                "Close your eyes and feel my love surrounding you",
                "You're the first thing I think of every morning",
                "Distance means so little when someone means so much",
                "You are my favorite notification",
                "My heart skips a beat every time I see you",
            ]
            .iter()
            .map(|s| (*s).to_owned())
            .collect(),
            quiz: crate::page::quiz::default_questions(),
            letter_paragraphs: 6,
        }
    }
}

/// Delays of the page's one-shot timers, in seconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Timing {
    pub load_delay_s: f64,
    pub letter_open_s: f64,
    pub paragraph_base_s: f64,
    pub paragraph_step_s: f64,
    pub heart_pulse_s: f64,
    pub quiz_advance_s: f64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            load_delay_s: 0.1,
            letter_open_s: 0.5,
            paragraph_base_s: 0.5,
            paragraph_step_s: 0.4,
            heart_pulse_s: 1.0,
            quiz_advance_s: 1.0,
        }
    }
}

impl Timing {
    pub fn validate(&self) -> HeartlineResult<()> {
        let all = [
            ("load_delay_s", self.load_delay_s),
            ("letter_open_s", self.letter_open_s),
            ("paragraph_base_s", self.paragraph_base_s),
            ("paragraph_step_s", self.paragraph_step_s),
            ("heart_pulse_s", self.heart_pulse_s),
            ("quiz_advance_s", self.quiz_advance_s),
        ];
        for (name, v) in all {
            if !v.is_finite() || v < 0.0 {
                return Err(HeartlineError::validation(format!(
                    "timing.{name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

/// Complete description of one greeting page. Every field has a default, so
/// `{}` is a valid configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Seed for every random draw (particles, messages, rising hearts).
    pub seed: u64,
    pub viewport: Viewport,
    pub fps: Fps,
    pub intersection: IntersectionSupport,
    /// Fixed section geometry. When omitted the stock layout is built for the
    /// viewport and rebuilt on every resize.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<PageLayout>,
    pub reveal: RevealRules,
    pub content: PageContent,
    pub timing: Timing,
    pub particles: EngineConfig,
    pub footer_hearts: RisingHeartsConfig,
    pub render: RenderSettings,
    pub audio: AudioConfig,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            seed: 0x0214_1402,
            viewport: Viewport::default(),
            fps: Fps::default(),
            intersection: IntersectionSupport::default(),
            layout: None,
            reveal: RevealRules::default(),
            content: PageContent::default(),
            timing: Timing::default(),
            particles: EngineConfig::default(),
            footer_hearts: RisingHeartsConfig::default(),
            render: RenderSettings::default(),
            audio: AudioConfig::default(),
        }
    }
}

impl PageConfig {
    pub fn from_json(s: &str) -> HeartlineResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: &Path) -> HeartlineResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read page config '{}'", path.display()))?;
        Self::from_json(&text)
    }

    /// The configured layout, or the stock layout for the configured viewport.
    pub fn resolved_layout(&self) -> PageLayout {
        self.layout
            .clone()
            .unwrap_or_else(|| PageLayout::for_viewport(self.viewport))
    }

    pub fn to_json_pretty(&self) -> HeartlineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> HeartlineResult<()> {
        if self.fps.den == 0 || self.fps.num == 0 {
            return Err(HeartlineError::validation("fps num and den must be > 0"));
        }
        if let Some(layout) = &self.layout {
            layout.validate()?;
        }
        self.reveal.validate()?;
        self.timing.validate()?;
        self.particles.validate()?;
        self.footer_hearts.validate()?;
        self.render.validate()?;
        self.audio.validate()?;
        for (i, q) in self.content.quiz.iter().enumerate() {
            q.validate(i)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/config.rs"]
mod tests;
