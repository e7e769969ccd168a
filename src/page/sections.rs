use std::collections::BTreeSet;

use crate::{
    foundation::{
        color::{Palette, Rgba8},
        core::{Point, Rect, Vec2},
        error::{HeartlineError, HeartlineResult},
        math::{Rng64, UniformRange},
    },
    page::{
        config::{PageLayout, SectionKind, SectionLayout, SectionRules},
        lightbox::Lightbox,
        quiz::Quiz,
    },
    scroll::{RevealTimeline, ScrollState},
    visibility::{
        engine::{Reveal, VisibilityEngine},
        group::{RevealFlag, RevealGroup},
        transition::RevealPose,
    },
};

/// Maximum hero tilt offset, px, reached with the pointer at a viewport edge.
const PARALLAX_RANGE: f64 = 20.0;

/// Regions one section registers: its own box plus its items.
#[derive(Clone, Debug)]
pub struct SectionRegions {
    kind: SectionKind,
    rules: SectionRules,
    header: RevealFlag,
    items: RevealGroup,
}

/// What flipped for one section in a single routing pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct SectionReveals {
    pub header: bool,
    pub items: Vec<usize>,
}

impl SectionReveals {
    pub fn is_empty(&self) -> bool {
        !self.header && self.items.is_empty()
    }
}

impl SectionRegions {
    pub fn register(
        engine: &mut VisibilityEngine,
        layout: &SectionLayout,
        rules: &SectionRules,
    ) -> HeartlineResult<Self> {
        Ok(Self {
            kind: layout.kind,
            rules: *rules,
            header: RevealFlag::register(engine, layout.bounds, rules.header)?,
            items: RevealGroup::register(engine, layout.items.iter().copied(), rules.items)?,
        })
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn apply(&mut self, reveals: &[Reveal], now: f64) -> SectionReveals {
        SectionReveals {
            header: self.header.apply(reveals, now),
            items: self.items.apply(reveals, now),
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.header.is_revealed()
    }

    pub fn items(&self) -> &RevealGroup {
        &self.items
    }

    pub fn header_pose(&self, now: f64) -> RevealPose {
        self.rules.transition.sample(self.header.revealed_at(), now)
    }

    pub fn item_pose(&self, index: usize, now: f64) -> RevealPose {
        self.rules
            .item_transition(index)
            .sample(self.items.revealed_at(index), now)
    }

    /// Move every region to its place in `layout`; latches are kept.
    pub fn relayout(
        &self,
        engine: &mut VisibilityEngine,
        layout: &SectionLayout,
    ) -> HeartlineResult<()> {
        self.header.move_to(engine, layout.bounds);
        self.items.move_to(engine, &layout.items)
    }

    pub fn teardown(&self, engine: &mut VisibilityEngine) {
        self.header.teardown(engine);
        self.items.teardown(engine);
    }
}

fn check_index(what: &str, index: usize, len: usize) -> HeartlineResult<()> {
    if index >= len {
        return Err(HeartlineError::validation(format!(
            "{what} index {index} out of range (have {len})"
        )));
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct Hero {
    pub regions: SectionRegions,
    bounds: Rect,
    parallax: Vec2,
}

impl Hero {
    pub fn new(regions: SectionRegions, layout: &SectionLayout) -> Self {
        Self {
            regions,
            bounds: layout.bounds,
            parallax: Vec2::ZERO,
        }
    }

    /// Pointer position in viewport coordinates. The hero tilts toward the
    /// pointer relative to its own on-screen box, wherever the pointer is.
    pub fn pointer_move(&mut self, pointer: Point, scroll_top: f64) {
        let w = self.bounds.width();
        let h = self.bounds.height();
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let left = self.bounds.x0;
        let top = self.bounds.y0 - scroll_top;
        self.parallax = Vec2::new(
            (pointer.x - left - w / 2.0) / w * PARALLAX_RANGE,
            (pointer.y - top - h / 2.0) / h * PARALLAX_RANGE,
        );
    }

    pub fn parallax(&self) -> Vec2 {
        self.parallax
    }
}

#[derive(Clone, Debug)]
pub struct Story {
    pub regions: SectionRegions,
    bounds: Rect,
    timeline: RevealTimeline,
}

impl Story {
    pub fn new(regions: SectionRegions, layout: &SectionLayout) -> Self {
        Self {
            regions,
            bounds: layout.bounds,
            timeline: RevealTimeline::default(),
        }
    }

    pub fn on_scroll(&mut self, scroll: &ScrollState) {
        self.timeline = RevealTimeline::measure(self.bounds, scroll);
    }

    pub fn timeline(&self) -> RevealTimeline {
        self.timeline
    }
}

/// Flip cards; each card toggles between its front and its reason.
#[derive(Clone, Debug)]
pub struct Reasons {
    pub regions: SectionRegions,
    flipped: BTreeSet<usize>,
}

impl Reasons {
    pub fn new(regions: SectionRegions) -> Self {
        Self {
            regions,
            flipped: BTreeSet::new(),
        }
    }

    /// Returns whether the card now shows its back.
    pub fn toggle_card(&mut self, index: usize) -> HeartlineResult<bool> {
        check_index("reason card", index, self.regions.items().len())?;
        if self.flipped.remove(&index) {
            Ok(false)
        } else {
            self.flipped.insert(index);
            Ok(true)
        }
    }

    pub fn flipped(&self) -> Vec<usize> {
        self.flipped.iter().copied().collect()
    }
}

#[derive(Clone, Debug)]
pub struct Gallery {
    pub regions: SectionRegions,
    pub lightbox: Lightbox,
    hovered: Option<usize>,
}

impl Gallery {
    pub fn new(regions: SectionRegions) -> Self {
        let lightbox = Lightbox::new(regions.items().len());
        Self {
            regions,
            lightbox,
            hovered: None,
        }
    }

    pub fn hover(&mut self, index: Option<usize>) -> HeartlineResult<()> {
        if let Some(i) = index {
            check_index("gallery tile", i, self.lightbox.len())?;
        }
        self.hovered = index;
        Ok(())
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }
}

/// Love letter: opens a beat after it reveals, then types paragraph by paragraph.
#[derive(Clone, Debug)]
pub struct Letter {
    pub regions: SectionRegions,
    paragraphs: usize,
    open: bool,
    typed: BTreeSet<usize>,
}

impl Letter {
    pub fn new(regions: SectionRegions, paragraphs: usize) -> Self {
        Self {
            regions,
            paragraphs,
            open: false,
            typed: BTreeSet::new(),
        }
    }

    pub fn paragraphs(&self) -> usize {
        self.paragraphs
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn type_paragraph(&mut self, index: usize) {
        if index < self.paragraphs {
            self.typed.insert(index);
        }
    }

    pub fn typed(&self) -> Vec<usize> {
        self.typed.iter().copied().collect()
    }
}

/// Heart button with hidden messages, plus the quiz.
#[derive(Clone, Debug)]
pub struct Surprise {
    pub regions: SectionRegions,
    pub quiz: Quiz,
    anchor: Rect,
    messages: usize,
    message: Option<usize>,
    message_visible: bool,
    pulsing: bool,
    quiz_open: bool,
}

impl Surprise {
    pub fn new(regions: SectionRegions, layout: &SectionLayout, messages: usize, quiz: Quiz) -> Self {
        Self {
            regions,
            quiz,
            anchor: layout.anchor.unwrap_or(layout.bounds),
            messages,
            message: None,
            message_visible: false,
            pulsing: false,
            quiz_open: false,
        }
    }

    /// Centre of the heart button in document coordinates.
    pub fn anchor_center(&self) -> Point {
        self.anchor.center()
    }

    /// Pick a message uniformly and start pulsing. Returns the message index,
    /// or `None` when there are no messages to show.
    pub fn click_heart(&mut self, rng: &mut Rng64) -> Option<usize> {
        self.pulsing = true;
        if self.messages == 0 {
            return None;
        }
        let index = rng.next_index(self.messages);
        self.message = Some(index);
        self.message_visible = true;
        Some(index)
    }

    pub fn end_pulse(&mut self) {
        self.pulsing = false;
    }

    pub fn dismiss_message(&mut self) {
        self.message_visible = false;
    }

    pub fn open_quiz(&mut self) {
        self.quiz_open = true;
    }

    pub fn is_pulsing(&self) -> bool {
        self.pulsing
    }

    pub fn message(&self) -> Option<usize> {
        self.message.filter(|_| self.message_visible)
    }

    pub fn is_quiz_open(&self) -> bool {
        self.quiz_open
    }
}

#[derive(Clone, Debug)]
pub struct Promises {
    pub regions: SectionRegions,
    hovered: Option<usize>,
}

impl Promises {
    pub fn new(regions: SectionRegions) -> Self {
        Self {
            regions,
            hovered: None,
        }
    }

    pub fn hover(&mut self, index: Option<usize>) -> HeartlineResult<()> {
        if let Some(i) = index {
            check_index("promise", i, self.regions.items().len())?;
        }
        self.hovered = index;
        Ok(())
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }
}

/// Ranges for the footer's CSS-style rising hearts.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RisingHeartsConfig {
    pub count: usize,
    /// Horizontal start, percent of the footer width.
    pub left_pct: UniformRange,
    pub delay_s: UniformRange,
    pub duration_s: UniformRange,
    pub size: UniformRange,
    pub palette: Palette,
}

impl Default for RisingHeartsConfig {
    fn default() -> Self {
        Self {
            count: 20,
            left_pct: UniformRange::new(0.0, 100.0),
            delay_s: UniformRange::new(0.0, 5.0),
            duration_s: UniformRange::new(8.0, 13.0),
            size: UniformRange::new(10.0, 30.0),
            palette: Palette::burst(),
        }
    }
}

impl RisingHeartsConfig {
    pub fn validate(&self) -> HeartlineResult<()> {
        self.left_pct.validate("footer_hearts.left_pct")?;
        self.delay_s.validate("footer_hearts.delay_s")?;
        self.duration_s.validate("footer_hearts.duration_s")?;
        self.size.validate("footer_hearts.size")?;
        if self.duration_s.min <= 0.0 {
            return Err(HeartlineError::validation(
                "footer_hearts.duration_s must be > 0",
            ));
        }
        self.palette.validate("footer_hearts")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct RisingHeart {
    pub left_pct: f64,
    pub delay_s: f64,
    pub duration_s: f64,
    pub size: f64,
    pub color: Rgba8,
}

#[derive(Clone, Debug)]
pub struct Footer {
    pub regions: SectionRegions,
    rising: Vec<RisingHeart>,
}

impl Footer {
    pub fn new(regions: SectionRegions) -> Self {
        Self {
            regions,
            rising: Vec::new(),
        }
    }

    /// Generate the rising hearts once; later calls keep the first set.
    pub fn spawn_rising(&mut self, config: &RisingHeartsConfig, rng: &mut Rng64) {
        if !self.rising.is_empty() {
            return;
        }
        self.rising = (0..config.count)
            .map(|_| RisingHeart {
                left_pct: config.left_pct.sample(rng),
                delay_s: config.delay_s.sample(rng),
                duration_s: config.duration_s.sample(rng),
                size: config.size.sample(rng),
                color: config.palette.pick(rng),
            })
            .collect();
    }

    pub fn rising(&self) -> &[RisingHeart] {
        &self.rising
    }
}

/// Every section of the page, each owning its own state.
#[derive(Clone, Debug)]
pub struct Sections {
    pub hero: Hero,
    pub story: Story,
    pub reasons: Reasons,
    pub gallery: Gallery,
    pub letter: Letter,
    pub surprise: Surprise,
    pub promises: Promises,
    pub footer: Footer,
}

impl Sections {
    pub fn regions(&self) -> [&SectionRegions; 8] {
        [
            &self.hero.regions,
            &self.story.regions,
            &self.reasons.regions,
            &self.gallery.regions,
            &self.letter.regions,
            &self.surprise.regions,
            &self.promises.regions,
            &self.footer.regions,
        ]
    }

    pub fn regions_mut(&mut self) -> [&mut SectionRegions; 8] {
        [
            &mut self.hero.regions,
            &mut self.story.regions,
            &mut self.reasons.regions,
            &mut self.gallery.regions,
            &mut self.letter.regions,
            &mut self.surprise.regions,
            &mut self.promises.regions,
            &mut self.footer.regions,
        ]
    }

    /// Follow a new layout (after a resize). Reveal state is untouched; the
    /// caller re-observes the viewport afterwards.
    pub fn relayout(
        &mut self,
        engine: &mut VisibilityEngine,
        layout: &PageLayout,
    ) -> HeartlineResult<()> {
        for regions in self.regions_mut() {
            regions.relayout(engine, layout.require(regions.kind())?)?;
        }
        self.hero.bounds = layout.require(SectionKind::Hero)?.bounds;
        self.story.bounds = layout.require(SectionKind::Story)?.bounds;
        let surprise = layout.require(SectionKind::Surprise)?;
        self.surprise.anchor = surprise.anchor.unwrap_or(surprise.bounds);
        Ok(())
    }

    pub fn teardown(&self, engine: &mut VisibilityEngine) {
        for r in self.regions() {
            r.teardown(engine);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/sections.rs"]
mod tests;
