use crate::{
    foundation::{
        core::{Point, Vec2, Viewport},
        error::{HeartlineError, HeartlineResult},
        math::Rng64,
    },
    page::{
        audio::{AudioSink, AudioState, AudioToggle, HeadlessSink, ToggleOutcome},
        config::{PageConfig, PageLayout, SectionKind},
        lightbox::Key,
        quiz::{AnswerOutcome, Quiz},
        sections::{
            Footer, Gallery, Hero, Letter, Promises, Reasons, RisingHeart, SectionRegions,
            Sections, Story, Surprise,
        },
        timers::{TimerKind, TimerQueue},
    },
    particles::engine::{FrameSnapshot, LoopHandle, ParticleEngine},
    scroll::ScrollState,
    visibility::engine::VisibilityEngine,
};

const MESSAGE_STREAM: u64 = 0x3E55;
const FOOTER_STREAM: u64 = 0xF007;

/// Longest single `wait`, in display frames.
const MAX_WAIT_FRAMES: u64 = 360_000;

/// Host input, in the order the host observed it.
///
/// Pointer coordinates are viewport pixels; scroll offsets are document pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    Scroll { top: f64 },
    Resize { width: u32, height: u32 },
    /// One display refresh.
    Frame,
    /// Let time pass, refreshing the display at the configured rate.
    Wait { secs: f64 },
    ScrollToSection { section: SectionKind },
    PointerMove { x: f64, y: f64 },
    ClickHeart,
    DismissMessage,
    OpenQuiz,
    AnswerQuiz { option: usize },
    ResetQuiz,
    ToggleCard { index: usize },
    OpenImage { index: usize },
    CloseImage,
    NextImage,
    PreviousImage,
    Key { key: Key },
    HoverImage { index: Option<usize> },
    HoverPromise { index: Option<usize> },
    TogglePlay,
    ToggleMute,
    Teardown,
}

/// A region that revealed, named by section and item index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RevealRecord {
    pub section: SectionKind,
    /// `None` for the section box itself.
    pub item: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TraceEntry {
    /// Session clock after the event was handled.
    pub time: f64,
    /// `None` for the mount step.
    pub event: Option<PageEvent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reveals: Vec<RevealRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub timers: Vec<TimerKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Everything a session did, in order.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct SessionTrace {
    pub entries: Vec<TraceEntry>,
}

impl SessionTrace {
    pub fn reveals(&self) -> impl Iterator<Item = &RevealRecord> {
        self.entries.iter().flat_map(|e| e.reveals.iter())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SectionView {
    pub section: SectionKind,
    pub revealed: bool,
    pub opacity: f64,
    pub revealed_items: Vec<usize>,
    pub item_count: usize,
    /// Per-item opacity, staggered by index after each item's reveal.
    pub item_opacity: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct GalleryView {
    pub selected: Option<usize>,
    pub hovered: Option<usize>,
    pub scroll_locked: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LetterView {
    pub open: bool,
    pub typed: Vec<usize>,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct SurpriseView {
    pub message: Option<String>,
    pub pulsing: bool,
    pub quiz_open: bool,
    pub quiz: Quiz,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AudioView {
    pub state: AudioState,
    pub hint_visible: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ParticleView {
    pub running: bool,
    pub ambient: usize,
    pub burst: usize,
    pub frames: u64,
}

/// Point-in-time view of the whole page.
#[derive(Clone, Debug, serde::Serialize)]
pub struct PageSnapshot {
    pub time: f64,
    pub loaded: bool,
    pub torn_down: bool,
    pub viewport: Viewport,
    pub scroll_top: f64,
    pub page_progress: f64,
    pub story_progress: f64,
    pub hero_parallax: Vec2,
    pub sections: Vec<SectionView>,
    pub flipped_cards: Vec<usize>,
    pub gallery: GalleryView,
    pub letter: LetterView,
    pub surprise: SurpriseView,
    pub hovered_promise: Option<usize>,
    pub rising_hearts: Vec<RisingHeart>,
    pub audio: AudioView,
    pub particles: ParticleView,
}

/// One mounted greeting page, driven by host events.
///
/// Owns the visibility engine, the particle loop, the timers and every
/// section. [`dispatch`](Self::dispatch) is the only way state changes.
#[derive(Debug)]
pub struct PageSession {
    config: PageConfig,
    layout: PageLayout,
    now: f64,
    scroll: ScrollState,
    visibility: VisibilityEngine,
    particles: ParticleEngine,
    loop_handle: Option<LoopHandle>,
    timers: TimerQueue,
    audio: AudioToggle,
    message_rng: Rng64,
    footer_rng: Rng64,
    sections: Sections,
    loaded: bool,
    torn_down: bool,
    last_frame: Option<FrameSnapshot>,
    trace: SessionTrace,
}

/// Collects what one step did, for the trace.
#[derive(Default)]
struct Step {
    reveals: Vec<RevealRecord>,
    timers: Vec<TimerKind>,
    note: Option<String>,
}

impl PageSession {
    pub fn new(config: PageConfig) -> HeartlineResult<Self> {
        let sink = HeadlessSink::new(config.audio.autoplay_allowed);
        Self::with_audio_sink(config, Box::new(sink))
    }

    /// Mount the page: register every section, start the particle loop and
    /// schedule the fade-in. Regions already on screen reveal here.
    #[tracing::instrument(level = "debug", skip_all, fields(seed = config.seed))]
    pub fn with_audio_sink(config: PageConfig, sink: Box<dyn AudioSink>) -> HeartlineResult<Self> {
        config.validate()?;

        let layout = config.resolved_layout();
        let scroll = ScrollState::new(0.0, layout.document_height, config.viewport);
        let mut visibility = VisibilityEngine::new(config.intersection, scroll.root());

        let sections = mount_sections(&config, &layout, &mut visibility)?;

        let mut rng = Rng64::new(config.seed);
        let mut particles = ParticleEngine::new(config.particles.clone(), rng.next_u64());
        let loop_handle = particles.start(config.viewport);

        let mut timers = TimerQueue::new();
        timers.schedule(0.0, config.timing.load_delay_s, TimerKind::PageLoaded);

        let audio = AudioToggle::new(sink, &config.audio);

        let mut session = Self {
            now: 0.0,
            scroll,
            visibility,
            particles,
            loop_handle: Some(loop_handle),
            timers,
            audio,
            message_rng: rng.fork(MESSAGE_STREAM),
            footer_rng: rng.fork(FOOTER_STREAM),
            sections,
            loaded: false,
            torn_down: false,
            last_frame: None,
            trace: SessionTrace::default(),
            config,
            layout,
        };
        session.sections.story.on_scroll(&session.scroll);

        let mut step = Step::default();
        session.route_reveals(&mut step);
        session.record(None, step);
        tracing::debug!(
            observing = session.visibility.observing_count(),
            "page mounted"
        );
        Ok(session)
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Section geometry in use; follows the viewport unless the config fixes it.
    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    pub fn trace(&self) -> &SessionTrace {
        &self.trace
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Particles drawn by the most recent display refresh.
    pub fn last_frame(&self) -> Option<&FrameSnapshot> {
        self.last_frame.as_ref()
    }

    /// Handle one host event.
    ///
    /// Bad input (an out-of-range index, a negative wait) is a validation
    /// error and leaves the session unchanged; so is any event after teardown.
    pub fn dispatch(&mut self, event: PageEvent) -> HeartlineResult<()> {
        if self.torn_down {
            return Err(HeartlineError::validation(
                "page session already torn down",
            ));
        }
        let mut step = Step::default();
        self.handle(&event, &mut step)?;
        self.route_reveals(&mut step);
        self.record(Some(event), step);
        Ok(())
    }

    pub fn dispatch_all(
        &mut self,
        events: impl IntoIterator<Item = PageEvent>,
    ) -> HeartlineResult<()> {
        for event in events {
            self.dispatch(event)?;
        }
        Ok(())
    }

    /// Unregister every region, stop the frame loop and silence the audio.
    /// Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.sections.teardown(&mut self.visibility);
        if let Some(handle) = self.loop_handle.take() {
            self.particles.cancel(handle);
        }
        self.particles.stop();
        self.timers.clear();
        self.audio.teardown();
        self.sections.gallery.lightbox.close();
        self.torn_down = true;
        tracing::debug!("page torn down");
    }

    fn handle(&mut self, event: &PageEvent, step: &mut Step) -> HeartlineResult<()> {
        match *event {
            PageEvent::Scroll { top } => self.scroll_to(top, step),
            PageEvent::Resize { width, height } => {
                let viewport = Viewport::new(width, height);
                if self.config.layout.is_none() {
                    let layout = PageLayout::for_viewport(viewport);
                    self.sections.relayout(&mut self.visibility, &layout)?;
                    self.scroll.document_height = layout.document_height;
                    self.layout = layout;
                }
                self.scroll.viewport = viewport;
                let top = self.scroll.clamp_scroll(self.scroll.scroll_top);
                self.particles.scroll_bursts(self.scroll.scroll_top - top);
                self.scroll.scroll_top = top;
                self.particles.resize(viewport);
                self.visibility.observe(self.scroll.root());
                self.sections.story.on_scroll(&self.scroll);
            }
            PageEvent::Frame => self.frame(step),
            PageEvent::Wait { secs } => {
                if !secs.is_finite() || secs < 0.0 {
                    return Err(HeartlineError::validation(
                        "wait secs must be finite and >= 0",
                    ));
                }
                let frames = self.config.fps.secs_to_frames_floor(secs);
                if frames > MAX_WAIT_FRAMES {
                    return Err(HeartlineError::validation(format!(
                        "wait of {secs}s exceeds {MAX_WAIT_FRAMES} frames"
                    )));
                }
                let target = self.now + secs;
                for _ in 0..frames {
                    self.frame(step);
                }
                self.advance_to(target, step);
            }
            PageEvent::ScrollToSection { section } => {
                let top = self.layout.require(section)?.bounds.y0;
                self.scroll_to(top, step);
            }
            PageEvent::PointerMove { x, y } => {
                self.sections
                    .hero
                    .pointer_move(Point::new(x, y), self.scroll.scroll_top);
            }
            PageEvent::ClickHeart => self.click_heart(),
            PageEvent::DismissMessage => self.sections.surprise.dismiss_message(),
            PageEvent::OpenQuiz => self.sections.surprise.open_quiz(),
            PageEvent::AnswerQuiz { option } => {
                if !self.sections.surprise.is_quiz_open() {
                    step.note = Some("quiz not open".to_owned());
                    return Ok(());
                }
                let outcome = self.sections.surprise.quiz.answer(option)?;
                if outcome != AnswerOutcome::Ignored {
                    self.timers
                        .schedule(self.now, self.config.timing.quiz_advance_s, TimerKind::QuizAdvance);
                }
                step.note = Some(format!("{outcome:?}").to_lowercase());
            }
            PageEvent::ResetQuiz => {
                self.timers.cancel_kind(TimerKind::QuizAdvance);
                self.sections.surprise.quiz.reset();
            }
            PageEvent::ToggleCard { index } => {
                let flipped = self.sections.reasons.toggle_card(index)?;
                step.note = Some(if flipped { "flipped" } else { "unflipped" }.to_owned());
            }
            PageEvent::OpenImage { index } => self.sections.gallery.lightbox.open(index)?,
            PageEvent::CloseImage => self.sections.gallery.lightbox.close(),
            PageEvent::NextImage => self.sections.gallery.lightbox.next(),
            PageEvent::PreviousImage => self.sections.gallery.lightbox.previous(),
            PageEvent::Key { key } => {
                if !self.sections.gallery.lightbox.handle_key(key) {
                    step.note = Some("key ignored".to_owned());
                }
            }
            PageEvent::HoverImage { index } => self.sections.gallery.hover(index)?,
            PageEvent::HoverPromise { index } => self.sections.promises.hover(index)?,
            PageEvent::TogglePlay => {
                let outcome = self.audio.toggle_play();
                self.after_audio_toggle(outcome, step);
            }
            PageEvent::ToggleMute => {
                let outcome = self.audio.toggle_mute();
                self.after_audio_toggle(outcome, step);
            }
            PageEvent::Teardown => self.teardown(),
        }
        Ok(())
    }

    fn scroll_to(&mut self, top: f64, step: &mut Step) {
        if self.sections.gallery.lightbox.scroll_locked() {
            step.note = Some("scroll locked".to_owned());
            return;
        }
        let top = self.scroll.clamp_scroll(top);
        self.particles.scroll_bursts(self.scroll.scroll_top - top);
        self.scroll.scroll_top = top;
        self.visibility.observe(self.scroll.root());
        self.sections.story.on_scroll(&self.scroll);
    }

    fn frame(&mut self, step: &mut Step) {
        let target = self.now + self.config.fps.frame_duration_secs();
        self.advance_to(target, step);
        if let Some(snapshot) = self.particles.tick(self.now) {
            self.last_frame = Some(snapshot);
        }
    }

    /// Move the clock to `target`, firing due timers at their own deadlines.
    fn advance_to(&mut self, target: f64, step: &mut Step) {
        while let Some((due, kind)) = self.timers.pop_due(target) {
            self.now = self.now.max(due);
            self.fire(kind);
            step.timers.push(kind);
        }
        self.now = self.now.max(target);
    }

    fn fire(&mut self, kind: TimerKind) {
        tracing::debug!(?kind, now = self.now, "timer fired");
        match kind {
            TimerKind::PageLoaded => self.loaded = true,
            TimerKind::LetterOpen => {
                self.sections.letter.open();
                let t = &self.config.timing;
                for index in 0..self.sections.letter.paragraphs() {
                    let delay = t.paragraph_base_s + t.paragraph_step_s * index as f64;
                    self.timers
                        .schedule(self.now, delay, TimerKind::TypeParagraph { index });
                }
            }
            TimerKind::TypeParagraph { index } => self.sections.letter.type_paragraph(index),
            TimerKind::HeartPulseEnd => self.sections.surprise.end_pulse(),
            TimerKind::QuizAdvance => self.sections.surprise.quiz.advance(),
            TimerKind::AudioHintEnd => self.audio.hide_hint(),
        }
    }

    fn click_heart(&mut self) {
        let surprise = &mut self.sections.surprise;
        surprise.click_heart(&mut self.message_rng);

        self.timers.cancel_kind(TimerKind::HeartPulseEnd);
        self.timers.schedule(
            self.now,
            self.config.timing.heart_pulse_s,
            TimerKind::HeartPulseEnd,
        );

        let center = surprise.anchor_center();
        let origin = Point::new(center.x, center.y - self.scroll.scroll_top);
        self.particles.burst(origin, None, None, self.now);
    }

    fn after_audio_toggle(&mut self, outcome: ToggleOutcome, step: &mut Step) {
        if outcome.rejected {
            self.audio.show_hint();
            self.timers.cancel_kind(TimerKind::AudioHintEnd);
            self.timers
                .schedule(self.now, self.config.audio.hint_s, TimerKind::AudioHintEnd);
            step.note = Some("playback rejected".to_owned());
        }
    }

    fn route_reveals(&mut self, step: &mut Step) {
        let reveals = self.visibility.take_reveals();
        if reveals.is_empty() {
            return;
        }
        let now = self.now;
        for regions in self.sections.regions_mut() {
            let flipped = regions.apply(&reveals, now);
            let section = regions.kind();
            if flipped.header {
                step.reveals.push(RevealRecord {
                    section,
                    item: None,
                });
            }
            step.reveals.extend(flipped.items.iter().map(|&i| RevealRecord {
                section,
                item: Some(i),
            }));
        }

        for record in &step.reveals {
            match (record.section, record.item) {
                (SectionKind::Letter, None) => {
                    self.timers
                        .schedule(now, self.config.timing.letter_open_s, TimerKind::LetterOpen);
                }
                (SectionKind::Footer, None) => {
                    self.sections
                        .footer
                        .spawn_rising(&self.config.footer_hearts, &mut self.footer_rng);
                }
                _ => {}
            }
        }
    }

    fn record(&mut self, event: Option<PageEvent>, step: Step) {
        self.trace.entries.push(TraceEntry {
            time: self.now,
            event,
            reveals: step.reveals,
            timers: step.timers,
            note: step.note,
        });
    }

    pub fn snapshot(&self) -> PageSnapshot {
        let now = self.now;
        let s = &self.sections;
        let sections = s
            .regions()
            .iter()
            .map(|r| SectionView {
                section: r.kind(),
                revealed: r.is_revealed(),
                opacity: r.header_pose(now).opacity,
                revealed_items: r.items().revealed_indices(),
                item_count: r.items().len(),
                item_opacity: (0..r.items().len())
                    .map(|i| r.item_pose(i, now).opacity)
                    .collect(),
            })
            .collect();

        PageSnapshot {
            time: now,
            loaded: self.loaded,
            torn_down: self.torn_down,
            viewport: self.scroll.viewport,
            scroll_top: self.scroll.scroll_top,
            page_progress: self.scroll.page_progress(),
            story_progress: s.story.timeline().progress,
            hero_parallax: s.hero.parallax(),
            sections,
            flipped_cards: s.reasons.flipped(),
            gallery: GalleryView {
                selected: s.gallery.lightbox.selected(),
                hovered: s.gallery.hovered(),
                scroll_locked: s.gallery.lightbox.scroll_locked(),
            },
            letter: LetterView {
                open: s.letter.is_open(),
                typed: s.letter.typed(),
            },
            surprise: SurpriseView {
                message: s
                    .surprise
                    .message()
                    .and_then(|i| self.config.content.messages.get(i).cloned()),
                pulsing: s.surprise.is_pulsing(),
                quiz_open: s.surprise.is_quiz_open(),
                quiz: s.surprise.quiz.clone(),
            },
            hovered_promise: s.promises.hovered(),
            rising_hearts: s.footer.rising().to_vec(),
            audio: AudioView {
                state: self.audio.state(),
                hint_visible: self.audio.hint_visible(),
            },
            particles: ParticleView {
                running: self.particles.is_running(),
                ambient: self.particles.live_ambient_particles(),
                burst: self.particles.live_burst_particles(now),
                frames: self.particles.frames_drawn(),
            },
        }
    }

}

fn mount_sections(
    config: &PageConfig,
    layout: &PageLayout,
    engine: &mut VisibilityEngine,
) -> HeartlineResult<Sections> {
    let regions = |engine: &mut VisibilityEngine, kind: SectionKind| {
        SectionRegions::register(engine, layout.require(kind)?, config.reveal.for_section(kind))
    };

    Ok(Sections {
        hero: Hero::new(
            regions(engine, SectionKind::Hero)?,
            layout.require(SectionKind::Hero)?,
        ),
        story: Story::new(
            regions(engine, SectionKind::Story)?,
            layout.require(SectionKind::Story)?,
        ),
        reasons: Reasons::new(regions(engine, SectionKind::Reasons)?),
        gallery: Gallery::new(regions(engine, SectionKind::Gallery)?),
        letter: Letter::new(
            regions(engine, SectionKind::Letter)?,
            config.content.letter_paragraphs,
        ),
        surprise: Surprise::new(
            regions(engine, SectionKind::Surprise)?,
            layout.require(SectionKind::Surprise)?,
            config.content.messages.len(),
            Quiz::new(config.content.quiz.clone()),
        ),
        promises: Promises::new(regions(engine, SectionKind::Promises)?),
        footer: Footer::new(regions(engine, SectionKind::Footer)?),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/page/session.rs"]
mod tests;
