use super::*;
use crate::visibility::engine::IntersectionSupport;

fn session() -> PageSession {
    PageSession::new(PageConfig::default()).unwrap()
}

fn revealed(s: &PageSession, kind: SectionKind) -> bool {
    s.snapshot()
        .sections
        .iter()
        .any(|v| v.section == kind && v.revealed)
}

#[test]
fn mount_reveals_only_the_hero() {
    let s = session();
    let first = &s.trace().entries[0];
    assert_eq!(first.event, None);
    assert_eq!(
        first.reveals,
        vec![RevealRecord {
            section: SectionKind::Hero,
            item: None
        }]
    );
    let snap = s.snapshot();
    assert!(!snap.loaded);
    assert_eq!(snap.particles.ambient, 30);
    assert!(snap.particles.running);
}

#[test]
fn page_fades_in_after_load_delay() {
    let mut s = session();
    s.dispatch(PageEvent::Wait { secs: 0.05 }).unwrap();
    assert!(!s.snapshot().loaded);
    s.dispatch(PageEvent::Wait { secs: 0.1 }).unwrap();
    assert!(s.snapshot().loaded);
}

#[test]
fn scrolling_reveals_story_title_and_visible_items() {
    let mut s = session();
    s.dispatch(PageEvent::ScrollToSection {
        section: SectionKind::Story,
    })
    .unwrap();
    let entry = s.trace().entries.last().unwrap();
    assert!(entry.reveals.contains(&RevealRecord {
        section: SectionKind::Story,
        item: None
    }));
    let items: Vec<_> = entry
        .reveals
        .iter()
        .filter(|r| r.section == SectionKind::Story)
        .filter_map(|r| r.item)
        .collect();
    assert_eq!(items, vec![0, 1]);

    // Scrolling back up never hides anything.
    s.dispatch(PageEvent::Scroll { top: 0.0 }).unwrap();
    assert!(revealed(&s, SectionKind::Story));
    assert_eq!(s.snapshot().story_progress, 0.0);
}

#[test]
fn story_timeline_tracks_scroll() {
    let mut s = session();
    // Section top 800, height 1600, viewport 800: midpoint enters at 400.
    s.dispatch(PageEvent::Scroll { top: 1200.0 }).unwrap();
    assert!((s.snapshot().story_progress - 0.5).abs() < 1e-9);
    s.dispatch(PageEvent::Scroll { top: 5000.0 }).unwrap();
    assert_eq!(s.snapshot().story_progress, 1.0);
}

#[test]
fn letter_opens_then_types_paragraphs() {
    let mut s = session();
    s.dispatch(PageEvent::ScrollToSection {
        section: SectionKind::Letter,
    })
    .unwrap();
    assert!(revealed(&s, SectionKind::Letter));
    assert!(!s.snapshot().letter.open);

    s.dispatch(PageEvent::Wait { secs: 0.5 }).unwrap();
    let letter = s.snapshot().letter;
    assert!(letter.open);
    assert!(letter.typed.is_empty());

    s.dispatch(PageEvent::Wait { secs: 0.6 }).unwrap();
    assert_eq!(s.snapshot().letter.typed, vec![0]);

    s.dispatch(PageEvent::Wait { secs: 3.0 }).unwrap();
    assert_eq!(s.snapshot().letter.typed, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn heart_click_shows_message_pulses_and_bursts() {
    let mut s = session();
    s.dispatch(PageEvent::ScrollToSection {
        section: SectionKind::Surprise,
    })
    .unwrap();
    s.dispatch(PageEvent::ClickHeart).unwrap();

    let snap = s.snapshot();
    let message = snap.surprise.message.unwrap();
    assert!(s.config().content.messages.contains(&message));
    assert!(snap.surprise.pulsing);
    assert_eq!(snap.particles.burst, 25);

    s.dispatch(PageEvent::Wait { secs: 1.1 }).unwrap();
    let snap = s.snapshot();
    assert!(!snap.surprise.pulsing);
    assert_eq!(snap.particles.burst, 25);

    s.dispatch(PageEvent::Wait { secs: 1.0 }).unwrap();
    assert_eq!(s.snapshot().particles.burst, 0);

    s.dispatch(PageEvent::DismissMessage).unwrap();
    assert_eq!(s.snapshot().surprise.message, None);
}

#[test]
fn quiz_runs_to_result() {
    let mut s = session();
    s.dispatch(PageEvent::AnswerQuiz { option: 1 }).unwrap();
    assert_eq!(s.snapshot().surprise.quiz.score(), 0);

    s.dispatch(PageEvent::OpenQuiz).unwrap();
    for option in [1, 1, 3] {
        s.dispatch(PageEvent::AnswerQuiz { option }).unwrap();
        s.dispatch(PageEvent::Wait { secs: 1.05 }).unwrap();
    }
    let quiz = s.snapshot().surprise.quiz;
    assert!(quiz.is_finished());
    assert_eq!(quiz.score(), 3);

    s.dispatch(PageEvent::ResetQuiz).unwrap();
    let quiz = s.snapshot().surprise.quiz;
    assert!(!quiz.is_finished());
    assert_eq!(quiz.score(), 0);
}

#[test]
fn lightbox_locks_scroll_and_handles_keys() {
    let mut s = session();
    s.dispatch(PageEvent::OpenImage { index: 8 }).unwrap();
    s.dispatch(PageEvent::Scroll { top: 500.0 }).unwrap();
    assert_eq!(s.snapshot().scroll_top, 0.0);
    assert_eq!(
        s.trace().entries.last().unwrap().note.as_deref(),
        Some("scroll locked")
    );

    s.dispatch(PageEvent::Key { key: Key::ArrowRight }).unwrap();
    assert_eq!(s.snapshot().gallery.selected, Some(0));
    s.dispatch(PageEvent::Key { key: Key::ArrowLeft }).unwrap();
    assert_eq!(s.snapshot().gallery.selected, Some(8));
    s.dispatch(PageEvent::Key { key: Key::Escape }).unwrap();
    assert!(!s.snapshot().gallery.scroll_locked);

    s.dispatch(PageEvent::Scroll { top: 500.0 }).unwrap();
    assert_eq!(s.snapshot().scroll_top, 500.0);
}

#[test]
fn blocked_autoplay_shows_hint_for_three_seconds() {
    let mut config = PageConfig::default();
    config.audio.autoplay_allowed = false;
    let mut s = PageSession::new(config).unwrap();

    s.dispatch(PageEvent::TogglePlay).unwrap();
    let snap = s.snapshot();
    assert!(snap.audio.hint_visible);
    assert_eq!(snap.audio.state, AudioState::Playing);

    s.dispatch(PageEvent::Wait { secs: 2.9 }).unwrap();
    assert!(s.snapshot().audio.hint_visible);
    s.dispatch(PageEvent::Wait { secs: 0.2 }).unwrap();
    assert!(!s.snapshot().audio.hint_visible);
}

#[test]
fn footer_reveal_spawns_rising_hearts_once() {
    let mut s = session();
    s.dispatch(PageEvent::ScrollToSection {
        section: SectionKind::Footer,
    })
    .unwrap();
    let snap = s.snapshot();
    assert_eq!(snap.page_progress, 1.0);
    assert_eq!(snap.rising_hearts.len(), 20);
    for h in &snap.rising_hearts {
        assert!((0.0..100.0).contains(&h.left_pct));
        assert!((8.0..13.0).contains(&h.duration_s));
        assert!((10.0..30.0).contains(&h.size));
    }
    let first = snap.rising_hearts.clone();
    s.dispatch(PageEvent::Scroll { top: 0.0 }).unwrap();
    s.dispatch(PageEvent::ScrollToSection {
        section: SectionKind::Footer,
    })
    .unwrap();
    assert_eq!(s.snapshot().rising_hearts, first);
}

#[test]
fn unavailable_intersection_reveals_everything_at_mount() {
    let config = PageConfig {
        intersection: IntersectionSupport::Unavailable,
        ..PageConfig::default()
    };
    let s = PageSession::new(config).unwrap();
    for kind in SectionKind::ALL {
        assert!(revealed(&s, kind), "{kind:?}");
    }
    let gallery = s
        .snapshot()
        .sections
        .into_iter()
        .find(|v| v.section == SectionKind::Gallery)
        .unwrap();
    assert_eq!(gallery.revealed_items.len(), 9);
}

#[test]
fn bad_input_is_rejected_without_side_effects() {
    let mut s = session();
    let len = s.trace().entries.len();
    assert!(s.dispatch(PageEvent::ToggleCard { index: 99 }).is_err());
    assert!(s.dispatch(PageEvent::OpenImage { index: 9 }).is_err());
    assert!(s.dispatch(PageEvent::Wait { secs: -1.0 }).is_err());
    assert_eq!(s.trace().entries.len(), len);

    s.dispatch(PageEvent::ToggleCard { index: 4 }).unwrap();
    assert_eq!(s.snapshot().flipped_cards, vec![4]);
    s.dispatch(PageEvent::ToggleCard { index: 4 }).unwrap();
    assert!(s.snapshot().flipped_cards.is_empty());
}

#[test]
fn teardown_stops_everything_and_rejects_later_events() {
    let mut s = session();
    s.dispatch(PageEvent::Frame).unwrap();
    s.dispatch(PageEvent::Teardown).unwrap();
    let snap = s.snapshot();
    assert!(snap.torn_down);
    assert!(!snap.particles.running);
    assert_eq!(s.visibility.observing_count(), 0);

    assert!(s.dispatch(PageEvent::Frame).is_err());
    s.teardown();
    assert!(s.is_torn_down());
}

#[test]
fn resize_keeps_ambient_population() {
    let mut s = session();
    s.dispatch(PageEvent::Wait { secs: 2.0 }).unwrap();
    s.dispatch(PageEvent::Resize {
        width: 390,
        height: 844,
    })
    .unwrap();
    s.dispatch(PageEvent::Frame).unwrap();
    let frame = s.last_frame().unwrap();
    assert_eq!(frame.surface, Viewport::new(390, 844));
    assert_eq!(frame.sprites.len(), 30);
    assert_eq!(s.snapshot().particles.ambient, 30);
}

#[test]
fn hero_parallax_follows_pointer() {
    let mut s = session();
    s.dispatch(PageEvent::PointerMove { x: 1280.0, y: 400.0 })
        .unwrap();
    let p = s.snapshot().hero_parallax;
    assert!((p.x - 10.0).abs() < 1e-9);
    assert!(p.y.abs() < 1e-9);
}

#[test]
fn events_round_trip_through_json() {
    let script = r#"[
        {"type": "scroll", "top": 120.5},
        {"type": "key", "key": "Escape"},
        {"type": "hover_promise", "index": null},
        {"type": "scroll_to_section", "section": "gallery"}
    ]"#;
    let events: Vec<PageEvent> = serde_json::from_str(script).unwrap();
    assert_eq!(events[0], PageEvent::Scroll { top: 120.5 });
    assert_eq!(events[1], PageEvent::Key { key: Key::Escape });
    assert_eq!(events[2], PageEvent::HoverPromise { index: None });
    assert_eq!(
        events[3],
        PageEvent::ScrollToSection {
            section: SectionKind::Gallery
        }
    );
}

fn scroll_through(s: &mut PageSession) {
    let end = s.layout().document_height;
    let mut top = 0.0;
    while top <= end {
        s.dispatch(PageEvent::Scroll { top }).unwrap();
        top += 50.0;
    }
}

fn assert_all_revealed(s: &PageSession) {
    for view in s.snapshot().sections {
        assert!(view.revealed, "{:?} never revealed", view.section);
        assert_eq!(
            view.revealed_items.len(),
            view.item_count,
            "{:?} left items hidden",
            view.section
        );
    }
}

#[test]
fn phone_resize_relays_out_and_reveals_every_section() {
    let mut s = session();
    s.dispatch(PageEvent::Resize {
        width: 390,
        height: 844,
    })
    .unwrap();
    assert_eq!(s.layout(), &PageLayout::for_viewport(Viewport::new(390, 844)));
    assert_eq!(s.scroll().document_height, s.layout().document_height);
    for section in &s.layout().sections {
        for item in &section.items {
            assert!(item.x0 >= 0.0 && item.x1 <= 390.0);
        }
    }

    scroll_through(&mut s);
    assert_all_revealed(&s);
}

#[test]
fn narrow_viewport_at_mount_reveals_every_grid_item() {
    let config = PageConfig {
        viewport: Viewport::new(400, 800),
        ..PageConfig::default()
    };
    let mut s = PageSession::new(config).unwrap();
    let cards = &s.layout().section(SectionKind::Reasons).unwrap().items;
    assert_eq!(cards[0].x0, cards[1].x0);

    scroll_through(&mut s);
    assert_all_revealed(&s);
}

#[test]
fn resize_keeps_an_explicit_layout() {
    let fixed = PageLayout::standard(1280.0, 800.0);
    let config = PageConfig {
        layout: Some(fixed.clone()),
        ..PageConfig::default()
    };
    let mut s = PageSession::new(config).unwrap();
    s.dispatch(PageEvent::Resize {
        width: 390,
        height: 844,
    })
    .unwrap();
    assert_eq!(s.layout(), &fixed);
}

#[test]
fn overlong_wait_is_rejected_without_advancing() {
    let mut s = session();
    let before = s.now();
    assert!(s.dispatch(PageEvent::Wait { secs: 1e12 }).is_err());
    assert_eq!(s.now(), before);
    s.dispatch(PageEvent::Wait { secs: 60.0 }).unwrap();
    assert!(s.now() > before);
}

#[test]
fn bursts_scroll_with_the_page() {
    let burst_sprites = |scroll_by: f64| {
        let mut s = session();
        s.dispatch(PageEvent::ScrollToSection {
            section: SectionKind::Surprise,
        })
        .unwrap();
        s.dispatch(PageEvent::ClickHeart).unwrap();
        let top = s.scroll().scroll_top + scroll_by;
        s.dispatch(PageEvent::Scroll { top }).unwrap();
        s.dispatch(PageEvent::Wait { secs: 0.1 }).unwrap();
        let frame = s.last_frame().unwrap();
        frame.sprites[frame.sprites.len() - 25..].to_vec()
    };
    let still = burst_sprites(0.0);
    let scrolled = burst_sprites(100.0);
    for (a, b) in still.iter().zip(&scrolled) {
        assert!((b.center.y - (a.center.y - 100.0)).abs() < 1e-9);
        assert_eq!(b.center.x, a.center.x);
    }
}
