use super::*;
use std::{cell::RefCell, rc::Rc};

#[derive(Default)]
struct Log {
    calls: Vec<&'static str>,
    volume: f64,
    looping: bool,
}

struct SharedSink {
    log: Rc<RefCell<Log>>,
    allow: bool,
}

impl AudioSink for SharedSink {
    fn play(&mut self) -> Result<(), PlaybackRejected> {
        self.log.borrow_mut().calls.push("play");
        if self.allow {
            Ok(())
        } else {
            Err(PlaybackRejected("blocked".to_owned()))
        }
    }

    fn pause(&mut self) {
        self.log.borrow_mut().calls.push("pause");
    }

    fn set_volume(&mut self, volume: f64) {
        self.log.borrow_mut().volume = volume;
    }

    fn set_looping(&mut self, looping: bool) {
        self.log.borrow_mut().looping = looping;
    }
}

fn toggle(allow: bool) -> (AudioToggle, Rc<RefCell<Log>>) {
    let log = Rc::new(RefCell::new(Log::default()));
    let sink = SharedSink {
        log: Rc::clone(&log),
        allow,
    };
    (AudioToggle::new(Box::new(sink), &AudioConfig::default()), log)
}

#[test]
fn sink_is_configured_on_creation() {
    let (_, log) = toggle(true);
    assert_eq!(log.borrow().volume, 0.3);
    assert!(log.borrow().looping);
}

#[test]
fn tri_state_follows_flags() {
    let (mut t, log) = toggle(true);
    assert_eq!(t.state(), AudioState::Paused);
    assert_eq!(t.toggle_play().state, AudioState::Playing);
    assert_eq!(t.toggle_mute().state, AudioState::Muted);
    assert_eq!(t.toggle_play().state, AudioState::Paused);
    // Unmuting while paused stays paused.
    assert_eq!(t.toggle_mute().state, AudioState::Paused);
    assert_eq!(log.borrow().calls, vec!["play", "pause", "pause", "pause"]);
}

#[test]
fn rejected_play_is_not_an_error() {
    let (mut t, _) = toggle(false);
    let outcome = t.toggle_play();
    assert!(outcome.rejected);
    assert_eq!(outcome.state, AudioState::Playing);
    assert!(t.is_playing());
}

#[test]
fn headless_sink_honours_autoplay_flag() {
    let mut sink = HeadlessSink::new(false);
    assert!(sink.play().is_err());
    assert!(!sink.playing);
    sink.autoplay_allowed = true;
    assert!(sink.play().is_ok());
    assert!(sink.playing);
    assert_eq!(sink.play_calls, 2);
}

#[test]
fn teardown_pauses() {
    let (mut t, log) = toggle(true);
    t.toggle_play();
    t.teardown();
    assert_eq!(log.borrow().calls.last(), Some(&"pause"));
}
