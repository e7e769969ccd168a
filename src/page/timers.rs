/// What a one-shot timer does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimerKind {
    /// Page fade-in after mount.
    PageLoaded,
    /// Letter card opens after its section reveals.
    LetterOpen,
    /// One letter paragraph finishes "typing".
    TypeParagraph { index: usize },
    /// Surprise heart stops pulsing.
    HeartPulseEnd,
    /// Quiz moves past the answered question.
    QuizAdvance,
    /// Blocked-autoplay hint disappears.
    AudioHintEnd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Clone, Copy, Debug)]
struct Timer {
    id: TimerId,
    due: f64,
    kind: TimerKind,
}

/// Fixed-duration, self-clearing timers on the session clock.
///
/// Timers due at the same instant fire in scheduling order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: f64, delay_s: f64, kind: TimerKind) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = now + delay_s.max(0.0);
        tracing::trace!(?kind, due, "timer scheduled");
        self.timers.push(Timer { id, due, kind });
        id
    }

    /// Returns whether the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Cancel every pending timer of the given kind.
    pub fn cancel_kind(&mut self, kind: TimerKind) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.kind != kind);
        before - self.timers.len()
    }

    /// Remove and return the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: f64) -> Option<(f64, TimerKind)> {
        let (index, _) = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)))?;
        let timer = self.timers.remove(index);
        Some((timer.due, timer.kind))
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/timers.rs"]
mod tests;
