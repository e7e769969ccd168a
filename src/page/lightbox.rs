use crate::foundation::error::{HeartlineError, HeartlineResult};

/// Keys the page listens for. Anything else arrives as `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    #[serde(other)]
    Other,
}

/// Full-screen viewer over a fixed, ordered list of gallery images.
///
/// While open the page scroll is locked.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Lightbox {
    len: usize,
    selected: Option<usize>,
}

impl Lightbox {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            selected: None,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn open(&mut self, index: usize) -> HeartlineResult<()> {
        if index >= self.len {
            return Err(HeartlineError::validation(format!(
                "image index {index} out of range (gallery has {})",
                self.len
            )));
        }
        self.selected = Some(index);
        Ok(())
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    /// Step forward, wrapping from the last image to the first. No-op while closed.
    pub fn next(&mut self) {
        if let Some(i) = self.selected {
            self.selected = Some((i + 1) % self.len);
        }
    }

    /// Step backward, wrapping from the first image to the last. No-op while closed.
    pub fn previous(&mut self) {
        if let Some(i) = self.selected {
            self.selected = Some((i + self.len - 1) % self.len);
        }
    }

    /// Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if !self.is_open() {
            return false;
        }
        match key {
            Key::Escape => self.close(),
            Key::ArrowLeft => self.previous(),
            Key::ArrowRight => self.next(),
            Key::Other => return false,
        }
        true
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    pub fn scroll_locked(&self) -> bool {
        self.is_open()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/lightbox.rs"]
mod tests;
