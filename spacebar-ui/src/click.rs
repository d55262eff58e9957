//! Pointer button handling for workspace boxes.

/// Mouse buttons by their toolkit number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Middle,
    Secondary,
    Other(u32),
}

impl From<u32> for MouseButton {
    fn from(button: u32) -> Self {
        match button {
            1 => MouseButton::Primary,
            2 => MouseButton::Middle,
            3 => MouseButton::Secondary,
            other => MouseButton::Other(other),
        }
    }
}

/// Pairs a primary press with the following release.
///
/// A release counts as a click only if this recognizer saw the press and the
/// release came at most `max_delta_ms` later. Releasing always forgets the press.
#[derive(Debug, Clone)]
pub struct ClickRecognizer {
    max_delta_ms: u32,
    last_press: Option<u32>,
}

impl ClickRecognizer {
    pub fn new(max_delta_ms: u32) -> Self {
        Self { max_delta_ms, last_press: None }
    }

    pub fn press(&mut self, time_ms: u32) {
        self.last_press = Some(time_ms);
    }

    /// Returns whether the release completes a click.
    pub fn release(&mut self, time_ms: u32) -> bool {
        match self.last_press.take() {
            Some(pressed) => time_ms.saturating_sub(pressed) <= self.max_delta_ms,
            None => false,
        }
    }

    pub fn has_pending_press(&self) -> bool {
        self.last_press.is_some()
    }
}
