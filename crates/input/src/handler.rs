//! Key phase tracking for terminal environments.
//!
//! Terminals with the keyboard enhancement protocol report press, repeat and
//! release kinds directly. Most others only report presses, sending a new press
//! for every auto-repeat and nothing on release. The handler turns such a
//! stream into proper phases: a press of a key that is already held becomes a
//! repeat, and a key that has been silent for longer than the release timeout
//! gets a synthesized release.
//!
//! Timestamps are plain milliseconds supplied by the caller, so the handler
//! never reads a clock.

use arrayvec::ArrayVec;

use crate::types::{Key, KeyInput, KeyPhase};

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state.
pub const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u64 = 150;

// Down must outlast the OS auto-repeat delay (typically 250-500 ms). An early
// synthesized release re-arms soft drop after a landing, and the first OS
// repeat would then push the freshly spawned figure.
pub const DEFAULT_DOWN_RELEASE_TIMEOUT_MS: u64 = 500;

const TRACKED_KEYS: usize = 3;

/// Tracks which keys are held and when they were last seen.
#[derive(Debug, Clone)]
pub struct InputHandler {
    held: ArrayVec<(Key, u64), TRACKED_KEYS>,
    key_release_timeout_ms: u64,
    down_release_timeout_ms: u64,
    /// The terminal reports releases itself; no synthesis needed.
    reports_release: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            held: ArrayVec::new(),
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
            down_release_timeout_ms: DEFAULT_DOWN_RELEASE_TIMEOUT_MS,
            reports_release: false,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    /// Release timeout for the Down key, which is held through landings.
    pub fn with_down_release_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.down_release_timeout_ms = timeout_ms;
        self
    }

    /// Declare whether the terminal emits release events on its own.
    pub fn with_release_events(mut self, reports_release: bool) -> Self {
        self.reports_release = reports_release;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u64 {
        self.key_release_timeout_ms
    }

    pub fn release_timeout_for(&self, key: Key) -> u64 {
        match key {
            Key::ArrowDown => self.down_release_timeout_ms,
            Key::ArrowLeft | Key::ArrowRight => self.key_release_timeout_ms,
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.iter().any(|(k, _)| *k == key)
    }

    fn touch(&mut self, key: Key, now_ms: u64) -> bool {
        if let Some(entry) = self.held.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = now_ms;
            return true;
        }
        let _ = self.held.try_push((key, now_ms));
        false
    }

    fn forget(&mut self, key: Key) -> bool {
        match self.held.iter().position(|(k, _)| *k == key) {
            Some(idx) => {
                self.held.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Feed one mapped key event observed at `now_ms`. Returns the input the
    /// game should see, if any.
    pub fn handle(&mut self, input: KeyInput, now_ms: u64) -> Option<KeyInput> {
        match input.phase {
            KeyPhase::Press => {
                let already_held = self.touch(input.key, now_ms);
                if already_held && !self.reports_release {
                    Some(KeyInput::repeat(input.key))
                } else {
                    Some(input)
                }
            }
            KeyPhase::Repeat => {
                self.touch(input.key, now_ms);
                Some(input)
            }
            KeyPhase::Release => {
                // A release for a key we already auto-released is stale.
                if self.forget(input.key) || self.reports_release {
                    Some(input)
                } else {
                    None
                }
            }
        }
    }

    /// Synthesize releases for keys silent longer than the timeout.
    pub fn update(&mut self, now_ms: u64) -> ArrayVec<KeyInput, TRACKED_KEYS> {
        let mut released = ArrayVec::new();
        if self.reports_release {
            return released;
        }

        let (timeout, down_timeout) = (self.key_release_timeout_ms, self.down_release_timeout_ms);
        self.held.retain(|(key, last_seen)| {
            let limit = match key {
                Key::ArrowDown => down_timeout,
                Key::ArrowLeft | Key::ArrowRight => timeout,
            };
            let stale = now_ms.saturating_sub(*last_seen) > limit;
            if stale {
                released.push(KeyInput::release(*key));
            }
            !stale
        });
        released
    }

    /// Drop all held state without emitting releases.
    pub fn reset(&mut self) {
        self.held.clear();
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_press_becomes_repeat() {
        let mut ih = InputHandler::new();

        assert_eq!(
            ih.handle(KeyInput::press(Key::ArrowDown), 0),
            Some(KeyInput::press(Key::ArrowDown))
        );
        assert_eq!(
            ih.handle(KeyInput::press(Key::ArrowDown), 30),
            Some(KeyInput::repeat(Key::ArrowDown))
        );
        assert!(ih.is_held(Key::ArrowDown));
    }

    #[test]
    fn test_auto_release_triggers_after_timeout() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(50);

        ih.handle(KeyInput::press(Key::ArrowLeft), 100);
        assert!(ih.update(150).is_empty());

        let released = ih.update(151);
        assert_eq!(released.as_slice(), &[KeyInput::release(Key::ArrowLeft)]);
        assert!(!ih.is_held(Key::ArrowLeft));

        // Next press starts a fresh series.
        assert_eq!(
            ih.handle(KeyInput::press(Key::ArrowLeft), 200),
            Some(KeyInput::press(Key::ArrowLeft))
        );
    }

    #[test]
    fn test_repeats_keep_key_held() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(50);

        ih.handle(KeyInput::press(Key::ArrowDown), 0);
        for t in (40..=400).step_by(40) {
            ih.handle(KeyInput::press(Key::ArrowDown), t);
            assert!(ih.update(t + 10).is_empty());
        }
        assert!(ih.is_held(Key::ArrowDown));
    }

    #[test]
    fn test_only_stale_keys_are_released() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(50);

        ih.handle(KeyInput::press(Key::ArrowLeft), 0);
        ih.handle(KeyInput::press(Key::ArrowDown), 40);

        let released = ih.update(60);
        assert_eq!(released.as_slice(), &[KeyInput::release(Key::ArrowLeft)]);
        assert!(ih.is_held(Key::ArrowDown));
    }

    #[test]
    fn test_stale_release_is_dropped() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(50);

        ih.handle(KeyInput::press(Key::ArrowLeft), 0);
        ih.update(100);
        assert_eq!(ih.handle(KeyInput::release(Key::ArrowLeft), 110), None);
    }

    #[test]
    fn test_down_outlasts_os_repeat_delay() {
        let mut ih = InputHandler::new();

        ih.handle(KeyInput::press(Key::ArrowDown), 0);
        ih.handle(KeyInput::press(Key::ArrowLeft), 0);

        // Typical first auto-repeat arrives ~400 ms after the press.
        let released = ih.update(399);
        assert_eq!(released.as_slice(), &[KeyInput::release(Key::ArrowLeft)]);
        assert!(ih.is_held(Key::ArrowDown));
        assert_eq!(
            ih.handle(KeyInput::press(Key::ArrowDown), 400),
            Some(KeyInput::repeat(Key::ArrowDown))
        );

        assert!(ih.update(900).is_empty());
        assert_eq!(
            ih.update(901).as_slice(),
            &[KeyInput::release(Key::ArrowDown)]
        );
    }

    #[test]
    fn test_down_timeout_is_configurable() {
        let mut ih = InputHandler::new().with_down_release_timeout_ms(20);
        assert_eq!(ih.release_timeout_for(Key::ArrowDown), 20);
        assert_eq!(
            ih.release_timeout_for(Key::ArrowLeft),
            DEFAULT_KEY_RELEASE_TIMEOUT_MS
        );

        ih.handle(KeyInput::press(Key::ArrowDown), 0);
        assert_eq!(
            ih.update(21).as_slice(),
            &[KeyInput::release(Key::ArrowDown)]
        );
    }

    #[test]
    fn test_terminal_with_release_events_passes_through() {
        let mut ih = InputHandler::new()
            .with_key_release_timeout_ms(50)
            .with_release_events(true);

        ih.handle(KeyInput::press(Key::ArrowDown), 0);
        assert!(ih.update(10_000).is_empty());
        assert_eq!(
            ih.handle(KeyInput::repeat(Key::ArrowDown), 10_001),
            Some(KeyInput::repeat(Key::ArrowDown))
        );
        assert_eq!(
            ih.handle(KeyInput::release(Key::ArrowDown), 10_002),
            Some(KeyInput::release(Key::ArrowDown))
        );
        assert!(!ih.is_held(Key::ArrowDown));
    }

    #[test]
    fn test_reset_clears_held_state() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(10);
        ih.handle(KeyInput::press(Key::ArrowRight), 0);

        ih.reset();
        assert!(!ih.is_held(Key::ArrowRight));
        assert!(ih.update(1_000).is_empty());
    }

    #[test]
    fn test_default_key_release_timeout_is_non_zero() {
        let ih = InputHandler::new();
        assert!(ih.key_release_timeout_ms() > 0);
    }
}
