/// Turns host frame timestamps into per-frame deltas.
///
/// The engine never reads a clock itself. The host passes a timestamp in
/// milliseconds for every frame and feeds the returned delta to
/// [`GameState::tick`](crate::GameState::tick).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the previous frame. The first frame yields 0, and a
    /// timestamp that goes backwards yields 0 as well.
    pub fn delta(&mut self, now_ms: f64) -> f64 {
        let delta = match self.last_ms {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        delta
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
