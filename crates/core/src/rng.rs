//! RNG module - seeded randomness for spawns
//!
//! Figure type and color are drawn uniformly on every spawn. A small LCG keeps
//! games reproducible from a seed, which the tests and benches rely on.

use crate::types::{FigureColor, FigureType};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // A zero state would stay zero forever.
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of an LCG cycle with a short period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        debug_assert!(max > 0);
        (((self.next_u32() >> 16) as u64 * max as u64) >> 16) as u32
    }

    /// Pick one element uniformly.
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.next_range(items.len() as u32) as usize]
    }

    pub fn figure_type(&mut self) -> FigureType {
        self.pick(&FigureType::ALL)
    }

    /// Draw a palette color, re-rolling until it differs from `previous`.
    pub fn figure_color(&mut self, previous: Option<FigureColor>) -> FigureColor {
        loop {
            let color = self.pick(&FigureColor::PALETTE);
            if Some(color) != previous {
                return color;
            }
        }
    }

    /// Current RNG state (a restart seeded with it continues the sequence)
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
