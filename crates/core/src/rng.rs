//! RNG module - injectable random source for piece selection
//!
//! The engine never touches a global generator. Everything random (which kind
//! spawns next, where random-start blocks go) is drawn from a
//! [`RandomSource`], so a fixed seed replays the same game.

/// Source of uniform integers.
pub trait RandomSource {
    /// Uniform value in `[lo, hi)`. Returns `lo` when the range is empty.
    fn next_int(&mut self, lo: u32, hi: u32) -> u32;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_int(&mut self, lo: u32, hi: u32) -> u32 {
        (**self).next_int(lo, hi)
    }
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn next_int(&mut self, lo: u32, hi: u32) -> u32 {
        (**self).next_int(lo, hi)
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // Low bits of an LCG have short periods.
        (self.next_u32() >> 16) % max
    }

    /// Current internal state; feeding it to [`SimpleRng::new`] resumes the sequence.
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RandomSource for SimpleRng {
    fn next_int(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        lo + self.next_range(hi - lo)
    }
}
