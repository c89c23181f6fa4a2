//! RNG module - injectable random source for puzzle generation
//!
//! Every random decision the generator makes (shape ids, colors, template
//! choice, grid shape types, tray order) goes through [`RandomSource`], so a
//! puzzle is fully reproducible from a seed.
//!
//! Two sources are provided:
//! - [`SimpleRng`]: a seedable LCG for deterministic tests and replays
//! - `rand::rngs::StdRng`: for callers that already carry a `rand` generator
//!
//! [`SimpleRng::from_entropy`] seeds from the OS for normal play.

use rand::rngs::StdRng;

/// Source of uniformly distributed random numbers.
pub trait RandomSource {
    /// Generate the next random u32
    fn next_u32(&mut self) -> u32;

    /// Random value in `[0, max)`. Returns 0 when `max` is 0.
    ///
    /// Uses the high bits of the generator (multiply-shift), which are
    /// better distributed than the low bits of an LCG.
    fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Random index into a collection of `len` items.
    fn next_index(&mut self, len: usize) -> usize {
        self.next_range(len as u32) as usize
    }

    /// Pick one element uniformly. `None` for an empty slice.
    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }
        items.get(self.next_index(items.len()))
    }

    /// Shuffle a slice using Fisher-Yates
    fn shuffle<T>(&mut self, slice: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..slice.len()).rev() {
            let j = self.next_index(i + 1);
            slice.swap(i, j);
        }
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
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

    /// Seed from OS entropy (non-deterministic).
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u32>())
    }

    /// Current internal state (for replaying a session from the same point)
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl RandomSource for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RandomSource for StdRng {
    fn next_u32(&mut self) -> u32 {
        rand::RngCore::next_u32(self)
    }
}

impl<R: RandomSource> RandomSource for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}
