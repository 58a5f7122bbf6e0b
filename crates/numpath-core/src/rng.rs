//! Injectable randomness.
//!
//! Every random decision in maze generation draws from a [`RandomSource`],
//! so callers can supply a real generator in production and a fixed
//! sequence of draws in tests.

/// A source of uniform draws in `[0, 1)`
pub trait RandomSource {
    /// Next uniform draw in `[0, 1)`
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `[min, max]` (inclusive)
    fn int_in(&mut self, min: i64, max: i64) -> i64 {
        let span = (max - min + 1) as f64;
        min + (self.next_f64() * span).floor() as i64
    }

    /// Uniform index in `[0, len)`; `len` must be non-zero
    fn index(&mut self, len: usize) -> usize {
        ((self.next_f64() * len as f64).floor() as usize).min(len.saturating_sub(1))
    }

    /// Coin flip that comes up true with probability `p`
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Shuffle a slice using Fisher-Yates
    fn shuffle<T>(&mut self, slice: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..slice.len()).rev() {
            let j = self.index(i + 1);
            slice.swap(i, j);
        }
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Small PCG-style PRNG, seeded from the platform entropy source
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleRng {
    pub fn new() -> Self {
        // getrandom works in the browser through its `js` feature
        let mut seed_bytes = [0u8; 8];
        getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
            // Fallback: use a static counter if getrandom fails
            static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
            let counter = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            seed_bytes = counter.to_le_bytes();
        });
        Self::with_seed(u64::from_le_bytes(seed_bytes))
    }

    /// Generator with a fixed seed, for reproducible mazes
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RandomSource for SimpleRng {
    fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }
}

/// Replays a fixed list of draws, wrapping around at the end.
///
/// Values are clamped into `[0, 1)`. An empty list behaves like a
/// generator that always returns `0.0`.
#[derive(Debug, Clone)]
pub struct SequenceRng {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceRng {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Number of draws taken so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceRng {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            self.cursor += 1;
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
