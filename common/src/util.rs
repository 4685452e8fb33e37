use serde::{Deserialize, Serialize};

// Seeded xorshift64 generator. Its state is part of every round snapshot so
// that replays with the same seed reproduce the same board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PseudoRandom {
    state: u64,
}

impl PseudoRandom {
    pub fn new(seed: u64) -> Self {
        // splitmix64 finalizer, so that small consecutive seeds start far apart
        let mut z = seed.wrapping_add(0x9e3779b97f4a7c15);
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^= z >> 31;
        // xorshift never leaves the zero state
        let state = if z == 0 { 0x1234567890abcdef } else { z };
        PseudoRandom { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform value in `0..bound`. Returns 0 when `bound` is 0.
    pub fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        // Multiply-shift keeps the result unbiased enough for board sizes and
        // avoids the low-bit weakness of a plain modulo.
        ((u64::from(self.next_u32()) * u64::from(bound)) >> 32) as u32
    }

    pub fn next_index(&mut self, len: usize) -> usize {
        self.next_below(len.min(u32::MAX as usize) as u32) as usize
    }
}
