//! Deterministic PRNG for terrain generation and seeded cursor placement.
//!
//! Uses the SplitMix64 algorithm: fast, 8 bytes of state, and identical on
//! every platform, so the same seed always produces the same map.

use crate::fixed::Fixed64;

/// SplitMix64 pseudo-random number generator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SimRng {
    state: u64,
}

impl SimRng {
    /// Create a new RNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        mix(self.state)
    }

    /// Uniform integer in `0..bound`. Returns 0 when `bound` is 0.
    pub fn next_below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        // Multiply-shift keeps the bias below 2^-32 for any bound we use.
        ((self.next_u64() as u128 * bound as u128) >> 64) as u64
    }

    /// Uniform fixed-point value in `[0, 1)`.
    pub fn next_unit(&mut self) -> Fixed64 {
        unit_from_bits(self.next_u64())
    }

    /// Get the internal state (for hashing).
    pub fn state(&self) -> u64 {
        self.state
    }
}

/// The SplitMix64 output finalizer. Also used as a stateless hash for
/// lattice noise.
#[inline]
pub fn mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Map the upper 32 bits of `bits` to a Q32.32 value in `[0, 1)`.
#[inline]
pub fn unit_from_bits(bits: u64) -> Fixed64 {
    // For I32F32 the low 32 raw bits are exactly the fraction.
    Fixed64::from_bits((bits >> 32) as i64)
}
