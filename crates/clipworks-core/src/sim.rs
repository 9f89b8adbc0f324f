//! Simulation bookkeeping: tick counter, per-step results, and the state hash.

use crate::fixed::{Fixed64, Ticks};
use crate::resource::ResourceMap;

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

/// Mutable simulation state tracked by the factory.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SimState {
    /// Number of completed ticks since the last reset.
    pub tick: Ticks,
}

impl SimState {
    pub fn new() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Step result
// ---------------------------------------------------------------------------

/// What a `step()` (or a run of steps) changed.
///
/// Only extraction and conversion count: belt transfers move resources
/// without producing or consuming anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepResult {
    /// The tick number just completed.
    pub tick: Ticks,
    /// New quantity created per kind (ore from extraction, steel, paperclips).
    pub produced: ResourceMap,
    /// Quantity destroyed per kind (deposits drawn, ore smelted, steel used).
    pub consumed: ResourceMap,
}

impl StepResult {
    /// Net change per kind: `produced - consumed`.
    pub fn net(&self) -> ResourceMap {
        let mut net = self.produced;
        for (kind, q) in self.consumed.iter() {
            net.add(kind, -q);
        }
        net
    }

    /// Fold a later step into this one.
    pub fn merge(&mut self, later: &StepResult) {
        self.tick = later.tick;
        self.produced.accumulate(&later.produced);
        self.consumed.accumulate(&later.consumed);
    }
}

// ---------------------------------------------------------------------------
// State hash
// ---------------------------------------------------------------------------

/// A simple deterministic hash of simulation state for desync detection.
///
/// Uses FNV-1a (64-bit) for speed and simplicity. Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(pub u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_fixed64(&mut self, v: Fixed64) {
        self.write(&v.to_bits().to_le_bytes());
    }

    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}
