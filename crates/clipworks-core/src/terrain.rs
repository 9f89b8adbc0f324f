//! Deposit layouts and the seeded terrain generator.
//!
//! A [`DepositLayout`] is the hand-off between terrain generation and the
//! factory: a list of deposit cells and their starting stock. The factory
//! accepts any layout through [`crate::factory::Factory::reset_with_layout`],
//! and uses its configured [`TerrainGenerator`] when reset from a seed.
//!
//! [`ValueNoiseTerrain`] is the built-in generator: two independent fields of
//! fractal value noise (one per deposit kind), thresholded per cell. It runs
//! entirely in Q32.32 so layouts are identical on every platform.

use crate::config::{ConfigError, TerrainConfig};
use crate::fixed::{Fixed64, Quantity, f64_to_fixed64};
use crate::grid::{Grid, GridPosition};
use crate::resource::ResourceKind;
use crate::rng::{SimRng, mix, unit_from_bits};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DepositLayout
// ---------------------------------------------------------------------------

/// One seeded deposit cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Deposit {
    pub position: GridPosition,
    pub kind: ResourceKind,
    pub quantity: Quantity,
}

/// The deposits to seed on reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositLayout {
    pub deposits: Vec<Deposit>,
}

impl DepositLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a deposit. Builder-style.
    pub fn with(mut self, position: GridPosition, kind: ResourceKind, quantity: Quantity) -> Self {
        self.push(position, kind, quantity);
        self
    }

    pub fn push(&mut self, position: GridPosition, kind: ResourceKind, quantity: Quantity) {
        self.deposits.push(Deposit {
            position,
            kind,
            quantity,
        });
    }

    pub fn len(&self) -> usize {
        self.deposits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deposits.is_empty()
    }

    /// Number of deposit cells of the given kind.
    pub fn count(&self, kind: ResourceKind) -> usize {
        self.deposits.iter().filter(|d| d.kind == kind).count()
    }
}

// ---------------------------------------------------------------------------
// TerrainGenerator
// ---------------------------------------------------------------------------

/// Produces a deposit layout for a grid from a seed.
///
/// Implementations must be pure: the same `(grid, seed)` always yields the
/// same layout.
pub trait TerrainGenerator: std::fmt::Debug + Send + Sync {
    fn generate(&self, grid: Grid, seed: u64) -> DepositLayout;
}

/// A generator that never places deposits. Useful when layouts are always
/// supplied explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct BarrenTerrain;

impl TerrainGenerator for BarrenTerrain {
    fn generate(&self, _grid: Grid, _seed: u64) -> DepositLayout {
        DepositLayout::new()
    }
}

// ---------------------------------------------------------------------------
// ValueNoiseTerrain
// ---------------------------------------------------------------------------

/// Fractal value-noise deposit generator.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueNoiseTerrain {
    /// Noise-space step per cell for the base octave.
    base_frequency: Fixed64,
    octaves: u32,
    coal_threshold: Fixed64,
    iron_threshold: Fixed64,
    deposit_amount: Quantity,
}

impl ValueNoiseTerrain {
    pub fn new(config: &TerrainConfig) -> Result<Self, ConfigError> {
        if !(config.scale.is_finite() && config.scale > 0.0) {
            return Err(ConfigError::InvalidTerrain { field: "scale" });
        }
        if config.octaves == 0 {
            return Err(ConfigError::InvalidTerrain { field: "octaves" });
        }
        let amount = config.deposit_amount;
        if !amount.is_finite() || amount < 0.0 || amount > i32::MAX as f64 {
            return Err(ConfigError::InvalidQuantity {
                field: "terrain.deposit_amount",
                value: amount,
            });
        }
        Ok(Self {
            base_frequency: f64_to_fixed64(1.0 / config.scale),
            // Beyond ~24 octaves the frequency doubling overflows Q32.32 on
            // large maps and the amplitudes are below resolution anyway.
            octaves: config.octaves.min(24),
            coal_threshold: f64_to_fixed64(config.coal_threshold.clamp(-2.0, 2.0)),
            iron_threshold: f64_to_fixed64(config.iron_threshold.clamp(-2.0, 2.0)),
            deposit_amount: f64_to_fixed64(amount),
        })
    }

    /// Fractal noise in `[-1, 1]` at a cell for one field.
    pub fn sample(&self, field_seed: u64, pos: GridPosition) -> Fixed64 {
        let mut total = Fixed64::ZERO;
        let mut weight = Fixed64::ZERO;
        let mut amplitude = Fixed64::from_num(1);
        let mut frequency = self.base_frequency;

        for octave in 0..self.octaves {
            let x = Fixed64::from_num(pos.x).saturating_mul(frequency);
            let y = Fixed64::from_num(pos.y).saturating_mul(frequency);
            let seed = field_seed ^ mix(octave as u64 + 1);
            total += amplitude * value_noise(seed, x, y);
            weight += amplitude;
            amplitude /= 2;
            frequency = frequency.saturating_mul(Fixed64::from_num(2));
        }

        if weight == Fixed64::ZERO {
            Fixed64::ZERO
        } else {
            total / weight
        }
    }
}

impl Default for ValueNoiseTerrain {
    fn default() -> Self {
        Self::new(&TerrainConfig::default())
            .unwrap_or_else(|e| unreachable!("default terrain config is valid: {e}"))
    }
}

impl TerrainGenerator for ValueNoiseTerrain {
    fn generate(&self, grid: Grid, seed: u64) -> DepositLayout {
        let mut seeds = SimRng::new(seed);
        let coal_seed = seeds.next_u64();
        let iron_seed = seeds.next_u64();

        let mut layout = DepositLayout::new();
        for pos in grid.positions() {
            if self.sample(coal_seed, pos) > self.coal_threshold {
                layout.push(pos, ResourceKind::CoalDeposit, self.deposit_amount);
            }
            if self.sample(iron_seed, pos) > self.iron_threshold {
                layout.push(pos, ResourceKind::IronDeposit, self.deposit_amount);
            }
        }
        layout
    }
}

/// Lattice value in `[-1, 1)` at integer coordinates.
fn lattice(seed: u64, ix: i64, iy: i64) -> Fixed64 {
    let h = mix(seed ^ mix((ix as u64) ^ mix(iy as u64).rotate_left(32)));
    unit_from_bits(h) * 2 - Fixed64::from_num(1)
}

/// Smoothstep-interpolated value noise at a fractional point.
fn value_noise(seed: u64, x: Fixed64, y: Fixed64) -> Fixed64 {
    let ix: i64 = x.floor().to_num();
    let iy: i64 = y.floor().to_num();
    let tx = smoothstep(x.frac());
    let ty = smoothstep(y.frac());

    let v00 = lattice(seed, ix, iy);
    let v10 = lattice(seed, ix + 1, iy);
    let v01 = lattice(seed, ix, iy + 1);
    let v11 = lattice(seed, ix + 1, iy + 1);

    let top = v00 + (v10 - v00) * tx;
    let bottom = v01 + (v11 - v01) * tx;
    top + (bottom - top) * ty
}

fn smoothstep(t: Fixed64) -> Fixed64 {
    t * t * (Fixed64::from_num(3) - t * 2)
}
