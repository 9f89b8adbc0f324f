//! Episode wrapper around a [`Factory`]: one action and one tick per step,
//! weighted production as reward, a step limit, and a cursor-centred
//! observation window.

use crate::action::{Action, ActionError};
use crate::reward::RewardWeights;
use clipworks_core::config::{ConfigError, FactoryConfig};
use clipworks_core::factory::Factory;
use clipworks_core::grid::GridPosition;
use clipworks_core::query::CellSnapshot;
use clipworks_core::resource::ResourceMap;
use clipworks_core::rng::SimRng;
use serde::{Deserialize, Serialize};

// ===========================================================================
// Errors
// ===========================================================================

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("observation window must be at least 1 cell, got {0}")]
    InvalidWindow(u32),

    #[error("max_steps must be at least 1")]
    ZeroMaxSteps,

    #[error(transparent)]
    Action(#[from] ActionError),
}

// ===========================================================================
// Config
// ===========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    pub factory: FactoryConfig,
    pub rewards: RewardWeights,
    /// Episode length in steps.
    pub max_steps: u64,
    /// Side length of the square observation window. Clipped to the map.
    pub window: u32,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            factory: FactoryConfig::default(),
            rewards: RewardWeights::default(),
            max_steps: 10_000,
            window: 8,
        }
    }
}

// ===========================================================================
// Step output
// ===========================================================================

/// What one `step` did.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub reward: f64,
    /// The step limit has been reached.
    pub done: bool,
    /// Whether the action changed anything before the tick ran.
    pub action_applied: bool,
    pub produced: ResourceMap,
    pub consumed: ResourceMap,
    pub cursor: GridPosition,
    /// Resources under the cursor after the tick.
    pub cursor_resources: ResourceMap,
}

/// A square window of cells around the cursor, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Map position of the window's top-left cell.
    pub origin: GridPosition,
    pub width: u32,
    pub height: u32,
    pub cells: Vec<CellSnapshot>,
    /// Cursor position relative to `origin`.
    pub cursor_offset: (u32, u32),
}

impl Observation {
    /// The cell at window-relative `(x, y)`.
    pub fn cell(&self, x: u32, y: u32) -> Option<&CellSnapshot> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get((y * self.width + x) as usize)
    }
}

// ===========================================================================
// FactoryEnv
// ===========================================================================

#[derive(Debug)]
pub struct FactoryEnv {
    factory: Factory,
    rewards: RewardWeights,
    max_steps: u64,
    window: u32,
    steps: u64,
    episode_reward: f64,
}

impl FactoryEnv {
    pub fn new(config: EnvConfig) -> Result<Self, EnvError> {
        if config.window == 0 {
            return Err(EnvError::InvalidWindow(config.window));
        }
        if config.max_steps == 0 {
            return Err(EnvError::ZeroMaxSteps);
        }
        let factory = Factory::new(&config.factory)?;
        Ok(Self {
            factory,
            rewards: config.rewards,
            max_steps: config.max_steps,
            window: config.window,
            steps: 0,
            episode_reward: 0.0,
        })
    }

    /// Start a new episode: fresh terrain and a random cursor, both derived
    /// from `seed`.
    pub fn reset(&mut self, seed: u64) -> Observation {
        let grid = self.factory.grid();
        let mut rng = SimRng::new(seed);
        let cursor = GridPosition::new(
            rng.next_below(u64::from(grid.width())) as i32,
            rng.next_below(u64::from(grid.height())) as i32,
        );
        let terrain_seed = rng.next_u64();
        self.factory.reset(terrain_seed, cursor);
        self.steps = 0;
        self.episode_reward = 0.0;
        tracing::debug!(seed, x = cursor.x, y = cursor.y, "episode reset");
        self.observe()
    }

    /// Apply `action`, advance one tick, and score the tick's production.
    pub fn step(&mut self, action: Action) -> Transition {
        let action_applied = action.apply(&mut self.factory);
        let result = self.factory.step();
        self.steps += 1;

        let reward = self.rewards.score(&result.produced);
        self.episode_reward += reward;
        let done = self.steps >= self.max_steps;
        if done {
            tracing::debug!(
                steps = self.steps,
                reward = self.episode_reward,
                "episode finished"
            );
        }

        let cursor = self.factory.cursor();
        Transition {
            reward,
            done,
            action_applied,
            produced: result.produced,
            consumed: result.consumed,
            cursor,
            cursor_resources: self.factory.query_cell(cursor).resources,
        }
    }

    /// [`FactoryEnv::step`] from a discrete action index.
    pub fn step_index(&mut self, index: usize) -> Result<Transition, EnvError> {
        let action = Action::try_from(index)?;
        Ok(self.step(action))
    }

    /// The window around the cursor, shifted to stay inside the map.
    pub fn observe(&self) -> Observation {
        let grid = self.factory.grid();
        let width = self.window.min(grid.width());
        let height = self.window.min(grid.height());
        let cursor = self.factory.cursor();

        let origin_axis = |c: i32, span: u32, limit: u32| -> i32 {
            let half = (span / 2) as i32;
            (c - half).clamp(0, (limit - span) as i32)
        };
        let origin = GridPosition::new(
            origin_axis(cursor.x, width, grid.width()),
            origin_axis(cursor.y, height, grid.height()),
        );

        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                cells.push(self.factory.query_cell(origin.offset(x, y)));
            }
        }

        Observation {
            origin,
            width,
            height,
            cells,
            cursor_offset: ((cursor.x - origin.x) as u32, (cursor.y - origin.y) as u32),
        }
    }

    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    /// Mutable access for scripted setups between steps.
    pub fn factory_mut(&mut self) -> &mut Factory {
        &mut self.factory
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn max_steps(&self) -> u64 {
        self.max_steps
    }

    /// Total reward since the last reset.
    pub fn episode_reward(&self) -> f64 {
        self.episode_reward
    }

    pub fn is_done(&self) -> bool {
        self.steps >= self.max_steps
    }
}
