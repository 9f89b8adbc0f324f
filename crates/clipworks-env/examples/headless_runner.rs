//! Headless episode runner: a seeded random policy against the default map.
//!
//! Optionally takes a factory config file (TOML or RON) as the first
//! argument. Set `RUST_LOG=clipworks_core=debug` to see every build.
//!
//! Run with: `cargo run -p clipworks-env --example headless_runner -- [config.toml]`

use clipworks_core::config::FactoryConfig;
use clipworks_core::resource::ResourceKind;
use clipworks_core::rng::SimRng;
use clipworks_env::{Action, EnvConfig, FactoryEnv};
use std::path::PathBuf;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let factory = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => FactoryConfig::load(&path)?,
        None => FactoryConfig::default(),
    };
    let mut env = FactoryEnv::new(EnvConfig {
        factory,
        max_steps: 2_000,
        ..EnvConfig::default()
    })?;

    let mut policy = SimRng::new(42);
    for episode in 0..3u64 {
        env.reset(episode);
        loop {
            // Favour building over wandering so something gets produced.
            let action = match policy.next_below(4) {
                0 => Action::BuildExtractor,
                _ => Action::ALL[policy.next_below(Action::COUNT as u64) as usize],
            };
            if env.step(action).done {
                break;
            }
        }

        let totals = env.factory().query_totals();
        tracing::info!(
            episode,
            reward = env.episode_reward(),
            equipment = env.factory().equipment_count(),
            coal_ore = %totals[ResourceKind::CoalOre],
            iron_ore = %totals[ResourceKind::IronOre],
            steel = %totals[ResourceKind::Steel],
            paperclips = %totals[ResourceKind::Paperclip],
            "episode complete"
        );
    }
    Ok(())
}
