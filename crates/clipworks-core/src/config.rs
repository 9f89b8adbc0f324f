//! Factory configuration: map size, flow-rate caps, furnace recipe, deposit
//! model, and terrain parameters.
//!
//! Configs are plain serde structs loadable from TOML or RON. Every field has
//! a default, so a config file only needs to name what it overrides. Values
//! are `f64` at this boundary and converted to [`Fixed64`] once, in
//! [`FactoryConfig::rules`].

use crate::fixed::{Fixed64, f64_to_fixed64};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors produced while loading or validating a [`FactoryConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Width or height is zero or does not fit the coordinate type.
    #[error("invalid grid size {width}x{height}")]
    InvalidGrid { width: u32, height: u32 },

    /// A rate, cost, or amount is negative or not finite.
    #[error("{field} must be a finite non-negative number, got {value}")]
    InvalidQuantity { field: &'static str, value: f64 },

    /// Furnace latency must be at least one tick.
    #[error("furnace latency must be at least 1 tick")]
    ZeroLatency,

    /// Terrain noise needs at least one octave and a positive scale.
    #[error("terrain {field} must be positive")]
    InvalidTerrain { field: &'static str },

    /// The file extension is not one we can parse.
    #[error("unsupported config format: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
}

impl Format {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "ron" => Some(Format::Ron),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }
}

// ===========================================================================
// Config types
// ===========================================================================

/// How deposits respond to extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositModel {
    /// Extraction draws down the deposit; an empty deposit yields nothing.
    #[default]
    Finite,
    /// Extraction yields ore without touching the deposit quantity.
    Infinite,
}

/// Per-kind, per-tick flow caps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    pub belt: f64,
    pub extractor: f64,
    pub paperclip_machine: f64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            belt: 25.0,
            extractor: 50.0,
            paperclip_machine: 50.0,
        }
    }
}

/// The furnace's fixed recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FurnaceConfig {
    /// Coal ore debited when a cook starts. Also the minimum a coal cell must
    /// hold; the threshold is inclusive, so a cell holding exactly this much
    /// qualifies.
    pub coal_cost: f64,
    /// Iron ore debited when a cook starts. Also the minimum an iron cell must
    /// hold, inclusive like `coal_cost`.
    pub iron_cost: f64,
    /// Steel credited when a cook finishes.
    pub steel_yield: f64,
    /// Ticks from start to emit, counting the start tick.
    pub latency: u32,
}

impl Default for FurnaceConfig {
    fn default() -> Self {
        Self {
            coal_cost: 2.0,
            iron_cost: 1.0,
            steel_yield: 1.0,
            latency: 3,
        }
    }
}

/// Parameters of the built-in fractal value-noise terrain generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Cells per unit of noise space.
    pub scale: f64,
    /// Number of noise octaves summed.
    pub octaves: u32,
    /// Cells whose coal noise exceeds this get a coal deposit.
    pub coal_threshold: f64,
    /// Cells whose iron noise exceeds this get an iron deposit.
    pub iron_threshold: f64,
    /// Quantity seeded into every deposit cell.
    pub deposit_amount: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            scale: 64.0,
            octaves: 6,
            coal_threshold: 0.2,
            iron_threshold: 0.3,
            deposit_amount: 1000.0,
        }
    }
}

/// Top-level factory configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    pub width: u32,
    pub height: u32,
    pub rates: RateConfig,
    pub furnace: FurnaceConfig,
    pub deposits: DepositModel,
    pub terrain: TerrainConfig,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            rates: RateConfig::default(),
            furnace: FurnaceConfig::default(),
            deposits: DepositModel::default(),
            terrain: TerrainConfig::default(),
        }
    }
}

// ===========================================================================
// Resolved rules
// ===========================================================================

/// The furnace recipe in simulation units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FurnaceRecipe {
    pub coal_cost: Fixed64,
    pub iron_cost: Fixed64,
    pub steel_yield: Fixed64,
    pub latency: u32,
}

/// Validated, fixed-point rule set handed to equipment at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rules {
    pub belt_rate: Fixed64,
    pub extractor_rate: Fixed64,
    pub paperclip_rate: Fixed64,
    pub furnace: FurnaceRecipe,
    pub deposits: DepositModel,
}

impl Default for Rules {
    fn default() -> Self {
        // The default config always validates.
        FactoryConfig::default()
            .rules()
            .unwrap_or_else(|e| unreachable!("default config is valid: {e}"))
    }
}

fn quantity(field: &'static str, value: f64) -> Result<Fixed64, ConfigError> {
    if !value.is_finite() || value < 0.0 || value > i32::MAX as f64 {
        return Err(ConfigError::InvalidQuantity { field, value });
    }
    Ok(f64_to_fixed64(value))
}

impl FactoryConfig {
    /// A default config with the given map size.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Check every field without converting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rules().map(|_| ())
    }

    /// Validate and convert to simulation units.
    pub fn rules(&self) -> Result<Rules, ConfigError> {
        if self.width == 0
            || self.height == 0
            || self.width > i32::MAX as u32
            || self.height > i32::MAX as u32
        {
            return Err(ConfigError::InvalidGrid {
                width: self.width,
                height: self.height,
            });
        }
        if self.furnace.latency == 0 {
            return Err(ConfigError::ZeroLatency);
        }
        if !(self.terrain.scale.is_finite() && self.terrain.scale > 0.0) {
            return Err(ConfigError::InvalidTerrain { field: "scale" });
        }
        if self.terrain.octaves == 0 {
            return Err(ConfigError::InvalidTerrain { field: "octaves" });
        }
        quantity("terrain.deposit_amount", self.terrain.deposit_amount)?;

        Ok(Rules {
            belt_rate: quantity("rates.belt", self.rates.belt)?,
            extractor_rate: quantity("rates.extractor", self.rates.extractor)?,
            paperclip_rate: quantity("rates.paperclip_machine", self.rates.paperclip_machine)?,
            furnace: FurnaceRecipe {
                coal_cost: quantity("furnace.coal_cost", self.furnace.coal_cost)?,
                iron_cost: quantity("furnace.iron_cost", self.furnace.iron_cost)?,
                steel_yield: quantity("furnace.steel_yield", self.furnace.steel_yield)?,
                latency: self.furnace.latency,
            },
            deposits: self.deposits,
        })
    }

    /// Parse a TOML config and validate it.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input).map_err(|e| ConfigError::Parse {
            file: PathBuf::from("<toml>"),
            detail: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a RON config and validate it.
    pub fn from_ron_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(input).map_err(|e| ConfigError::Parse {
            file: PathBuf::from("<ron>"),
            detail: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, choosing the parser from its extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = Format::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
            file: path.to_path_buf(),
        })?;
        let content = std::fs::read_to_string(path)?;
        let parsed = match format {
            Format::Toml => toml::from_str::<Self>(&content).map_err(|e| e.to_string()),
            Format::Ron => ron::from_str::<Self>(&content).map_err(|e| e.to_string()),
        };
        let config = parsed.map_err(|detail| ConfigError::Parse {
            file: path.to_path_buf(),
            detail,
        })?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_canonical_rules() {
        let rules = FactoryConfig::default().rules().unwrap();
        assert_eq!(rules.belt_rate, Fixed64::from_num(25));
        assert_eq!(rules.extractor_rate, Fixed64::from_num(50));
        assert_eq!(rules.paperclip_rate, Fixed64::from_num(50));
        assert_eq!(rules.furnace.coal_cost, Fixed64::from_num(2));
        assert_eq!(rules.furnace.iron_cost, Fixed64::from_num(1));
        assert_eq!(rules.furnace.steel_yield, Fixed64::from_num(1));
        assert_eq!(rules.furnace.latency, 3);
        assert_eq!(rules.deposits, DepositModel::Finite);
    }

    #[test]
    fn toml_overrides_only_named_fields() {
        let config = FactoryConfig::from_toml_str(
            r#"
            width = 16
            height = 8
            deposits = "infinite"

            [rates]
            belt = 100.0
            "#,
        )
        .unwrap();
        assert_eq!(config.width, 16);
        assert_eq!(config.height, 8);
        assert_eq!(config.rates.belt, 100.0);
        assert_eq!(config.rates.extractor, 50.0);
        assert_eq!(config.deposits, DepositModel::Infinite);
        assert_eq!(config.furnace, FurnaceConfig::default());
    }

    #[test]
    fn ron_config_parses() {
        let config = FactoryConfig::from_ron_str(
            "(width: 4, height: 4, furnace: (latency: 5), terrain: (octaves: 2))",
        )
        .unwrap();
        assert_eq!(config.furnace.latency, 5);
        assert_eq!(config.furnace.coal_cost, 2.0);
        assert_eq!(config.terrain.octaves, 2);
    }

    #[test]
    fn zero_grid_rejected() {
        let err = FactoryConfig::with_size(0, 4).validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGrid { width: 0, height: 4 }));
    }

    #[test]
    fn negative_rate_rejected() {
        let mut config = FactoryConfig::default();
        config.rates.belt = -1.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidQuantity { field: "rates.belt", .. }
        ));
    }

    #[test]
    fn zero_latency_rejected() {
        let mut config = FactoryConfig::default();
        config.furnace.latency = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroLatency)));
    }

    #[test]
    fn bad_toml_is_parse_error() {
        let err = FactoryConfig::from_toml_str("width = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unknown_extension_rejected() {
        let err = FactoryConfig::load(Path::new("factory.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }

    #[test]
    fn load_reads_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "clipworks-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "width = 12\nheight = 10\n").unwrap();
        let config = FactoryConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!((config.width, config.height), (12, 10));
    }

    #[test]
    fn format_detection() {
        assert_eq!(Format::from_path(Path::new("a.ron")), Some(Format::Ron));
        assert_eq!(Format::from_path(Path::new("a.toml")), Some(Format::Toml));
        assert_eq!(Format::from_path(Path::new("a")), None);
    }
}
