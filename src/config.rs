use std::path::Path;

use crate::ai::{Agent, MinimaxAgent, RandomAgent};
use crate::error::ConfigError;
use crate::game::{BoardGeometry, VariantKind};

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub ai: AiConfig,
    pub network: NetworkConfig,
    pub display: BoardGeometry,
    pub animation: AnimationConfig,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub variant: VariantKind,
}

/// Who the human plays against in local mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpponentKind {
    #[default]
    Minimax,
    Random,
    /// Hot-seat: both colors are played at the same device.
    None,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub opponent: OpponentKind,
    /// Minimax search depth in plies.
    pub depth: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig {
            opponent: OpponentKind::Minimax,
            depth: 4,
        }
    }
}

impl AiConfig {
    pub fn build_agent(&self) -> Option<Box<dyn Agent>> {
        match self.opponent {
            OpponentKind::Minimax => Some(Box::new(MinimaxAgent::new(self.depth))),
            OpponentKind::Random => Some(Box::new(RandomAgent::new())),
            OpponentKind::None => None,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Players required before the authority marks the room ready.
    pub expected_peers: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig { expected_peers: 2 }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Milliseconds per row while a piece is falling.
    pub tick_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig { tick_ms: 40 }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ai.depth == 0 {
            return Err(ConfigError::Validation("ai.depth must be >= 1".into()));
        }
        if self.network.expected_peers < 2 {
            return Err(ConfigError::Validation(
                "network.expected_peers must be >= 2".into(),
            ));
        }
        if self.display.cell_size.is_nan() || self.display.cell_size <= 0.0 {
            return Err(ConfigError::Validation(
                "display.cell_size must be > 0".into(),
            ));
        }
        if self.animation.tick_ms == 0 {
            return Err(ConfigError::Validation(
                "animation.tick_ms must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&AppConfig::default())
    }
}
