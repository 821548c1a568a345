//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/avlkit/avlkit.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `AVLKIT_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};

/// Largest workload the driver accepts.
pub const MAX_COUNT_LIMIT: usize = 1 << 24;

/// Parameters of the stress driver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DriverSettings {
    /// Number of distinct keys inserted per cycle (keys are `0..max_count`)
    pub max_count: usize,
    /// Keys at permutation positions below this survive the removal phase
    pub min_count: usize,
    /// Number of insert/remove/trim rounds
    pub cycles: usize,
    /// Keys strictly above this bound are dropped at the end of each cycle
    pub upper_bound: i64,
    /// Seed of the key permutation
    pub seed: u64,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            max_count: 1024,
            min_count: 16,
            cycles: 2,
            upper_bound: 220,
            seed: 0x5eed,
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit from base).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDriverSettings {
    pub max_count: Option<usize>,
    pub min_count: Option<usize>,
    pub cycles: Option<usize>,
    pub upper_bound: Option<i64>,
    pub seed: Option<u64>,
}

/// Get the XDG config directory for avlkit.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "avlkit").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("avlkit.toml"))
}

/// Load a TOML file into RawDriverSettings for manual merging.
fn load_raw_settings(path: &Path) -> ApplicationResult<RawDriverSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl DriverSettings {
    /// Overlay wins where it specifies a value.
    pub fn merge_with(&self, overlay: &RawDriverSettings) -> Self {
        Self {
            max_count: overlay.max_count.unwrap_or(self.max_count),
            min_count: overlay.min_count.unwrap_or(self.min_count),
            cycles: overlay.cycles.unwrap_or(self.cycles),
            upper_bound: overlay.upper_bound.unwrap_or(self.upper_bound),
            seed: overlay.seed.unwrap_or(self.seed),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file; unlike the global file it must exist
    pub fn load(explicit: Option<&Path>) -> ApplicationResult<Self> {
        let global = global_config_path().filter(|path| path.exists());
        Self::load_from(global.as_deref(), explicit, Self::environment())
    }

    /// Same as [`DriverSettings::load`] with every source given explicitly.
    #[instrument(level = "debug", skip(env))]
    pub fn load_from(
        global: Option<&Path>,
        explicit: Option<&Path>,
        env: Environment,
    ) -> ApplicationResult<Self> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global {
            current = current.merge_with(&load_raw_settings(global_path)?);
            debug!(path = %global_path.display(), "applied global config");
        }

        // 3. Explicit config file
        if let Some(path) = explicit {
            current = current.merge_with(&load_raw_settings(path)?);
            debug!(path = %path.display(), "applied explicit config");
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current, env)?;

        Ok(current)
    }

    /// The `AVLKIT_*` environment source, e.g. `AVLKIT_MAX_COUNT=4096`.
    pub fn environment() -> Environment {
        Environment::with_prefix("AVLKIT")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn apply_env_overrides(mut settings: Self, env: Environment) -> ApplicationResult<Self> {
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get::<usize>("max_count") {
            settings.max_count = val;
        }
        if let Ok(val) = config.get::<usize>("min_count") {
            settings.min_count = val;
        }
        if let Ok(val) = config.get::<usize>("cycles") {
            settings.cycles = val;
        }
        if let Ok(val) = config.get::<i64>("upper_bound") {
            settings.upper_bound = val;
        }
        if let Ok(val) = config.get::<u64>("seed") {
            settings.seed = val;
        }

        Ok(settings)
    }

    /// Rejects parameter combinations the driver cannot run.
    pub fn validate(&self) -> ApplicationResult<()> {
        let invalid = |reason: String| Err(ApplicationError::InvalidParameters { reason });
        if self.max_count == 0 {
            return invalid("max_count must be positive".into());
        }
        if self.max_count > MAX_COUNT_LIMIT {
            return invalid(format!(
                "max_count {} exceeds limit {}",
                self.max_count, MAX_COUNT_LIMIT
            ));
        }
        if self.min_count > self.max_count {
            return invalid(format!(
                "min_count {} exceeds max_count {}",
                self.min_count, self.max_count
            ));
        }
        if self.cycles == 0 {
            return invalid("cycles must be positive".into());
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# avlkit configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/avlkit/avlkit.toml
#   Explicit: avlkit --config <file>
#   Env:      AVLKIT_* environment variables (e.g. AVLKIT_MAX_COUNT)

# Distinct keys inserted per cycle
# max_count = 1024

# Keys surviving the removal phase
# min_count = 16

# Number of rounds
# cycles = 2

# Keys above this bound are dropped at the end of each round
# upper_bound = 220

# Permutation seed
# seed = 24301
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
