//! Typed runner configuration: built-in defaults, overridden by an optional
//! RON config file, overridden by CLI flags (see `SPEC_FULL.md` §6.1/§7.2).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bg_core::strategy::StrategyName;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RunnerError};

/// Default worker-pool size when neither config nor CLI specifies one.
const DEFAULT_WORKER_CAP: usize = 8;

/// Runner-wide configuration, three-layer precedence: built-in default, then
/// `--config PATH` (or the bundled default below), then individual CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Default tick cap applied to every battle unless a scenario overrides it.
    pub default_tick_cap: u64,
    /// Default worker-pool size for tournaments and sweeps (`0` = `min(cpu_count, 8)`).
    pub worker_count: usize,
    /// Default output directory for `tourney`/`plot` result files.
    pub output_dir: PathBuf,
    /// Extra strategy names a deployment can register, each an alias for one
    /// of the five built-ins (`SPEC_FULL.md` §4.3's closed vocabulary) — this
    /// lets an operator hand out a friendlier name without a recompile.
    pub custom_strategies: HashMap<String, StrategyName>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            default_tick_cap: bg_core::engine::DEFAULT_TICK_CAP,
            worker_count: 0,
            output_dir: PathBuf::from("results"),
            custom_strategies: HashMap::new(),
        }
    }
}

impl RunnerConfig {
    /// Load from an optional RON file, falling back to built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Resource`] if `path` is given but unreadable,
    /// or [`RunnerError::ConfigParseError`] if its contents aren't valid RON
    /// for this shape.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else { return Ok(Self::default()) };
        let text = std::fs::read_to_string(path).map_err(|e| RunnerError::resource(path, e))?;
        ron::de::from_str(&text)
            .map_err(|e| RunnerError::ConfigParseError { path: path.to_path_buf(), message: e.to_string() })
    }

    /// Validate the configuration, producing a [`RunnerError::InvalidArgument`]
    /// for anything out of range (§7.2: unknown field, out-of-range worker
    /// count, tick cap of zero are all configuration errors).
    pub fn validate(&self) -> Result<()> {
        if self.default_tick_cap == 0 {
            return Err(RunnerError::InvalidArgument {
                name: "default_tick_cap".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Resolved worker-pool size: `worker_count` if set, else `min(cpu_count, 8)`.
    #[must_use]
    pub fn resolved_worker_count(&self) -> usize {
        if self.worker_count > 0 {
            return self.worker_count;
        }
        std::thread::available_parallelism().map(std::num::NonZeroUsize::get).unwrap_or(1).min(DEFAULT_WORKER_CAP)
    }

    /// Resolve a strategy name, checking the registered custom aliases before
    /// falling back to the five built-ins.
    ///
    /// # Errors
    ///
    /// Returns [`bg_core::error::BattleError::UnknownStrategy`] if `name`
    /// matches neither a custom alias nor a built-in.
    pub fn resolve_strategy(&self, name: &str) -> bg_core::error::Result<StrategyName> {
        if let Some(&resolved) = self.custom_strategies.get(name) {
            return Ok(resolved);
        }
        StrategyName::parse(name)
    }

    /// Apply a CLI-provided worker count override, if present.
    #[must_use]
    pub fn with_worker_count_override(mut self, override_count: Option<usize>) -> Self {
        if let Some(count) = override_count {
            self.worker_count = count;
        }
        self
    }

    /// Apply a CLI-provided output directory override, if present.
    #[must_use]
    pub fn with_output_dir_override(mut self, override_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = override_dir {
            self.output_dir = dir;
        }
        self
    }

    /// Apply a CLI-provided tick cap override, if present.
    #[must_use]
    pub fn with_tick_cap_override(mut self, override_cap: Option<u64>) -> Self {
        if let Some(cap) = override_cap {
            self.default_tick_cap = cap;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(RunnerConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_tick_cap_is_rejected() {
        let mut config = RunnerConfig::default();
        config.default_tick_cap = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let config = RunnerConfig::load(None).unwrap();
        assert_eq!(config.default_tick_cap, bg_core::engine::DEFAULT_TICK_CAP);
    }

    #[test]
    fn cli_overrides_win_over_defaults() {
        let config = RunnerConfig::default().with_worker_count_override(Some(4)).with_tick_cap_override(Some(500));
        assert_eq!(config.worker_count, 4);
        assert_eq!(config.default_tick_cap, 500);
    }

    #[test]
    fn custom_strategy_alias_resolves() {
        let mut config = RunnerConfig::default();
        config.custom_strategies.insert("turtle".to_string(), StrategyName::Daft);
        assert_eq!(config.resolve_strategy("turtle").unwrap(), StrategyName::Daft);
        assert_eq!(config.resolve_strategy("DAFT").unwrap(), StrategyName::Daft);
        assert!(config.resolve_strategy("nonsense").is_err());
    }

    #[test]
    fn load_from_ron_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        std::fs::write(
            &path,
            "(default_tick_cap: 2000, worker_count: 2, output_dir: \"out\", custom_strategies: {})",
        )
        .unwrap();
        let config = RunnerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.default_tick_cap, 2000);
        assert_eq!(config.worker_count, 2);
    }
}
