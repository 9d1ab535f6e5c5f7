/*!
 * Simulation Configuration
 *
 * JSON config file plus environment overrides.
 *
 * Environment variables:
 * - PARTITION_SIM_CONFIG: config file used when `--config` is not given
 * - PARTITION_SIM_STRESS_PERCENT: stress allocation percentage (1-100)
 * - PARTITION_SIM_MAX_BLOCKS: block table limit
 */

use crate::core::errors::ConfigError;
use crate::core::limits::{
    DEFAULT_STRESS_PERCENT, MAX_PROCESSES, STRESS_PERCENT_MAX, STRESS_PERCENT_MIN,
};
use crate::core::types::Pid;
use crate::memory::{MemoryLimits, PlacementStrategy};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_CONFIG: &str = "PARTITION_SIM_CONFIG";
pub const ENV_STRESS_PERCENT: &str = "PARTITION_SIM_STRESS_PERCENT";
pub const ENV_MAX_BLOCKS: &str = "PARTITION_SIM_MAX_BLOCKS";

/// Which running processes the termination phase frees
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationPlan {
    None,
    All,
    /// Every second running process, starting with the first
    #[default]
    Alternate,
    /// Specific process IDs, in order
    Ids(Vec<Pid>),
}

/// Decisions for the four simulation phases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PhasePlan {
    /// Processes allocated in phase 1, in input order (`None` = all)
    pub initial_allocations: Option<usize>,
    pub termination: TerminationPlan,
    /// New processes allocated in phase 3 (`None` = all remaining)
    pub additional_allocations: Option<usize>,
    /// Stress request size as a percentage of free memory
    pub stress_percent: f64,
}

impl Default for PhasePlan {
    fn default() -> Self {
        Self {
            initial_allocations: None,
            termination: TerminationPlan::default(),
            additional_allocations: None,
            stress_percent: DEFAULT_STRESS_PERCENT,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SimulationConfig {
    pub limits: MemoryLimits,
    /// Maximum number of processes read from a workload
    pub max_processes: usize,
    pub plan: PhasePlan,
    /// Strategies compared, in run order
    pub strategies: Vec<PlacementStrategy>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            limits: MemoryLimits::default(),
            max_processes: MAX_PROCESSES,
            plan: PhasePlan::default(),
            strategies: PlacementStrategy::ALL.to_vec(),
        }
    }
}

impl SimulationConfig {
    /// Read a JSON config file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build the effective config: explicit file, else `PARTITION_SIM_CONFIG`,
    /// else defaults; then environment overrides; then validation.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(ENV_CONFIG).map(PathBuf::from));

        let config = match path {
            Some(path) => {
                info!("Loading simulation config from {}", path.display());
                Self::load(&path)?
            }
            None => Self::default(),
        };

        let config = config.with_overrides(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in `resolve`)
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_STRESS_PERCENT) {
            self.plan.stress_percent =
                value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    var: ENV_STRESS_PERCENT,
                    value: value.clone(),
                })?;
        }
        if let Some(value) = lookup(ENV_MAX_BLOCKS) {
            self.limits.max_blocks =
                value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    var: ENV_MAX_BLOCKS,
                    value: value.clone(),
                })?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let pct = self.plan.stress_percent;
        if !(STRESS_PERCENT_MIN..=STRESS_PERCENT_MAX).contains(&pct) {
            return Err(ConfigError::InvalidStressPercent(pct));
        }
        if self.limits.max_blocks == 0 {
            return Err(ConfigError::ZeroMaxBlocks);
        }
        if self.strategies.is_empty() {
            return Err(ConfigError::NoStrategies);
        }
        Ok(())
    }
}
