/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

// Re-export MemoryError from memory module
pub use crate::memory::MemoryError;

/// Workload file errors
#[derive(Error, Debug, Diagnostic)]
pub enum LoadError {
    #[error("Could not read workload file '{}'", path.display())]
    #[diagnostic(
        code(load::io),
        help("Check that the file exists and is readable. Pass a path as the first argument.")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Workload has no memory size line")]
    #[diagnostic(
        code(load::missing_memory_size),
        help("The first non-comment line must hold the memory size in KB.")
    )]
    MissingMemorySize,

    #[error("Invalid memory size on line {line}: '{value}'")]
    #[diagnostic(
        code(load::invalid_memory_size),
        help("The memory size must be a positive integer (KB).")
    )]
    InvalidMemorySize { line: usize, value: String },

    #[error("No valid processes found in '{source_name}'")]
    #[diagnostic(
        code(load::no_processes),
        help("Process lines look like `<id> <size> [arrival] [duration]`.")
    )]
    NoProcesses { source_name: String },
}

/// Simulation configuration errors
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("Could not read config file '{}'", path.display())]
    #[diagnostic(code(config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config file '{}'", path.display())]
    #[diagnostic(code(config::parse), help("The config file must be JSON."))]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Stress percentage {0} is out of range")]
    #[diagnostic(
        code(config::stress_percent),
        help("Use a percentage between 1 and 100 (inclusive).")
    )]
    InvalidStressPercent(f64),

    #[error("max_blocks must be at least 1")]
    #[diagnostic(code(config::max_blocks))]
    ZeroMaxBlocks,

    #[error("No placement strategies configured")]
    #[diagnostic(
        code(config::no_strategies),
        help("List at least one of first_fit, best_fit, worst_fit.")
    )]
    NoStrategies,

    #[error("Invalid value for {var}: '{value}'")]
    #[diagnostic(code(config::env))]
    InvalidEnv { var: &'static str, value: String },
}

/// Unified simulator error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum SimulationError {
    #[error("Memory error: {0}")]
    #[diagnostic(transparent)]
    Memory(#[from] MemoryError),

    #[error("Workload error: {0}")]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),

    #[error("Config error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}
