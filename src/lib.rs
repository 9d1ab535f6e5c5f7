/*!
 * Partition Allocation Simulator Library
 * Contiguous memory allocation with first, best, and worst fit placement
 */

pub mod core;
pub mod memory;
pub mod monitoring;
pub mod process;
pub mod report;
pub mod simulation;

// Re-exports
pub use crate::core::errors::{ConfigError, LoadError, SimulationError};
pub use crate::core::types::{Address, Pid, Size};
pub use memory::{
    BlockHandle, FragmentationMetrics, MemoryBlock, MemoryError, MemoryLimits, MemoryManager,
    MemoryResult, MemoryStats, PlacementStrategy,
};
pub use monitoring::init_tracing;
pub use process::{load_workload, parse_workload, Process, ProcessSpec, ProcessState, Workload};
pub use simulation::{compare_strategies, run_simulation, SimulationConfig, SimulationRun};
