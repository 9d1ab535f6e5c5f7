/*!
 * System Limits and Constants
 *
 * Centralized location for simulator-wide limits, thresholds, and magic numbers.
 * Grouped by domain; every value here is a default that `MemoryLimits` or
 * `SimulationConfig` may override.
 */

// =============================================================================
// MEMORY LIMITS
// =============================================================================

/// Maximum number of blocks tracked by one block table
pub const MAX_BLOCKS: usize = 100;

/// A free block is only split when the leftover exceeds this many KB.
/// Anything at or below stays inside the allocation as internal fragmentation.
pub const SPLIT_THRESHOLD: usize = 10;

/// Memory pressure: usage ratio at which allocations are logged as MEDIUM
pub const PRESSURE_MEDIUM: f64 = 0.60;

/// Memory pressure: usage ratio at which allocations are logged as HIGH
pub const PRESSURE_HIGH: f64 = 0.80;

/// Memory pressure: usage ratio at which allocations are logged as CRITICAL
pub const PRESSURE_CRITICAL: f64 = 0.95;

// =============================================================================
// WORKLOAD LIMITS
// =============================================================================

/// Maximum number of processes read from a workload file
pub const MAX_PROCESSES: usize = 20;

/// Workload file used when none is given on the command line
pub const DEFAULT_INPUT_FILE: &str = "input.txt";

/// Arrival time assumed when a process line omits it
pub const DEFAULT_ARRIVAL_TIME: u32 = 0;

/// Duration assumed when a process line omits it
pub const DEFAULT_DURATION: u32 = 10;

// =============================================================================
// SIMULATION
// =============================================================================

/// Process ID used for the stress allocation phase
pub const STRESS_PROCESS_ID: u32 = 9999;

/// Stress allocation size as a percentage of free memory
pub const DEFAULT_STRESS_PERCENT: f64 = 50.0;

/// Accepted range for the stress percentage (inclusive)
pub const STRESS_PERCENT_MIN: f64 = 1.0;
pub const STRESS_PERCENT_MAX: f64 = 100.0;
