/*!
 * Process Module
 * Process records and workload loading
 */

pub mod loader;
pub mod types;

// Re-export for convenience
pub use loader::{load_workload, parse_workload, SkipReason, SkippedLine, Workload};
pub use types::{Process, ProcessCounts, ProcessSpec, ProcessState};
