/*!
 * Memory Traits
 * Allocation, placement, and statistics abstractions
 */

use super::block_list::BlockList;
use super::types::*;
use crate::core::types::Size;
use crate::process::Process;

/// Placement search over a block table.
///
/// Implementations are pure: they inspect the table and return the position
/// of the chosen free block, or `None` when no single free block fits.
pub trait PlacementPolicy {
    fn find(&self, blocks: &BlockList, size: Size) -> Option<usize>;
}

/// Process-level allocator interface
pub trait Allocator {
    /// Bind a block to a process
    fn allocate(&mut self, process: &mut Process) -> MemoryResult<BlockHandle>;

    /// Release the process's block, if any, and coalesce
    fn deallocate(&mut self, process: &mut Process) -> MemoryResult<Option<Release>>;
}

/// Memory statistics provider
pub trait MemoryInfo {
    /// Get overall memory statistics
    fn stats(&self) -> MemoryStats;

    /// Get memory info as (total, used, free)
    fn info(&self) -> (Size, Size, Size);

    /// Fraction of the address space in use
    fn utilization(&self) -> f64 {
        let (total, used, _) = self.info();
        if total == 0 {
            0.0
        } else {
            used as f64 / total as f64
        }
    }

    /// Get memory pressure level
    fn pressure(&self) -> MemoryPressure {
        self.stats().memory_pressure()
    }
}
