/*!
 * Memory Management
 *
 * Contiguous partition allocator over a fixed address space.
 *
 * ## Allocation
 *
 * - **Placement**: the manager's strategy (first, best, or worst fit) picks a
 *   free block large enough for the request
 * - **Splitting**: a block is split only when the leftover exceeds the split
 *   threshold; smaller leftovers stay inside the allocation
 * - **Admission**: requests larger than the free counter are rejected before
 *   any search
 *
 * ## Freeing
 *
 * - Released blocks are coalesced with free neighbours immediately, so no two
 *   adjacent blocks are ever both free between calls
 * - Process handles stay valid across every split and merge
 */

mod allocator;
mod coalesce;
mod inspect;

use super::block_list::BlockList;
use super::fragmentation::FragmentationMetrics;
use super::placement::PlacementStrategy;
use super::traits::{Allocator, MemoryInfo};
use super::types::{
    BlockHandle, MemoryBlock, MemoryError, MemoryLimits, MemoryResult, MemoryStats, Release,
};
use crate::core::types::Size;
use crate::process::Process;
use log::info;

/// Memory manager
///
/// Each manager is independent; a simulation run builds a fresh one per strategy.
#[derive(Debug, Clone)]
pub struct MemoryManager {
    total_memory: Size,
    // Always equal to the sum of free block sizes
    free_memory: Size,
    blocks: BlockList,
    strategy: PlacementStrategy,
    limits: MemoryLimits,
}

impl MemoryManager {
    pub fn new(total: Size, strategy: PlacementStrategy) -> MemoryResult<Self> {
        Self::with_limits(total, strategy, MemoryLimits::default())
    }

    /// Create memory manager with custom limits (useful for testing)
    pub fn with_limits(
        total: Size,
        strategy: PlacementStrategy,
        limits: MemoryLimits,
    ) -> MemoryResult<Self> {
        if total == 0 {
            return Err(MemoryError::InvalidCapacity);
        }
        if limits.max_blocks == 0 {
            return Err(MemoryError::InvalidBlockLimit);
        }

        info!(
            "Memory manager initialized with {} KB, {} placement (block limit {}, split threshold {} KB)",
            total, strategy, limits.max_blocks, limits.split_threshold
        );
        Ok(Self {
            total_memory: total,
            free_memory: total,
            blocks: BlockList::new(total, limits.max_blocks),
            strategy,
            limits,
        })
    }

    /// Rebuild a manager from an explicit block layout.
    ///
    /// Adjacent free blocks are accepted as given; call [`MemoryManager::coalesce`]
    /// to merge them.
    pub fn from_blocks(
        blocks: Vec<MemoryBlock>,
        strategy: PlacementStrategy,
        limits: MemoryLimits,
    ) -> MemoryResult<Self> {
        if limits.max_blocks == 0 {
            return Err(MemoryError::InvalidBlockLimit);
        }
        let blocks = BlockList::from_blocks(blocks, limits.max_blocks)?;
        let total = blocks.total_size();
        if total == 0 {
            return Err(MemoryError::InvalidCapacity);
        }
        Ok(Self {
            total_memory: total,
            free_memory: blocks.free_size(),
            blocks,
            strategy,
            limits,
        })
    }

    pub fn strategy(&self) -> PlacementStrategy {
        self.strategy
    }

    pub fn limits(&self) -> MemoryLimits {
        self.limits
    }

    pub fn total_memory(&self) -> Size {
        self.total_memory
    }

    pub fn free_memory(&self) -> Size {
        self.free_memory
    }

    pub fn used_memory(&self) -> Size {
        self.total_memory - self.free_memory
    }

    pub fn blocks(&self) -> &BlockList {
        &self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Block currently bound to a process
    pub fn block_of(&self, process: &Process) -> Option<&MemoryBlock> {
        process.block().and_then(|h| self.blocks.resolve(h))
    }

    /// Position of a process's block in address order
    pub fn position_of(&self, process: &Process) -> Option<usize> {
        process.block().and_then(|h| self.blocks.index_of(h))
    }

    pub fn fragmentation(&self) -> FragmentationMetrics {
        FragmentationMetrics::analyze(&self.blocks)
    }
}

// Implement trait interfaces
impl Allocator for MemoryManager {
    fn allocate(&mut self, process: &mut Process) -> MemoryResult<BlockHandle> {
        MemoryManager::allocate(self, process)
    }

    fn deallocate(&mut self, process: &mut Process) -> MemoryResult<Option<Release>> {
        MemoryManager::deallocate(self, process)
    }
}

impl MemoryInfo for MemoryManager {
    fn stats(&self) -> MemoryStats {
        MemoryManager::stats(self)
    }

    fn info(&self) -> (Size, Size, Size) {
        MemoryManager::info(self)
    }
}
