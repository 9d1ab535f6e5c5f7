/*!
 * Memory Inspection
 * Statistics, snapshots, and invariant verification
 */

use super::super::types::{MemoryError, MemoryResult, MemoryStats};
use super::MemoryManager;
use crate::core::types::Size;

impl MemoryManager {
    /// Get memory info as (total, used, free)
    pub fn info(&self) -> (Size, Size, Size) {
        (self.total_memory, self.used_memory(), self.free_memory)
    }

    pub fn stats(&self) -> MemoryStats {
        let free_blocks = self.blocks.free_block_count();
        let block_count = self.blocks.len();
        MemoryStats {
            total_memory: self.total_memory,
            used_memory: self.used_memory(),
            free_memory: self.free_memory,
            usage_percentage: self.used_memory() as f64 / self.total_memory as f64 * 100.0,
            block_count,
            free_blocks,
            allocated_blocks: block_count - free_blocks,
        }
    }

    /// Check every block table invariant against the manager's counters.
    ///
    /// - blocks tile `[0, total)` with no gaps or overlaps
    /// - the free counter equals the sum of free block sizes
    /// - free blocks have no owner, used blocks have one
    /// - no two adjacent blocks are both free
    pub fn verify(&self) -> MemoryResult<()> {
        self.blocks.check_tiling()?;

        let covered = self.blocks.total_size();
        if covered != self.total_memory {
            return Err(MemoryError::InvariantViolation(format!(
                "blocks cover {} KB of {} KB",
                covered, self.total_memory
            )));
        }

        let free_sum = self.blocks.free_size();
        if free_sum != self.free_memory {
            return Err(MemoryError::InvariantViolation(format!(
                "free counter is {} KB but free blocks sum to {} KB",
                self.free_memory, free_sum
            )));
        }

        if let Some(block) = self.blocks.iter().find(|b| b.free == b.owner.is_some()) {
            return Err(MemoryError::InvariantViolation(format!(
                "block at {} has free={} owner={:?}",
                block.start, block.free, block.owner
            )));
        }

        if self.blocks.has_adjacent_free() {
            return Err(MemoryError::InvariantViolation(
                "adjacent free blocks left uncoalesced".to_string(),
            ));
        }

        Ok(())
    }
}
