/*!
 * Free Block Coalescing
 * Merges adjacent free blocks to reduce external fragmentation
 */

use super::super::types::Merge;
use super::MemoryManager;
use log::{debug, info};

impl MemoryManager {
    /// Merge adjacent free blocks until none remain; returns the merge count.
    ///
    /// Idempotent: a second call on a coalesced table returns 0.
    pub fn coalesce(&mut self) -> usize {
        self.coalesce_with(|_| {})
    }

    /// Coalesce, reporting each merge to `on_merge` as it happens.
    ///
    /// Handles of surviving blocks stay valid; the absorbed block's handle is
    /// retired and every later position shifts down by one.
    pub fn coalesce_with<F>(&mut self, mut on_merge: F) -> usize
    where
        F: FnMut(&Merge),
    {
        let initial_blocks = self.blocks.len();
        let mut total = 0;

        loop {
            let mut merged = 0;
            let mut i = 0;
            while i + 1 < self.blocks.len() {
                match self.blocks.merge_with_next(i) {
                    Some(merge) => {
                        debug!(
                            "Coalescing blocks at {} and {} ({} KB + {} KB = {} KB)",
                            merge.start,
                            merge.right_start(),
                            merge.left_size,
                            merge.right_size,
                            merge.merged_size()
                        );
                        on_merge(&merge);
                        merged += 1;
                        // Stay on i: the grown block may also absorb its new successor
                    }
                    None => i += 1,
                }
            }
            total += merged;
            if merged == 0 {
                break;
            }
        }

        if total > 0 {
            info!(
                "Coalesced {} pairs of adjacent free blocks, reduced from {} to {} blocks",
                total,
                initial_blocks,
                self.blocks.len()
            );
        }

        total
    }
}
