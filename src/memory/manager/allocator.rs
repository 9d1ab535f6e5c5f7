/*!
 * Memory Allocator Implementation
 * Allocation and deallocation logic
 */

use super::super::traits::PlacementPolicy;
use super::super::types::{BlockHandle, MemoryError, MemoryPressure, MemoryResult, Release};
use super::MemoryManager;
use crate::core::types::Size;
use crate::process::Process;
use log::{debug, error, info, warn};

impl MemoryManager {
    /// Allocate a block for a process using the manager's placement strategy.
    ///
    /// On failure nothing is mutated: neither the block table, the free
    /// counter, nor the process.
    pub fn allocate(&mut self, process: &mut Process) -> MemoryResult<BlockHandle> {
        let pid = process.id();
        let size = process.requested_size();

        if process.block().is_some() {
            warn!("PID {} already holds a block, refusing second allocation", pid);
            return Err(MemoryError::AlreadyAllocated { pid });
        }
        if size == 0 {
            return Err(MemoryError::InvalidRequest { requested: size });
        }

        // Admission check against the free counter saves a futile scan
        if size > self.free_memory {
            info!(
                "PID {} requested {} KB, only {} KB free ({} used / {} total)",
                pid,
                size,
                self.free_memory,
                self.used_memory(),
                self.total_memory
            );
            return Err(MemoryError::CapacityExceeded {
                requested: size,
                available: self.free_memory,
            });
        }

        let index = match self.strategy.find(&self.blocks, size) {
            Some(index) => index,
            None => {
                let largest_free = self.blocks.largest_free();
                info!(
                    "{}: no free block fits {} KB for PID {} ({} KB free, largest block {} KB)",
                    self.strategy, size, pid, self.free_memory, largest_free
                );
                return Err(MemoryError::NoFitFound {
                    requested: size,
                    available: self.free_memory,
                    largest_free,
                });
            }
        };

        let (handle, candidate_size) = match (self.blocks.handle_at(index), self.blocks.get(index)) {
            (Some(handle), Some(block)) => (handle, block.size),
            _ => {
                error!("Placement returned position {} outside the block table", index);
                return Err(MemoryError::InvariantViolation(format!(
                    "placement returned position {} of {}",
                    index,
                    self.blocks.len()
                )));
            }
        };

        // Split only when the leftover is worth tracking as its own block
        if candidate_size - size > self.limits.split_threshold {
            let tail = self.blocks.split(index, size).map_err(|e| {
                warn!(
                    "Cannot split {} KB block for PID {}: {}",
                    candidate_size, pid, e
                );
                e
            })?;
            debug!(
                "Split block: keeping {} KB, returning {} KB as free block {:?}",
                size,
                candidate_size - size,
                tail
            );
        }

        let (start, granted) = match self.blocks.resolve_mut(handle) {
            Some(block) => {
                block.bind(pid);
                (block.start, block.size)
            }
            None => {
                return Err(MemoryError::InvariantViolation(format!(
                    "handle {:?} stopped resolving during allocation",
                    handle
                )))
            }
        };

        self.free_memory -= granted;
        process.bind(handle);

        let used = self.used_memory();
        if let Some(level) = self.check_memory_pressure(used) {
            warn!(
                "Memory pressure {}: Allocated {} KB at {} for PID {} ({:.1}% used: {} / {})",
                level,
                granted,
                start,
                pid,
                (used as f64 / self.total_memory as f64) * 100.0,
                used,
                self.total_memory
            );
        } else {
            info!("Allocated {} KB at {} for PID {}", granted, start, pid);
        }

        Ok(handle)
    }

    /// Release a process's block and coalesce free neighbours.
    ///
    /// Returns `Ok(None)` when the process holds no block.
    pub fn deallocate(&mut self, process: &mut Process) -> MemoryResult<Option<Release>> {
        let pid = process.id();
        let handle = match process.block() {
            Some(handle) => handle,
            None => {
                debug!("PID {} holds no block, nothing to free", pid);
                return Ok(None);
            }
        };

        let (start, freed) = match self.blocks.resolve_mut(handle) {
            Some(block) if !block.free && block.owner == Some(pid) => {
                block.release();
                (block.start, block.size)
            }
            _ => {
                error!(
                    "PID {} holds handle {:?} which does not resolve to its block",
                    pid, handle
                );
                return Err(MemoryError::StaleHandle { pid });
            }
        };

        self.free_memory += freed;
        process.terminate();

        let mut merges = Vec::new();
        self.coalesce_with(|merge| merges.push(merge.clone()));

        info!(
            "Deallocated {} KB at {} from PID {} ({} KB now free, {} merges, {} blocks)",
            freed,
            start,
            pid,
            self.free_memory,
            merges.len(),
            self.blocks.len()
        );

        Ok(Some(Release {
            pid,
            start,
            freed,
            merges,
        }))
    }

    /// Check memory pressure level
    pub(super) fn check_memory_pressure(&self, used: Size) -> Option<MemoryPressure> {
        match MemoryPressure::from_ratio(used as f64 / self.total_memory as f64) {
            MemoryPressure::Low => None,
            level => Some(level),
        }
    }
}
