/*!
 * Block List
 * Address-ordered block table with generation-tagged handles
 */

use super::types::{BlockHandle, MemoryBlock, MemoryError, MemoryResult, Merge};
use crate::core::types::Size;

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    block: Option<MemoryBlock>,
}

/// Ordered, gap-free sequence of blocks covering `[0, total_size)`.
///
/// Blocks live in an arena of slots; `order` lists occupied slots by ascending
/// start address. Positions shift when blocks are inserted or removed, handles
/// do not.
#[derive(Debug, Clone)]
pub struct BlockList {
    slots: Vec<Slot>,
    vacant: Vec<u32>,
    order: Vec<u32>,
    max_blocks: usize,
}

impl BlockList {
    /// Create a table holding a single free block spanning the whole space
    pub fn new(total_size: Size, max_blocks: usize) -> Self {
        let mut list = Self::empty(max_blocks);
        let slot = list.occupy(MemoryBlock::free(0, total_size));
        list.order.push(slot);
        list
    }

    /// Build a table from an explicit layout.
    ///
    /// The blocks must tile `[0, end)` in order; adjacent free blocks are allowed.
    pub fn from_blocks(blocks: Vec<MemoryBlock>, max_blocks: usize) -> MemoryResult<Self> {
        if blocks.len() > max_blocks {
            return Err(MemoryError::BlockTableFull { limit: max_blocks });
        }
        let mut list = Self::empty(max_blocks);
        for block in blocks {
            let slot = list.occupy(block);
            list.order.push(slot);
        }
        list.check_tiling()?;
        Ok(list)
    }

    fn empty(max_blocks: usize) -> Self {
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
            order: Vec::with_capacity(max_blocks.min(256)),
            max_blocks,
        }
    }

    fn occupy(&mut self, block: MemoryBlock) -> u32 {
        if let Some(slot) = self.vacant.pop() {
            self.slots[slot as usize].block = Some(block);
            slot
        } else {
            self.slots.push(Slot {
                generation: 0,
                block: Some(block),
            });
            (self.slots.len() - 1) as u32
        }
    }

    /// Empty a slot and bump its generation so outstanding handles stop resolving
    fn vacate(&mut self, slot: u32) -> BlockHandle {
        let entry = &mut self.slots[slot as usize];
        let retired = BlockHandle {
            slot,
            generation: entry.generation,
        };
        entry.block = None;
        entry.generation = entry.generation.wrapping_add(1);
        self.vacant.push(slot);
        retired
    }

    fn handle_for(&self, slot: u32) -> BlockHandle {
        BlockHandle {
            slot,
            generation: self.slots[slot as usize].generation,
        }
    }

    fn block_in(&self, slot: u32) -> Option<&MemoryBlock> {
        self.slots.get(slot as usize).and_then(|s| s.block.as_ref())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn max_blocks(&self) -> usize {
        self.max_blocks
    }

    /// True when a split would exceed the block limit
    pub fn is_full(&self) -> bool {
        self.order.len() >= self.max_blocks
    }

    /// Block at a position in address order
    pub fn get(&self, index: usize) -> Option<&MemoryBlock> {
        self.order.get(index).and_then(|&slot| self.block_in(slot))
    }

    pub fn handle_at(&self, index: usize) -> Option<BlockHandle> {
        self.order.get(index).map(|&slot| self.handle_for(slot))
    }

    pub fn resolve(&self, handle: BlockHandle) -> Option<&MemoryBlock> {
        self.slots
            .get(handle.slot as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.block.as_ref())
    }

    pub(crate) fn resolve_mut(&mut self, handle: BlockHandle) -> Option<&mut MemoryBlock> {
        self.slots
            .get_mut(handle.slot as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.block.as_mut())
    }

    /// Current position of a block in address order
    pub fn index_of(&self, handle: BlockHandle) -> Option<usize> {
        self.resolve(handle)?;
        self.order.iter().position(|&slot| slot == handle.slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemoryBlock> + '_ {
        self.order.iter().filter_map(move |&slot| self.block_in(slot))
    }

    pub fn snapshot(&self) -> Vec<MemoryBlock> {
        self.iter().cloned().collect()
    }

    /// Size of the address space covered by the table
    pub fn total_size(&self) -> Size {
        self.iter().last().map_or(0, MemoryBlock::end)
    }

    pub fn free_size(&self) -> Size {
        self.iter().filter(|b| b.free).map(|b| b.size).sum()
    }

    pub fn free_block_count(&self) -> usize {
        self.iter().filter(|b| b.free).count()
    }

    pub fn largest_free(&self) -> Size {
        self.iter()
            .filter(|b| b.free)
            .map(|b| b.size)
            .max()
            .unwrap_or(0)
    }

    pub fn has_adjacent_free(&self) -> bool {
        self.iter()
            .zip(self.iter().skip(1))
            .any(|(a, b)| a.free && b.free)
    }

    /// Split the free block at `index` into a head of `head_size` and a free tail.
    ///
    /// Returns the handle of the new tail block. Fails without touching the
    /// table when the limit is reached or the split point is out of range.
    pub(crate) fn split(&mut self, index: usize, head_size: Size) -> MemoryResult<BlockHandle> {
        let slot = *self.order.get(index).ok_or_else(|| {
            MemoryError::InvariantViolation(format!("no block at index {}", index))
        })?;
        let block = self.block_in(slot).ok_or_else(|| {
            MemoryError::InvariantViolation(format!("empty slot {} in order", slot))
        })?;

        if head_size == 0 || head_size >= block.size {
            return Err(MemoryError::InvalidRequest {
                requested: head_size,
            });
        }
        if self.is_full() {
            return Err(MemoryError::BlockTableFull {
                limit: self.max_blocks,
            });
        }

        let tail = MemoryBlock::free(block.start + head_size, block.size - head_size);
        if let Some(head) = self.slots[slot as usize].block.as_mut() {
            head.size = head_size;
        }
        let tail_slot = self.occupy(tail);
        self.order.insert(index + 1, tail_slot);
        Ok(self.handle_for(tail_slot))
    }

    /// Merge the block at `index` with its successor when both are free
    pub(crate) fn merge_with_next(&mut self, index: usize) -> Option<Merge> {
        let left_slot = *self.order.get(index)?;
        let right_slot = *self.order.get(index + 1)?;
        let right = self.block_in(right_slot)?.clone();
        let left = self.slots[left_slot as usize].block.as_mut()?;
        if !(left.free && right.free) {
            return None;
        }

        let left_size = left.size;
        let start = left.start;
        left.size += right.size;

        self.order.remove(index + 1);
        let retired = self.vacate(right_slot);

        Some(Merge {
            survivor: self.handle_for(left_slot),
            retired,
            removed_index: index + 1,
            start,
            left_size,
            right_size: right.size,
        })
    }

    /// Check that blocks are non-empty and tile `[0, total_size())` without gaps
    pub fn check_tiling(&self) -> MemoryResult<()> {
        if self.order.is_empty() {
            return Err(MemoryError::InvariantViolation(
                "block table is empty".to_string(),
            ));
        }
        let mut expected = 0;
        for (index, &slot) in self.order.iter().enumerate() {
            let block = self.block_in(slot).ok_or_else(|| {
                MemoryError::InvariantViolation(format!("position {} points at empty slot", index))
            })?;
            if block.size == 0 {
                return Err(MemoryError::InvariantViolation(format!(
                    "zero-sized block at position {}",
                    index
                )));
            }
            if block.start != expected {
                return Err(MemoryError::InvariantViolation(format!(
                    "block at position {} starts at {}, expected {}",
                    index, block.start, expected
                )));
            }
            expected = block.end();
        }
        Ok(())
    }
}
