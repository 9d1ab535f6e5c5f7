/*!
 * Fragmentation Analysis
 * External fragmentation metrics derived from block table state
 */

use super::block_list::BlockList;
use crate::core::types::Size;
use serde::{Deserialize, Serialize};

/// External fragmentation snapshot.
///
/// Internal waste from unsplit blocks is deliberately not counted here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FragmentationMetrics {
    /// Number of free blocks
    pub external_fragmentation: usize,
    /// Share of free memory outside the largest free block, in percent
    pub fragmentation_percentage: f64,
    /// Mean free block size (KB)
    pub avg_fragment_size: f64,
    pub total_free: Size,
    pub largest_free_block: Size,
}

impl FragmentationMetrics {
    /// Analyze a block table without mutating it
    pub fn analyze(blocks: &BlockList) -> Self {
        let (count, total_free, largest) = blocks
            .iter()
            .filter(|b| b.free)
            .fold((0usize, 0usize, 0usize), |(count, total, largest), b| {
                (count + 1, total + b.size, largest.max(b.size))
            });

        let avg_fragment_size = if count > 0 {
            total_free as f64 / count as f64
        } else {
            0.0
        };

        let fragmentation_percentage = if count > 1 && total_free > 0 {
            (total_free - largest) as f64 / total_free as f64 * 100.0
        } else {
            0.0
        };

        Self {
            external_fragmentation: count,
            fragmentation_percentage,
            avg_fragment_size,
            total_free,
            largest_free_block: largest,
        }
    }

    pub fn is_fragmented(&self) -> bool {
        self.external_fragmentation > 1
    }
}
