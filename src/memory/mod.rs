/*!
 * Memory Module
 * Partition allocator: block table, placement, coalescing, fragmentation
 */

pub mod block_list;
pub mod fragmentation;
pub mod manager;
pub mod placement;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use block_list::BlockList;
pub use fragmentation::FragmentationMetrics;
pub use manager::MemoryManager;
pub use placement::{BestFit, FirstFit, ParseStrategyError, PlacementStrategy, WorstFit};
pub use traits::*;
pub use types::*;
