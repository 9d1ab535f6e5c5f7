/*!
 * Memory Types
 * Common types for the partition allocator
 */

use crate::core::limits::{
    MAX_BLOCKS, PRESSURE_CRITICAL, PRESSURE_HIGH, PRESSURE_MEDIUM, SPLIT_THRESHOLD,
};
use crate::core::types::{Address, Pid, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
///
/// Every variant is recoverable: a failed allocation leaves the manager untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum MemoryError {
    #[error("Address space size must be positive")]
    #[diagnostic(code(memory::invalid_capacity))]
    InvalidCapacity,

    #[error("Block limit must allow at least one block")]
    #[diagnostic(code(memory::invalid_block_limit))]
    InvalidBlockLimit,

    #[error("Invalid request: {requested} KB")]
    #[diagnostic(
        code(memory::invalid_request),
        help("Requested sizes must be positive.")
    )]
    InvalidRequest { requested: Size },

    #[error("Process {pid} already holds a block")]
    #[diagnostic(code(memory::already_allocated))]
    AlreadyAllocated { pid: Pid },

    #[error("Capacity exceeded: requested {requested} KB, only {available} KB free")]
    #[diagnostic(code(memory::capacity_exceeded))]
    CapacityExceeded { requested: Size, available: Size },

    #[error(
        "No fit found: requested {requested} KB, {available} KB free but largest free block is {largest_free} KB"
    )]
    #[diagnostic(
        code(memory::no_fit),
        help("Free memory is fragmented; no single block is large enough.")
    )]
    NoFitFound {
        requested: Size,
        available: Size,
        largest_free: Size,
    },

    #[error("Block table full: {limit} blocks")]
    #[diagnostic(code(memory::block_table_full))]
    BlockTableFull { limit: usize },

    #[error("Process {pid} holds a handle that does not resolve to its block")]
    #[diagnostic(code(memory::stale_handle))]
    StaleHandle { pid: Pid },

    #[error("Block table invariant violated: {0}")]
    #[diagnostic(code(memory::invariant))]
    InvariantViolation(String),
}

impl MemoryError {
    /// Short label used in reports
    pub fn reason(&self) -> &'static str {
        match self {
            MemoryError::InvalidCapacity => "invalid capacity",
            MemoryError::InvalidBlockLimit => "invalid block limit",
            MemoryError::InvalidRequest { .. } => "invalid request",
            MemoryError::AlreadyAllocated { .. } => "already allocated",
            MemoryError::CapacityExceeded { .. } => "not enough free memory",
            MemoryError::NoFitFound { .. } => "not enough contiguous space",
            MemoryError::BlockTableFull { .. } => "block table full",
            MemoryError::StaleHandle { .. } => "stale handle",
            MemoryError::InvariantViolation(_) => "invariant violation",
        }
    }
}

/// Stable reference to a block in a `BlockList`.
///
/// Survives splits and merges of other blocks. Once the block itself is merged
/// away the generation no longer matches and the handle stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockHandle {
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

/// Memory block metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBlock {
    pub start: Address,
    pub size: Size,
    pub free: bool,
    pub owner: Option<Pid>,
}

impl MemoryBlock {
    pub fn free(start: Address, size: Size) -> Self {
        Self {
            start,
            size,
            free: true,
            owner: None,
        }
    }

    pub fn used(start: Address, size: Size, owner: Pid) -> Self {
        Self {
            start,
            size,
            free: false,
            owner: Some(owner),
        }
    }

    /// One past the last address covered by this block
    pub fn end(&self) -> Address {
        self.start + self.size
    }

    pub fn is_free(&self) -> bool {
        self.free
    }

    pub(crate) fn bind(&mut self, pid: Pid) {
        self.free = false;
        self.owner = Some(pid);
    }

    pub(crate) fn release(&mut self) {
        self.free = true;
        self.owner = None;
    }
}

/// Allocation limits for one manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryLimits {
    /// Maximum number of blocks the table may hold
    pub max_blocks: usize,
    /// Leftover (KB) above which a free block is split on allocation
    pub split_threshold: Size,
}

impl Default for MemoryLimits {
    fn default() -> Self {
        Self {
            max_blocks: MAX_BLOCKS,
            split_threshold: SPLIT_THRESHOLD,
        }
    }
}

/// One merge performed by the coalescer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merge {
    /// Handle of the block that absorbed its neighbour
    pub survivor: BlockHandle,
    /// Handle of the absorbed block; no longer resolves
    pub retired: BlockHandle,
    /// Position the absorbed block occupied before removal
    pub removed_index: usize,
    pub start: Address,
    pub left_size: Size,
    pub right_size: Size,
}

impl Merge {
    pub fn merged_size(&self) -> Size {
        self.left_size + self.right_size
    }

    /// Start address of the absorbed block
    pub fn right_start(&self) -> Address {
        self.start + self.left_size
    }
}

/// Result of a successful deallocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub pid: Pid,
    pub start: Address,
    pub freed: Size,
    pub merges: Vec<Merge>,
}

/// Memory statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_memory: Size,
    pub used_memory: Size,
    pub free_memory: Size,
    pub usage_percentage: f64,
    pub block_count: usize,
    pub free_blocks: usize,
    pub allocated_blocks: usize,
}

impl MemoryStats {
    pub fn memory_pressure(&self) -> MemoryPressure {
        MemoryPressure::from_ratio(self.usage_percentage / 100.0)
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= PRESSURE_CRITICAL {
            MemoryPressure::Critical
        } else if ratio >= PRESSURE_HIGH {
            MemoryPressure::High
        } else if ratio >= PRESSURE_MEDIUM {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

impl std::fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}
