/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type
pub type Pid = u32;

/// Address type for memory operations (KB offset into the address space)
pub type Address = usize;

/// Size type for memory operations (KB)
pub type Size = usize;

/// Fraction of the address space in use, in `[0.0, 1.0]`
pub type Utilization = f64;
