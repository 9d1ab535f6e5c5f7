/*!
 * Memory Manager Tests
 * Allocation, deallocation, and coalescing through the public API
 */

use partition_sim::memory::{
    Allocator, MemoryBlock, MemoryError, MemoryInfo, MemoryLimits, MemoryManager,
    MemoryPressure, PlacementStrategy,
};
use partition_sim::process::{Process, ProcessState};
use pretty_assertions::assert_eq;

fn first_fit(total: usize) -> MemoryManager {
    MemoryManager::new(total, PlacementStrategy::FirstFit).unwrap()
}

#[test]
fn test_memory_manager_initialization() {
    let mem_mgr = first_fit(1024);
    let (total, used, available) = mem_mgr.info();

    assert_eq!(total, 1024);
    assert_eq!(used, 0);
    assert_eq!(available, 1024);
    assert_eq!(mem_mgr.blocks().snapshot(), vec![MemoryBlock::free(0, 1024)]);
}

#[test]
fn test_zero_capacity_rejected() {
    assert_eq!(
        MemoryManager::new(0, PlacementStrategy::BestFit).unwrap_err(),
        MemoryError::InvalidCapacity
    );
}

#[test]
fn test_zero_block_limit_rejected() {
    let limits = MemoryLimits {
        max_blocks: 0,
        ..MemoryLimits::default()
    };

    let err = MemoryManager::with_limits(1024, PlacementStrategy::FirstFit, limits).unwrap_err();
    assert_eq!(err, MemoryError::InvalidBlockLimit);
    assert_eq!(err.reason(), "invalid block limit");
    let blocks = vec![MemoryBlock::free(0, 1024)];
    assert_eq!(
        MemoryManager::from_blocks(blocks, PlacementStrategy::BestFit, limits).unwrap_err(),
        MemoryError::InvalidBlockLimit
    );
}

#[test]
fn test_sequential_allocations_are_contiguous() {
    let mut mem_mgr = first_fit(1000);
    let mut procs: Vec<Process> = (1..=3).map(|id| Process::new(id, 100 * id as usize)).collect();

    for p in procs.iter_mut() {
        mem_mgr.allocate(p).unwrap();
    }

    let starts: Vec<usize> = procs
        .iter()
        .map(|p| mem_mgr.block_of(p).unwrap().start)
        .collect();
    assert_eq!(starts, vec![0, 100, 300]);
    assert_eq!(mem_mgr.used_memory(), 600);
    assert_eq!(mem_mgr.block_count(), 4);
}

#[test]
fn test_allocate_then_deallocate_restores_layout() {
    let mut mem_mgr = first_fit(500);
    let mut a = Process::new(1, 100);
    let mut b = Process::new(2, 100);
    mem_mgr.allocate(&mut a).unwrap();
    let before = mem_mgr.blocks().snapshot();

    mem_mgr.allocate(&mut b).unwrap();
    mem_mgr.deallocate(&mut b).unwrap();

    assert_eq!(mem_mgr.blocks().snapshot(), before);
    assert_eq!(mem_mgr.free_memory(), 400);
    assert_eq!(b.state(), ProcessState::Terminated);
}

#[test]
fn test_no_contiguous_fit_despite_enough_free() {
    let mut mem_mgr = first_fit(300);
    let mut procs: Vec<Process> = (1..=3).map(|id| Process::new(id, 100)).collect();
    for p in procs.iter_mut() {
        mem_mgr.allocate(p).unwrap();
    }
    mem_mgr.deallocate(&mut procs[0]).unwrap();
    mem_mgr.deallocate(&mut procs[2]).unwrap();

    let mut big = Process::new(4, 150);
    assert_eq!(
        mem_mgr.allocate(&mut big),
        Err(MemoryError::NoFitFound {
            requested: 150,
            available: 200,
            largest_free: 100
        })
    );
    assert_eq!(mem_mgr.fragmentation().fragmentation_percentage, 50.0);
}

#[test]
fn test_handles_survive_coalescing() {
    let mut mem_mgr = first_fit(1000);
    let mut procs: Vec<Process> = (1..=4).map(|id| Process::new(id, 100)).collect();
    for p in procs.iter_mut() {
        mem_mgr.allocate(p).unwrap();
    }
    assert_eq!(mem_mgr.position_of(&procs[3]), Some(3));

    mem_mgr.deallocate(&mut procs[0]).unwrap();
    mem_mgr.deallocate(&mut procs[2]).unwrap();
    let release = mem_mgr.deallocate(&mut procs[1]).unwrap().unwrap();

    assert_eq!(release.merges.len(), 2);
    assert_eq!(mem_mgr.position_of(&procs[3]), Some(1));
    assert_eq!(mem_mgr.block_of(&procs[3]), Some(&MemoryBlock::used(300, 100, 4)));
    mem_mgr.verify().unwrap();
}

#[test]
fn test_pressure_levels() {
    let mut mem_mgr = first_fit(100);
    assert_eq!(mem_mgr.pressure(), MemoryPressure::Low);

    let mut p = Process::new(1, 85);
    mem_mgr.allocate(&mut p).unwrap();
    assert_eq!(mem_mgr.pressure(), MemoryPressure::High);
    assert!((mem_mgr.utilization() - 0.85).abs() < f64::EPSILON);
}

fn churn<A: Allocator + MemoryInfo>(allocator: &mut A, procs: &mut [Process]) -> usize {
    let mut granted = 0;
    for p in procs.iter_mut() {
        if allocator.allocate(p).is_ok() {
            granted += 1;
        }
    }
    for p in procs.iter_mut().step_by(2) {
        allocator.deallocate(p).unwrap();
    }
    granted
}

#[test]
fn test_generic_allocator_usage() {
    let mut mem_mgr = MemoryManager::new(400, PlacementStrategy::WorstFit).unwrap();
    let mut procs: Vec<Process> = (1..=5).map(|id| Process::new(id, 100)).collect();

    assert_eq!(churn(&mut mem_mgr, &mut procs), 4);

    let (total, used, free) = mem_mgr.info();
    assert_eq!((total, used, free), (400, 200, 200));
    assert_eq!(mem_mgr.stats().allocated_blocks, 2);
}
