/*!
 * Block Table Invariant Properties
 * Random allocate/free sequences must keep the table consistent
 */

use partition_sim::memory::{MemoryLimits, MemoryManager, PlacementStrategy};
use partition_sim::process::Process;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Allocate(usize),
    Free(usize),
}

const SLOTS: usize = 12;

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..SLOTS).prop_map(Op::Allocate),
        2 => (0..SLOTS).prop_map(Op::Free),
    ]
}

fn placement() -> impl Strategy<Value = PlacementStrategy> {
    prop_oneof![
        Just(PlacementStrategy::FirstFit),
        Just(PlacementStrategy::BestFit),
        Just(PlacementStrategy::WorstFit),
    ]
}

proptest! {
    #[test]
    fn table_stays_consistent(
        strategy in placement(),
        sizes in prop::collection::vec(1usize..300, SLOTS),
        ops in prop::collection::vec(op(), 1..80),
        max_blocks in 2usize..16,
    ) {
        let limits = MemoryLimits { max_blocks, ..MemoryLimits::default() };
        let mut mem_mgr = MemoryManager::with_limits(1024, strategy, limits).unwrap();
        let mut procs: Vec<Process> = sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| Process::new(i as u32 + 1, size))
            .collect();

        for op in ops {
            match op {
                Op::Allocate(i) => {
                    let before = mem_mgr.blocks().snapshot();
                    let free_before = mem_mgr.free_memory();
                    if mem_mgr.allocate(&mut procs[i]).is_err() {
                        prop_assert_eq!(mem_mgr.blocks().snapshot(), before);
                        prop_assert_eq!(mem_mgr.free_memory(), free_before);
                    } else {
                        let granted = mem_mgr.block_of(&procs[i]).unwrap();
                        prop_assert!(granted.size >= procs[i].requested_size());
                        prop_assert!(granted.size - procs[i].requested_size() <= limits.split_threshold);
                    }
                }
                Op::Free(i) => {
                    let free_before = mem_mgr.free_memory();
                    let release = mem_mgr.deallocate(&mut procs[i]).unwrap();
                    let freed = release.map_or(0, |r| r.freed);
                    prop_assert_eq!(mem_mgr.free_memory(), free_before + freed);
                }
            }

            prop_assert!(mem_mgr.verify().is_ok());
            prop_assert!(!mem_mgr.blocks().has_adjacent_free());
            prop_assert!(mem_mgr.block_count() <= max_blocks);
            for p in procs.iter().filter(|p| p.is_running()) {
                let block = mem_mgr.block_of(p).unwrap();
                prop_assert_eq!(block.owner, Some(p.id()));
            }
        }
    }
}
