/*!
 * Placement Strategy Tests
 * The same layout and request under each strategy
 */

use partition_sim::memory::{
    BestFit, BlockList, FirstFit, MemoryBlock, MemoryLimits, MemoryManager, PlacementPolicy,
    PlacementStrategy, WorstFit,
};
use partition_sim::process::Process;
use pretty_assertions::assert_eq;

fn layout() -> Vec<MemoryBlock> {
    vec![
        MemoryBlock::free(0, 100),
        MemoryBlock::used(100, 50, 9),
        MemoryBlock::used(150, 20, 8),
        MemoryBlock::free(170, 30),
        MemoryBlock::used(200, 10, 7),
        MemoryBlock::free(210, 200),
    ]
}

#[test]
fn test_policies_pick_expected_positions() {
    let blocks = BlockList::from_blocks(layout(), 100).unwrap();

    assert_eq!(FirstFit.find(&blocks, 30), Some(0));
    assert_eq!(BestFit.find(&blocks, 30), Some(3));
    assert_eq!(WorstFit.find(&blocks, 30), Some(5));
    assert_eq!(FirstFit.find(&blocks, 150), Some(5));
    assert_eq!(BestFit.find(&blocks, 201), None);
}

#[test]
fn test_strategies_through_manager() {
    let expected = [
        (PlacementStrategy::FirstFit, 0),
        (PlacementStrategy::BestFit, 170),
        (PlacementStrategy::WorstFit, 210),
    ];

    for (strategy, start) in expected {
        let mut mem_mgr =
            MemoryManager::from_blocks(layout(), strategy, MemoryLimits::default()).unwrap();
        let mut p = Process::new(1, 30);
        mem_mgr.allocate(&mut p).unwrap();

        assert_eq!(mem_mgr.block_of(&p).unwrap().start, start, "{}", strategy);
        mem_mgr.verify().unwrap();
    }
}

#[test]
fn test_best_fit_exact_match_does_not_split() {
    let mut mem_mgr =
        MemoryManager::from_blocks(layout(), PlacementStrategy::BestFit, MemoryLimits::default())
            .unwrap();
    let before = mem_mgr.block_count();
    let mut p = Process::new(1, 30);
    mem_mgr.allocate(&mut p).unwrap();
    assert_eq!(mem_mgr.block_count(), before);
}

#[test]
fn test_worst_fit_splits_largest() {
    let mut mem_mgr =
        MemoryManager::from_blocks(layout(), PlacementStrategy::WorstFit, MemoryLimits::default())
            .unwrap();
    let mut p = Process::new(1, 30);
    mem_mgr.allocate(&mut p).unwrap();

    let tail = mem_mgr.blocks().get(6).unwrap();
    assert_eq!(tail, &MemoryBlock::free(240, 170));
}

#[test]
fn test_strategy_names_round_trip() {
    for strategy in PlacementStrategy::ALL {
        let parsed: PlacementStrategy = strategy.to_string().parse().unwrap();
        assert_eq!(parsed, strategy);
    }
    assert!("next fit".parse::<PlacementStrategy>().is_err());
}
