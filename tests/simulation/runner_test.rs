/*!
 * Simulation Runner Tests
 * Full four-phase runs across strategies
 */

use partition_sim::core::limits::STRESS_PROCESS_ID;
use partition_sim::memory::{MemoryBlock, PlacementStrategy};
use partition_sim::process::{parse_workload, ProcessSpec, Workload};
use partition_sim::simulation::{
    compare_strategies, run_simulation, Phase, SimulationConfig, SimulationRun, TerminationPlan,
};
use pretty_assertions::assert_eq;

fn workload() -> Workload {
    parse_workload(
        "1000\n1 280\n2 100\n3 200\n4 100\n5 250\n6 180\n",
        "fixture",
        20,
    )
    .unwrap()
}

fn config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.plan.initial_allocations = Some(5);
    config
}

fn start_of(run: &SimulationRun, pid: u32) -> Option<usize> {
    run.final_blocks
        .iter()
        .find(|b| b.owner == Some(pid))
        .map(|b| b.start)
}

#[test]
fn test_strategies_place_late_process_differently() {
    let runs = compare_strategies(&workload(), &config()).unwrap();

    let placements: Vec<(PlacementStrategy, Option<usize>)> =
        runs.iter().map(|r| (r.strategy, start_of(r, 6))).collect();
    assert_eq!(
        placements,
        vec![
            (PlacementStrategy::FirstFit, Some(0)),
            (PlacementStrategy::BestFit, Some(380)),
            (PlacementStrategy::WorstFit, Some(680)),
        ]
    );
}

#[test]
fn test_runs_are_isolated() {
    let workload = workload();
    let config = config();
    let compared = compare_strategies(&workload, &config).unwrap();
    let alone = run_simulation(
        workload.memory_size,
        PlacementStrategy::BestFit,
        &workload.processes,
        &config,
    )
    .unwrap();

    assert_eq!(compared[1].final_blocks, alone.final_blocks);
    assert_eq!(compared[1].stats, alone.stats);
}

#[test]
fn test_statistics_match_phase_records() {
    for run in compare_strategies(&workload(), &config()).unwrap() {
        let attempts: usize = run.phases.iter().map(|p| p.allocations.len()).sum();
        let successes = run
            .phases
            .iter()
            .flat_map(|p| &p.allocations)
            .filter(|a| a.succeeded())
            .count();

        assert_eq!(run.stats.allocation_attempts, attempts);
        assert_eq!(run.stats.successful_allocations, successes);
        assert_eq!(
            run.stats.allocation_attempts,
            run.stats.successful_allocations + run.stats.failed_allocations
        );
        assert!(run.stats.peak_utilization >= run.stats.avg_utilization);
        assert!(run.stats.peak_utilization <= 1.0);
    }
}

#[test]
fn test_terminate_all_restores_single_block() {
    let mut config = config();
    config.plan.termination = TerminationPlan::All;
    config.plan.additional_allocations = Some(0);

    let run = run_simulation(
        1000,
        PlacementStrategy::FirstFit,
        &workload().processes,
        &config,
    )
    .unwrap();
    let termination = run.phase(Phase::Termination).unwrap();

    assert_eq!(termination.terminations.len(), 5);
    assert_eq!(termination.memory.free_memory, 1000);
    assert_eq!(termination.memory.block_count, 1);
    assert_eq!(termination.processes.terminated, 5);
    assert_eq!(termination.processes.new, 1);
}

#[test]
fn test_stress_request_is_percentage_of_free() {
    let mut config = SimulationConfig::default();
    config.plan.termination = TerminationPlan::None;
    config.plan.stress_percent = 40.0;
    let specs = vec![ProcessSpec::new(1, 300), ProcessSpec::new(2, 200)];

    let run = run_simulation(1000, PlacementStrategy::WorstFit, &specs, &config).unwrap();
    let stress = &run.phase(Phase::StressAllocation).unwrap().allocations[0];

    assert_eq!(stress.pid, STRESS_PROCESS_ID);
    assert_eq!(stress.requested, 200);
    assert!(stress.succeeded());
    assert_eq!(run.processes.len(), 3);
    assert_eq!(
        run.final_blocks,
        vec![
            MemoryBlock::used(0, 300, 1),
            MemoryBlock::used(300, 200, 2),
            MemoryBlock::used(500, 200, STRESS_PROCESS_ID),
            MemoryBlock::free(700, 300),
        ]
    );
}

#[test]
fn test_block_limit_failures_are_counted() {
    let mut config = SimulationConfig::default();
    config.limits.max_blocks = 2;
    config.plan.termination = TerminationPlan::None;
    let specs: Vec<ProcessSpec> = (1..=4).map(|id| ProcessSpec::new(id, 100)).collect();

    let run = run_simulation(1000, PlacementStrategy::FirstFit, &specs, &config).unwrap();

    assert_eq!(run.stats.successful_allocations, 1);
    assert_eq!(run.stats.failed_allocations, 7);
    assert!(run.block_count() <= 2);
}
