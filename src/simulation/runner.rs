/*!
 * Simulation Runner
 *
 * Drives one placement strategy through the four workload phases:
 * 1. Initial allocation of the first processes in input order
 * 2. Termination according to the configured plan
 * 3. Additional allocation of processes that never ran
 * 4. Stress allocation sized as a percentage of free memory
 *
 * Every run builds its own manager and process copies, so runs for
 * different strategies never share state.
 */

use super::config::{PhasePlan, SimulationConfig, TerminationPlan};
use super::stats::{Statistics, UtilizationTracker};
use crate::core::limits::STRESS_PROCESS_ID;
use crate::core::types::{Address, Pid, Size};
use crate::memory::{
    MemoryBlock, MemoryError, MemoryInfo, MemoryManager, MemoryResult, MemoryStats,
    PlacementStrategy, Release,
};
use crate::process::{Process, ProcessCounts, ProcessSpec, Workload};
use serde::{Serialize, Serializer};
use tracing::{debug, info, info_span, warn};

/// Simulation phases in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    InitialAllocation,
    Termination,
    AdditionalAllocation,
    StressAllocation,
}

impl Phase {
    pub fn number(&self) -> u8 {
        match self {
            Phase::InitialAllocation => 1,
            Phase::Termination => 2,
            Phase::AdditionalAllocation => 3,
            Phase::StressAllocation => 4,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Phase::InitialAllocation => "Initial Process Allocation",
            Phase::Termination => "Process Termination",
            Phase::AdditionalAllocation => "Additional Process Allocation",
            Phase::StressAllocation => "Large Process Allocation",
        }
    }
}

/// One allocation request and what came of it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationAttempt {
    pub pid: Pid,
    pub requested: Size,
    pub outcome: AttemptOutcome,
}

impl AllocationAttempt {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Allocated { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum AttemptOutcome {
    /// Granted block; `size` may exceed the request when no split happened
    Allocated { start: Address, size: Size },
    Failed {
        #[serde(serialize_with = "serialize_error")]
        error: MemoryError,
    },
}

fn serialize_error<S: Serializer>(error: &MemoryError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum TerminationOutcome {
    Terminated(Release),
    /// Unknown process, or one that was not running
    NotRunning { pid: Pid },
}

/// State captured at the end of a phase
#[derive(Debug, Clone, Serialize)]
pub struct PhaseRecord {
    pub phase: Phase,
    pub allocations: Vec<AllocationAttempt>,
    pub terminations: Vec<TerminationOutcome>,
    /// Only set for the stress phase
    pub stress_percent: Option<f64>,
    pub memory: MemoryStats,
    pub processes: ProcessCounts,
}

/// A process at the end of a run, with the block it holds resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessRecord {
    #[serde(flatten)]
    pub process: Process,
    /// Start of the process's own block while it is running
    pub location: Option<Address>,
}

/// Complete record of one strategy run
#[derive(Debug, Clone, Serialize)]
pub struct SimulationRun {
    pub strategy: PlacementStrategy,
    pub memory_size: Size,
    pub phases: Vec<PhaseRecord>,
    pub stats: Statistics,
    pub final_memory: MemoryStats,
    pub final_blocks: Vec<MemoryBlock>,
    pub processes: Vec<ProcessRecord>,
}

impl SimulationRun {
    pub fn block_count(&self) -> usize {
        self.final_blocks.len()
    }

    pub fn free_block_count(&self) -> usize {
        self.final_blocks.iter().filter(|b| b.free).count()
    }

    pub fn phase(&self, phase: Phase) -> Option<&PhaseRecord> {
        self.phases.iter().find(|p| p.phase == phase)
    }
}

/// Run every configured strategy over the same workload
pub fn compare_strategies(
    workload: &Workload,
    config: &SimulationConfig,
) -> MemoryResult<Vec<SimulationRun>> {
    config
        .strategies
        .iter()
        .map(|&strategy| run_simulation(workload.memory_size, strategy, &workload.processes, config))
        .collect()
}

/// Run all four phases for one strategy
pub fn run_simulation(
    memory_size: Size,
    strategy: PlacementStrategy,
    specs: &[ProcessSpec],
    config: &SimulationConfig,
) -> MemoryResult<SimulationRun> {
    let span = info_span!("simulation", strategy = %strategy, memory_size);
    let _enter = span.enter();

    let manager = MemoryManager::with_limits(memory_size, strategy, config.limits)?;
    let mut sim = Simulation::new(manager, specs);
    let plan = &config.plan;

    sim.initial_allocation(plan);
    sim.termination(&plan.termination)?;
    sim.additional_allocation(plan);
    sim.stress_allocation(plan.stress_percent);

    sim.finish()
}

struct Simulation {
    manager: MemoryManager,
    processes: Vec<Process>,
    stats: Statistics,
    utilization: UtilizationTracker,
    phases: Vec<PhaseRecord>,
}

impl Simulation {
    fn new(manager: MemoryManager, specs: &[ProcessSpec]) -> Self {
        Self {
            manager,
            processes: specs.iter().map(Process::from).collect(),
            stats: Statistics::default(),
            utilization: UtilizationTracker::default(),
            phases: Vec::with_capacity(4),
        }
    }

    fn initial_allocation(&mut self, plan: &PhasePlan) {
        let _span = info_span!("phase", phase = Phase::InitialAllocation.number()).entered();

        let available = self.processes.len();
        let count = match plan.initial_allocations {
            None => available,
            Some(n) => n.max(1).min(available),
        };
        info!("Allocating the first {} of {} processes", count, available);

        let allocations = (0..count).map(|index| self.attempt(index)).collect();
        self.record(Phase::InitialAllocation, allocations, Vec::new(), None);
    }

    fn termination(&mut self, plan: &TerminationPlan) -> MemoryResult<()> {
        let _span = info_span!("phase", phase = Phase::Termination.number()).entered();

        let running: Vec<usize> = self
            .processes
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_running())
            .map(|(i, _)| i)
            .collect();

        let mut terminations = Vec::new();
        match plan {
            TerminationPlan::None => {}
            TerminationPlan::All => {
                for index in running {
                    terminations.push(self.terminate(index)?);
                }
            }
            TerminationPlan::Alternate => {
                for index in running.into_iter().step_by(2) {
                    terminations.push(self.terminate(index)?);
                }
            }
            TerminationPlan::Ids(ids) => {
                for &pid in ids {
                    let target = self
                        .processes
                        .iter()
                        .position(|p| p.id() == pid && p.is_running());
                    match target {
                        Some(index) => terminations.push(self.terminate(index)?),
                        None => {
                            warn!("P{} is not running, skipping termination", pid);
                            terminations.push(TerminationOutcome::NotRunning { pid });
                        }
                    }
                }
            }
        }

        self.record(Phase::Termination, Vec::new(), terminations, None);
        Ok(())
    }

    fn additional_allocation(&mut self, plan: &PhasePlan) {
        let _span = info_span!("phase", phase = Phase::AdditionalAllocation.number()).entered();

        let limit = plan.additional_allocations.unwrap_or(usize::MAX);
        let pending: Vec<usize> = self
            .processes
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_new())
            .map(|(i, _)| i)
            .take(limit)
            .collect();
        info!("Allocating {} waiting processes", pending.len());

        let allocations = pending.into_iter().map(|index| self.attempt(index)).collect();
        self.record(Phase::AdditionalAllocation, allocations, Vec::new(), None);
    }

    fn stress_allocation(&mut self, percent: f64) {
        let _span = info_span!("phase", phase = Phase::StressAllocation.number()).entered();

        let size = (self.manager.free_memory() as f64 * percent / 100.0).floor() as Size;
        info!(
            "Stress request P{}: {} KB ({:.2}% of {} KB free)",
            STRESS_PROCESS_ID,
            size,
            percent,
            self.manager.free_memory()
        );

        self.processes.push(Process::new(STRESS_PROCESS_ID, size));
        let index = self.processes.len() - 1;
        let attempt = self.attempt(index);
        if !attempt.succeeded() {
            self.processes.pop();
        }

        self.record(Phase::StressAllocation, vec![attempt], Vec::new(), Some(percent));
    }

    fn attempt(&mut self, index: usize) -> AllocationAttempt {
        let process = &mut self.processes[index];
        let pid = process.id();
        let requested = process.requested_size();

        let outcome = match self.manager.allocate(process) {
            Ok(handle) => match self.manager.blocks().resolve(handle) {
                Some(block) => AttemptOutcome::Allocated {
                    start: block.start,
                    size: block.size,
                },
                None => AttemptOutcome::Failed {
                    error: MemoryError::StaleHandle { pid },
                },
            },
            Err(error) => {
                debug!("P{} ({} KB) not allocated: {}", pid, requested, error);
                AttemptOutcome::Failed { error }
            }
        };

        let attempt = AllocationAttempt {
            pid,
            requested,
            outcome,
        };
        self.stats.record_attempt(attempt.succeeded());
        attempt
    }

    fn terminate(&mut self, index: usize) -> MemoryResult<TerminationOutcome> {
        let process = &mut self.processes[index];
        let pid = process.id();
        Ok(match self.manager.deallocate(process)? {
            Some(release) => TerminationOutcome::Terminated(release),
            None => TerminationOutcome::NotRunning { pid },
        })
    }

    fn record(
        &mut self,
        phase: Phase,
        allocations: Vec<AllocationAttempt>,
        terminations: Vec<TerminationOutcome>,
        stress_percent: Option<f64>,
    ) {
        let utilization = self.manager.utilization();
        self.utilization.record(utilization);

        let memory = self.manager.stats();
        let processes = ProcessCounts::tally(&self.processes);
        info!(
            "Phase {} done: {:.1}% used, {} blocks ({} free), {} running",
            phase.number(),
            utilization * 100.0,
            memory.block_count,
            memory.free_blocks,
            processes.running
        );

        self.phases.push(PhaseRecord {
            phase,
            allocations,
            terminations,
            stress_percent,
            memory,
            processes,
        });
    }

    fn finish(mut self) -> MemoryResult<SimulationRun> {
        self.manager.verify()?;

        self.stats.avg_utilization = self.utilization.average();
        self.stats.peak_utilization = self.utilization.peak();
        self.stats.fragmentation = self.manager.fragmentation();

        info!(
            "{} finished: {}/{} allocations succeeded, peak {:.1}%, fragmentation {:.1}%",
            self.manager.strategy(),
            self.stats.successful_allocations,
            self.stats.allocation_attempts,
            self.stats.peak_utilization * 100.0,
            self.stats.fragmentation.fragmentation_percentage
        );

        let processes = self
            .processes
            .into_iter()
            .map(|process| ProcessRecord {
                location: self.manager.block_of(&process).map(|b| b.start),
                process,
            })
            .collect();

        Ok(SimulationRun {
            strategy: self.manager.strategy(),
            memory_size: self.manager.total_memory(),
            phases: self.phases,
            stats: self.stats,
            final_memory: self.manager.stats(),
            final_blocks: self.manager.blocks().snapshot(),
            processes,
        })
    }
}
