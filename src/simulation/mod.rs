/*!
 * Simulation Module
 * Phase driver, run statistics, and configuration
 */

pub mod config;
pub mod runner;
pub mod stats;

pub use config::{PhasePlan, SimulationConfig, TerminationPlan};
pub use runner::{
    compare_strategies, run_simulation, AllocationAttempt, AttemptOutcome, Phase, PhaseRecord,
    ProcessRecord, SimulationRun, TerminationOutcome,
};
pub use stats::{Statistics, UtilizationTracker};
