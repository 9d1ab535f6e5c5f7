/*!
 * Reporting
 * Text and JSON rendering of workloads and strategy runs
 */

use crate::memory::MemoryBlock;
use crate::process::{ProcessSpec, SkippedLine, Workload};
use crate::simulation::{
    AttemptOutcome, PhaseRecord, ProcessRecord, SimulationRun, TerminationOutcome,
};
use serde::Serialize;
use std::fmt;

const RULE: &str = "------------------------------------------";

/// Loaded workload: header and process table
pub struct WorkloadTable<'a> {
    pub source: &'a str,
    pub workload: &'a Workload,
}

impl fmt::Display for WorkloadTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "===== PARTITION ALLOCATION SIMULATION =====")?;
        writeln!(f)?;
        writeln!(f, "Input file: {}", self.source)?;
        writeln!(f, "Memory size: {} KB", self.workload.memory_size)?;
        writeln!(f, "Number of processes: {}", self.workload.processes.len())?;
        if !self.workload.skipped.is_empty() {
            writeln!(f, "Skipped lines: {}", self.workload.skipped.len())?;
            for SkippedLine { line, reason } in &self.workload.skipped {
                writeln!(f, "  line {}: {}", line, reason)?;
            }
        }
        writeln!(f)?;
        writeln!(f, "Processes Loaded:")?;
        writeln!(f, "{:<10} {:<10}", "ProcessID", "Size (KB)")?;
        writeln!(f, "{}", RULE)?;
        for ProcessSpec { id, size, .. } in &self.workload.processes {
            writeln!(f, "{:<10} {:<10}", id, size)?;
        }
        Ok(())
    }
}

/// One phase: allocation outcomes, terminations, and the memory summary
pub struct PhaseReport<'a>(pub &'a PhaseRecord);

impl fmt::Display for PhaseReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let record = self.0;
        writeln!(f, "--- Phase {}: {} ---", record.phase.number(), record.phase.title())?;

        if let Some(percent) = record.stress_percent {
            writeln!(f, "Stress request at {:.2}% of free memory", percent)?;
        }

        for attempt in &record.allocations {
            write!(f, "Allocating P{} ({} KB): ", attempt.pid, attempt.requested)?;
            match &attempt.outcome {
                AttemptOutcome::Allocated { start, size } if *size != attempt.requested => {
                    writeln!(f, "SUCCESS at {} ({} KB block)", start, size)?
                }
                AttemptOutcome::Allocated { start, .. } => writeln!(f, "SUCCESS at {}", start)?,
                AttemptOutcome::Failed { error } => {
                    writeln!(f, "FAILED ({}: {})", error.reason(), error)?
                }
            }
        }

        for termination in &record.terminations {
            match termination {
                TerminationOutcome::Terminated(release) => {
                    writeln!(
                        f,
                        "Terminating P{}: freed {} KB at {}",
                        release.pid, release.freed, release.start
                    )?;
                    for merge in &release.merges {
                        writeln!(
                            f,
                            "  Coalescing blocks at {} and {} ({} KB + {} KB = {} KB)",
                            merge.start,
                            merge.right_start(),
                            merge.left_size,
                            merge.right_size,
                            merge.merged_size()
                        )?;
                    }
                }
                TerminationOutcome::NotRunning { pid } => {
                    writeln!(f, "Terminating P{}: not running", pid)?
                }
            }
        }

        let memory = &record.memory;
        let free_pct = 100.0 - memory.usage_percentage;
        writeln!(f)?;
        writeln!(
            f,
            "Memory Summary: Used: {} KB ({:.1}%), Free: {} KB ({:.1}%)",
            memory.used_memory, memory.usage_percentage, memory.free_memory, free_pct
        )?;
        writeln!(
            f,
            "Blocks: Total: {}, Free: {}",
            memory.block_count, memory.free_blocks
        )?;
        writeln!(
            f,
            "Processes: Running: {}, Terminated: {}, Unallocated: {}",
            record.processes.running, record.processes.terminated, record.processes.new
        )
    }
}

/// Final process table and block list of a run
pub struct DetailedState<'a>(pub &'a SimulationRun);

impl fmt::Display for DetailedState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let run = self.0;
        writeln!(f, "Memory Allocation Table:")?;
        writeln!(f, "{:<6} {:<12} {:<8} {:<10}", "ID", "State", "Size", "Location")?;
        writeln!(f, "{}", RULE)?;
        let started = run.processes.iter().filter(|r| !r.process.is_new());
        for ProcessRecord { process, location } in started {
            let location = location.map_or_else(|| "N/A".to_string(), |start| start.to_string());
            writeln!(
                f,
                "{:<6} {:<12} {:<8} {:<10}",
                process.id(),
                process.state().to_string(),
                process.requested_size(),
                location
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Memory Status:")?;
        writeln!(
            f,
            "Total Memory: {} KB, Used: {} KB, Free: {} KB",
            run.final_memory.total_memory, run.final_memory.used_memory, run.final_memory.free_memory
        )?;

        writeln!(f)?;
        writeln!(f, "Block List Details:")?;
        writeln!(f, "{:<8} {:<8} {:<12} {:<8}", "Start", "Size", "Status", "Process")?;
        writeln!(f, "{}", RULE)?;
        for MemoryBlock {
            start,
            size,
            free,
            owner,
        } in &run.final_blocks
        {
            let status = if *free { "Free" } else { "Allocated" };
            let owner = owner.map_or_else(|| "-".to_string(), |pid| pid.to_string());
            writeln!(f, "{:<8} {:<8} {:<12} {:<8}", start, size, status, owner)?;
        }
        Ok(())
    }
}

/// Complete text report of one strategy run
pub struct RunReport<'a>(pub &'a SimulationRun);

impl fmt::Display for RunReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let run = self.0;
        let label = run.strategy.label();
        let stats = &run.stats;

        writeln!(f, "=== {} Strategy Simulation ===", run.strategy)?;
        for record in &run.phases {
            writeln!(f)?;
            write!(f, "{}", PhaseReport(record))?;
        }

        writeln!(f)?;
        writeln!(f, "--- Final Memory State (Detailed) ---")?;
        write!(f, "{}", DetailedState(run))?;

        writeln!(f)?;
        writeln!(f, "--- Final Results ({}) ---", label)?;
        writeln!(
            f,
            "Success Rate: {:.1}% ({}/{})",
            stats.success_rate(),
            stats.successful_allocations,
            stats.allocation_attempts
        )?;
        writeln!(f, "Average Memory Usage: {:.1}%", stats.avg_utilization * 100.0)?;
        writeln!(f, "Peak Memory Usage: {:.1}%", stats.peak_utilization * 100.0)?;
        writeln!(
            f,
            "Fragmentation: {:.1}% ({} free fragments, avg {:.1} KB)",
            stats.fragmentation.fragmentation_percentage,
            stats.fragmentation.external_fragmentation,
            stats.fragmentation.avg_fragment_size
        )?;
        writeln!(f, "Final Block Count: {}", run.block_count())?;
        writeln!(f)?;
        writeln!(f, "--- {} Simulation Completed ---", label)
    }
}

/// Cross-strategy comparison table
pub struct SummaryTable<'a>(pub &'a [SimulationRun]);

impl fmt::Display for SummaryTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "=== Summary of Allocation Methods ===")?;
        writeln!(
            f,
            "{:<10} {:<14} {:<14} {:<12} {:<12}",
            "Strategy", "Success Rate", "Fragmentation", "Blocks", "Free Blocks"
        )?;
        writeln!(f, "{}", "-".repeat(66))?;
        for run in self.0 {
            writeln!(
                f,
                "{:<10} {:<14} {:<14} {:<12} {:<12}",
                run.strategy.to_string(),
                format!("{:.1}%", run.stats.success_rate()),
                format!("{:.1}%", run.stats.fragmentation.fragmentation_percentage),
                run.block_count(),
                run.free_block_count()
            )?;
        }
        Ok(())
    }
}

/// Full text report: workload, every run, and the summary
pub fn render_text(source: &str, workload: &Workload, runs: &[SimulationRun]) -> String {
    let mut out = format!("{}\n", WorkloadTable { source, workload });
    for run in runs {
        out.push_str(&format!("\n{}\n", RunReport(run)));
    }
    out.push_str(&format!("\n{}", SummaryTable(runs)));
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    input: &'a str,
    workload: &'a Workload,
    runs: &'a [SimulationRun],
}

/// Pretty-printed JSON of the workload and every run
pub fn render_json(
    source: &str,
    workload: &Workload,
    runs: &[SimulationRun],
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        input: source,
        workload,
        runs,
    })
}
