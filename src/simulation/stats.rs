/*!
 * Run Statistics
 * Allocation counters and utilization sampling for one strategy run
 */

use crate::core::types::Utilization;
use crate::memory::FragmentationMetrics;
use serde::{Deserialize, Serialize};

/// Per-run statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub allocation_attempts: usize,
    pub successful_allocations: usize,
    pub failed_allocations: usize,
    /// Mean of the per-phase utilization samples (0.0 - 1.0)
    pub avg_utilization: Utilization,
    pub peak_utilization: Utilization,
    /// Fragmentation at the end of the run
    pub fragmentation: FragmentationMetrics,
}

impl Statistics {
    pub fn record_attempt(&mut self, succeeded: bool) {
        self.allocation_attempts += 1;
        if succeeded {
            self.successful_allocations += 1;
        } else {
            self.failed_allocations += 1;
        }
    }

    /// Successful allocations as a percentage of attempts
    pub fn success_rate(&self) -> f64 {
        if self.allocation_attempts == 0 {
            return 0.0;
        }
        self.successful_allocations as f64 / self.allocation_attempts as f64 * 100.0
    }
}

/// Running mean and peak of utilization samples
#[derive(Debug, Clone, Copy, Default)]
pub struct UtilizationTracker {
    total: f64,
    samples: usize,
    peak: Utilization,
}

impl UtilizationTracker {
    pub fn record(&mut self, utilization: Utilization) {
        self.total += utilization;
        self.samples += 1;
        self.peak = self.peak.max(utilization);
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn average(&self) -> Utilization {
        if self.samples == 0 {
            0.0
        } else {
            self.total / self.samples as f64
        }
    }

    pub fn peak(&self) -> Utilization {
        self.peak
    }
}
