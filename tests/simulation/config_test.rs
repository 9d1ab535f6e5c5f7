/*!
 * Configuration File Tests
 */

use partition_sim::core::errors::ConfigError;
use partition_sim::memory::PlacementStrategy;
use partition_sim::simulation::{SimulationConfig, TerminationPlan};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_config_file() {
    let file = config_file(
        r#"{
            "limits": { "max_blocks": 32 },
            "max_processes": 8,
            "plan": {
                "initial_allocations": 4,
                "termination": "all",
                "additional_allocations": 2,
                "stress_percent": 90
            },
            "strategies": ["worst_fit", "first_fit"]
        }"#,
    );

    let config = SimulationConfig::load(file.path()).unwrap();
    config.validate().unwrap();

    assert_eq!(config.limits.max_blocks, 32);
    assert_eq!(config.limits.split_threshold, 10);
    assert_eq!(config.max_processes, 8);
    assert_eq!(config.plan.initial_allocations, Some(4));
    assert_eq!(config.plan.termination, TerminationPlan::All);
    assert_eq!(config.plan.additional_allocations, Some(2));
    assert_eq!(
        config.strategies,
        vec![PlacementStrategy::WorstFit, PlacementStrategy::FirstFit]
    );
}

#[test]
fn test_malformed_config_file() {
    let file = config_file("{ not json");
    assert!(matches!(
        SimulationConfig::load(file.path()),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn test_out_of_range_stress_in_file() {
    let file = config_file(r#"{ "plan": { "stress_percent": 150 } }"#);
    let config = SimulationConfig::load(file.path()).unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidStressPercent(p)) if p == 150.0
    ));
}
