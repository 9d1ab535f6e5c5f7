/*!
 * Workload Loader Tests
 * Reading workload files from disk
 */

use partition_sim::core::errors::LoadError;
use partition_sim::core::limits::MAX_PROCESSES;
use partition_sim::process::{load_workload, ProcessSpec, SkipReason};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn workload_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = workload_file(
        "# Memory size in KB\n1024\n\n# id size arrival duration\n1 212 0 5\n2 417\n3 112 2\n4 426 3 8\n",
    );
    let workload = load_workload(file.path(), MAX_PROCESSES).unwrap();

    assert_eq!(workload.memory_size, 1024);
    assert_eq!(workload.processes.len(), 4);
    assert_eq!(workload.processes[0], ProcessSpec::new(1, 212).with_timing(0, 5));
    assert_eq!(workload.processes[1], ProcessSpec::new(2, 417));
}

#[test]
fn test_default_process_cap() {
    let mut text = String::from("4096\n");
    for id in 1..=25 {
        text.push_str(&format!("{} 10\n", id));
    }
    let file = workload_file(&text);
    let workload = load_workload(file.path(), MAX_PROCESSES).unwrap();

    assert_eq!(workload.processes.len(), 20);
    assert_eq!(workload.skipped.len(), 5);
    assert!(workload
        .skipped
        .iter()
        .all(|s| s.reason == SkipReason::OverLimit));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.txt");

    match load_workload(&path, MAX_PROCESSES) {
        Err(LoadError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected Io error, got {:?}", other),
    }
}
