/*!
 * Workload Loader
 * Reads the memory size and process descriptors from a text workload
 *
 * Format:
 * ```text
 * # comment
 * 1024                 <- memory size (KB)
 * 1 200                <- id size
 * 2 150 3 20           <- id size arrival duration
 * ```
 */

use super::types::ProcessSpec;
use crate::core::errors::LoadError;
use crate::core::limits::{DEFAULT_ARRIVAL_TIME, DEFAULT_DURATION};
use crate::core::types::Size;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Parsed workload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    pub memory_size: Size,
    pub processes: Vec<ProcessSpec>,
    pub skipped: Vec<SkippedLine>,
}

/// A process line the loader rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLine {
    pub line: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Fewer than two integer fields
    Malformed,
    NegativeId(i64),
    NonPositiveSize(i64),
    /// Process limit already reached
    OverLimit,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SkipReason::Malformed => write!(f, "invalid format"),
            SkipReason::NegativeId(id) => write!(f, "invalid process id ({})", id),
            SkipReason::NonPositiveSize(size) => write!(f, "invalid process size ({})", size),
            SkipReason::OverLimit => write!(f, "process limit reached"),
        }
    }
}

/// Load a workload file
pub fn load_workload(path: impl AsRef<Path>, max_processes: usize) -> Result<Workload, LoadError> {
    let path = path.as_ref();
    info!("Loading workload from {}", path.display());
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_workload(&text, &path.display().to_string(), max_processes)
}

/// Parse workload text; `source_name` only appears in errors and logs
pub fn parse_workload(
    text: &str,
    source_name: &str,
    max_processes: usize,
) -> Result<Workload, LoadError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

    let memory_size = match lines.next() {
        Some((line_number, line)) => parse_memory_size(line_number, line)?,
        None => return Err(LoadError::MissingMemorySize),
    };

    let mut processes = Vec::new();
    let mut skipped = Vec::new();

    for (line_number, line) in lines {
        if processes.len() >= max_processes {
            if !skipped.iter().any(|s: &SkippedLine| s.reason == SkipReason::OverLimit) {
                warn!(
                    "{}: process limit {} reached at line {}, ignoring the rest",
                    source_name, max_processes, line_number
                );
            }
            skipped.push(SkippedLine {
                line: line_number,
                reason: SkipReason::OverLimit,
            });
            continue;
        }

        match parse_process_line(line) {
            Ok(spec) => processes.push(spec),
            Err(reason) => {
                warn!(
                    "{}: line {} has {}, skipping",
                    source_name, line_number, reason
                );
                skipped.push(SkippedLine {
                    line: line_number,
                    reason,
                });
            }
        }
    }

    if processes.is_empty() {
        return Err(LoadError::NoProcesses {
            source_name: source_name.to_string(),
        });
    }

    info!(
        "Loaded {} processes for {} KB of memory from {} ({} lines skipped)",
        processes.len(),
        memory_size,
        source_name,
        skipped.len()
    );

    Ok(Workload {
        memory_size,
        processes,
        skipped,
    })
}

fn parse_memory_size(line_number: usize, line: &str) -> Result<Size, LoadError> {
    match leading_integers(line, 1).first() {
        Some(&size) if size > 0 => Ok(size as Size),
        _ => Err(LoadError::InvalidMemorySize {
            line: line_number,
            value: line.split_whitespace().next().unwrap_or_default().to_string(),
        }),
    }
}

/// Leading integer fields: id, size, then optional arrival and duration
fn parse_process_line(line: &str) -> Result<ProcessSpec, SkipReason> {
    let fields = leading_integers(line, 4);

    let (id, size) = match fields.as_slice() {
        [id, size, ..] => (*id, *size),
        _ => return Err(SkipReason::Malformed),
    };
    if id < 0 || id > u32::MAX as i64 {
        return Err(SkipReason::NegativeId(id));
    }
    if size <= 0 {
        return Err(SkipReason::NonPositiveSize(size));
    }

    let arrival = fields
        .get(2)
        .map_or(DEFAULT_ARRIVAL_TIME, |&v| v.max(0) as u32);
    let duration = fields.get(3).map_or(DEFAULT_DURATION, |&v| v.max(0) as u32);

    Ok(ProcessSpec::new(id as u32, size as Size).with_timing(arrival, duration))
}

/// Scan up to `limit` integers from the start of a line.
///
/// Each integer may follow whitespace and ends at the first non-digit, so
/// `10abc` reads as 10. Scanning stops at the first position holding no digits.
fn leading_integers(line: &str, limit: usize) -> Vec<i64> {
    let mut values = Vec::with_capacity(limit);
    let mut rest = line;

    while values.len() < limit {
        let trimmed = rest.trim_start();
        let sign = usize::from(trimmed.starts_with(|c| c == '-' || c == '+'));
        let digits = trimmed[sign..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        if digits == 0 {
            break;
        }

        let (number, tail) = trimmed.split_at(sign + digits);
        match number.parse::<i64>() {
            Ok(value) => values.push(value),
            Err(_) => break,
        }
        rest = tail;
    }
    values
}
