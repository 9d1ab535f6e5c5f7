/*!
 * Process Types
 * Process descriptors and simulation-time process records
 */

use crate::core::limits::{DEFAULT_ARRIVAL_TIME, DEFAULT_DURATION};
use crate::core::types::{Pid, Size};
use crate::memory::BlockHandle;
use serde::{Deserialize, Serialize};

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Not yet allocated
    New,
    /// Holds a block
    Running,
    /// Block released
    Terminated,
}

impl std::fmt::Display for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ProcessState::New => write!(f, "New"),
            ProcessState::Running => write!(f, "Running"),
            ProcessState::Terminated => write!(f, "Terminated"),
        }
    }
}

/// Process descriptor as read from a workload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessSpec {
    pub id: Pid,
    pub size: Size,
    /// Accepted for compatibility with workload files; unused by the allocator
    #[serde(default)]
    pub arrival_time: u32,
    /// Accepted for compatibility with workload files; unused by the allocator
    #[serde(default = "default_duration")]
    pub duration: u32,
}

fn default_duration() -> u32 {
    DEFAULT_DURATION
}

impl ProcessSpec {
    pub fn new(id: Pid, size: Size) -> Self {
        Self {
            id,
            size,
            arrival_time: DEFAULT_ARRIVAL_TIME,
            duration: DEFAULT_DURATION,
        }
    }

    pub fn with_timing(mut self, arrival_time: u32, duration: u32) -> Self {
        self.arrival_time = arrival_time;
        self.duration = duration;
        self
    }
}

/// A process taking part in one simulation run.
///
/// The block handle is `Some` exactly while the state is `Running`; only the
/// memory manager moves a process between states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Process {
    id: Pid,
    requested_size: Size,
    state: ProcessState,
    #[serde(skip)]
    block: Option<BlockHandle>,
}

impl Process {
    pub fn new(id: Pid, requested_size: Size) -> Self {
        Self {
            id,
            requested_size,
            state: ProcessState::New,
            block: None,
        }
    }

    pub fn id(&self) -> Pid {
        self.id
    }

    pub fn requested_size(&self) -> Size {
        self.requested_size
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn block(&self) -> Option<BlockHandle> {
        self.block
    }

    pub fn is_running(&self) -> bool {
        self.state == ProcessState::Running
    }

    pub fn is_new(&self) -> bool {
        self.state == ProcessState::New
    }

    pub(crate) fn bind(&mut self, handle: BlockHandle) {
        self.block = Some(handle);
        self.state = ProcessState::Running;
    }

    pub(crate) fn terminate(&mut self) {
        self.block = None;
        self.state = ProcessState::Terminated;
    }
}

impl From<&ProcessSpec> for Process {
    fn from(spec: &ProcessSpec) -> Self {
        Process::new(spec.id, spec.size)
    }
}

/// Process counts by state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessCounts {
    pub new: usize,
    pub running: usize,
    pub terminated: usize,
}

impl ProcessCounts {
    pub fn tally(processes: &[Process]) -> Self {
        processes
            .iter()
            .fold(Self::default(), |mut counts, p| {
                match p.state() {
                    ProcessState::New => counts.new += 1,
                    ProcessState::Running => counts.running += 1,
                    ProcessState::Terminated => counts.terminated += 1,
                }
                counts
            })
    }
}
