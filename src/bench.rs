//! Benchmark runner
//!
//! Wraps one full traversal in a wall-clock timer and samples the
//! process's resident memory before and after it.

use crate::client::{ApiClient, GraphClient};
use crate::config::BenchmarkConfig;
use crate::error::Result;
use crate::folder::FolderRef;
use crate::walker::{Visit, WalkStats, Walker};
use std::time::{Duration, Instant};
use sysinfo::{Pid, System};
use tracing::{info, warn};

/// Result of one benchmark run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkReport {
    pub elapsed: Duration,
    /// Resident memory of the process right after the walk, in bytes.
    pub memory_in_use: u64,
    /// Change in resident memory across the walk, in bytes.
    pub memory_delta: i64,
    pub stats: WalkStats,
}

/// Samples the resident memory of the current process.
pub struct MemoryProbe {
    system: System,
    pid: Option<Pid>,
}

impl MemoryProbe {
    #[must_use]
    pub fn new() -> Self {
        let pid = sysinfo::get_current_pid()
            .map_err(|e| warn!("Process memory unavailable: {}", e))
            .ok();
        Self {
            system: System::new(),
            pid,
        }
    }

    /// Current resident memory in bytes, if the platform reports it.
    pub fn sample(&mut self) -> Option<u64> {
        let pid = self.pid?;
        self.system.refresh_process(pid);
        self.system.process(pid).map(sysinfo::Process::memory)
    }
}

impl Default for MemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}

/// One timed traversal of a mailbox subtree.
pub struct Benchmark<'a, C: ApiClient + ?Sized> {
    walker: Walker<'a, C>,
    root: FolderRef,
}

impl<'a, C: ApiClient + ?Sized> Benchmark<'a, C> {
    #[must_use]
    pub fn new(client: &'a C, user_id: impl Into<String>, root: FolderRef) -> Self {
        Self {
            walker: Walker::new(client, user_id),
            root,
        }
    }

    /// Walk the mailbox once and report time and memory.
    ///
    /// # Errors
    ///
    /// Any error from the walk aborts the run; no partial report is
    /// produced.
    pub async fn run<F>(&self, on_visit: F) -> Result<BenchmarkReport>
    where
        F: FnMut(Visit<'_>),
    {
        let mut probe = MemoryProbe::new();
        let before = probe.sample();

        let started = Instant::now();
        let stats = self.walker.walk(&self.root, on_visit).await?;
        let elapsed = started.elapsed();

        let after = probe.sample();
        let (memory_in_use, memory_delta) = match (before, after) {
            (Some(before), Some(after)) => (after, signed_delta(before, after)),
            (_, Some(after)) => (after, 0),
            _ => {
                warn!("Could not sample process memory");
                (0, 0)
            }
        };

        info!(
            "Benchmark finished in {:?}: {} folders, {} messages",
            elapsed, stats.folders, stats.messages
        );
        Ok(BenchmarkReport {
            elapsed,
            memory_in_use,
            memory_delta,
            stats,
        })
    }
}

/// Authenticate with `config` and benchmark its root folder.
///
/// # Errors
///
/// Returns configuration and authentication errors before any
/// traversal starts, and the first traversal error after.
pub async fn run<F>(config: &BenchmarkConfig, on_visit: F) -> Result<BenchmarkReport>
where
    F: FnMut(Visit<'_>),
{
    let client = GraphClient::connect(config).await?;
    let root = FolderRef::from(config.root_folder.as_str());
    Benchmark::new(&client, config.user_id.as_str(), root)
        .run(on_visit)
        .await
}

fn signed_delta(before: u64, after: u64) -> i64 {
    if after >= before {
        i64::try_from(after - before).unwrap_or(i64::MAX)
    } else {
        i64::try_from(before - after).map_or(i64::MIN, |d| -d)
    }
}
