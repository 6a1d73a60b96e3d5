// Loss of precision is allowable in this module's use cases.
#![allow(clippy::cast_precision_loss)]

use std::time::{Duration, Instant};

use bytesize::ByteSize;
use humantime::format_duration;
use log::{debug, error, info};
use serde::Serialize;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// A container struct for computed final statistics of a run. If the population or the
/// number of rounds is zero, the corresponding per-unit statistics are zero as well.
#[derive(Debug, Serialize)]
pub struct ExecutionStatistics {
    pub max_memory_usage: u64,
    pub cpu_time: Duration,
    pub wall_time: Duration,

    pub population: usize,
    pub rounds: u32,
    pub wall_time_per_round: Duration,
    pub memory_per_agent: u64,
}

/// Collects wall time, CPU time and peak memory over a run.
pub struct ExecutionProfilingCollector {
    /// Run start time, used to compute elapsed wall time
    start_time: Instant,
    /// The accumulated CPU time of the process in CPU-milliseconds at run start
    start_cpu_time: u64,
    /// The maximum amount of real memory used by the process, polled by
    /// [`ExecutionProfilingCollector::refresh`].
    max_memory_usage: u64,
    system: System,
    /// Current process, `None` on unsupported platforms
    process_id: Option<Pid>,
}

impl ExecutionProfilingCollector {
    #[must_use]
    pub fn new() -> ExecutionProfilingCollector {
        let process_id = sysinfo::get_current_pid().ok();
        let mut collector = ExecutionProfilingCollector {
            start_time: Instant::now(),
            start_cpu_time: 0,
            max_memory_usage: 0,
            system: System::new(),
            process_id,
        };
        if let Some(process_id) = process_id {
            debug!("Process ID: {}", process_id);
            collector.update_system_info(ProcessRefreshKind::nothing().with_cpu().with_memory());
            if let Some(process) = collector.system.process(process_id) {
                collector.max_memory_usage = process.memory();
                collector.start_cpu_time = process.accumulated_cpu_time();
            }
        }
        collector
    }

    /// Updates maximum memory usage. Polling is a system call, so the runner calls this once
    /// per round rather than once per agent.
    pub fn refresh(&mut self) {
        if let Some(pid) = self.process_id {
            self.update_system_info(ProcessRefreshKind::nothing().with_memory());
            if let Some(process) = self.system.process(pid) {
                self.max_memory_usage = self.max_memory_usage.max(process.memory());
            }
        }
    }

    fn update_system_info(&mut self, process_refresh_kind: ProcessRefreshKind) {
        if let Some(pid) = self.process_id {
            if self.system.refresh_processes_specifics(
                ProcessesToUpdate::Some(&[pid]),
                true,
                process_refresh_kind,
            ) < 1
            {
                error!("could not refresh process statistics");
            }
        }
    }

    /// Computes the final summary statistics for a run over `population` agents and `rounds`
    /// rounds.
    pub fn compute_final_statistics(
        &mut self,
        population: usize,
        rounds: u32,
    ) -> ExecutionStatistics {
        let mut cpu_time_millis = 0;
        if let Some(pid) = self.process_id {
            self.update_system_info(ProcessRefreshKind::nothing().with_cpu().with_memory());
            if let Some(process) = self.system.process(pid) {
                self.max_memory_usage = self.max_memory_usage.max(process.memory());
                cpu_time_millis = process
                    .accumulated_cpu_time()
                    .saturating_sub(self.start_cpu_time);
            }
        }

        let wall_time = self.start_time.elapsed();
        let wall_time_per_round = if rounds > 0 {
            wall_time / rounds
        } else {
            Duration::ZERO
        };
        let memory_per_agent = if population > 0 {
            self.max_memory_usage / population as u64
        } else {
            0
        };

        ExecutionStatistics {
            max_memory_usage: self.max_memory_usage,
            cpu_time: Duration::from_millis(cpu_time_millis),
            wall_time,
            population,
            rounds,
            wall_time_per_round,
            memory_per_agent,
        }
    }
}

impl Default for ExecutionProfilingCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints execution statistics to the console.
pub fn print_execution_statistics(summary: &ExecutionStatistics) {
    println!("━━━━ Execution Summary ━━━━");
    if summary.max_memory_usage == 0 {
        println!("Memory and CPU statistics are not available on your platform.");
    } else {
        println!(
            "{:<25}{}",
            "Max memory usage:",
            ByteSize::b(summary.max_memory_usage)
        );
        println!("{:<25}{}", "CPU time:", format_duration(summary.cpu_time));
    }
    println!("{:<25}{}", "Wall time:", format_duration(summary.wall_time));
    println!("{:<25}{}", "Population:", summary.population);
    println!("{:<25}{}", "Rounds:", summary.rounds);
    if summary.rounds > 0 {
        println!(
            "{:<25}{}",
            "Wall time per round:",
            format_duration(summary.wall_time_per_round)
        );
    }
    if summary.max_memory_usage > 0 && summary.population > 0 {
        println!(
            "{:<25}{}",
            "Memory per agent:",
            ByteSize::b(summary.memory_per_agent)
        );
    }
}

/// Logs execution statistics with the logging system.
pub fn log_execution_statistics(stats: &ExecutionStatistics) {
    info!("Execution complete.");
    if stats.max_memory_usage > 0 {
        info!("Max memory usage: {}", ByteSize::b(stats.max_memory_usage));
        info!("CPU time: {}", format_duration(stats.cpu_time));
    }
    info!("Wall time: {}", format_duration(stats.wall_time));
    info!(
        "Population: {}, rounds: {}, wall time per round: {}",
        stats.population,
        stats.rounds,
        format_duration(stats.wall_time_per_round)
    );
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn test_compute_final_statistics_structure() {
        let mut collector = ExecutionProfilingCollector::new();

        thread::sleep(Duration::from_millis(20));
        let stats = collector.compute_final_statistics(10, 4);

        assert!(stats.wall_time >= Duration::from_millis(20));
        assert_eq!(stats.population, 10);
        assert_eq!(stats.rounds, 4);
        assert!(stats.wall_time_per_round >= Duration::from_millis(5));
    }

    #[test]
    fn test_zero_population_results() {
        let mut collector = ExecutionProfilingCollector::new();
        collector.refresh();

        let stats = collector.compute_final_statistics(0, 0);

        assert_eq!(stats.population, 0);
        assert_eq!(stats.wall_time_per_round, Duration::ZERO);
        assert_eq!(stats.memory_per_agent, 0);
    }
}
