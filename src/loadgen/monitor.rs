use std::fmt;
use std::time::{Duration, Instant};

use sysinfo::{Pid, ProcessesToUpdate, System};

use super::LoadError;

/// How long CPU usage is sampled for the final report.
pub const CPU_SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceReport {
    pub elapsed: Duration,
    /// Resident memory of the runner process.
    pub memory_mb: f64,
    /// System-wide CPU utilization over the sample interval.
    pub cpu_percent: f32,
}

impl fmt::Display for ResourceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Performance Report:")?;
        writeln!(f, "  Time Taken      : {:.2} seconds", self.elapsed.as_secs_f64())?;
        writeln!(f, "  Memory Used     : {:.2} MB", self.memory_mb)?;
        write!(f, "  CPU Utilization : {:.1}%", self.cpu_percent)
    }
}

pub struct ResourceMonitor {
    system: System,
    pid: Pid,
    start_time: Instant,
}

impl ResourceMonitor {
    pub fn start() -> Result<Self, LoadError> {
        let pid = sysinfo::get_current_pid().map_err(|e| LoadError::Monitor(e.to_string()))?;
        Ok(Self {
            system: System::new(),
            pid,
            start_time: Instant::now(),
        })
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn memory_mb(&mut self) -> f64 {
        self.system
            .refresh_processes(ProcessesToUpdate::Some(&[self.pid]), true);
        self.system
            .process(self.pid)
            .map(|process| process.memory() as f64 / (1024.0 * 1024.0))
            .unwrap_or(0.0)
    }

    /// Stop the clock, then sample memory and CPU.
    pub async fn finish(mut self, cpu_interval: Duration) -> ResourceReport {
        let elapsed = self.elapsed();
        let memory_mb = self.memory_mb();

        self.system.refresh_cpu_usage();
        tokio::time::sleep(cpu_interval.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL)).await;
        self.system.refresh_cpu_usage();
        let cpu_percent = self.system.global_cpu_usage();

        ResourceReport {
            elapsed,
            memory_mb,
            cpu_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_formatting() {
        let report = ResourceReport {
            elapsed: Duration::from_millis(12_345),
            memory_mb: 48.123,
            cpu_percent: 37.5,
        };
        let text = report.to_string();

        assert!(text.contains("Time Taken      : 12.35 seconds"));
        assert!(text.contains("Memory Used     : 48.12 MB"));
        assert!(text.contains("CPU Utilization : 37.5%"));
    }

    #[tokio::test]
    async fn test_monitor_reports_own_process() {
        let monitor = ResourceMonitor::start().unwrap();
        let report = monitor.finish(Duration::from_millis(10)).await;

        assert!(report.memory_mb > 0.0);
        assert!((0.0..=100.0).contains(&report.cpu_percent));
    }
}
