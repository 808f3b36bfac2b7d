use serde::Serialize;
use serde_json::{Value, json};
use sysinfo::{ProcessesToUpdate, System};

/// Share of host memory held by this process at or above which the memory check warns.
pub const MEMORY_WARN_THRESHOLD_PCT: f64 = 90.0;

#[derive(Debug, Serialize, Clone, Default)]
pub struct ProcessMemory {
    pub rss: u64,
    pub virtual_bytes: u64,
}

#[derive(Debug, Serialize, Clone)]
pub struct SystemSnapshot {
    pub pid: u32,
    pub platform: &'static str,
    pub process: ProcessMemory,
    pub mem_total: u64,
    pub mem_used: u64,
    pub load_one: f64,
    pub load_five: f64,
    pub load_fifteen: f64,
    pub host_uptime_seconds: u64,
}

impl SystemSnapshot {
    /// Resident set of this process as a percentage of host memory, `0.0` when
    /// the total is unknown. Other tenants of the host do not count.
    pub fn memory_usage_pct(&self) -> f64 {
        if self.mem_total == 0 {
            return 0.0;
        }
        (self.process.rss as f64 / self.mem_total as f64) * 100.0
    }

    /// `"pass"` below [`MEMORY_WARN_THRESHOLD_PCT`], `"warn"` otherwise.
    pub fn memory_status(&self) -> &'static str {
        if self.memory_usage_pct() < MEMORY_WARN_THRESHOLD_PCT {
            "pass"
        } else {
            "warn"
        }
    }

    pub fn memory_json(&self) -> Value {
        json!({
            "rss": self.process.rss,
            "virtual": self.process.virtual_bytes,
            "systemTotal": self.mem_total,
            "systemUsed": self.mem_used,
        })
    }
}

/// Samples memory figures for the current process and the host.
pub fn sample_system_snapshot() -> SystemSnapshot {
    let mut sys = System::new();
    sys.refresh_memory();

    let pid = std::process::id();
    let process = match sysinfo::get_current_pid() {
        Ok(current) => {
            sys.refresh_processes(ProcessesToUpdate::Some(&[current]), true);
            sys.process(current)
                .map(|p| ProcessMemory {
                    rss: p.memory(),
                    virtual_bytes: p.virtual_memory(),
                })
                .unwrap_or_default()
        }
        Err(e) => {
            tracing::debug!(error = %e, "current pid unavailable to sysinfo");
            ProcessMemory::default()
        }
    };

    let load = System::load_average();

    SystemSnapshot {
        pid,
        platform: std::env::consts::OS,
        process,
        mem_total: sys.total_memory(),
        mem_used: sys.used_memory(),
        load_one: load.one,
        load_five: load.five,
        load_fifteen: load.fifteen,
        host_uptime_seconds: System::uptime(),
    }
}
