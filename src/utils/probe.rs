//! Resident memory probes.
//!
//! Two interchangeable ways to ask how much memory a process holds:
//! [`ProcStatusProbe`] reads `RssAnon` from `/proc/<pid>/status`, and
//! [`SysinfoProbe`] asks the `sysinfo` crate for the resident set size.

use crate::domain::ports::MemoryProbe;
use crate::utils::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

const RSS_ANON_FIELD: &str = "RssAnon:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeKind {
    /// 解析 /proc/<pid>/status 的 RssAnon 欄位
    ProcStatus,
    /// 透過 sysinfo 查詢 RSS
    Sysinfo,
}

impl ProbeKind {
    pub fn platform_default() -> Self {
        if cfg!(target_os = "linux") {
            ProbeKind::ProcStatus
        } else {
            ProbeKind::Sysinfo
        }
    }

    pub fn build(self) -> Box<dyn MemoryProbe> {
        match self {
            ProbeKind::ProcStatus => Box::new(ProcStatusProbe),
            ProbeKind::Sysinfo => Box::new(SysinfoProbe::new()),
        }
    }
}

impl std::fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeKind::ProcStatus => write!(f, "proc-status"),
            ProbeKind::Sysinfo => write!(f, "sysinfo"),
        }
    }
}

/// Resident memory of `pid` in bytes, using the platform's default probe.
pub fn resident_memory_bytes(pid: u32) -> Result<u64> {
    ProbeKind::platform_default().build().resident_memory_bytes(pid)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcStatusProbe;

impl MemoryProbe for ProcStatusProbe {
    fn resident_memory_bytes(&self, pid: u32) -> Result<u64> {
        let path = format!("/proc/{}/status", pid);
        let status = std::fs::read_to_string(&path).map_err(|e| HarnessError::ProbeError {
            pid,
            message: format!("{}: {}", path, e),
        })?;
        parse_rss_anon(&status).map_err(|message| HarnessError::ProbeError { pid, message })
    }
}

/// Extracts `RssAnon` from a `/proc/<pid>/status` payload, in bytes.
///
/// A payload without an `RssAnon:` line yields `Ok(0)`. Kernels without
/// the field (or a truncated read) therefore report zero memory instead of
/// failing; callers that need a hard guarantee should check for zero.
/// Unknown unit suffixes leave the number unscaled; a missing suffix is an error.
pub fn parse_rss_anon(status: &str) -> std::result::Result<u64, String> {
    let Some(line) = status
        .lines()
        .find_map(|line| line.strip_prefix(RSS_ANON_FIELD))
    else {
        return Ok(0);
    };

    let mut parts = line.split_whitespace();
    let value: u64 = parts
        .next()
        .ok_or_else(|| format!("{}{}: missing value", RSS_ANON_FIELD, line))?
        .parse()
        .map_err(|e| format!("{}{}: {}", RSS_ANON_FIELD, line, e))?;

    let bytes = match parts.next() {
        Some("kB") => value << 10,
        Some("MB") => value << 20,
        Some("GB") => value << 30,
        Some(_) => value,
        None => return Err(format!("{}{}: missing unit", RSS_ANON_FIELD, line)),
    };
    Ok(bytes)
}

pub struct SysinfoProbe {
    system: Mutex<System>,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProbe for SysinfoProbe {
    fn resident_memory_bytes(&self, pid: u32) -> Result<u64> {
        let mut system = self.system.lock().map_err(|_| HarnessError::ProbeError {
            pid,
            message: "sysinfo state poisoned".to_string(),
        })?;

        let pid_handle = Pid::from_u32(pid);
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid_handle]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );

        system
            .process(pid_handle)
            .map(|process| process.memory())
            .ok_or_else(|| HarnessError::ProbeError {
                pid,
                message: "process not found".to_string(),
            })
    }
}
