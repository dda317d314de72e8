//! ODPI-C memory trace analysis.
//!
//! With `DPI_DEBUG_LEVEL` memory tracing enabled, ODPI-C writes one line per
//! allocation and release, for its own buffers and for OCI's:
//!
//! ```text
//! ODPI [12345] 2024-01-01 10:00:00.000: allocated 128 bytes at 0x55d0c8a1e2a0
//! ODPI [12345] 2024-01-01 10:00:00.001: OCI allocated 64 bytes at 0x55d0c8a1e400
//! ODPI [12345] 2024-01-01 10:00:00.002: freed ptr at 0x55d0c8a1e2a0
//! ODPI [12345] 2024-01-01 10:00:00.003: OCI freed ptr at 0x55d0c8a1e400
//! ```
//!
//! [`analyze`] replays those lines and reports what was never released.

use crate::utils::error::{HarnessError, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Allocation {
    pub address: String,
    pub size: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TraceReport {
    /// Allocations never freed, in the order they were first made.
    pub outstanding: Vec<Allocation>,
    /// Frees of addresses that had no live allocation.
    pub unmatched_frees: Vec<String>,
    pub allocations: usize,
    pub frees: usize,
}

impl TraceReport {
    pub fn outstanding_bytes(&self) -> u64 {
        self.outstanding.iter().map(|a| a.size).sum()
    }
}

struct Patterns {
    allocated: Regex,
    freed: Regex,
}

impl Patterns {
    fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| HarnessError::ConfigError {
                message: format!("invalid trace pattern: {}", e),
            })
        };
        Ok(Self {
            allocated: compile(r": (?:OCI )?allocated (\d+)\s+\S+\s+\S+\s+(\S+)")?,
            freed: compile(r": (?:OCI )?freed\s+\S+\s+\S+\s+(\S+)")?,
        })
    }
}

/// Live allocations keyed by address, remembering insertion order.
#[derive(Default)]
struct LiveSet {
    slots: Vec<Option<Allocation>>,
    index: HashMap<String, usize>,
}

impl LiveSet {
    fn allocate(&mut self, address: &str, size: u64) {
        match self.index.get(address) {
            // 同一位址重複配置: 更新大小，保留原本順序
            Some(&slot) => {
                if let Some(existing) = self.slots[slot].as_mut() {
                    existing.size = size;
                }
            }
            None => {
                self.index.insert(address.to_string(), self.slots.len());
                self.slots.push(Some(Allocation {
                    address: address.to_string(),
                    size,
                }));
            }
        }
    }

    fn free(&mut self, address: &str) -> bool {
        match self.index.remove(address) {
            Some(slot) => {
                self.slots[slot] = None;
                true
            }
            None => false,
        }
    }

    fn into_outstanding(self) -> Vec<Allocation> {
        self.slots.into_iter().flatten().collect()
    }
}

pub fn analyze<R: BufRead>(reader: R) -> Result<TraceReport> {
    let patterns = Patterns::new()?;
    let mut live = LiveSet::default();
    let mut report = TraceReport::default();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;

        if let Some(caps) = patterns.allocated.captures(&line) {
            let size: u64 = caps[1].parse().map_err(|e| HarnessError::TraceError {
                line: number + 1,
                message: format!("bad allocation size '{}': {}", &caps[1], e),
            })?;
            live.allocate(&caps[2], size);
            report.allocations += 1;
        } else if let Some(caps) = patterns.freed.captures(&line) {
            report.frees += 1;
            if !live.free(&caps[1]) {
                tracing::warn!("⚠️ line {}: free of unknown address {}", number + 1, &caps[1]);
                report.unmatched_frees.push(caps[1].to_string());
            }
        }
    }

    report.outstanding = live.into_outstanding();
    Ok(report)
}

pub fn analyze_file<P: AsRef<Path>>(path: P) -> Result<TraceReport> {
    let file = std::fs::File::open(path)?;
    analyze(std::io::BufReader::new(file))
}
