//! Allocator statistics (jemalloc).

use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

pub const MIB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapStats {
    pub allocated: u64,
    pub active: u64,
    pub resident: u64,
    pub mapped: u64,
}

impl HeapStats {
    pub fn log(&self, iteration: usize) {
        tracing::info!(
            "🧮 {}; Allocated: {:.3} MiB, Active: {:.3} MiB, Resident: {:.3} MiB, Mapped: {:.3} MiB",
            iteration,
            self.allocated as f64 / MIB,
            self.active as f64 / MIB,
            self.resident as f64 / MIB,
            self.mapped as f64 / MIB
        );
    }
}

/// Current allocator statistics, or `None` when built without jemalloc.
#[cfg(feature = "jemalloc")]
pub fn read_heap_stats() -> Result<Option<HeapStats>> {
    use crate::utils::error::HarnessError;
    use tikv_jemalloc_ctl::{epoch, stats};

    let to_err = |e: tikv_jemalloc_ctl::Error| HarnessError::HeapStatsError {
        message: e.to_string(),
    };

    // 統計數值有快取，先推進 epoch 才會拿到最新值
    epoch::advance().map_err(to_err)?;

    Ok(Some(HeapStats {
        allocated: stats::allocated::read().map_err(to_err)? as u64,
        active: stats::active::read().map_err(to_err)? as u64,
        resident: stats::resident::read().map_err(to_err)? as u64,
        mapped: stats::mapped::read().map_err(to_err)? as u64,
    }))
}

#[cfg(not(feature = "jemalloc"))]
pub fn read_heap_stats() -> Result<Option<HeapStats>> {
    Ok(None)
}
