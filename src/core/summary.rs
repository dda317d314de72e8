use crate::config::RunSettings;
use crate::utils::error::Result;
use crate::utils::heap::{HeapStats, MIB};
use crate::utils::probe::ProbeKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct MemorySample {
    pub iteration: usize,
    pub rss_bytes: u64,
    pub heap: Option<HeapStats>,
    pub taken_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub settings: RunSettings,
    pub probe: Option<ProbeKind>,
    pub pid: u32,
    pub calls: u64,
    pub elapsed_ms: u128,
    pub samples: Vec<MemorySample>,
}

impl RunSummary {
    /// RSS of the last sample minus RSS of the first. Negative when memory was released.
    pub fn rss_growth_bytes(&self) -> Option<i64> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        Some(last.rss_bytes as i64 - first.rss_bytes as i64)
    }

    pub fn peak_rss_bytes(&self) -> Option<u64> {
        self.samples.iter().map(|s| s.rss_bytes).max()
    }

    pub fn log(&self) {
        tracing::info!(
            "📊 Final Stats - Calls: {}, Total Time: {} ms, Samples: {}",
            self.calls,
            self.elapsed_ms,
            self.samples.len()
        );
        if let (Some(growth), Some(peak)) = (self.rss_growth_bytes(), self.peak_rss_bytes()) {
            tracing::info!(
                "📈 RSS growth: {:+.3} MiB, Peak: {:.3} MiB",
                growth as f64 / MIB,
                peak as f64 / MIB
            );
        }
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }
}
