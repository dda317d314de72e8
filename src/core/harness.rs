use crate::config::RunSettings;
use crate::core::fanout;
use crate::core::summary::{MemorySample, RunSummary};
use crate::domain::ports::{MemoryProbe, RecordCaller};
use crate::utils::error::Result;
use crate::utils::heap::{self, MIB};
use crate::utils::validation::Validate;
use std::sync::Arc;
use std::time::Instant;

pub struct Harness<C: RecordCaller + 'static> {
    caller: Arc<C>,
    probe: Box<dyn MemoryProbe>,
    settings: RunSettings,
    pid: u32,
}

impl<C: RecordCaller + 'static> Harness<C> {
    pub fn new(caller: Arc<C>, probe: Box<dyn MemoryProbe>, settings: RunSettings) -> Self {
        Self {
            caller,
            probe,
            settings,
            pid: std::process::id(),
        }
    }

    /// Samples another process instead of this one.
    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }

    pub async fn run(&self) -> Result<RunSummary> {
        self.settings.validate()?;

        let RunSettings {
            runs,
            step,
            workers,
        } = self.settings;

        tracing::info!(
            "🚀 Starting {} iterations ({} worker(s) each), sampling every {}",
            runs,
            workers,
            step
        );

        let start = Instant::now();
        let mut samples = Vec::with_capacity(runs / step + 2);
        let mut calls: u64 = 0;

        for iteration in 0..runs {
            fanout::run_batch(&self.caller, workers).await?;
            calls += workers as u64;

            if iteration % step == 0 {
                samples.push(self.sample(iteration)?);
            }
        }
        samples.push(self.sample(runs)?);

        Ok(RunSummary {
            settings: self.settings,
            probe: None,
            pid: self.pid,
            calls,
            elapsed_ms: start.elapsed().as_millis(),
            samples,
        })
    }

    fn sample(&self, iteration: usize) -> Result<MemorySample> {
        let heap = heap::read_heap_stats()?;
        if let Some(stats) = &heap {
            stats.log(iteration);
        }

        let rss_bytes = self.probe.resident_memory_bytes(self.pid)?;
        tracing::info!(
            "📊 {}; process memory (rss): {:.3} MiB",
            iteration,
            rss_bytes as f64 / MIB
        );

        Ok(MemorySample {
            iteration,
            rss_bytes,
            heap,
            taken_at: chrono::Utc::now(),
        })
    }
}
