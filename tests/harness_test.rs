use ora_leakcheck::domain::ports::{MemoryProbe, RecordCaller};
use ora_leakcheck::{Harness, HarnessError, Result, RunSettings, TestRecord};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// 模擬 PL/SQL 的 increment 程序
#[derive(Default)]
struct IncrementCaller {
    calls: AtomicUsize,
    fail_on_call: Option<usize>,
    off_by: i64,
}

impl RecordCaller for IncrementCaller {
    fn call_increment(&self, record: TestRecord) -> Result<TestRecord> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_call == Some(n) {
            return Err(HarnessError::ConnectionError {
                message: format!("call {} refused", n),
            });
        }
        Ok(TestRecord::new(record.id() + 1 + self.off_by))
    }
}

/// 每次取樣回傳遞增的 RSS
#[derive(Default)]
struct GrowingProbe {
    reads: AtomicU64,
}

impl MemoryProbe for GrowingProbe {
    fn resident_memory_bytes(&self, _pid: u32) -> Result<u64> {
        let n = self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(1024 * (n + 1))
    }
}

struct FailingProbe;

impl MemoryProbe for FailingProbe {
    fn resident_memory_bytes(&self, pid: u32) -> Result<u64> {
        Err(HarnessError::ProbeError {
            pid,
            message: "gone".to_string(),
        })
    }
}

fn settings(runs: usize, step: usize, workers: usize) -> RunSettings {
    RunSettings {
        runs,
        step,
        workers,
    }
}

#[tokio::test]
async fn test_samples_every_step_plus_final() {
    let caller = Arc::new(IncrementCaller::default());
    let harness = Harness::new(
        Arc::clone(&caller),
        Box::new(GrowingProbe::default()),
        settings(10, 4, 1),
    );

    let summary = harness.run().await.unwrap();

    let iterations: Vec<usize> = summary.samples.iter().map(|s| s.iteration).collect();
    assert_eq!(iterations, vec![0, 4, 8, 10]);
    assert_eq!(summary.calls, 10);
    assert_eq!(caller.calls.load(Ordering::SeqCst), 10);
    assert_eq!(summary.rss_growth_bytes(), Some(3 * 1024));
    assert_eq!(summary.pid, std::process::id());
}

#[tokio::test]
async fn test_workers_fan_out_per_iteration() {
    let caller = Arc::new(IncrementCaller::default());
    let harness = Harness::new(
        Arc::clone(&caller),
        Box::new(GrowingProbe::default()),
        settings(5, 100, 8),
    );

    let summary = harness.run().await.unwrap();

    assert_eq!(caller.calls.load(Ordering::SeqCst), 40);
    assert_eq!(summary.calls, 40);
    // 只有第 0 次與最後一次
    assert_eq!(summary.samples.len(), 2);
}

#[tokio::test]
async fn test_zero_runs_takes_only_final_sample() {
    let harness = Harness::new(
        Arc::new(IncrementCaller::default()),
        Box::new(GrowingProbe::default()),
        settings(0, 1, 1),
    );

    let summary = harness.run().await.unwrap();
    assert_eq!(summary.samples.len(), 1);
    assert_eq!(summary.samples[0].iteration, 0);
    assert_eq!(summary.calls, 0);
}

#[tokio::test]
async fn test_worker_failure_is_fatal() {
    let caller = Arc::new(IncrementCaller {
        fail_on_call: Some(6),
        ..IncrementCaller::default()
    });
    let harness = Harness::new(
        Arc::clone(&caller),
        Box::new(GrowingProbe::default()),
        settings(100, 10, 2),
    );

    let err = harness.run().await.unwrap_err();
    assert!(matches!(err, HarnessError::ConnectionError { .. }));
    // 第 4 個 iteration 失敗後不再繼續
    assert!(caller.calls.load(Ordering::SeqCst) <= 8);
}

#[tokio::test]
async fn test_wrong_result_is_fatal() {
    let caller = Arc::new(IncrementCaller {
        off_by: 1,
        ..IncrementCaller::default()
    });
    let harness = Harness::new(caller, Box::new(GrowingProbe::default()), settings(3, 1, 1));

    let err = harness.run().await.unwrap_err();
    assert!(matches!(
        err,
        HarnessError::UnexpectedResultError {
            expected: 2,
            actual: 3,
            ..
        }
    ));
}

#[tokio::test]
async fn test_probe_failure_is_fatal() {
    let caller = Arc::new(IncrementCaller::default());
    let harness = Harness::new(Arc::clone(&caller), Box::new(FailingProbe), settings(10, 5, 1))
        .with_pid(4242);

    let err = harness.run().await.unwrap_err();
    assert!(matches!(err, HarnessError::ProbeError { pid: 4242, .. }));
    // 第一次取樣就失敗
    assert_eq!(caller.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invalid_settings_are_rejected() {
    let harness = Harness::new(
        Arc::new(IncrementCaller::default()),
        Box::new(GrowingProbe::default()),
        settings(10, 0, 1),
    );
    assert!(harness.run().await.is_err());
}
