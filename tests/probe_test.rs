use ora_leakcheck::domain::ports::MemoryProbe;
use ora_leakcheck::utils::probe::{ProcStatusProbe, SysinfoProbe};
use ora_leakcheck::{resident_memory_bytes, HarnessError, ProbeKind};

// 超過 Linux pid_max 上限，保證不存在
const MISSING_PID: u32 = 999_999_999;

#[test]
fn test_sysinfo_reports_own_memory() {
    let rss = SysinfoProbe::new()
        .resident_memory_bytes(std::process::id())
        .unwrap();
    assert!(rss > 0);
}

#[test]
fn test_sysinfo_missing_process_is_error() {
    let err = SysinfoProbe::new()
        .resident_memory_bytes(MISSING_PID)
        .unwrap_err();
    assert!(matches!(err, HarnessError::ProbeError { pid: MISSING_PID, .. }));
}

#[test]
fn test_default_probe_missing_process_is_error() {
    assert!(resident_memory_bytes(MISSING_PID).is_err());
}

#[test]
fn test_probe_kind_builds_working_probe() {
    let probe = ProbeKind::Sysinfo.build();
    assert!(probe.resident_memory_bytes(std::process::id()).unwrap() > 0);
}

#[cfg(target_os = "linux")]
mod proc_status {
    use super::*;

    #[test]
    fn test_reads_own_status() {
        let rss = ProcStatusProbe
            .resident_memory_bytes(std::process::id())
            .unwrap();
        assert!(rss > 0);
        // RssAnon 以 kB 回報，換算後必為 1024 的倍數
        assert_eq!(rss % 1024, 0);
    }

    #[test]
    fn test_missing_process_is_error_not_zero() {
        let err = ProcStatusProbe
            .resident_memory_bytes(MISSING_PID)
            .unwrap_err();
        assert!(matches!(err, HarnessError::ProbeError { pid: MISSING_PID, .. }));
    }
}
