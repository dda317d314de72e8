use crate::domain::model::TestRecord;
use crate::utils::error::Result;

/// Round-trips a record through the increment procedure.
///
/// Calls are blocking; the harness runs them on tokio's blocking pool.
pub trait RecordCaller: Send + Sync {
    fn call_increment(&self, record: TestRecord) -> Result<TestRecord>;
}

pub trait MemoryProbe: Send + Sync {
    /// Resident memory of `pid` in bytes.
    fn resident_memory_bytes(&self, pid: u32) -> Result<u64>;
}
