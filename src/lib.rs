pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod trace;
pub mod utils;

// 所有連結此 crate 的 binary 與測試都使用 jemalloc
#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

pub use crate::adapters::session::OracleSession;
pub use crate::config::{cli::CliArgs, dsn::ConnectParams, file::FileConfig, HarnessConfig, RunSettings};
pub use crate::core::{harness::Harness, summary::RunSummary};
pub use crate::domain::model::TestRecord;
pub use crate::utils::error::{HarnessError, Result};
pub use crate::utils::probe::{resident_memory_bytes, ProbeKind};
