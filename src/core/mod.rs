pub mod fanout;
pub mod harness;
pub mod summary;

pub use crate::domain::model::TestRecord;
pub use crate::domain::ports::{MemoryProbe, RecordCaller};
pub use crate::utils::error::Result;
