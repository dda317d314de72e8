use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] oracle::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Worker task failed: {0}")]
    WorkerJoinError(#[from] tokio::task::JoinError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Connection unavailable: {message}")]
    ConnectionError { message: String },

    #[error("Invalid DSN: {reason}")]
    DsnError { reason: String },

    #[error("Object attribute error ({attribute}): {message}")]
    AttributeError { attribute: String, message: String },

    #[error("Cannot read memory of process {pid}: {message}")]
    ProbeError { pid: u32, message: String },

    #[error("Heap statistics unavailable: {message}")]
    HeapStatsError { message: String },

    #[error("Worker {worker} got ID {actual}, expected {expected}")]
    UnexpectedResultError {
        worker: usize,
        expected: i64,
        actual: i64,
    },

    #[error("Trace parsing error at line {line}: {message}")]
    TraceError { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, HarnessError>;
