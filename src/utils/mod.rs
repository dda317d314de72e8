pub mod error;
pub mod heap;
pub mod logger;
pub mod probe;
pub mod validation;
