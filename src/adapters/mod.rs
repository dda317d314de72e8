// Adapters layer: concrete implementations for external systems (the Oracle driver).

pub mod session;
