//! Execution Adapters - `ExecutionPort` Implementations
//!
//! - Paper: In-memory simulated fills for demos and dry runs

pub mod paper;

pub use paper::{Fill, PaperExecutor};
