//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! backends. Each sub-module groups adapters by concern.
//!
//! Adapter categories:
//! - `execution`: `ExecutionPort` backends (paper fills)
//! - `feeds`: `PriceFeed` sources (seeded synthetic prices)

pub mod execution;
pub mod feeds;
