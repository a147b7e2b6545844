//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the use cases require
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `ExecutionPort`: Buy order placement
//! - `PriceFeed`: Streaming price updates

pub mod execution;
pub mod price_feed;

pub use execution::ExecutionPort;
pub use price_feed::PriceFeed;
