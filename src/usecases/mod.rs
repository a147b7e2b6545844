//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain values with the execution port to
//! implement the trigger workflows.
//!
//! Use cases:
//! - `PriceTriggerListener`: One-shot buy on a price breach
//! - `ThresholdStrategy`: Threshold tables, auto-buy, live dispatch

pub mod threshold_strategy;
pub mod trigger_listener;

pub use threshold_strategy::ThresholdStrategy;
pub use trigger_listener::PriceTriggerListener;
