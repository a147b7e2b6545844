//! Domain layer - Core business values.
//!
//! Pure data and validation for the trigger engine: instructions,
//! price updates, threshold tables, and the error taxonomy.
//! No I/O happens here (hexagonal architecture inner ring).

pub mod error;
pub mod thresholds;
pub mod trade;

// Re-export core types for convenience
pub use error::TriggerError;
pub use thresholds::ThresholdTable;
pub use trade::{
    AutoBuyRequest, BuyInstruction, Price, PriceUpdateEvent, Quantity, Security, TriggerState,
};
