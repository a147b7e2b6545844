//! Execution Port - Order Placement Interface
//!
//! The single capability the trigger engine needs from an
//! order-management backend: place a buy. Any backend satisfying
//! this signature is substitutable (paper, broker REST, FIX).
//!
//! Key design decisions:
//! - The port returns no payload; only success or failure matters
//! - Failures propagate to the caller, the core never retries
//! - Calls are awaited, so a listener only marks itself executed
//!   after the backend confirms

use async_trait::async_trait;

use crate::domain::trade::{Price, Quantity};

/// Trait for order execution backends.
///
/// Implementors receive the security, the observed price that fired
/// the trigger, and the quantity to buy.
#[async_trait]
pub trait ExecutionPort: Send + Sync + 'static {
  /// Place a buy order.
  ///
  /// # Errors
  /// Returns error if the backend rejects or fails to place the order.
  async fn buy(&self, security: &str, price: Price, quantity: Quantity) -> anyhow::Result<()>;
}
