//! Price Feed Port - Real-time Price Update Interface
//!
//! Defines the trait for sources of `(security, price)` observations.
//! Live feeds, replayers, and the synthetic demo feed all publish
//! through a broadcast channel so the strategy never depends on
//! transport details.

use tokio::sync::broadcast;

use crate::domain::trade::PriceUpdateEvent;

/// Trait for price update providers.
pub trait PriceFeed: Send + Sync + 'static {
  /// Subscribe to every price update the feed publishes.
  ///
  /// Updates published before the call are not replayed.
  fn subscribe(&self) -> broadcast::Receiver<PriceUpdateEvent>;
}
