//! Threshold Strategy - Buy/Sell Thresholds and Listener Dispatch
//!
//! Owns the per-security threshold tables and the listeners built
//! from them. Two ways to drive a buy:
//! - `auto_buy`: one-shot listener fed a caller-supplied sequence of
//!   updates (the synthetic demo feed, a replay, a test fixture)
//! - `arm` + `on_price_update` / `run`: one retained pending buy per
//!   security, bound to its buy threshold and fed by a live feed
//!
//! Sell thresholds are stored and readable but never evaluated.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, instrument, warn};

use crate::domain::trade::{AutoBuyRequest, BuyInstruction, Price, PriceUpdateEvent, Quantity, Security};
use crate::domain::{ThresholdTable, TriggerError};
use crate::ports::execution::ExecutionPort;

use super::trigger_listener::PriceTriggerListener;

/// Threshold tables plus the listeners dispatched from them.
pub struct ThresholdStrategy<E: ExecutionPort> {
  /// Execution port shared with every listener.
  execution: Arc<E>,
  /// Buy and sell thresholds.
  thresholds: RwLock<ThresholdTable>,
  /// Retained listeners, at most one per security.
  armed: Mutex<HashMap<Security, Arc<PriceTriggerListener<E>>>>,
}

impl<E: ExecutionPort> ThresholdStrategy<E> {
  /// Create a strategy with empty threshold tables.
  pub fn new(execution: Arc<E>) -> Self {
    Self {
      execution,
      thresholds: RwLock::new(ThresholdTable::new()),
      armed: Mutex::new(HashMap::new()),
    }
  }

  /// Set the buy threshold, below which a buy order should be placed.
  pub fn set_buy_threshold(&self, security: &str, value: Price) {
    self.thresholds.write().set_buy(security, value);
    debug!(security, value, "Buy threshold set");
  }

  /// Set the sell threshold, above which a sell order should be placed.
  pub fn set_sell_threshold(&self, security: &str, value: Price) {
    self.thresholds.write().set_sell(security, value);
    debug!(security, value, "Sell threshold set");
  }

  /// Clear all buy and sell thresholds. Armed listeners are kept.
  pub fn clear_thresholds(&self) {
    self.thresholds.write().clear();
    info!("All thresholds cleared");
  }

  pub fn buy_threshold(&self, security: &str) -> Option<Price> {
    self.thresholds.read().buy(security)
  }

  pub fn sell_threshold(&self, security: &str) -> Option<Price> {
    self.thresholds.read().sell(security)
  }

  /// Snapshot of the buy threshold table.
  pub fn buy_thresholds(&self) -> HashMap<Security, Price> {
    self.thresholds.read().buy_table().clone()
  }

  /// Snapshot of the sell threshold table.
  pub fn sell_thresholds(&self) -> HashMap<Security, Price> {
    self.thresholds.read().sell_table().clone()
  }

  /// Execute a single buy of `request.volume` lots as soon as the price
  /// of `request.security` is seen below `request.price_threshold`.
  ///
  /// A fresh listener is fed `updates` one at a time, in order, and
  /// dropped afterwards. At most one buy is placed.
  ///
  /// # Errors
  /// `InvalidArgument` for an invalid request (before any update is
  /// processed), or the first `ExecutionFailure`, which stops delivery.
  #[instrument(
    skip(self, request, updates),
    fields(security = %request.security, threshold = request.price_threshold, volume = request.volume)
  )]
  pub async fn auto_buy<I>(&self, request: &AutoBuyRequest, updates: I) -> Result<(), TriggerError>
  where
    I: IntoIterator<Item = PriceUpdateEvent>,
  {
    let listener = PriceTriggerListener::from_instruction(
      request.to_instruction()?,
      Arc::clone(&self.execution),
      false,
    );

    let mut delivered = 0usize;
    for update in updates {
      listener.on_event(&update).await?;
      delivered += 1;
    }

    info!(
      delivered,
      executed = listener.is_executed(),
      "Auto-buy scenario finished"
    );
    Ok(())
  }

  /// Arm a retained pending buy for `security` at its current buy threshold.
  ///
  /// A listener that already executed is replaced.
  ///
  /// # Errors
  /// - `NoBuyThreshold` if no buy threshold is stored for `security`
  /// - `AlreadyArmed` if a pending (or in-flight) buy exists for it
  /// - `InvalidArgument` for a zero quantity or unusable threshold
  pub fn arm(
    &self,
    security: &str,
    quantity: Quantity,
  ) -> Result<Arc<PriceTriggerListener<E>>, TriggerError> {
    let trigger_level = self
      .buy_threshold(security)
      .ok_or_else(|| TriggerError::NoBuyThreshold(security.to_string()))?;
    let instruction = BuyInstruction::new(security, trigger_level, quantity)?;

    let mut armed = self.armed.lock();
    if armed.get(security).is_some_and(|existing| !existing.is_executed()) {
      return Err(TriggerError::AlreadyArmed(security.to_string()));
    }

    let listener = Arc::new(PriceTriggerListener::from_instruction(
      instruction,
      Arc::clone(&self.execution),
      false,
    ));
    armed.insert(security.to_string(), Arc::clone(&listener));

    info!(security, trigger_level, quantity, "Buy armed");
    Ok(listener)
  }

  /// Drop the retained listener for `security`. Returns whether one existed.
  pub fn disarm(&self, security: &str) -> bool {
    let removed = self.armed.lock().remove(security).is_some();
    if removed {
      info!(security, "Buy disarmed");
    }
    removed
  }

  /// Securities with a retained listener, pending or executed.
  pub fn armed_securities(&self) -> Vec<Security> {
    let mut securities: Vec<_> = self.armed.lock().keys().cloned().collect();
    securities.sort();
    securities
  }

  /// Whether the retained buy for `security` executed; `None` if not armed.
  pub fn is_executed(&self, security: &str) -> Option<bool> {
    self
      .armed
      .lock()
      .get(security)
      .map(|listener| listener.is_executed())
  }

  /// Route a live update to the retained listener for its security.
  ///
  /// # Errors
  /// `ExecutionFailure` if the listener fired and the port failed.
  pub async fn on_price_update(&self, event: &PriceUpdateEvent) -> Result<(), TriggerError> {
    let listener = self.armed.lock().get(&event.security).cloned();
    match listener {
      Some(listener) => listener.on_event(event).await,
      None => Ok(()),
    }
  }

  /// Dispatch a live feed until shutdown or until the feed closes.
  ///
  /// Execution failures are logged and the loop keeps going; the
  /// listener stays pending and may fire on a later update.
  #[instrument(skip_all, name = "threshold_loop")]
  pub async fn run(
    &self,
    mut updates: broadcast::Receiver<PriceUpdateEvent>,
    mut shutdown_rx: broadcast::Receiver<()>,
  ) -> Result<()> {
    info!(armed = self.armed.lock().len(), "Threshold strategy started");

    loop {
      tokio::select! {
        biased;
        _ = shutdown_rx.recv() => {
          info!("Shutdown signal received, stopping strategy");
          break;
        }
        update = updates.recv() => match update {
          Ok(event) => {
            if let Err(e) = self.on_price_update(&event).await {
              warn!(
                error = %e,
                security = %event.security,
                price = event.price,
                "Error processing price update"
              );
            }
          }
          Err(RecvError::Lagged(skipped)) => {
            warn!(skipped, "Price feed lagged, updates dropped");
          }
          Err(RecvError::Closed) => {
            info!("Price feed closed, stopping strategy");
            break;
          }
        }
      }
    }

    Ok(())
  }
}
