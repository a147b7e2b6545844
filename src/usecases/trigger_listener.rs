//! Price Trigger Listener - One-shot Buy on Price Breach
//!
//! Holds a single pending buy instruction and fires it at most once:
//! the first price update for the bound security that is strictly
//! below the trigger level places the buy through the execution port.
//!
//! The check-then-buy sequence is an atomic compare-and-set on the
//! listener state, so concurrent updates can never place two orders:
//! - `Pending → InFlight` is claimed before the port is called
//! - success stores `Executed` (terminal)
//! - failure stores `Pending` again, leaving the listener eligible
//!   to fire on a later qualifying update

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use tracing::{debug, info, warn};

use crate::domain::trade::{BuyInstruction, Price, PriceUpdateEvent, Quantity, TriggerState};
use crate::domain::TriggerError;
use crate::ports::execution::ExecutionPort;

/// Listener bound to one buy instruction.
pub struct PriceTriggerListener<E: ExecutionPort> {
  /// Instruction fired by this listener.
  instruction: BuyInstruction,
  /// Encoded `TriggerState`.
  state: AtomicU8,
  /// Shared execution port.
  execution: Arc<E>,
}

impl<E: ExecutionPort> PriceTriggerListener<E> {
  /// Create a pending listener.
  ///
  /// # Errors
  /// Returns `TriggerError::InvalidArgument` for an empty security,
  /// a negative or non-finite trigger level, or a zero quantity.
  pub fn new(
    security: &str,
    trigger_level: Price,
    quantity: Quantity,
    execution: Arc<E>,
  ) -> Result<Self, TriggerError> {
    Self::with_state(security, trigger_level, quantity, execution, false)
  }

  /// Create a listener with an explicit initial executed flag.
  ///
  /// # Errors
  /// Same as [`PriceTriggerListener::new`].
  pub fn with_state(
    security: &str,
    trigger_level: Price,
    quantity: Quantity,
    execution: Arc<E>,
    executed: bool,
  ) -> Result<Self, TriggerError> {
    let instruction = BuyInstruction::new(security, trigger_level, quantity)?;
    Ok(Self::from_instruction(instruction, execution, executed))
  }

  /// Wrap an already validated instruction.
  pub fn from_instruction(instruction: BuyInstruction, execution: Arc<E>, executed: bool) -> Self {
    let state = if executed {
      TriggerState::Executed
    } else {
      TriggerState::Pending
    };
    Self {
      instruction,
      state: AtomicU8::new(state as u8),
      execution,
    }
  }

  /// Consume one price update.
  ///
  /// Places the buy when `security` matches and `price` is strictly
  /// below the trigger level, unless an order was already placed or
  /// is in flight. Every other update is a no-op.
  ///
  /// # Errors
  /// Returns `TriggerError::ExecutionFailure` if the execution port
  /// fails; the listener is left pending.
  pub async fn on_price_update(&self, security: &str, price: Price) -> Result<(), TriggerError> {
    if self.state() == TriggerState::Executed {
      return Ok(());
    }
    if !self.instruction.is_triggered_by(security, price) {
      return Ok(());
    }

    if self
      .state
      .compare_exchange(
        TriggerState::Pending as u8,
        TriggerState::InFlight as u8,
        Ordering::AcqRel,
        Ordering::Acquire,
      )
      .is_err()
    {
      debug!(security, price, "Buy already placed or in flight, update ignored");
      return Ok(());
    }

    // A dropped future leaves the state InFlight: the order outcome is
    // unknown, so the listener must not fire again.
    let quantity = self.instruction.quantity();
    match self.execution.buy(security, price, quantity).await {
      Ok(()) => {
        self
          .state
          .store(TriggerState::Executed as u8, Ordering::Release);
        info!(
          security,
          price,
          quantity,
          trigger = self.instruction.trigger_level(),
          "Buy executed"
        );
        Ok(())
      }
      Err(source) => {
        self
          .state
          .store(TriggerState::Pending as u8, Ordering::Release);
        warn!(security, price, error = %source, "Buy failed, listener still pending");
        Err(TriggerError::ExecutionFailure {
          security: security.to_string(),
          source,
        })
      }
    }
  }

  /// Consume one price update event.
  ///
  /// # Errors
  /// Same as [`PriceTriggerListener::on_price_update`].
  pub async fn on_event(&self, event: &PriceUpdateEvent) -> Result<(), TriggerError> {
    self.on_price_update(&event.security, event.price).await
  }

  pub const fn instruction(&self) -> &BuyInstruction {
    &self.instruction
  }

  pub fn security(&self) -> &str {
    self.instruction.security()
  }

  pub const fn trigger_level(&self) -> Price {
    self.instruction.trigger_level()
  }

  pub const fn quantity(&self) -> Quantity {
    self.instruction.quantity()
  }

  /// Current lifecycle state.
  pub fn state(&self) -> TriggerState {
    TriggerState::from_u8(self.state.load(Ordering::Acquire))
  }

  /// True once the buy has been confirmed by the execution port.
  pub fn is_executed(&self) -> bool {
    self.state() == TriggerState::Executed
  }
}

impl<E: ExecutionPort> std::fmt::Debug for PriceTriggerListener<E> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PriceTriggerListener")
      .field("instruction", &self.instruction)
      .field("state", &self.state())
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::AtomicUsize;

  use async_trait::async_trait;
  use parking_lot::Mutex;

  use super::*;

  /// Records every buy; fails the first `failures` calls.
  #[derive(Default)]
  struct RecordingPort {
    calls: Mutex<Vec<(String, Price, Quantity)>>,
    failures: AtomicUsize,
  }

  impl RecordingPort {
    fn failing(failures: usize) -> Self {
      Self {
        calls: Mutex::new(Vec::new()),
        failures: AtomicUsize::new(failures),
      }
    }

    fn calls(&self) -> Vec<(String, Price, Quantity)> {
      self.calls.lock().clone()
    }
  }

  #[async_trait]
  impl ExecutionPort for RecordingPort {
    async fn buy(&self, security: &str, price: Price, quantity: Quantity) -> anyhow::Result<()> {
      self.calls.lock().push((security.to_string(), price, quantity));
      let remaining = self.failures.load(Ordering::SeqCst);
      if remaining > 0 {
        self.failures.store(remaining - 1, Ordering::SeqCst);
        anyhow::bail!("broker rejected order");
      }
      Ok(())
    }
  }

  fn listener(port: &Arc<RecordingPort>) -> PriceTriggerListener<RecordingPort> {
    PriceTriggerListener::new("IBM", 50.0, 100, Arc::clone(port)).unwrap()
  }

  #[test]
  fn test_initial_state() {
    let port = Arc::new(RecordingPort::default());
    let listener = listener(&port);
    assert_eq!(listener.security(), "IBM");
    assert_eq!(listener.trigger_level(), 50.0);
    assert_eq!(listener.quantity(), 100);
    assert!(!listener.is_executed());
    assert_eq!(listener.state(), TriggerState::Pending);
  }

  #[test]
  fn test_rejects_invalid_arguments() {
    let port = Arc::new(RecordingPort::default());
    assert!(PriceTriggerListener::new("IBM", 50.0, 0, Arc::clone(&port)).is_err());
    assert!(PriceTriggerListener::new("IBM", -1.0, 10, Arc::clone(&port)).is_err());
    assert!(PriceTriggerListener::new("IBM", f64::NAN, 10, port).is_err());
  }

  #[tokio::test]
  async fn test_buy_when_threshold_met() {
    let port = Arc::new(RecordingPort::default());
    let listener = listener(&port);

    listener.on_price_update("IBM", 25.0).await.unwrap();

    assert_eq!(port.calls(), vec![("IBM".to_string(), 25.0, 100)]);
    assert!(listener.is_executed());
  }

  #[tokio::test]
  async fn test_no_buy_at_trigger_level() {
    let port = Arc::new(RecordingPort::default());
    let listener = listener(&port);

    listener.on_price_update("IBM", 50.0).await.unwrap();
    assert!(port.calls().is_empty());
    assert!(!listener.is_executed());

    listener.on_price_update("IBM", 49.99).await.unwrap();
    assert_eq!(port.calls(), vec![("IBM".to_string(), 49.99, 100)]);
  }

  #[tokio::test]
  async fn test_no_buy_above_threshold() {
    let port = Arc::new(RecordingPort::default());
    let listener = listener(&port);

    listener.on_price_update("IBM", 55.0).await.unwrap();

    assert!(port.calls().is_empty());
    assert!(!listener.is_executed());
  }

  #[tokio::test]
  async fn test_no_buy_for_other_security() {
    let port = Arc::new(RecordingPort::default());
    let listener = listener(&port);

    listener.on_price_update("APPLE", 10.0).await.unwrap();

    assert!(port.calls().is_empty());
    assert!(!listener.is_executed());
  }

  #[tokio::test]
  async fn test_buys_only_once() {
    let port = Arc::new(RecordingPort::default());
    let listener = listener(&port);

    for price in [25.0, 10.0, 35.0] {
      listener.on_price_update("IBM", price).await.unwrap();
    }

    assert_eq!(port.calls(), vec![("IBM".to_string(), 25.0, 100)]);
    assert!(listener.is_executed());
  }

  #[tokio::test]
  async fn test_initially_executed_never_buys() {
    let port = Arc::new(RecordingPort::default());
    let listener =
      PriceTriggerListener::with_state("IBM", 50.0, 100, Arc::clone(&port), true).unwrap();

    listener.on_price_update("IBM", 1.0).await.unwrap();

    assert!(port.calls().is_empty());
    assert!(listener.is_executed());
  }

  #[tokio::test]
  async fn test_failure_leaves_listener_pending() {
    let port = Arc::new(RecordingPort::failing(1));
    let listener = listener(&port);

    let err = listener.on_price_update("IBM", 25.0).await.unwrap_err();
    assert!(err.is_execution_failure());
    assert_eq!(listener.state(), TriggerState::Pending);

    // Identical update retries and succeeds.
    listener.on_price_update("IBM", 25.0).await.unwrap();
    assert!(listener.is_executed());
    assert_eq!(port.calls().len(), 2);
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn test_concurrent_updates_buy_once() {
    let port = Arc::new(RecordingPort::default());
    let listener = Arc::new(listener(&port));

    let handles: Vec<_> = (0..32u32)
      .map(|i| {
        let listener = Arc::clone(&listener);
        tokio::spawn(async move {
          listener
            .on_price_update("IBM", 10.0 + f64::from(i))
            .await
            .unwrap();
        })
      })
      .collect();
    for handle in handles {
      handle.await.unwrap();
    }

    assert_eq!(port.calls().len(), 1);
    assert!(listener.is_executed());
  }
}
