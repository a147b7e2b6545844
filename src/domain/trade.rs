//! Core trading domain types.
//!
//! Defines the business values that flow through the trigger engine:
//! securities, buy instructions, auto-buy requests, and price updates.
//! Everything here is plain data; behavior lives in the use cases.

use serde::{Deserialize, Serialize};

use super::error::TriggerError;

// ────────────────────────────────────────────
// Type aliases consumed by ports and adapters
// ────────────────────────────────────────────

/// Opaque identifier naming a tradable instrument (e.g. "IBM").
///
/// Equality is exact string match; no normalization is applied.
pub type Security = String;

/// Quoted price of a security.
pub type Price = f64;

/// Number of lots to buy.
pub type Quantity = u32;

// ────────────────────────────────────────────
// Instructions and requests
// ────────────────────────────────────────────

/// Immutable pending buy instruction.
///
/// Built once per auto-buy request or armed listener and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuyInstruction {
    security: Security,
    trigger_level: Price,
    quantity: Quantity,
}

impl BuyInstruction {
    /// Validate and build an instruction.
    ///
    /// # Errors
    /// Returns `TriggerError::InvalidArgument` when the security is empty,
    /// the trigger level is negative or not finite, or the quantity is zero.
    pub fn new(
        security: impl Into<Security>,
        trigger_level: Price,
        quantity: Quantity,
    ) -> Result<Self, TriggerError> {
        let security = security.into();
        if security.is_empty() {
            return Err(TriggerError::InvalidArgument(
                "security must not be empty".to_string(),
            ));
        }
        if !trigger_level.is_finite() || trigger_level < 0.0 {
            return Err(TriggerError::InvalidArgument(format!(
                "trigger level must be finite and non-negative, got {trigger_level}"
            )));
        }
        if quantity == 0 {
            return Err(TriggerError::InvalidArgument(
                "quantity must be positive".to_string(),
            ));
        }
        Ok(Self {
            security,
            trigger_level,
            quantity,
        })
    }

    pub fn security(&self) -> &str {
        &self.security
    }

    pub const fn trigger_level(&self) -> Price {
        self.trigger_level
    }

    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// True when `price` for `security` should fire this instruction.
    ///
    /// The comparison is strict: a price equal to the trigger does not fire.
    pub fn is_triggered_by(&self, security: &str, price: Price) -> bool {
        security == self.security && price < self.trigger_level
    }
}

/// Caller request for a one-shot auto-buy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoBuyRequest {
    /// Security to buy.
    pub security: Security,
    /// Buy once the price is seen strictly below this level.
    pub price_threshold: Price,
    /// Number of lots to buy.
    pub volume: Quantity,
}

impl AutoBuyRequest {
    pub fn new(security: impl Into<Security>, price_threshold: Price, volume: Quantity) -> Self {
        Self {
            security: security.into(),
            price_threshold,
            volume,
        }
    }

    /// Convert into a validated instruction.
    ///
    /// # Errors
    /// Same as [`BuyInstruction::new`].
    pub fn to_instruction(&self) -> Result<BuyInstruction, TriggerError> {
        BuyInstruction::new(self.security.clone(), self.price_threshold, self.volume)
    }
}

/// Observation of a security's price at a point in time.
///
/// Ephemeral: delivered to listeners and never stored by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdateEvent {
    /// Security the price refers to.
    pub security: Security,
    /// Current quoted price.
    pub price: Price,
}

impl PriceUpdateEvent {
    pub fn new(security: impl Into<Security>, price: Price) -> Self {
        Self {
            security: security.into(),
            price,
        }
    }
}

// ────────────────────────────────────────────
// Listener lifecycle
// ────────────────────────────────────────────

/// Lifecycle of a pending buy.
///
/// `Pending → InFlight → Executed` on success, `InFlight → Pending` when the
/// execution port fails. `Executed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TriggerState {
    /// Waiting for a qualifying price update.
    Pending = 0,
    /// A buy call is outstanding.
    InFlight = 1,
    /// The buy succeeded; no further orders.
    Executed = 2,
}

impl TriggerState {
    /// Decode the atomic representation. Unknown values decode as `Executed`.
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Pending,
            1 => Self::InFlight,
            _ => Self::Executed,
        }
    }
}

impl std::fmt::Display for TriggerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::InFlight => write!(f, "IN_FLIGHT"),
            Self::Executed => write!(f, "EXECUTED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_accepts_valid_values() {
        let instruction = BuyInstruction::new("IBM", 50.0, 100).unwrap();
        assert_eq!(instruction.security(), "IBM");
        assert_eq!(instruction.trigger_level(), 50.0);
        assert_eq!(instruction.quantity(), 100);
    }

    #[test]
    fn test_instruction_accepts_zero_trigger() {
        assert!(BuyInstruction::new("IBM", 0.0, 1).is_ok());
    }

    #[test]
    fn test_instruction_rejects_zero_quantity() {
        let err = BuyInstruction::new("IBM", 50.0, 0).unwrap_err();
        assert!(matches!(err, TriggerError::InvalidArgument(_)));
    }

    #[test]
    fn test_instruction_rejects_bad_trigger() {
        for level in [-0.01, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = BuyInstruction::new("IBM", level, 10).unwrap_err();
            assert!(matches!(err, TriggerError::InvalidArgument(_)), "level {level}");
        }
    }

    #[test]
    fn test_instruction_rejects_empty_security() {
        assert!(BuyInstruction::new("", 50.0, 10).is_err());
    }

    #[test]
    fn test_trigger_is_strict() {
        let instruction = BuyInstruction::new("IBM", 50.0, 100).unwrap();
        assert!(!instruction.is_triggered_by("IBM", 50.0));
        assert!(instruction.is_triggered_by("IBM", 49.99));
        assert!(!instruction.is_triggered_by("APPLE", 10.0));
    }

    #[test]
    fn test_request_to_instruction() {
        let request = AutoBuyRequest::new("IBM", 55.0, 100);
        let instruction = request.to_instruction().unwrap();
        assert_eq!(instruction.trigger_level(), 55.0);
        assert_eq!(instruction.quantity(), 100);
    }

    #[test]
    fn test_state_round_trips_through_u8() {
        for state in [TriggerState::Pending, TriggerState::InFlight, TriggerState::Executed] {
            assert_eq!(TriggerState::from_u8(state as u8), state);
        }
        assert_eq!(TriggerState::from_u8(42), TriggerState::Executed);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(format!("{}", TriggerState::Pending), "PENDING");
        assert_eq!(format!("{}", TriggerState::Executed), "EXECUTED");
    }
}
