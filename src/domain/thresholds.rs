//! Per-security buy and sell threshold tables.
//!
//! Two independent maps keyed by security. Writes are upserts
//! (last write wins); there is no ordering between entries.
//! Sell thresholds are stored for inspection only and never
//! drive an order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::trade::{Price, Security};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    buy: HashMap<Security, Price>,
    sell: HashMap<Security, Price>,
}

impl ThresholdTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_buy(&mut self, security: impl Into<Security>, value: Price) {
        self.buy.insert(security.into(), value);
    }

    pub fn set_sell(&mut self, security: impl Into<Security>, value: Price) {
        self.sell.insert(security.into(), value);
    }

    pub fn buy(&self, security: &str) -> Option<Price> {
        self.buy.get(security).copied()
    }

    pub fn sell(&self, security: &str) -> Option<Price> {
        self.sell.get(security).copied()
    }

    pub const fn buy_table(&self) -> &HashMap<Security, Price> {
        &self.buy
    }

    pub const fn sell_table(&self) -> &HashMap<Security, Price> {
        &self.sell
    }

    /// Empty both tables regardless of prior contents.
    pub fn clear(&mut self) {
        self.sell.clear();
        self.buy.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.buy.is_empty() && self.sell.is_empty()
    }
}
