//! Configuration Module - TOML-based Bot Configuration
//!
//! Loads and validates configuration from `config.toml`.
//! Thresholds, auto-buy requests, and the synthetic feed universe
//! are externalized here; nothing is hardcoded in the core.

pub mod loader;

use serde::Deserialize;

use crate::domain::trade::{Price, Quantity, Security};

/// Top-level bot configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the bot begins operation.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Bot identity and metadata.
  pub bot: BotConfig,
  /// Synthetic price feed parameters.
  #[serde(default)]
  pub simulation: SimulationConfig,
  /// Initial buy/sell thresholds.
  #[serde(default)]
  pub thresholds: Vec<ThresholdConfig>,
  /// One-shot auto-buy scenarios run against the synthetic feed.
  #[serde(default)]
  pub auto_buy: Vec<AutoBuyConfig>,
  /// Retained buys armed from the buy thresholds for the live loop.
  #[serde(default)]
  pub armed: Vec<ArmedConfig>,
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
  /// Human-readable bot name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

/// Synthetic price feed configuration.
///
/// Each update picks a security uniformly from `securities` and a
/// price uniformly from `[price_min, price_max]`.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
  /// Security universe the feed draws from.
  #[serde(default = "default_securities")]
  pub securities: Vec<Security>,
  /// Lowest generated price (inclusive).
  #[serde(default = "default_price_min")]
  pub price_min: Price,
  /// Highest generated price (inclusive).
  #[serde(default = "default_price_max")]
  pub price_max: Price,
  /// Updates generated per auto-buy scenario or live run.
  #[serde(default = "default_updates_per_run")]
  pub updates_per_run: usize,
  /// Seed for a reproducible feed; OS entropy when absent.
  pub seed: Option<u64>,
}

impl Default for SimulationConfig {
  fn default() -> Self {
    Self {
      securities: default_securities(),
      price_min: default_price_min(),
      price_max: default_price_max(),
      updates_per_run: default_updates_per_run(),
      seed: None,
    }
  }
}

/// Initial thresholds for one security.
#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdConfig {
  pub security: Security,
  /// Buy below this price.
  pub buy: Option<Price>,
  /// Sell above this price (stored only).
  pub sell: Option<Price>,
}

/// One-shot auto-buy scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct AutoBuyConfig {
  pub security: Security,
  pub price_threshold: Price,
  pub volume: Quantity,
}

/// Retained buy armed at the security's buy threshold.
#[derive(Debug, Clone, Deserialize)]
pub struct ArmedConfig {
  pub security: Security,
  pub quantity: Quantity,
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_securities() -> Vec<Security> {
  vec!["IBM".to_string(), "GOOGLE".to_string()]
}

const fn default_price_min() -> Price {
  1.0
}

const fn default_price_max() -> Price {
  100.0
}

const fn default_updates_per_run() -> usize {
  10
}
