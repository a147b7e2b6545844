//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    thresholds = config.thresholds.len(),
    auto_buy = config.auto_buy.len(),
    armed = config.armed.len(),
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
///
/// # Errors
/// Returns error if parsing fails or validation rules are violated.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig =
    toml::from_str(content).with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;
  Ok(config)
}

fn is_valid_level(value: f64) -> bool {
  value.is_finite() && value >= 0.0
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - A usable synthetic feed (non-empty universe, ordered finite range)
/// - Non-empty securities everywhere
/// - Finite, non-negative thresholds
/// - Positive volumes and quantities
fn validate_config(config: &AppConfig) -> Result<()> {
  let sim = &config.simulation;
  anyhow::ensure!(
    !sim.securities.is_empty(),
    "Simulation needs at least one security"
  );
  anyhow::ensure!(
    sim.securities.iter().all(|s| !s.is_empty()),
    "Simulation securities must not be empty strings"
  );
  anyhow::ensure!(
    is_valid_level(sim.price_min) && is_valid_level(sim.price_max),
    "Simulation price range must be finite and non-negative, got [{}, {}]",
    sim.price_min,
    sim.price_max
  );
  anyhow::ensure!(
    sim.price_min <= sim.price_max,
    "Simulation price_min {} exceeds price_max {}",
    sim.price_min,
    sim.price_max
  );
  anyhow::ensure!(
    sim.updates_per_run > 0,
    "Simulation updates_per_run must be positive"
  );

  for (i, threshold) in config.thresholds.iter().enumerate() {
    anyhow::ensure!(
      !threshold.security.is_empty(),
      "Threshold {} has empty security",
      i
    );
    for value in [threshold.buy, threshold.sell].into_iter().flatten() {
      anyhow::ensure!(
        is_valid_level(value),
        "Threshold {} ({}) must be finite and non-negative, got {}",
        i,
        threshold.security,
        value
      );
    }
  }

  for (i, request) in config.auto_buy.iter().enumerate() {
    anyhow::ensure!(
      !request.security.is_empty(),
      "Auto-buy {} has empty security",
      i
    );
    anyhow::ensure!(
      is_valid_level(request.price_threshold),
      "Auto-buy {} ({}) price_threshold must be finite and non-negative, got {}",
      i,
      request.security,
      request.price_threshold
    );
    anyhow::ensure!(
      request.volume > 0,
      "Auto-buy {} ({}) volume must be positive",
      i,
      request.security
    );
  }

  for (i, armed) in config.armed.iter().enumerate() {
    anyhow::ensure!(
      armed.quantity > 0,
      "Armed buy {} ({}) quantity must be positive",
      i,
      armed.security
    );
    anyhow::ensure!(
      config
        .thresholds
        .iter()
        .any(|t| t.security == armed.security && t.buy.is_some()),
      "Armed buy {} ({}) has no buy threshold configured",
      i,
      armed.security
    );
  }

  Ok(())
}
