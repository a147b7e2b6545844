//! Paper Executor - Simulated Order Placement
//!
//! Implements the `ExecutionPort` by recording every buy as an
//! in-memory fill and emitting it as a structured log line. No
//! order ever leaves the process; used by the demo binary and as a
//! drop-in backend for dry runs.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::trade::{Price, Quantity, Security};
use crate::ports::execution::ExecutionPort;

/// A simulated buy fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    /// Paper order ID.
    pub id: Uuid,
    /// Security bought.
    pub security: Security,
    /// Price the trigger fired at.
    pub price: Price,
    /// Lots bought.
    pub quantity: Quantity,
    /// When the fill was recorded.
    pub executed_at: DateTime<Utc>,
}

impl Fill {
    /// Notional value of the fill.
    pub fn notional(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Paper trading backend. Every buy fills immediately at the trigger price.
#[derive(Debug, Default)]
pub struct PaperExecutor {
    fills: Mutex<Vec<Fill>>,
}

impl PaperExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded fills, oldest first.
    pub fn fills(&self) -> Vec<Fill> {
        self.fills.lock().clone()
    }

    pub fn fill_count(&self) -> usize {
        self.fills.lock().len()
    }
}

#[async_trait]
impl ExecutionPort for PaperExecutor {
    #[instrument(skip(self))]
    async fn buy(&self, security: &str, price: Price, quantity: Quantity) -> Result<()> {
        let fill = Fill {
            id: Uuid::new_v4(),
            security: security.to_string(),
            price,
            quantity,
            executed_at: Utc::now(),
        };

        let record = serde_json::to_string(&fill).context("Failed to serialize paper fill")?;
        info!(fill = %record, notional = fill.notional(), "Paper buy filled");

        self.fills.lock().push(fill);
        Ok(())
    }
}
