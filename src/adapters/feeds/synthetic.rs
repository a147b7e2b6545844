//! Synthetic Price Feed - Seeded Random Price Updates
//!
//! Generates `(security, price)` updates by picking a security
//! uniformly from a fixed universe and a price uniformly from a
//! closed range. The random source is a seedable `StdRng`, so a
//! configured seed reproduces the exact same sequence.
//!
//! Two ways to consume it:
//! - as an `Iterator` (e.g. `feed.batch(10)` into `auto_buy`)
//! - as a `PriceFeed`, publishing batches on a broadcast channel

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::domain::trade::{Price, PriceUpdateEvent, Security};
use crate::ports::price_feed::PriceFeed;

/// Broadcast buffer; slow subscribers see `Lagged` beyond this.
const CHANNEL_CAPACITY: usize = 1024;

/// Random price generator over a fixed security universe.
pub struct SyntheticFeed {
    /// Securities drawn from.
    securities: Vec<Security>,
    /// Lowest generated price (inclusive).
    price_min: Price,
    /// Highest generated price (inclusive).
    price_max: Price,
    /// Injected random source.
    rng: StdRng,
    /// Broadcast sender for published updates.
    update_tx: broadcast::Sender<PriceUpdateEvent>,
}

impl SyntheticFeed {
    /// Build a feed over `securities` with prices in `[price_min, price_max]`.
    ///
    /// # Errors
    /// Returns error for an empty universe or an unusable price range.
    pub fn new(
        securities: Vec<Security>,
        price_min: Price,
        price_max: Price,
        rng: StdRng,
    ) -> Result<Self> {
        anyhow::ensure!(!securities.is_empty(), "Synthetic feed needs at least one security");
        anyhow::ensure!(
            price_min.is_finite() && price_max.is_finite() && price_min <= price_max,
            "Invalid synthetic price range [{price_min}, {price_max}]"
        );

        let (update_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Ok(Self {
            securities,
            price_min,
            price_max,
            rng,
            update_tx,
        })
    }

    /// Build a feed from configuration, seeded from `config.seed` or
    /// OS entropy when no seed is set.
    ///
    /// # Errors
    /// Same as [`SyntheticFeed::new`].
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        info!(
            securities = config.securities.len(),
            price_min = config.price_min,
            price_max = config.price_max,
            seeded = config.seed.is_some(),
            "Synthetic feed created"
        );
        Self::new(
            config.securities.clone(),
            config.price_min,
            config.price_max,
            rng,
        )
    }

    /// Generate the next update.
    pub fn next_update(&mut self) -> PriceUpdateEvent {
        let index = self.rng.random_range(0..self.securities.len());
        let price = self.rng.random_range(self.price_min..=self.price_max);
        PriceUpdateEvent::new(self.securities[index].clone(), price)
    }

    /// Generate `count` updates in order.
    pub fn batch(&mut self, count: usize) -> Vec<PriceUpdateEvent> {
        (0..count).map(|_| self.next_update()).collect()
    }

    /// Generate `count` updates and broadcast them to subscribers.
    ///
    /// Returns how many updates were published. Updates generated
    /// while nobody is subscribed are dropped.
    pub fn publish(&mut self, count: usize) -> usize {
        let mut published = 0;
        for _ in 0..count {
            let update = self.next_update();
            if self.update_tx.send(update).is_ok() {
                published += 1;
            }
        }
        debug!(published, requested = count, "Synthetic batch published");
        published
    }

    /// Close the broadcast side: subscribers drain and then see `Closed`.
    pub fn close(self) {
        drop(self.update_tx);
    }

    pub fn securities(&self) -> &[Security] {
        &self.securities
    }
}

impl Iterator for SyntheticFeed {
    type Item = PriceUpdateEvent;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_update())
    }
}

impl PriceFeed for SyntheticFeed {
    fn subscribe(&self) -> broadcast::Receiver<PriceUpdateEvent> {
        self.update_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> SyntheticFeed {
        SyntheticFeed::new(
            vec!["IBM".to_string(), "GOOGLE".to_string()],
            1.0,
            100.0,
            StdRng::seed_from_u64(seed),
        )
        .unwrap()
    }

    #[test]
    fn test_updates_stay_in_universe_and_range() {
        let mut feed = seeded(1);
        for update in feed.batch(500) {
            assert!(update.security == "IBM" || update.security == "GOOGLE");
            assert!((1.0..=100.0).contains(&update.price), "price {}", update.price);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = seeded(42).batch(20);
        let b = seeded(42).batch(20);
        assert_eq!(a, b);
    }

    #[test]
    fn test_degenerate_range() {
        let mut feed =
            SyntheticFeed::new(vec!["IBM".to_string()], 5.0, 5.0, StdRng::seed_from_u64(3))
                .unwrap();
        assert_eq!(feed.next_update(), PriceUpdateEvent::new("IBM", 5.0));
    }

    #[test]
    fn test_rejects_empty_universe_and_bad_range() {
        assert!(SyntheticFeed::new(Vec::new(), 1.0, 2.0, StdRng::seed_from_u64(0)).is_err());
        assert!(
            SyntheticFeed::new(vec!["IBM".to_string()], 2.0, 1.0, StdRng::seed_from_u64(0))
                .is_err()
        );
    }

    #[test]
    fn test_from_config_uses_seed() {
        let config = SimulationConfig {
            seed: Some(9),
            ..SimulationConfig::default()
        };
        let a = SyntheticFeed::from_config(&config).unwrap().batch(10);
        let b = SyntheticFeed::from_config(&config).unwrap().batch(10);
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let mut feed = seeded(5);
        let mut rx = feed.subscribe();

        assert_eq!(feed.publish(3), 3);
        feed.close();

        let mut received = 0;
        while rx.recv().await.is_ok() {
            received += 1;
        }
        assert_eq!(received, 3);
    }

    #[test]
    fn test_publish_without_subscribers_drops() {
        let mut feed = seeded(5);
        assert_eq!(feed.publish(3), 0);
    }
}
