//! Trigger Benchmarks - Hot-Path Performance Validation
//!
//! Benchmarks the code that runs on every price update: the
//! listener's no-op paths and the strategy's dispatch lookup.
//!
//! Run with: cargo bench --bench trigger_bench

use std::sync::Arc;

use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use price_trigger_bot::domain::PriceUpdateEvent;
use price_trigger_bot::ports::ExecutionPort;
use price_trigger_bot::usecases::{PriceTriggerListener, ThresholdStrategy};

struct NullPort;

#[async_trait]
impl ExecutionPort for NullPort {
    async fn buy(&self, _security: &str, _price: f64, _quantity: u32) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Benchmark an update that does not qualify (price above trigger).
fn bench_listener_miss(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let listener = PriceTriggerListener::new("IBM", 50.0, 100, Arc::new(NullPort)).unwrap();

    c.bench_function("listener_miss", |b| {
        b.to_async(&rt).iter(|| async {
            listener
                .on_price_update(black_box("IBM"), black_box(75.0))
                .await
                .unwrap();
        });
    });
}

/// Benchmark an update arriving after the buy already executed.
fn bench_listener_executed(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let listener =
        PriceTriggerListener::with_state("IBM", 50.0, 100, Arc::new(NullPort), true).unwrap();

    c.bench_function("listener_executed", |b| {
        b.to_async(&rt).iter(|| async {
            listener
                .on_price_update(black_box("IBM"), black_box(10.0))
                .await
                .unwrap();
        });
    });
}

/// Benchmark strategy dispatch to an armed listener.
fn bench_strategy_dispatch(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let strategy = ThresholdStrategy::new(Arc::new(NullPort));
    for i in 0..100 {
        let security = format!("SEC{i}");
        strategy.set_buy_threshold(&security, 50.0);
        strategy.arm(&security, 10).unwrap();
    }
    let event = PriceUpdateEvent::new("SEC42", 75.0);

    c.bench_function("strategy_dispatch_100_armed", |b| {
        b.to_async(&rt).iter(|| async {
            strategy.on_price_update(black_box(&event)).await.unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_listener_miss,
    bench_listener_executed,
    bench_strategy_dispatch
);
criterion_main!(benches);
